use crate::data::record::FieldValue;
use std::cmp::Ordering;

/// Rank used when two values have different types.
/// Order: Null < Boolean < number < String < List < Record
fn type_rank(value: &FieldValue) -> u8 {
    match value {
        FieldValue::Null => 0,
        FieldValue::Boolean(_) => 1,
        FieldValue::Integer(_) | FieldValue::Float(_) => 2,
        FieldValue::String(_) => 3,
        FieldValue::List(_) => 4,
        FieldValue::Record(_) => 5,
    }
}

/// NaN sorts after every other number; `-0.0` equals `0.0`
fn compare_floats(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) if a < b => Ordering::Less,
        (false, false) if a > b => Ordering::Greater,
        (false, false) => Ordering::Equal,
    }
}

/// Exact integer/float comparison. Casting the integer to f64 would round
/// values beyond 2^53.
fn compare_integer_float(i: i64, f: f64) -> Ordering {
    // 2^63, exactly representable
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;

    if f.is_nan() {
        return Ordering::Less;
    }
    if f >= LIMIT {
        return Ordering::Less;
    }
    if f < -LIMIT {
        return Ordering::Greater;
    }

    let whole = f.trunc();
    i.cmp(&(whole as i64)).then_with(|| {
        let fraction = f - whole;
        if fraction > 0.0 {
            Ordering::Less
        } else if fraction < 0.0 {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    })
}

/// Natural ordering of two field values.
///
/// Numbers compare numerically (Integer against Float by exact value, NaN
/// after all other numbers), strings lexicographically, booleans with
/// `false < true`. Null sorts first.
pub fn compare_values(a: &FieldValue, b: &FieldValue) -> Ordering {
    match (a, b) {
        (FieldValue::Integer(a), FieldValue::Integer(b)) => a.cmp(b),
        (FieldValue::Float(a), FieldValue::Float(b)) => compare_floats(*a, *b),
        (FieldValue::Integer(i), FieldValue::Float(f)) => compare_integer_float(*i, *f),
        (FieldValue::Float(f), FieldValue::Integer(i)) => compare_integer_float(*i, *f).reverse(),
        (FieldValue::String(a), FieldValue::String(b)) => a.cmp(b),
        (FieldValue::Boolean(a), FieldValue::Boolean(b)) => a.cmp(b),
        (FieldValue::Null, FieldValue::Null) => Ordering::Equal,

        // Lists compare element-wise, shorter list first on a shared prefix
        (FieldValue::List(a), FieldValue::List(b)) => {
            for (x, y) in a.iter().zip(b.iter()) {
                let ord = compare_values(x, y);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            a.len().cmp(&b.len())
        }

        // Nested records have no natural order
        (FieldValue::Record(_), FieldValue::Record(_)) => Ordering::Equal,

        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Compare optional values; a missing field sorts like Null
pub fn compare_optional_values(a: Option<&FieldValue>, b: Option<&FieldValue>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(b)) => compare_values(&FieldValue::Null, b),
        (Some(a), None) => compare_values(a, &FieldValue::Null),
        (Some(a), Some(b)) => compare_values(a, b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_comparison() {
        assert_eq!(
            compare_values(&FieldValue::Integer(1), &FieldValue::Integer(2)),
            Ordering::Less
        );
        assert_eq!(
            compare_values(&FieldValue::Integer(2), &FieldValue::Integer(2)),
            Ordering::Equal
        );
        assert_eq!(
            compare_values(&FieldValue::Integer(10), &FieldValue::Integer(9)),
            Ordering::Greater
        );
    }

    #[test]
    fn test_mixed_numeric_comparison() {
        assert_eq!(
            compare_values(&FieldValue::Integer(2), &FieldValue::Float(2.5)),
            Ordering::Less
        );
        assert_eq!(
            compare_values(&FieldValue::Float(3.0), &FieldValue::Integer(3)),
            Ordering::Equal
        );
    }

    #[test]
    fn test_nan_sorts_after_numbers() {
        let nan = FieldValue::Float(f64::NAN);
        assert_eq!(compare_values(&nan, &FieldValue::Float(f64::INFINITY)), Ordering::Greater);
        assert_eq!(compare_values(&FieldValue::Integer(i64::MAX), &nan), Ordering::Less);
        assert_eq!(compare_values(&nan, &FieldValue::Float(f64::NAN)), Ordering::Equal);
        assert_eq!(compare_values(&nan, &"a".into()), Ordering::Less);
        assert_eq!(
            compare_values(&FieldValue::Float(-0.0), &FieldValue::Float(0.0)),
            Ordering::Equal
        );
    }

    #[test]
    fn test_large_integers_against_floats() {
        // 2^53 + 1 rounds to 2^53 as f64
        let big = (1_i64 << 53) + 1;
        let float = FieldValue::Float((1_i64 << 53) as f64);
        assert_eq!(compare_values(&FieldValue::Integer(big), &float), Ordering::Greater);
        assert_eq!(compare_values(&float, &FieldValue::Integer(big)), Ordering::Less);

        assert_eq!(
            compare_values(&FieldValue::Integer(i64::MAX), &FieldValue::Float(9.3e18)),
            Ordering::Less
        );
        assert_eq!(
            compare_values(&FieldValue::Integer(i64::MIN), &FieldValue::Float(f64::NEG_INFINITY)),
            Ordering::Greater
        );
        assert_eq!(
            compare_values(&FieldValue::Integer(-3), &FieldValue::Float(-2.5)),
            Ordering::Less
        );
        assert_eq!(
            compare_values(&FieldValue::Integer(-2), &FieldValue::Float(-2.5)),
            Ordering::Greater
        );
    }

    #[test]
    fn test_string_comparison() {
        assert_eq!(
            compare_values(&"apple".into(), &"banana".into()),
            Ordering::Less
        );
    }

    #[test]
    fn test_null_and_missing_sort_first() {
        assert_eq!(
            compare_values(&FieldValue::Null, &FieldValue::Integer(1)),
            Ordering::Less
        );
        assert_eq!(
            compare_optional_values(None, Some(&FieldValue::Integer(1))),
            Ordering::Less
        );
        assert_eq!(
            compare_optional_values(None, Some(&FieldValue::Null)),
            Ordering::Equal
        );
    }

    #[test]
    fn test_cross_type_comparison() {
        assert_eq!(
            compare_values(&FieldValue::Boolean(true), &FieldValue::Integer(0)),
            Ordering::Less
        );
        assert_eq!(
            compare_values(&FieldValue::Float(1e9), &"a".into()),
            Ordering::Less
        );
    }
}
