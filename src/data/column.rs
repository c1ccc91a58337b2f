use crate::data::record::{FieldValue, Record};
use std::fmt;
use std::sync::Arc;

/// Cell formatting function: `(raw value, whole record) -> display text`
pub type CellRenderer = Arc<dyn Fn(Option<&FieldValue>, &Record) -> String + Send + Sync>;

/// Table-rendering metadata for one field
#[derive(Clone)]
pub struct ColumnDescriptor {
    pub key: String,
    pub label: String,
    pub sortable: bool,
    pub render: Option<CellRenderer>,
}

impl ColumnDescriptor {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            sortable: true,
            render: None,
        }
    }

    pub fn with_sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn with_render<F>(mut self, render: F) -> Self
    where
        F: Fn(Option<&FieldValue>, &Record) -> String + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(render));
        self
    }

    /// Produce the display text for this column's cell in `record`
    pub fn display(&self, record: &Record) -> String {
        let raw = record.get(&self.key);
        match &self.render {
            Some(render) => render(raw, record),
            None => raw.map(|v| v.to_string()).unwrap_or_default(),
        }
    }
}

impl fmt::Debug for ColumnDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("sortable", &self.sortable)
            .field("render", &self.render.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_value_without_renderer() {
        let column = ColumnDescriptor::new("age", "Age");
        let record = Record::new().with("age", 42);
        assert_eq!(column.display(&record), "42");
    }

    #[test]
    fn test_missing_and_null_render_empty() {
        let column = ColumnDescriptor::new("phone", "Phone");
        assert_eq!(column.display(&Record::new()), "");
        let record = Record::new().with("phone", FieldValue::Null);
        assert_eq!(column.display(&record), "");
    }

    #[test]
    fn test_renderer_sees_whole_record() {
        let column = ColumnDescriptor::new("adminName", "Admin").with_render(|value, row| {
            format!(
                "{} ({})",
                value.map(|v| v.to_string()).unwrap_or_default(),
                row.display_value("adminId")
            )
        });
        let record = Record::new().with("adminName", "Dana").with("adminId", "A-7");
        assert_eq!(column.display(&record), "Dana (A-7)");
        assert!(column.sortable);
    }
}
