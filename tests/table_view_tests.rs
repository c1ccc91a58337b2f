use admin_tables::data::data_view::{PageBody, SortDirection};
use admin_tables::{ColumnDescriptor, FieldValue, Record, TableView};
use std::sync::Arc;

fn columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::new("id", "ID"),
        ColumnDescriptor::new("name", "Name"),
        ColumnDescriptor::new("team", "Team"),
    ]
}

fn ids(view: &TableView) -> Vec<i64> {
    view.sorted_records()
        .map(|r| match r.get("id") {
            Some(FieldValue::Integer(i)) => *i,
            other => panic!("unexpected id {:?}", other),
        })
        .collect()
}

#[test]
fn test_sort_then_toggle_direction() {
    let data = vec![
        Record::new().with("id", 3).with("name", "Bob"),
        Record::new().with("id", 1).with("name", "Amy"),
        Record::new().with("id", 2).with("name", "Cid"),
    ];
    let mut view = TableView::new(Arc::new(data), columns());

    assert!(view.set_sort("id"));
    assert_eq!(ids(&view), vec![1, 2, 3]);
    assert_eq!(view.sort_state().direction, SortDirection::Ascending);

    assert!(view.set_sort("id"));
    assert_eq!(ids(&view), vec![3, 2, 1]);
    assert_eq!(view.sort_state().direction, SortDirection::Descending);
}

#[test]
fn test_ties_keep_source_order_in_both_directions() {
    let data: Vec<Record> = (0..20)
        .map(|i| Record::new().with("id", i).with("team", ["red", "blue", "green"][i as usize % 3]))
        .collect();
    let mut view = TableView::new(Arc::new(data), columns());

    view.set_sort("team");
    let ascending: Vec<(String, i64)> = team_and_id(&view);
    view.set_sort("team");
    let descending: Vec<(String, i64)> = team_and_id(&view);

    for rows in [&ascending, &descending] {
        for pair in rows.windows(2) {
            if pair[0].0 == pair[1].0 {
                assert!(pair[0].1 < pair[1].1, "tie reordered: {:?}", pair);
            }
        }
    }

    let teams_up: Vec<&str> = ascending.iter().map(|(t, _)| t.as_str()).collect();
    let mut teams_down: Vec<&str> = descending.iter().map(|(t, _)| t.as_str()).collect();
    teams_down.reverse();
    assert_eq!(teams_up, teams_down);
}

fn team_and_id(view: &TableView) -> Vec<(String, i64)> {
    view.sorted_records()
        .map(|r| {
            let id = match r.get("id") {
                Some(FieldValue::Integer(i)) => *i,
                _ => -1,
            };
            (r.display_value("team"), id)
        })
        .collect()
}

#[test]
fn test_page_count_and_last_page() {
    let data: Vec<Record> = (1..=5).map(|i| Record::new().with("id", i)).collect();
    let mut view = TableView::new(Arc::new(data), columns()).with_page_size(2);
    assert_eq!(view.total_pages(), 3);

    view.set_page(3);
    assert_eq!(view.page_records().len(), 1);
    assert!(!view.has_next_page());

    view.set_page(99);
    assert_eq!(view.current_page(), 3);
}

#[test]
fn test_empty_collection_shows_placeholder() {
    let view = TableView::new(Arc::new(Vec::new()), columns());
    assert_eq!(view.total_pages(), 0);
    assert!(!view.show_pagination());

    let page = view.render_page();
    assert_eq!(
        page.body,
        PageBody::Placeholder {
            text: "No data available".to_string(),
            colspan: 3
        }
    );
    assert!(page.pagination.is_none());
}

#[test]
fn test_missing_and_null_render_empty() {
    let data = vec![Record::new().with("id", 1).with("name", FieldValue::Null)];
    let view = TableView::new(Arc::new(data), columns());
    match view.render_page().body {
        PageBody::Rows(rows) => assert_eq!(rows, vec![vec!["1".to_string(), String::new(), String::new()]]),
        other => panic!("expected rows, got {:?}", other),
    }
}

#[test]
fn test_shrinking_data_clamps_page() {
    let data: Vec<Record> = (1..=30).map(|i| Record::new().with("id", i)).collect();
    let mut view = TableView::new(Arc::new(data), columns());
    view.set_page(3);
    assert_eq!(view.current_page(), 3);

    let fewer: Vec<Record> = (1..=4).map(|i| Record::new().with("id", i)).collect();
    view.set_data(Arc::new(fewer));
    assert_eq!(view.current_page(), 1);
    assert_eq!(view.page_records().len(), 4);
}

#[test]
fn test_invalid_sort_key_keeps_previous_state() {
    let data = vec![
        Record::new().with("id", 2),
        Record::new().with("id", 1),
    ];
    let columns = vec![
        ColumnDescriptor::new("id", "ID"),
        ColumnDescriptor::new("phone", "Phone").with_sortable(false),
    ];
    let mut view = TableView::new(Arc::new(data), columns);
    view.set_sort("id");
    let before = view.sort_state().clone();

    assert!(!view.set_sort("phone"));
    assert!(!view.set_sort("no_such_column"));
    assert_eq!(view.sort_state(), &before);
    assert_eq!(ids(&view), vec![1, 2]);
}
