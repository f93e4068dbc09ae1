//! Navigation tests: back/forward, route changes, tables sharing one url
//!
//! ## Running
//!
//! ```bash
//! cargo test -p tablestate --test test_navigation
//! ```

mod common;

use tablestate::{codec, prelude::*};

use common::{in_memory_table, param_of, settle, shared_history, shared_table, url_state, url_table};

fn sorted_by(id: &str) -> String {
    codec::encode(&ViewState {
        sorting: Some(vec![ColumnSort::desc(id)]),
        ..ViewState::default()
    })
}

// =============================================================================
// Back / forward
// =============================================================================

#[test_log::test]
fn test_navigation_adopts_url_state() {
    let mut table = url_table("/items");
    settle(&mut table, &["name", "cost"]);
    table.set_sorting(vec![ColumnSort::asc("name")]);
    let first = table.history().location().href();
    let writes = table.history().replace_count();

    table
        .history_mut()
        .push(&format!("/items?state={}", sorted_by("cost")));
    table.location_changed();
    assert_eq!(table.state().sorting, vec![ColumnSort::desc("cost")]);
    assert_eq!(table.history().replace_count(), writes);

    assert!(table.history_mut().back());
    table.location_changed();
    assert_eq!(table.history().location().href(), first);
    assert_eq!(table.state().sorting, vec![ColumnSort::asc("name")]);
    assert_eq!(table.history().replace_count(), writes);
}

#[test_log::test]
fn test_stale_state_never_overwrites_url() {
    let mut table = url_table("/items");
    table.set_global_filter(Some("pump".to_string()));

    // navigation not yet reported when the next change arrives
    table
        .history_mut()
        .push(&format!("/items?state={}", sorted_by("created")));
    table.set_global_filter(Some("valve".to_string()));

    assert_eq!(
        url_state(&table).sorting,
        Some(vec![ColumnSort::desc("created")])
    );
    assert_eq!(table.view_state().global_filter, None);
    assert_eq!(table.state().sorting, vec![ColumnSort::desc("created")]);
}

#[test_log::test]
fn test_navigation_to_default_state() {
    let mut table = url_table("/items");
    table.set_sorting(vec![ColumnSort::asc("name")]);
    table.history_mut().push("/items");
    table.location_changed();
    assert!(table.view_state().is_empty());
    assert_eq!(param_of(&table), None);
}

// =============================================================================
// Route changes
// =============================================================================

#[test_log::test]
fn test_path_change_ignores_next_pagination_update() {
    let mut table = url_table("/systems/1");
    settle(&mut table, &["name"]);
    table.set_pagination(Pagination::new(3, 15));
    assert_eq!(url_state(&table).pagination, Some(Pagination::new(3, 15)));

    // the table re-mounts its rows for the new system and resets to the first page
    table.history_mut().push("/systems/2");
    table.location_changed();
    assert_eq!(table.state().pagination, Pagination::default());

    table.set_pagination(Pagination::new(0, 15));
    assert_eq!(param_of(&table), None);

    table.set_pagination(Pagination::new(1, 15));
    assert_eq!(url_state(&table).pagination, Some(Pagination::new(1, 15)));
}

#[test_log::test]
fn test_path_change_with_pagination_in_url() {
    let mut table = url_table("/systems/1");
    settle(&mut table, &["name"]);
    table.set_sorting(vec![ColumnSort::asc("name")]);

    let token = codec::encode(&ViewState {
        pagination: Some(Pagination::new(2, 15)),
        ..ViewState::default()
    });
    table.history_mut().push(&format!("/systems/2?state={token}"));
    table.location_changed();
    assert_eq!(table.state().pagination, Pagination::new(2, 15));

    table.set_pagination(Pagination::new(0, 15));
    assert_eq!(param_of(&table), None);
}

// =============================================================================
// Shared url
// =============================================================================

#[test_log::test]
fn test_two_tables_share_one_url() {
    let history = shared_history("/systems?tab=items");
    let mut systems = shared_table(&history, "state");
    let mut dialog = shared_table(&history, "subsystems");

    systems.set_sorting(vec![ColumnSort::asc("name")]);
    dialog.set_global_filter(Some("pump".to_string()));
    systems.set_global_filter(Some("valve".to_string()));

    let location = history.borrow().location();
    assert_eq!(location.param("tab").as_deref(), Some("items"));
    assert_eq!(url_state(&systems).global_filter.as_deref(), Some("valve"));
    assert_eq!(url_state(&systems).sorting, Some(vec![ColumnSort::asc("name")]));
    assert_eq!(url_state(&dialog).global_filter.as_deref(), Some("pump"));
    assert_eq!(url_state(&dialog).sorting, None);

    // closing the dialog clears only its own parameter
    dialog.reset();
    let location = history.borrow().location();
    assert_eq!(location.param("subsystems"), None);
    assert!(location.param("state").is_some());
    assert_eq!(history.borrow().entry_count(), 1);
}

// =============================================================================
// In memory
// =============================================================================

#[test_log::test]
fn test_in_memory_table_ignores_url() {
    let mut table = in_memory_table();
    table
        .history_mut()
        .push(&format!("/items?state={}", sorted_by("cost")));
    table.location_changed();
    assert!(table.view_state().is_empty());

    table.set_grouping(vec!["system".to_string()]);
    assert_eq!(table.state().grouping, vec!["system".to_string()]);
    assert_eq!(table.history().replace_count(), 0);
    assert_eq!(
        table.history().location().param("state").as_deref(),
        Some(sorted_by("cost").as_str())
    );
}
