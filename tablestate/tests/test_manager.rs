//! Manager tests: default elision, first-update suppression, url writes
//!
//! ## Running
//!
//! ```bash
//! cargo test -p tablestate --test test_manager
//! ```

mod common;

use tablestate::{codec, prelude::*};

use common::{TestResult, check, param_of, settle, url_state, url_table, url_table_at};

// =============================================================================
// Default elision
// =============================================================================

#[test_log::test]
fn test_filter_with_default_pagination() -> TestResult<()> {
    let mut table = url_table("/catalogue/items");
    settle(&mut table, &["name", "cost"]);
    table.set_pagination(Pagination::new(0, 15));
    table.set_column_filters(vec![ColumnFilter::text("name", "abc")]);

    let token = param_of(&table).unwrap_or_default();
    check(!token.is_empty(), "state parameter missing")?;

    let decoded = codec::try_decode(&token)?;
    assert_eq!(
        decoded,
        ViewState {
            column_filters: Some(vec![ColumnFilter::text("name", "abc")]),
            ..ViewState::default()
        }
    );
    assert_eq!(codec::try_encode(&decoded)?, token);
    Ok(())
}

#[test_log::test]
fn test_clearing_filters_removes_parameter() {
    let mut table = url_table_at("/catalogue/items?tab=2");
    settle(&mut table, &["name"]);
    table.set_column_filters(vec![ColumnFilter::text("name", "abc")]);
    assert!(param_of(&table).is_some());

    table.set_column_filters(vec![]);
    assert_eq!(param_of(&table), None);
    assert_eq!(table.history().location().href(), "/catalogue/items?tab=2");
}

#[test_log::test]
fn test_clearing_one_dimension_keeps_others() {
    let mut table = url_table("/items");
    table.set_column_filters(vec![ColumnFilter::text("name", "abc")]);
    table.set_sorting(vec![ColumnSort::asc("cost")]);
    table.set_column_filters(vec![]);

    let state = url_state(&table);
    assert_eq!(state.column_filters, None);
    assert_eq!(state.sorting, Some(vec![ColumnSort::asc("cost")]));
}

#[test_log::test]
fn test_setting_default_twice_is_idempotent() {
    let mut table = url_table("/items");
    table.set_global_filter(Some("pump".to_string()));
    table.set_global_filter(None);
    let href = table.history().location().href();
    let writes = table.history().replace_count();

    table.set_global_filter(None);
    assert_eq!(table.history().location().href(), href);
    assert_eq!(table.history().replace_count(), writes);
    assert_eq!(param_of(&table), None);
}

#[test_log::test]
fn test_partial_range_is_not_default() {
    let mut table = url_table("/items");
    table.set_column_filters(vec![ColumnFilter::range("cost", FilterScalar::Null, 100_i64)]);
    assert_eq!(
        url_state(&table).column_filters,
        Some(vec![ColumnFilter::range("cost", FilterScalar::Null, 100_i64)])
    );

    table.set_column_filters(vec![ColumnFilter::range(
        "cost",
        FilterScalar::Null,
        FilterScalar::Null,
    )]);
    assert_eq!(param_of(&table), None);
}

#[test_log::test]
fn test_non_default_page_size_on_first_page_kept() {
    let mut table = url_table("/items");
    settle(&mut table, &["name", "cost"]);
    table.set_pagination(Pagination::new(0, 30));
    assert_eq!(url_state(&table).pagination, Some(Pagination::new(0, 30)));
}

#[test_log::test]
fn test_zero_page_size_in_link_reads_as_default() {
    let token = codec::encode(&ViewState {
        pagination: Some(Pagination::new(0, 0)),
        sorting: Some(vec![ColumnSort::asc("name")]),
        ..ViewState::default()
    });
    let table = url_table_at(&format!("/items?state={token}"));
    assert_eq!(table.state().pagination, Pagination::default());
    assert_eq!(table.state().sorting, vec![ColumnSort::asc("name")]);
}

// =============================================================================
// First-update suppression
// =============================================================================

#[test_log::test]
fn test_spurious_first_pagination_ignored() {
    let mut table = url_table("/items");
    table.set_pagination(Pagination::new(0, 15));
    assert_eq!(param_of(&table), None);
    assert_eq!(table.history().replace_count(), 0);

    table.set_pagination(Pagination::new(1, 15));
    assert_eq!(url_state(&table).pagination, Some(Pagination::new(1, 15)));
}

#[test_log::test]
fn test_first_update_not_ignored_when_url_has_value() {
    let token = codec::encode(&ViewState {
        pagination: Some(Pagination::new(4, 15)),
        column_order: Some(vec!["cost".to_string(), "name".to_string()]),
        ..ViewState::default()
    });
    let mut table = url_table_at(&format!("/items?state={token}"));
    assert_eq!(table.state().pagination, Pagination::new(4, 15));

    // navigating away from the shared page is a real update
    table.set_pagination(Pagination::new(0, 15));
    assert_eq!(url_state(&table).pagination, None);

    table.set_column_order(vec!["name".to_string(), "cost".to_string()]);
    assert_eq!(
        url_state(&table).column_order,
        Some(vec!["name".to_string(), "cost".to_string()])
    );
}

#[test_log::test]
fn test_pagination_only_writes_first_update() {
    let config = PreservedStateConfig::default()
        .store_in_url(true)
        .pagination_only(true)
        .initial(InitialState {
            pagination: Some(Pagination::new(0, 24)),
            ..InitialState::default()
        });
    let mut cards = PreservedTableState::new(config, MemoryHistory::new("/systems", ""));
    cards.set_pagination(Updater::from_fn(|prev: &Pagination| {
        Pagination::new(prev.page_index + 1, prev.page_size)
    }));
    assert_eq!(url_state(&cards).pagination, Some(Pagination::new(1, 24)));

    cards.set_pagination(Pagination::new(0, 24));
    assert_eq!(param_of(&cards), None);
}

// =============================================================================
// Url handling
// =============================================================================

#[test_log::test]
fn test_malformed_url_reads_as_default() {
    let mut table = url_table_at("/items?state=not-a-state&tab=1");
    assert!(table.view_state().is_empty());
    assert_eq!(table.state().pagination, Pagination::default());

    // the next write replaces the garbage
    table.set_sorting(vec![ColumnSort::desc("created")]);
    assert_eq!(
        url_state(&table).sorting,
        Some(vec![ColumnSort::desc("created")])
    );
    assert_eq!(table.history().location().param("tab").as_deref(), Some("1"));
}

#[test_log::test]
fn test_url_writes_replace_history_entry() {
    let mut table = url_table("/items");
    table.set_sorting(vec![ColumnSort::asc("name")]);
    table.set_sorting(vec![ColumnSort::desc("name")]);
    table.set_global_filter(Some("pump".to_string()));
    assert_eq!(table.history().entry_count(), 1);
    assert_eq!(table.history().replace_count(), 3);
}

#[test_log::test]
fn test_share_href_reproduces_view() -> TestResult<()> {
    let mut table = url_table("/catalogue/items");
    settle(&mut table, &["name", "cost"]);
    table.set_grouping(vec!["manufacturer".to_string()]);
    table.set_pagination(Pagination::new(2, 15));

    let href = table.share_href().unwrap_or_default();
    let other = url_table_at(&href);
    check(
        other.view_state() == table.view_state(),
        "shared link does not reproduce the view",
    )?;
    assert_eq!(other.state().pagination, Pagination::new(2, 15));
    assert_eq!(other.state().grouping, vec!["manufacturer".to_string()]);
    Ok(())
}

#[test_log::test]
fn test_custom_param_name() {
    let config = PreservedStateConfig::default()
        .store_in_url(true)
        .url_param_name("parts");
    let mut table = PreservedTableState::new(config, MemoryHistory::new("/items", ""));
    table.set_sorting(vec![ColumnSort::asc("name")]);
    let location = table.history().location();
    assert_eq!(location.param("state"), None);
    assert!(location.param("parts").is_some());
}
