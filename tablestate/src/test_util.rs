//! Test utilities
//!
//! Helper functions used to test the `tablestate` library.
//! These are not part of the supported api and are subject to change.
//!
#![doc(hidden)]

use chrono::{DateTime, TimeZone, Utc};
use snafu::prelude::*;

use crate::{
    codec,
    config::PreservedStateConfig,
    error::TableStateError,
    location::{History, MemoryHistory},
    manager::PreservedTableState,
    state::{ColumnFilter, ColumnSort, FilterScalar, Pagination, ViewState},
};

// =============================================================================
// TestError
// =============================================================================

#[doc(hidden)]
pub type TestResult<T> = std::result::Result<T, TestError>;

#[doc(hidden)]
#[derive(Debug, Snafu)]
pub enum TestError {
    #[snafu(display("table state error: {source}"))]
    TableState { source: TableStateError },

    #[snafu(display("Test assertion failed: {message}"))]
    Assertion { message: String },
}

impl From<TableStateError> for TestError {
    fn from(source: TableStateError) -> Self {
        TestError::TableState { source }
    }
}

// =============================================================================
// Managers
// =============================================================================

/// Manager keeping its state in the url of a fresh in-memory history at `path`.
pub fn url_table(path: &str) -> PreservedTableState<MemoryHistory> {
    PreservedTableState::new(
        PreservedStateConfig::default().store_in_url(true),
        MemoryHistory::new(path, ""),
    )
}

/// Manager keeping its state in the url, starting at `href`.
pub fn url_table_at(href: &str) -> PreservedTableState<MemoryHistory> {
    PreservedTableState::new(
        PreservedStateConfig::default().store_in_url(true),
        MemoryHistory::from_href(href),
    )
}

/// Manager keeping its state in memory only.
pub fn in_memory_table() -> PreservedTableState<MemoryHistory> {
    PreservedTableState::new(
        PreservedStateConfig::default(),
        MemoryHistory::new("/items", ""),
    )
}

/// Consumes the first column-order and pagination updates the way a table
/// component does right after mount.
pub fn settle<H: History>(table: &mut PreservedTableState<H>, column_order: &[&str]) {
    table.set_column_order(
        column_order
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>(),
    );
    table.set_pagination(Pagination::default());
}

/// State currently held in the url under the manager's parameter name.
pub fn url_state<H: History>(table: &PreservedTableState<H>) -> ViewState {
    let name = table.config().get_url_param_name();
    codec::decode(table.history().location().param(name).as_deref())
}

// =============================================================================
// Fixtures
// =============================================================================

/// Fixed date with sub-millisecond precision.
pub fn sample_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 7, 14, 30, 5)
        .single()
        .unwrap_or_default()
        + chrono::Duration::microseconds(123_456)
}

/// A state touching every dimension.
pub fn sample_view_state() -> ViewState {
    ViewState {
        column_filters: Some(vec![
            ColumnFilter::text("name", "centrifugal pump"),
            ColumnFilter::range("cost", FilterScalar::Null, 100_i64),
            ColumnFilter::new("created", FilterScalar::date(sample_date())),
        ]),
        column_filter_modes: Some(
            [("name".to_string(), "contains".to_string())]
                .into_iter()
                .collect(),
        ),
        sorting: Some(vec![ColumnSort::desc("created"), ColumnSort::asc("name")]),
        column_visibility: Some([("notes".to_string(), false)].into_iter().collect()),
        global_filter: Some("valve".to_string()),
        grouping: Some(vec!["manufacturer".to_string()]),
        column_order: Some(vec![
            "created".to_string(),
            "name".to_string(),
            "cost".to_string(),
        ]),
        pagination: Some(Pagination::new(2, 30)),
    }
}
