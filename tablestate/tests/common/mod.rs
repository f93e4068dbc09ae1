//! Shared test utilities for tablestate integration tests
//!
//! - shared in-memory history for several managers
//! - query parameter inspection
#![cfg(test)]
#![allow(dead_code)]

use std::{cell::RefCell, rc::Rc};

use tablestate::prelude::*;

pub use tablestate::test_util::{
    TestError, TestResult, in_memory_table, sample_date, sample_view_state, settle, url_state,
    url_table, url_table_at,
};

pub type SharedHistory = Rc<RefCell<MemoryHistory>>;

/// One history (one browser tab) for several tables.
pub fn shared_history(href: &str) -> SharedHistory {
    Rc::new(RefCell::new(MemoryHistory::from_href(href)))
}

/// Manager on a shared history, state kept under `param`.
pub fn shared_table(history: &SharedHistory, param: &str) -> PreservedTableState<SharedHistory> {
    PreservedTableState::new(
        PreservedStateConfig::default()
            .store_in_url(true)
            .url_param_name(param),
        Rc::clone(history),
    )
}

/// Raw value of the manager's query parameter, if present.
pub fn param_of<H: History>(table: &PreservedTableState<H>) -> Option<String> {
    table
        .history()
        .location()
        .param(table.config().get_url_param_name())
}

/// Fails unless `condition` holds.
pub fn check(condition: bool, message: &str) -> TestResult<()> {
    if condition {
        Ok(())
    } else {
        Err(TestError::Assertion {
            message: message.to_string(),
        })
    }
}
