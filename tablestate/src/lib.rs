/*
 * tablestate - preserve data-table view state in the page URL
 *
 * SPDX-FileCopyrightText: 2025-2026 Steve Schoettler
 * SPDX-License-Identifier: Apache-2.0
 */
//! # Table view-state preservation
//!
//! Keeps the visual/query configuration of a data table (filters, filter modes,
//! sorting, column visibility, global search, grouping, column order, pagination)
//! in sync with a single, shareable URL query parameter.
//!
//! ## Features
//!
//! - compact, URL-safe encoding (JSON + DEFLATE + base64url)
//! - type-tagged filter values, so dates survive the round trip exactly
//! - default elision: dimensions at their default are never written to the URL
//! - suppression of the spurious first update a table component emits after mount
//! - browser back/forward handled as navigation, in-page changes as url replacement
//! - several independent states on one URL (configurable parameter name)
//!
//! ## Quick Start
//!
//! ```rust
//! use tablestate::prelude::*;
//!
//! let history = MemoryHistory::new("/catalogue/items", "");
//! let config = PreservedStateConfig::default().store_in_url(true);
//! let mut table = PreservedTableState::new(config, history);
//!
//! // hand `table.state()` to the table component, and route its change
//! // callbacks to the matching setters
//! table.set_column_filters(vec![ColumnFilter::text("name", "abc")]);
//! table.set_sorting(Updater::from_fn(|prev: &Vec<ColumnSort>| {
//!     let mut next = prev.clone();
//!     next.push(ColumnSort::desc("created_time"));
//!     next
//! }));
//!
//! let href = table.share_href().unwrap_or_default();
//! assert!(href.starts_with("/catalogue/items?state="));
//!
//! // after browser back/forward, tell the manager the location moved
//! table.location_changed();
//! ```
//!
//! ## Codec only
//!
//! ```rust
//! use tablestate::prelude::*;
//!
//! let state = ViewState {
//!     global_filter: Some("pump".to_string()),
//!     ..ViewState::default()
//! };
//! let token = tablestate::codec::encode(&state);
//! assert_eq!(tablestate::codec::decode(Some(token.as_str())), state);
//!
//! // garbage never fails, it decodes to the default state
//! assert!(tablestate::codec::decode(Some("not json")).is_empty());
//! ```
//!
#![allow(clippy::missing_errors_doc)] // pedantic
#![allow(clippy::missing_const_for_fn)] //  nursery function
#![allow(clippy::must_use_candidate)] // pedantic
#![warn(clippy::default_trait_access)]
#![warn(clippy::doc_markdown)]
#![warn(clippy::explicit_iter_loop)]
#![warn(clippy::implicit_clone)]
#![warn(clippy::match_same_arms)]
#![warn(clippy::min_ident_chars)]
#![warn(clippy::needless_raw_strings)]
#![warn(clippy::option_if_let_else)]
#![warn(clippy::redundant_clone)]
#![warn(clippy::ref_option)]
#![warn(clippy::redundant_closure)]
#![warn(clippy::uninlined_format_args)]
#![warn(clippy::unnecessary_wraps)]

pub mod codec;
pub mod config;
pub mod error;
pub mod location;
pub mod manager;
pub mod state;
pub mod updater;

pub mod test_util;

/// Result type alias using `TableStateError` as the default error.
pub type Result<T, E = crate::error::TableStateError> = std::result::Result<T, E>;

/// Prelude module - import the common types with `use tablestate::prelude::*;`
pub mod prelude {
    pub use super::{DEFAULT_PAGE_SIZE, DEFAULT_URL_PARAM_NAME};
    // Error types
    pub use crate::error::*;
    pub use crate::{
        // Wire format
        codec::{SerializedViewState, TaggedFilterValue, TaggedScalar, ValueTag},
        // Configuration
        config::{InitialState, PreservedStateConfig},
        // Routing / history
        location::{History, Location, MemoryHistory},
        // Manager
        manager::{PreservedTableState, SyncAction, reconcile},
        // View-state values
        state::{
            ColumnFilter, ColumnSort, ColumnVisibility, Dimension, FilterModes, FilterScalar,
            FilterValue, Pagination, TableState, ViewState,
        },
        // Value-or-function setter argument
        updater::Updater,
    };
}

// ============================================================================
// CONSTANTS
// ============================================================================

/// Query parameter holding the encoded view state, unless configured otherwise.
pub const DEFAULT_URL_PARAM_NAME: &str = "state";

/// Page size used when the consumer does not configure initial pagination.
pub const DEFAULT_PAGE_SIZE: usize = 15;

pub(crate) mod limits {
    /// Upper bound for an inflated view-state payload (bytes).
    /// Larger payloads are treated as malformed.
    pub const MAX_DECODED_STATE_LEN: u64 = 1024 * 1024;
}
