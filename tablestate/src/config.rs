//! Manager configuration
//!
//! ```rust
//! use tablestate::prelude::*;
//!
//! // a table inside a dialog, sharing the page url with the table behind it
//! let config = PreservedStateConfig::default()
//!     .store_in_url(true)
//!     .url_param_name("dialogState")
//!     .initial(InitialState {
//!         pagination: Some(Pagination::new(0, 5)),
//!         ..InitialState::default()
//!     });
//! assert_eq!(config.get_url_param_name(), "dialogState");
//! ```

use crate::{
    DEFAULT_URL_PARAM_NAME,
    state::{ColumnVisibility, FilterModes, Pagination},
};

/// Per-table defaults. A dimension equal to its default is kept out of the url.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitialState {
    /// Default filter mode per column. Default: empty.
    pub column_filter_modes: Option<FilterModes>,

    /// Default visibility per column. Columns not listed are visible.
    pub column_visibility: Option<ColumnVisibility>,

    /// Default grouping. Default: no grouping.
    pub grouping: Option<Vec<String>>,

    /// Default pagination. Default: first page, `DEFAULT_PAGE_SIZE` rows.
    pub pagination: Option<Pagination>,
}

/// Configuration for a [`PreservedTableState`](crate::manager::PreservedTableState).
#[derive(Debug, Clone)]
pub struct PreservedStateConfig {
    /// Per-table defaults.
    pub initial: InitialState,

    /// Keep the state in the url query. When false the state lives in memory only,
    /// and the history is never read or written.
    pub store_in_url: bool,

    /// Query parameter holding the state. Use distinct names for tables that share
    /// one url (e.g. a table in a dialog over another table).
    pub url_param_name: String,

    /// The consumer only wires pagination (e.g. a card grid), so no table component
    /// will emit a spurious first pagination update to be ignored.
    pub pagination_only: bool,
}

impl Default for PreservedStateConfig {
    fn default() -> Self {
        PreservedStateConfig {
            initial: InitialState::default(),
            store_in_url: false,
            url_param_name: DEFAULT_URL_PARAM_NAME.to_string(),
            pagination_only: false,
        }
    }
}

impl PreservedStateConfig {
    pub fn initial(self, initial: InitialState) -> Self {
        PreservedStateConfig { initial, ..self }
    }

    pub fn store_in_url(self, store_in_url: bool) -> Self {
        PreservedStateConfig {
            store_in_url,
            ..self
        }
    }

    /// Sets the query parameter name. An empty name keeps the default.
    pub fn url_param_name(self, url_param_name: &str) -> Self {
        let url_param_name = if url_param_name.is_empty() {
            DEFAULT_URL_PARAM_NAME.to_string()
        } else {
            url_param_name.to_string()
        };
        PreservedStateConfig {
            url_param_name,
            ..self
        }
    }

    pub fn pagination_only(self, pagination_only: bool) -> Self {
        PreservedStateConfig {
            pagination_only,
            ..self
        }
    }

    pub fn get_url_param_name(&self) -> &str {
        &self.url_param_name
    }

    pub fn get_initial(&self) -> &InitialState {
        &self.initial
    }
}
