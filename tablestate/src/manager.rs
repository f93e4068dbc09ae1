//! Preserved table state manager
//!
//! [`PreservedTableState`] owns the view state of one table instance. It hands the
//! effective state to the table component ([`state`](PreservedTableState::state)),
//! receives the component's change callbacks through one setter per dimension, and
//! keeps the url query parameter in step with the state.
//!
//! ## Defaults
//!
//! Each setter stores `None` for a dimension that equals its default, so the url only
//! ever carries what differs from a fresh page. What counts as default is decided per
//! dimension:
//!
//! | dimension | default when |
//! | --- | --- |
//! | column filters | every filter is blank (ranges: every end blank) |
//! | filter modes | equal to the configured initial modes |
//! | sorting | empty |
//! | column visibility | every column matches the initial visibility, or is visible when not listed |
//! | global filter | absent or empty |
//! | grouping | equal to the configured initial grouping |
//! | column order | empty, or equal to the ignored first update |
//! | pagination | equal to the ignored first update, else the configured initial pagination |
//!
//! ## First update
//!
//! Table components emit a column-order and a pagination update shortly after mount,
//! without any user action. The first such update of each dimension is ignored and
//! cached as that dimension's default, unless the url already carried the dimension
//! on load. Pagination is not suppressed in `pagination_only` mode.
//!
//! ## Synchronization
//!
//! After every setter call, and whenever the host reports a location change, the
//! manager runs [`reconcile`]:
//! - same location as at the last sync, state differs from the url: the url is
//!   rewritten in place (replace, no new history entry)
//! - different location (back/forward, another route): the url wins and the state is
//!   re-read from it
//!
//! Locations are compared by path and this table's own parameter only. Another table
//! writing its parameter into the same url does not count as a navigation.
//!

use tracing::{debug, trace};

use crate::{
    codec,
    config::PreservedStateConfig,
    location::{History, Location},
    state::{
        ColumnFilter, ColumnSort, ColumnVisibility, Dimension, FilterModes, Pagination,
        TableState, ViewState,
    },
    updater::Updater,
};

/// First-update handling for one dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Baseline<T> {
    /// The next update is the table's initial noise: ignore it and cache it.
    Pending,
    /// The ignored first update. Used as the dimension's default.
    Ignored(T),
    /// No suppression; the configured default applies.
    Settled,
}

impl<T> Baseline<T> {
    fn on_load(present_in_url: bool) -> Self {
        if present_in_url {
            Baseline::Settled
        } else {
            Baseline::Pending
        }
    }

    fn ignored(&self) -> Option<&T> {
        match self {
            Baseline::Ignored(value) => Some(value),
            Baseline::Pending | Baseline::Settled => None,
        }
    }
}

/// Outcome of reconciling the internal state with the url.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    /// State and url agree.
    Unchanged,
    /// In-page change: replace the parameter with `value`, or remove it when `None`.
    WriteUrl { value: Option<String> },
    /// The location moved: take the state decoded from the url.
    AdoptUrl {
        state: ViewState,
        path_changed: bool,
    },
}

/// Decides which side wins when the internal state and the url state differ.
///
/// `current` is the location now; `last_synced` the location recorded at the previous
/// synchronization (`None` before the first one, treated as the same page).
pub fn reconcile(
    internal: &ViewState,
    url_state: &ViewState,
    current: &Location,
    last_synced: Option<&Location>,
) -> SyncAction {
    if codec::to_json(internal).ok() == codec::to_json(url_state).ok() {
        return SyncAction::Unchanged;
    }
    let same_location = last_synced.is_none_or(|last| last.href() == current.href());
    if same_location {
        let value = if internal.is_empty() {
            None
        } else {
            Some(codec::encode(internal))
        };
        SyncAction::WriteUrl { value }
    } else {
        SyncAction::AdoptUrl {
            state: url_state.clone(),
            path_changed: last_synced.is_some_and(|last| last.path != current.path),
        }
    }
}

/// View state of one table, preserved in the url (or in memory).
///
/// Setters take either a value or an [`Updater::from_fn`] transform of the current
/// effective value, matching the table component's change-callback contract.
#[derive(Debug)]
pub struct PreservedTableState<H: History> {
    config: PreservedStateConfig,
    history: H,
    state: ViewState,
    column_order_baseline: Baseline<Vec<String>>,
    pagination_baseline: Baseline<Pagination>,
    last_synced: Option<Location>,
}

impl<H: History> PreservedTableState<H> {
    /// Creates the manager. With `store_in_url`, the initial state is read from the
    /// configured query parameter; a malformed parameter reads as the default state.
    pub fn new(config: PreservedStateConfig, history: H) -> Self {
        let (state, last_synced) = if config.store_in_url {
            let location = history.location();
            let state = codec::decode(location.param(&config.url_param_name).as_deref());
            (state, Some(location.scoped(&config.url_param_name)))
        } else {
            (ViewState::default(), None)
        };
        let column_order_baseline = Baseline::on_load(state.column_order.is_some());
        let pagination_baseline = if config.pagination_only {
            Baseline::Settled
        } else {
            Baseline::on_load(state.pagination.is_some())
        };
        Self {
            config,
            history,
            state,
            column_order_baseline,
            pagination_baseline,
            last_synced,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    /// Effective state for the table component, defaults filled in.
    pub fn state(&self) -> TableState {
        TableState {
            column_filters: self.column_filters(),
            column_filter_modes: self.column_filter_modes(),
            sorting: self.sorting(),
            column_visibility: self.column_visibility(),
            global_filter: self.state.global_filter.clone(),
            grouping: self.grouping(),
            column_order: self.column_order(),
            pagination: self.pagination(),
        }
    }

    /// Stored state: only the dimensions that differ from their defaults.
    pub fn view_state(&self) -> &ViewState {
        &self.state
    }

    pub fn config(&self) -> &PreservedStateConfig {
        &self.config
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    /// Mutable access to the history, e.g. to navigate. Call
    /// [`location_changed`](Self::location_changed) afterwards.
    pub fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }

    /// Href (path and query) that reproduces this view, or `None` when the state
    /// is not kept in the url.
    pub fn share_href(&self) -> Option<String> {
        if !self.config.store_in_url {
            return None;
        }
        let location = self.history.location();
        let value = (!self.state.is_empty()).then(|| codec::encode(&self.state));
        let query = location.with_param(&self.config.url_param_name, value.as_deref());
        Some(Location::new(location.path, query).href())
    }

    fn column_filters(&self) -> Vec<ColumnFilter> {
        self.state.column_filters.clone().unwrap_or_default()
    }

    fn column_filter_modes(&self) -> FilterModes {
        self.state
            .column_filter_modes
            .clone()
            .unwrap_or_else(|| self.default_filter_modes())
    }

    fn sorting(&self) -> Vec<ColumnSort> {
        self.state.sorting.clone().unwrap_or_default()
    }

    fn column_visibility(&self) -> ColumnVisibility {
        self.state
            .column_visibility
            .clone()
            .unwrap_or_else(|| self.default_visibility())
    }

    fn grouping(&self) -> Vec<String> {
        self.state
            .grouping
            .clone()
            .unwrap_or_else(|| self.default_grouping())
    }

    fn column_order(&self) -> Vec<String> {
        self.state
            .column_order
            .clone()
            .unwrap_or_else(|| self.default_column_order())
    }

    fn pagination(&self) -> Pagination {
        self.state
            .pagination
            .unwrap_or_else(|| self.default_pagination())
    }

    // ========================================================================
    // DEFAULTS
    // ========================================================================

    fn default_filter_modes(&self) -> FilterModes {
        self.config
            .initial
            .column_filter_modes
            .clone()
            .unwrap_or_default()
    }

    fn default_visibility(&self) -> ColumnVisibility {
        self.config
            .initial
            .column_visibility
            .clone()
            .unwrap_or_default()
    }

    fn default_grouping(&self) -> Vec<String> {
        self.config.initial.grouping.clone().unwrap_or_default()
    }

    fn default_column_order(&self) -> Vec<String> {
        self.column_order_baseline
            .ignored()
            .cloned()
            .unwrap_or_default()
    }

    fn default_pagination(&self) -> Pagination {
        self.pagination_baseline
            .ignored()
            .copied()
            .or(self.config.initial.pagination)
            .unwrap_or_default()
    }

    fn is_default_visibility(&self, visibility: &ColumnVisibility) -> bool {
        let initial = self.config.initial.column_visibility.as_ref();
        visibility.iter().all(|(id, visible)| {
            *visible
                == initial
                    .and_then(|initial| initial.get(id).copied())
                    .unwrap_or(true)
        })
    }

    // ========================================================================
    // SETTERS
    // ========================================================================

    pub fn set_column_filters<'a>(&mut self, updater: impl Into<Updater<'a, Vec<ColumnFilter>>>) {
        let next = updater.into().resolve(&self.column_filters());
        let is_default = next.iter().all(ColumnFilter::is_blank);
        self.state.column_filters = keep(Dimension::ColumnFilters, next, is_default);
        self.sync();
    }

    pub fn set_column_filter_modes<'a>(&mut self, updater: impl Into<Updater<'a, FilterModes>>) {
        let next = updater.into().resolve(&self.column_filter_modes());
        let is_default = next == self.default_filter_modes();
        self.state.column_filter_modes = keep(Dimension::ColumnFilterModes, next, is_default);
        self.sync();
    }

    pub fn set_sorting<'a>(&mut self, updater: impl Into<Updater<'a, Vec<ColumnSort>>>) {
        let next = updater.into().resolve(&self.sorting());
        let is_default = next.is_empty();
        self.state.sorting = keep(Dimension::Sorting, next, is_default);
        self.sync();
    }

    pub fn set_column_visibility<'a>(
        &mut self,
        updater: impl Into<Updater<'a, ColumnVisibility>>,
    ) {
        let next = updater.into().resolve(&self.column_visibility());
        let is_default = self.is_default_visibility(&next);
        self.state.column_visibility = keep(Dimension::ColumnVisibility, next, is_default);
        self.sync();
    }

    pub fn set_global_filter<'a>(&mut self, updater: impl Into<Updater<'a, Option<String>>>) {
        let next = updater.into().resolve(&self.state.global_filter);
        self.state.global_filter = next.filter(|text| !text.is_empty());
        self.sync();
    }

    pub fn set_grouping<'a>(&mut self, updater: impl Into<Updater<'a, Vec<String>>>) {
        let next = updater.into().resolve(&self.grouping());
        let is_default = next == self.default_grouping();
        self.state.grouping = keep(Dimension::Grouping, next, is_default);
        self.sync();
    }

    pub fn set_column_order<'a>(&mut self, updater: impl Into<Updater<'a, Vec<String>>>) {
        let next = updater.into().resolve(&self.column_order());
        if self.column_order_baseline == Baseline::Pending {
            trace!(?next, "ignoring first column order update");
            self.column_order_baseline = Baseline::Ignored(next);
            return;
        }
        let is_default = next.is_empty() || next == self.default_column_order();
        self.state.column_order = keep(Dimension::ColumnOrder, next, is_default);
        self.sync();
    }

    pub fn set_pagination<'a>(&mut self, updater: impl Into<Updater<'a, Pagination>>) {
        let next = updater.into().resolve(&self.pagination());
        if self.pagination_baseline == Baseline::Pending {
            trace!(?next, "ignoring first pagination update");
            self.pagination_baseline = Baseline::Ignored(next);
            return;
        }
        let is_default = next == self.default_pagination();
        self.state.pagination = keep(Dimension::Pagination, next, is_default);
        self.sync();
    }

    /// Returns every dimension to its default (one url update).
    pub fn reset(&mut self) {
        self.state = ViewState::default();
        self.sync();
    }

    // ========================================================================
    // SYNCHRONIZATION
    // ========================================================================

    /// Tells the manager the location changed (browser back/forward, route change,
    /// or any other navigation). The url is authoritative after a navigation.
    pub fn location_changed(&mut self) {
        self.sync();
    }

    fn sync(&mut self) {
        if !self.config.store_in_url {
            return;
        }
        let param_name = self.config.url_param_name.clone();
        let current = self.history.location();
        let url_state = codec::decode(current.param(&param_name).as_deref());
        let scoped = current.scoped(&param_name);

        match reconcile(&self.state, &url_state, &scoped, self.last_synced.as_ref()) {
            SyncAction::Unchanged => {}
            SyncAction::WriteUrl { value } => {
                debug!(
                    param = %param_name,
                    removed = value.is_none(),
                    "replacing view state in url"
                );
                let query = current.with_param(&param_name, value.as_deref());
                self.history.replace_query(&query);
            }
            SyncAction::AdoptUrl {
                state,
                path_changed,
            } => {
                debug!(
                    href = %current.href(),
                    path_changed,
                    "location changed, reading view state from url"
                );
                if path_changed {
                    self.pagination_baseline = if self.config.pagination_only {
                        Baseline::Settled
                    } else {
                        Baseline::on_load(state.pagination.is_some())
                    };
                }
                self.state = state;
            }
        }
        self.last_synced = Some(self.history.location().scoped(&param_name));
    }
}

/// Stores `value` unless it is the dimension's default.
fn keep<T>(dimension: Dimension, value: T, is_default: bool) -> Option<T> {
    if is_default {
        trace!(%dimension, "dimension at default, omitted from url");
        None
    } else {
        Some(value)
    }
}

// ============================================================================
// TESTS
// ============================================================================
