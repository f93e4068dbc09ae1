//! View-state values
//!
//! [`ViewState`] is the stored, partial form: every dimension is an `Option`, and
//! `None` means "at its default". [`TableState`] is the effective form handed to the
//! table component, with every default filled in.
//!

use std::collections::BTreeMap;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::DEFAULT_PAGE_SIZE;

/// Active filter predicate name per column id (e.g. "contains", "between")
pub type FilterModes = BTreeMap<String, String>;

/// Visibility per column id. Columns missing from the map are visible.
pub type ColumnVisibility = BTreeMap<String, bool>;

/// One component of a filter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterScalar {
    /// No value (e.g. the unset end of a range).
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
    /// Timestamp, millisecond precision.
    Date(DateTime<Utc>),
    /// A date entry without a valid timestamp, such as a partially typed date.
    InvalidDate,
}

impl FilterScalar {
    /// Constructs a date scalar, truncated to milliseconds.
    pub fn date(date: DateTime<Utc>) -> Self {
        FilterScalar::Date(date.trunc_subsecs(3))
    }

    /// Returns true for values that filter nothing: null, empty text, or an invalid date.
    pub fn is_blank(&self) -> bool {
        match self {
            FilterScalar::Null | FilterScalar::InvalidDate => true,
            FilterScalar::Text(text) => text.is_empty(),
            FilterScalar::Bool(_) | FilterScalar::Number(_) | FilterScalar::Date(_) => false,
        }
    }
}

impl From<&str> for FilterScalar {
    fn from(text: &str) -> Self {
        FilterScalar::Text(text.to_string())
    }
}

impl From<String> for FilterScalar {
    fn from(text: String) -> Self {
        FilterScalar::Text(text)
    }
}

impl From<bool> for FilterScalar {
    fn from(value: bool) -> Self {
        FilterScalar::Bool(value)
    }
}

impl From<i64> for FilterScalar {
    fn from(value: i64) -> Self {
        FilterScalar::Number(Number::from(value))
    }
}

impl From<DateTime<Utc>> for FilterScalar {
    fn from(date: DateTime<Utc>) -> Self {
        FilterScalar::date(date)
    }
}

impl<T: Into<FilterScalar>> From<Option<T>> for FilterScalar {
    fn from(value: Option<T>) -> Self {
        value.map_or(FilterScalar::Null, Into::into)
    }
}

/// Value of a column filter: a single scalar, or the components of a
/// range / multi-value filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Scalar(FilterScalar),
    Range(Vec<FilterScalar>),
}

impl FilterValue {
    /// A scalar is blank when the scalar is; a range is blank when every component is.
    pub fn is_blank(&self) -> bool {
        match self {
            FilterValue::Scalar(scalar) => scalar.is_blank(),
            FilterValue::Range(values) => values.iter().all(FilterScalar::is_blank),
        }
    }
}

impl From<FilterScalar> for FilterValue {
    fn from(scalar: FilterScalar) -> Self {
        FilterValue::Scalar(scalar)
    }
}

macro_rules! scalar_filter_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for FilterValue {
                fn from(value: $ty) -> Self {
                    FilterValue::Scalar(value.into())
                }
            }
        )*
    };
}

scalar_filter_value!(&str, String, bool, i64, DateTime<Utc>);

/// Filter applied to one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnFilter {
    pub id: String,
    pub value: FilterValue,
}

impl ColumnFilter {
    pub fn new(id: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
        }
    }

    /// Constructs a free-text filter.
    pub fn text(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, FilterScalar::Text(text.into()))
    }

    /// Constructs a min/max range filter. Either end may be `FilterScalar::Null`.
    pub fn range(
        id: impl Into<String>,
        min: impl Into<FilterScalar>,
        max: impl Into<FilterScalar>,
    ) -> Self {
        Self {
            id: id.into(),
            value: FilterValue::Range(vec![min.into(), max.into()]),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.value.is_blank()
    }
}

/// Sort on one column. The first entry of a sort list is the primary sort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSort {
    pub id: String,
    #[serde(default)]
    pub desc: bool,
}

impl ColumnSort {
    /// Constructs an ascending sort.
    pub fn asc(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            desc: false,
        }
    }

    /// Constructs a descending sort.
    pub fn desc(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            desc: true,
        }
    }
}

/// Current page and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page_index: usize,
    pub page_size: usize,
}

impl Pagination {
    pub fn new(page_index: usize, page_size: usize) -> Self {
        Self {
            page_index,
            page_size,
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// The eight independently preserved dimensions of a table view.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[strum(serialize_all = "camelCase")]
pub enum Dimension {
    ColumnFilters,
    ColumnFilterModes,
    Sorting,
    ColumnVisibility,
    GlobalFilter,
    Grouping,
    ColumnOrder,
    Pagination,
}

impl Dimension {
    /// Key of this dimension in the encoded (url) form.
    pub fn wire_key(self) -> &'static str {
        match self {
            Dimension::ColumnFilters => "cF",
            Dimension::ColumnFilterModes => "cFn",
            Dimension::Sorting => "srt",
            Dimension::ColumnVisibility => "cVis",
            Dimension::GlobalFilter => "gFil",
            Dimension::Grouping => "g",
            Dimension::ColumnOrder => "cO",
            Dimension::Pagination => "p",
        }
    }
}

/// Stored view state. `None` in any field means that dimension is at its default,
/// which is what keeps it out of the url.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub column_filters: Option<Vec<ColumnFilter>>,
    pub column_filter_modes: Option<FilterModes>,
    pub sorting: Option<Vec<ColumnSort>>,
    pub column_visibility: Option<ColumnVisibility>,
    pub global_filter: Option<String>,
    pub grouping: Option<Vec<String>>,
    pub column_order: Option<Vec<String>>,
    pub pagination: Option<Pagination>,
}

impl ViewState {
    /// Returns true when every dimension is at its default.
    pub fn is_empty(&self) -> bool {
        self.present().is_empty()
    }

    /// Returns true when the dimension holds an explicit (non-default) value.
    pub fn has(&self, dimension: Dimension) -> bool {
        match dimension {
            Dimension::ColumnFilters => self.column_filters.is_some(),
            Dimension::ColumnFilterModes => self.column_filter_modes.is_some(),
            Dimension::Sorting => self.sorting.is_some(),
            Dimension::ColumnVisibility => self.column_visibility.is_some(),
            Dimension::GlobalFilter => self.global_filter.is_some(),
            Dimension::Grouping => self.grouping.is_some(),
            Dimension::ColumnOrder => self.column_order.is_some(),
            Dimension::Pagination => self.pagination.is_some(),
        }
    }

    /// Dimensions holding an explicit value, in canonical order.
    pub fn present(&self) -> Vec<Dimension> {
        use strum::IntoEnumIterator;
        Dimension::iter().filter(|dim| self.has(*dim)).collect()
    }
}

/// Effective view state: stored values with defaults filled in.
/// Field names and shapes follow the table component's controlled-state contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    pub column_filters: Vec<ColumnFilter>,
    pub column_filter_modes: FilterModes,
    pub sorting: Vec<ColumnSort>,
    pub column_visibility: ColumnVisibility,
    pub global_filter: Option<String>,
    pub grouping: Vec<String>,
    pub column_order: Vec<String>,
    pub pagination: Pagination,
}
