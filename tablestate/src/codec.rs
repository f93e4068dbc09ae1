//! URL state codec
//!
//! Converts a [`ViewState`] to and from the value of a single query parameter:
//!
//! ```text
//! ViewState -> SerializedViewState -> JSON -> DEFLATE -> base64 (url-safe, no padding)
//! ```
//!
//! Filter values are wrapped with an explicit type tag (`"string"` or `"date"`),
//! because a date cannot be told apart from a string once it is JSON.
//! Dates without a valid timestamp are written as an empty `"string"`, so a shared
//! link never carries a malformed date.
//!
//! - [`encode`] / [`decode`] never fail. A parameter that does not inflate or parse
//!   decodes to the empty (all default) state.
//! - [`try_encode`] / [`try_decode`] report the failure, for diagnostics.
//!
//! Decoding is lenient per field: a field with an unexpected shape is dropped
//! and the remaining fields are kept.
//!

use std::io::{Read, Write};

use base64::{
    Engine, alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, general_purpose},
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use flate2::{Compression, read::DeflateDecoder, write::DeflateEncoder};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use snafu::prelude::*;
use tracing::error;

use crate::{
    Result,
    error::{
        Base64Snafu, DeflateSnafu, InflateSnafu, JsonSnafu, NotAnObjectSnafu, SerializationSnafu,
        TooLargeSnafu, Utf8Snafu,
    },
    limits::MAX_DECODED_STATE_LEN,
    state::{
        ColumnFilter, ColumnSort, ColumnVisibility, Dimension, FilterModes, FilterScalar,
        FilterValue, Pagination, ViewState,
    },
};

/// url-safe alphabet; writes without padding, reads either way
const URL_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    general_purpose::NO_PAD.with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

// ============================================================================
// WIRE TYPES
// ============================================================================

/// Type tag of an encoded filter value
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ValueTag {
    /// Raw JSON value, passed through unchanged.
    String,
    /// RFC 3339 timestamp.
    Date,
}

/// Encoded filter value component: `{"type": "date", "value": "2024-03-01T12:00:00.000Z"}`.
/// A null value is omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedScalar {
    #[serde(rename = "type")]
    pub tag: ValueTag,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub value: Value,
}

impl TaggedScalar {
    fn string(value: Value) -> Self {
        Self {
            tag: ValueTag::String,
            value,
        }
    }
}

impl From<&FilterScalar> for TaggedScalar {
    fn from(scalar: &FilterScalar) -> Self {
        match scalar {
            FilterScalar::Null => TaggedScalar::string(Value::Null),
            FilterScalar::Bool(value) => TaggedScalar::string(Value::Bool(*value)),
            FilterScalar::Number(number) => TaggedScalar::string(Value::Number(number.clone())),
            FilterScalar::Text(text) => TaggedScalar::string(Value::String(text.clone())),
            FilterScalar::Date(date) => TaggedScalar {
                tag: ValueTag::Date,
                value: Value::String(date.to_rfc3339_opts(SecondsFormat::Millis, true)),
            },
            FilterScalar::InvalidDate => TaggedScalar::string(Value::String(String::new())),
        }
    }
}

impl From<TaggedScalar> for FilterScalar {
    fn from(tagged: TaggedScalar) -> Self {
        match tagged.tag {
            ValueTag::Date => tagged
                .value
                .as_str()
                .and_then(parse_date)
                .map_or(FilterScalar::InvalidDate, FilterScalar::date),
            ValueTag::String => match tagged.value {
                Value::Bool(value) => FilterScalar::Bool(value),
                Value::Number(number) => FilterScalar::Number(number),
                Value::String(text) => FilterScalar::Text(text),
                // nested values only come from hand-edited urls
                Value::Null | Value::Array(_) | Value::Object(_) => FilterScalar::Null,
            },
        }
    }
}

/// Accepts RFC 3339, RFC 3339 with a signed year outside 0..=9999 (as written by
/// the encoder, e.g. `+10000-01-01T00:00:00.000Z`), or a bare `YYYY-MM-DD`
/// (midnight UTC).
fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.fZ") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Encoded filter value. Ranges are tagged element-wise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaggedFilterValue {
    Range(Vec<TaggedScalar>),
    Scalar(TaggedScalar),
}

impl From<&FilterValue> for TaggedFilterValue {
    fn from(value: &FilterValue) -> Self {
        match value {
            FilterValue::Scalar(scalar) => TaggedFilterValue::Scalar(scalar.into()),
            FilterValue::Range(values) => {
                TaggedFilterValue::Range(values.iter().map(TaggedScalar::from).collect())
            }
        }
    }
}

impl From<TaggedFilterValue> for FilterValue {
    fn from(value: TaggedFilterValue) -> Self {
        match value {
            TaggedFilterValue::Scalar(scalar) => FilterValue::Scalar(scalar.into()),
            TaggedFilterValue::Range(values) => {
                FilterValue::Range(values.into_iter().map(FilterScalar::from).collect())
            }
        }
    }
}

/// Encoded column filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedColumnFilter {
    pub id: String,
    pub value: TaggedFilterValue,
}

/// Url form of [`ViewState`]: same dimensions under short keys, filter values tagged.
/// Absent dimensions are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SerializedViewState {
    #[serde(rename = "cF", default, skip_serializing_if = "Option::is_none")]
    pub column_filters: Option<Vec<SerializedColumnFilter>>,
    #[serde(rename = "cFn", default, skip_serializing_if = "Option::is_none")]
    pub column_filter_modes: Option<FilterModes>,
    #[serde(rename = "srt", default, skip_serializing_if = "Option::is_none")]
    pub sorting: Option<Vec<ColumnSort>>,
    #[serde(rename = "cVis", default, skip_serializing_if = "Option::is_none")]
    pub column_visibility: Option<ColumnVisibility>,
    #[serde(rename = "gFil", default, skip_serializing_if = "Option::is_none")]
    pub global_filter: Option<String>,
    #[serde(rename = "g", default, skip_serializing_if = "Option::is_none")]
    pub grouping: Option<Vec<String>>,
    #[serde(rename = "cO", default, skip_serializing_if = "Option::is_none")]
    pub column_order: Option<Vec<String>>,
    #[serde(rename = "p", default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl SerializedViewState {
    /// Builds the state from a parsed JSON object, dropping fields (and single
    /// filter entries) whose shape is not recognized. Unknown keys are ignored.
    /// Pagination with a zero page size is dropped.
    pub fn from_map(mut map: Map<String, Value>) -> Self {
        let column_filters = map
            .remove(Dimension::ColumnFilters.wire_key())
            .and_then(|value| match value {
                Value::Array(entries) => Some(
                    entries
                        .into_iter()
                        .filter_map(|entry| serde_json::from_value(entry).ok())
                        .collect(),
                ),
                _ => None,
            });
        Self {
            column_filters,
            column_filter_modes: take_field(&mut map, Dimension::ColumnFilterModes),
            sorting: take_field(&mut map, Dimension::Sorting),
            column_visibility: take_field(&mut map, Dimension::ColumnVisibility),
            global_filter: take_field(&mut map, Dimension::GlobalFilter),
            grouping: take_field(&mut map, Dimension::Grouping),
            column_order: take_field(&mut map, Dimension::ColumnOrder),
            pagination: take_field::<Pagination>(&mut map, Dimension::Pagination)
                .filter(|pagination| pagination.page_size > 0),
        }
    }
}

fn take_field<T: DeserializeOwned>(
    map: &mut Map<String, Value>,
    dimension: Dimension,
) -> Option<T> {
    map.remove(dimension.wire_key())
        .and_then(|value| serde_json::from_value(value).ok())
}

impl From<&ViewState> for SerializedViewState {
    fn from(state: &ViewState) -> Self {
        Self {
            column_filters: state.column_filters.as_ref().map(|filters| {
                filters
                    .iter()
                    .map(|filter| SerializedColumnFilter {
                        id: filter.id.clone(),
                        value: (&filter.value).into(),
                    })
                    .collect()
            }),
            column_filter_modes: state.column_filter_modes.clone(),
            sorting: state.sorting.clone(),
            column_visibility: state.column_visibility.clone(),
            global_filter: state.global_filter.clone(),
            grouping: state.grouping.clone(),
            column_order: state.column_order.clone(),
            pagination: state.pagination,
        }
    }
}

impl From<SerializedViewState> for ViewState {
    fn from(state: SerializedViewState) -> Self {
        Self {
            column_filters: state.column_filters.map(|filters| {
                filters
                    .into_iter()
                    .map(|filter| ColumnFilter {
                        id: filter.id,
                        value: filter.value.into(),
                    })
                    .collect()
            }),
            column_filter_modes: state.column_filter_modes,
            sorting: state.sorting,
            column_visibility: state.column_visibility,
            global_filter: state.global_filter,
            grouping: state.grouping,
            column_order: state.column_order,
            pagination: state.pagination,
        }
    }
}

// ============================================================================
// ENCODE / DECODE
// ============================================================================

/// Serializes the state to its canonical JSON text (before compression).
/// Two states are equal for url purposes exactly when their JSON texts are.
pub fn to_json(state: &ViewState) -> Result<String> {
    serde_json::to_string(&SerializedViewState::from(state)).context(SerializationSnafu)
}

/// Encodes the state into a url-safe token.
pub fn try_encode(state: &ViewState) -> Result<String> {
    let json = to_json(state)?;
    compress(&json)
}

/// Encodes a serialized (tagged) state into a url-safe token.
pub fn try_encode_serialized(state: &SerializedViewState) -> Result<String> {
    let json = serde_json::to_string(state).context(SerializationSnafu)?;
    compress(&json)
}

fn compress(json: &str) -> Result<String> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(json.as_bytes()).context(DeflateSnafu)?;
    let compressed = encoder.finish().context(DeflateSnafu)?;
    Ok(URL_ENGINE.encode(compressed))
}

/// Encodes the state into a url-safe token. Does not fail: the (unreachable)
/// serialization failure is logged and yields an empty token.
pub fn encode(state: &ViewState) -> String {
    try_encode(state).unwrap_or_else(|err| {
        error!("failed to encode view state: {err}");
        String::new()
    })
}

/// Inflates a token back to its JSON text.
pub fn inflate(raw: &str) -> Result<String> {
    let compressed = URL_ENGINE.decode(raw.trim()).context(Base64Snafu)?;
    let mut bytes = Vec::new();
    DeflateDecoder::new(compressed.as_slice())
        .take(MAX_DECODED_STATE_LEN + 1)
        .read_to_end(&mut bytes)
        .context(InflateSnafu)?;
    ensure!(
        bytes.len() as u64 <= MAX_DECODED_STATE_LEN,
        TooLargeSnafu {
            limit: MAX_DECODED_STATE_LEN
        }
    );
    String::from_utf8(bytes).context(Utf8Snafu)
}

/// Decodes a token into its tagged form, reporting why a malformed token fails.
pub fn try_decode_serialized(raw: &str) -> Result<SerializedViewState> {
    let json = inflate(raw)?;
    match serde_json::from_str::<Value>(&json).context(JsonSnafu)? {
        Value::Object(map) => Ok(SerializedViewState::from_map(map)),
        other => NotAnObjectSnafu {
            found: json_kind(&other),
        }
        .fail(),
    }
}

/// Decodes a token, reporting why a malformed token fails.
pub fn try_decode(raw: &str) -> Result<ViewState> {
    try_decode_serialized(raw).map(ViewState::from)
}

/// Decodes an optional query parameter value. Missing, empty, or malformed
/// input yields the empty (all default) state.
pub fn decode(raw: Option<&str>) -> ViewState {
    raw.and_then(|raw| try_decode(raw).ok()).unwrap_or_default()
}

fn json_kind(value: &Value) -> String {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
    .to_string()
}

// ============================================================================
// TESTS
// ============================================================================
