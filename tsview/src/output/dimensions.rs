use serde_json::{Map, Value};
use tablestate::prelude::*;

/// One present dimension of a decoded view state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionRow {
    pub dimension: Dimension,
    /// Compact json of the dimension's wire value
    pub value: String,
}

impl DimensionRow {
    /// Rows for the dimensions present in `state`, in wire order.
    pub fn from_state(state: &SerializedViewState) -> serde_json::Result<Vec<Self>> {
        let Value::Object(mut fields) = serde_json::to_value(state)? else {
            return Ok(Vec::new());
        };
        let present = ViewState::from(state.clone()).present();
        Ok(present
            .into_iter()
            .map(|dimension| Self {
                dimension,
                value: take_json(&mut fields, dimension.wire_key()),
            })
            .collect())
    }
}

fn take_json(fields: &mut Map<String, Value>, key: &str) -> String {
    fields.remove(key).map(|value| value.to_string()).unwrap_or_default()
}

/// `dimension  key  value` table. The value column is last and never padded, so long
/// filter lists do not widen the other rows.
pub fn render_dimensions(rows: &[DimensionRow]) -> String {
    let name_width = rows
        .iter()
        .map(|row| row.dimension.to_string().len())
        .chain(["dimension".len()])
        .max()
        .unwrap_or_default();
    let key_width = rows
        .iter()
        .map(|row| row.dimension.wire_key().len())
        .chain(["key".len()])
        .max()
        .unwrap_or_default();

    let mut lines = vec![
        format!("{:<name_width$}  {:<key_width$}  value", "dimension", "key"),
        format!("{}  {}  -----", "-".repeat(name_width), "-".repeat(key_width)),
    ];
    lines.extend(rows.iter().map(|row| {
        format!(
            "{:<name_width$}  {:<key_width$}  {}",
            row.dimension.to_string(),
            row.dimension.wire_key(),
            row.value
        )
    }));
    lines.join("\n")
}
