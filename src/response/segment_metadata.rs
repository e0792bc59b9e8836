//! `segmentMetadata` responses.

use serde_json::{json, Map, Value};

use super::{objects, NormalizedResult, Row};

/// One column reported by a segment metadata query.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    /// Engine type name, e.g. `STRING`, `LONG`, `hyperUnique`.
    pub column_type: String,
    pub has_multiple_values: bool,
    /// True when the column also appears in the merged `aggregators` map.
    pub is_metric: bool,
}

/// Columns of the first (merged) analysis, in response order, or `None`
/// when the response carries no `columns` map.
pub fn columns(raw: &Value) -> Option<Vec<ColumnInfo>> {
    let analysis = raw.as_array()?.first()?.as_object()?;
    let columns = analysis.get("columns")?.as_object()?;
    let aggregators = analysis.get("aggregators").and_then(Value::as_object);

    Some(
        columns
            .iter()
            .map(|(name, info)| ColumnInfo {
                name: name.clone(),
                column_type: info
                    .get("type")
                    .and_then(Value::as_str)
                    .unwrap_or("UNKNOWN")
                    .to_string(),
                has_multiple_values: info
                    .get("hasMultipleValues")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
                is_metric: aggregators.map(|a| a.contains_key(name)).unwrap_or(false),
            })
            .collect(),
    )
}

/// One row per column: `{field, type, hasMultipleValues, ...}` with the
/// remaining analysis keys passed through.
pub(super) fn normalize(raw: Value) -> NormalizedResult {
    let Some(mut analysis) = objects(raw).next() else {
        return NormalizedResult::default();
    };
    let columns = match analysis.remove("columns") {
        Some(Value::Object(columns)) => columns,
        _ => return NormalizedResult::default(),
    };

    let rows = columns
        .into_iter()
        .map(|(name, info)| {
            let mut row: Row = Map::new();
            row.insert("field".to_string(), json!(name));
            if let Value::Object(info) = info {
                row.extend(info);
            }
            row
        })
        .collect();
    NormalizedResult::from_rows(rows)
}
