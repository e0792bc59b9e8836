//! `groupBy` responses.

use serde_json::Value;

use super::{objects, NormalizedResult};

pub(super) fn normalize(raw: Value) -> NormalizedResult {
    let rows = objects(raw)
        .filter_map(|mut wrapper| match wrapper.remove("event") {
            Some(Value::Object(event)) => Some(event),
            _ => None,
        })
        .collect();
    NormalizedResult::from_rows(rows)
}
