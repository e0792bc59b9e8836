//! `timeseries` responses.

use serde_json::Value;

use super::{objects, NormalizedResult};

pub(super) fn normalize(raw: Value, time_output: &str) -> NormalizedResult {
    let rows = objects(raw)
        .map(|mut bucket| {
            let timestamp = bucket.remove("timestamp").unwrap_or(Value::Null);
            let mut row = match bucket.remove("result") {
                Some(Value::Object(result)) => result,
                _ => Default::default(),
            };
            row.insert(time_output.to_string(), timestamp);
            row
        })
        .collect();
    NormalizedResult::from_rows(rows)
}
