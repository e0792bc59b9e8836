//! `topN` responses.

use serde_json::Value;

use super::{objects, NormalizedResult};

/// Unwrap the ranked rows. With a granularity finer than `all` the engine
/// returns one bucket per period; their rows are concatenated in order.
pub(super) fn normalize(raw: Value) -> NormalizedResult {
    let rows = objects(raw)
        .flat_map(|mut bucket| match bucket.remove("result") {
            Some(result) => objects(result).collect::<Vec<_>>(),
            None => Vec::new(),
        })
        .collect();
    NormalizedResult::from_rows(rows)
}
