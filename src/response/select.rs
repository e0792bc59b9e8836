//! Paginated `select` responses.

use serde_json::Value;

use super::{objects, NormalizedResult, ResultMetadata};

pub(super) fn normalize(raw: Value) -> NormalizedResult {
    // The engine wraps the page in a single-element array; accept a bare
    // object too.
    let page = match raw {
        Value::Array(_) => objects(raw).next(),
        Value::Object(obj) => Some(obj),
        _ => None,
    };
    let Some(mut page) = page else {
        return NormalizedResult::default();
    };
    let mut result = match page.remove("result") {
        Some(Value::Object(result)) => result,
        _ => return NormalizedResult::default(),
    };

    let paging_identifiers = match result.remove("pagingIdentifiers") {
        Some(Value::Object(ids)) => Some(ids),
        _ => None,
    };
    let rows = result
        .remove("events")
        .map(objects)
        .into_iter()
        .flatten()
        .filter_map(|mut e| match e.remove("event") {
            Some(Value::Object(event)) => Some(event),
            _ => None,
        })
        .collect();

    NormalizedResult {
        rows,
        metadata: ResultMetadata { paging_identifiers },
    }
}

