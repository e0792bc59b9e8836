//! `groupBy` bodies.

use serde_json::{json, Value};

use super::{append_common, header};
use crate::query::QuerySpec;

pub(super) fn serialize(spec: &QuerySpec) -> Value {
    let mut body = header("groupBy", spec);

    let dimensions: Vec<Value> = spec.dimensions().iter().map(|d| d.to_json()).collect();
    body.insert("dimensions".to_string(), Value::Array(dimensions));

    if let Some(limit) = spec.limit() {
        body.insert("limitSpec".to_string(), limit.to_limit_spec());
    }
    if let Some(having) = spec.having() {
        body.insert("having".to_string(), json!(having));
    }
    // TODO: subtotalsSpec is sent as given; output names are not checked against the dimension list.
    if let Some(subtotals) = spec.subtotals() {
        body.insert("subtotalsSpec".to_string(), json!(subtotals));
    }

    append_common(&mut body, spec);
    Value::Object(body)
}
