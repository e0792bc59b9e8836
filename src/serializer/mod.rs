//! Wire serialization of a [`QuerySpec`] for each query shape.
//!
//! Every body starts with `queryType`, `dataSource`, `intervals` and
//! `granularity`. Optional parts (`filter`, `aggregations`,
//! `postAggregations`, `context`) are omitted when empty rather than sent as
//! null, since the engine rejects nulls for some of them.

mod group_by;
mod metadata;
mod select;
mod timeseries;
mod topn;

pub use metadata::segment_metadata;
pub use select::select;
pub use topn::TopNPlan;

use serde_json::{json, Map, Value};

use crate::query::QuerySpec;
use crate::shape::QueryShape;

/// Render `spec` as the body of a `shape` query.
pub fn serialize(shape: QueryShape, spec: &QuerySpec) -> Value {
    match shape {
        QueryShape::TimeSeries => timeseries::serialize(spec),
        QueryShape::TopN => match TopNPlan::resolve(spec) {
            Some(plan) => topn::serialize(spec, &plan),
            None => {
                debug_assert!(false, "topN selected without a single order-by and bounded limit");
                group_by::serialize(spec)
            }
        },
        QueryShape::GroupBy => group_by::serialize(spec),
    }
}

/// `queryType`, `dataSource`, `intervals`, `granularity`.
fn header(query_type: &str, spec: &QuerySpec) -> Map<String, Value> {
    let mut body = Map::new();
    body.insert("queryType".to_string(), json!(query_type));
    body.insert("dataSource".to_string(), json!(spec.data_source()));
    body.insert("intervals".to_string(), json!(spec.intervals()));
    body.insert("granularity".to_string(), json!(spec.granularity()));
    body
}

/// Append filter, aggregations, post-aggregations and context when present.
fn append_common(body: &mut Map<String, Value>, spec: &QuerySpec) {
    append_filter(body, spec);
    if !spec.aggregations().is_empty() {
        body.insert("aggregations".to_string(), json!(spec.aggregations()));
    }
    if !spec.post_aggregations().is_empty() {
        body.insert("postAggregations".to_string(), json!(spec.post_aggregations()));
    }
    append_context(body, spec);
}

fn append_filter(body: &mut Map<String, Value>, spec: &QuerySpec) {
    if let Some(filter) = spec.filter() {
        body.insert("filter".to_string(), json!(filter));
    }
}

fn append_context(body: &mut Map<String, Value>, spec: &QuerySpec) {
    if !spec.context().is_empty() {
        body.insert("context".to_string(), spec.context().to_json());
    }
}
