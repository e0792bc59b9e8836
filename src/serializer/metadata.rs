//! `segmentMetadata` bodies used for structure discovery.

use serde_json::{json, Value};

use crate::query::Interval;

pub fn segment_metadata(data_source: &str, intervals: &[Interval]) -> Value {
    json!({
        "queryType": "segmentMetadata",
        "dataSource": data_source,
        "intervals": intervals,
        "merge": true,
        "lenientAggregatorMerge": true,
        "analysisTypes": ["aggregators"],
    })
}
