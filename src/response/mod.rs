//! Response normalization.
//!
//! Each query type answers with a differently nested JSON document. The
//! normalizers here flatten them into one ordered list of row maps plus any
//! metadata the caller needs (paging identifiers for select queries).
//!
//! Normalizers never fail: absent or unexpected keys produce an empty result.
//! Operations that need a particular key to continue (structure discovery)
//! check for it themselves.

mod group_by;
mod segment_metadata;
mod select;
mod timeseries;
mod topn;

use serde_json::{Map, Value};

use crate::query::TIME_COLUMN;
use crate::shape::QueryShape;

/// A single result row.
pub type Row = Map<String, Value>;

/// Which response layout to expect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseKind {
    /// `[{timestamp, result}]`; the timestamp is injected under `time_output`.
    TimeSeries { time_output: String },
    /// `[{timestamp, result: [rows]}]`.
    TopN,
    /// `[{version, timestamp, event}]`.
    GroupBy,
    /// `[{timestamp, result: {pagingIdentifiers, events: [{event}]}}]`.
    Select,
    /// `[{id, intervals, columns: {name: {type, ...}}, aggregators}]`.
    SegmentMetadata,
    /// Any other array of objects, passed through as rows.
    Raw,
}

impl ResponseKind {
    /// Response kind of a shape, injecting timeseries timestamps under
    /// `time_output`.
    pub fn for_shape(shape: QueryShape, time_output: &str) -> Self {
        match shape {
            QueryShape::TimeSeries => ResponseKind::TimeSeries {
                time_output: time_output.to_string(),
            },
            QueryShape::TopN => ResponseKind::TopN,
            QueryShape::GroupBy => ResponseKind::GroupBy,
        }
    }

    /// Response kind for a native `queryType` value.
    pub fn from_query_type(query_type: &str) -> Self {
        match query_type {
            "timeseries" => ResponseKind::TimeSeries {
                time_output: "timestamp".to_string(),
            },
            "topN" => ResponseKind::TopN,
            "groupBy" => ResponseKind::GroupBy,
            "select" => ResponseKind::Select,
            "segmentMetadata" => ResponseKind::SegmentMetadata,
            _ => ResponseKind::Raw,
        }
    }
}

impl From<QueryShape> for ResponseKind {
    fn from(shape: QueryShape) -> Self {
        ResponseKind::for_shape(shape, TIME_COLUMN)
    }
}

/// Shape-specific response metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultMetadata {
    /// Select queries only: feed into `PagingSpec::next_page`.
    pub paging_identifiers: Option<Map<String, Value>>,
}

/// Normalized rows of a response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedResult {
    pub rows: Vec<Row>,
    pub metadata: ResultMetadata,
}

impl NormalizedResult {
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self {
            rows,
            metadata: ResultMetadata::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    pub fn paging_identifiers(&self) -> Option<&Map<String, Value>> {
        self.metadata.paging_identifiers.as_ref()
    }
}

impl IntoIterator for NormalizedResult {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a NormalizedResult {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Normalize a raw response of the given kind.
pub fn normalize(kind: &ResponseKind, raw: Value) -> NormalizedResult {
    match kind {
        ResponseKind::TimeSeries { time_output } => timeseries::normalize(raw, time_output),
        ResponseKind::TopN => topn::normalize(raw),
        ResponseKind::GroupBy => group_by::normalize(raw),
        ResponseKind::Select => select::normalize(raw),
        ResponseKind::SegmentMetadata => segment_metadata::normalize(raw),
        ResponseKind::Raw => NormalizedResult::from_rows(objects(raw).collect()),
    }
}

/// Object elements of a JSON array; nothing for any other value.
fn objects(raw: Value) -> impl Iterator<Item = Row> {
    let items = match raw {
        Value::Array(items) => items,
        _ => Vec::new(),
    };
    items.into_iter().filter_map(|item| match item {
        Value::Object(obj) => Some(obj),
        _ => None,
    })
}

pub use segment_metadata::{columns as segment_columns, ColumnInfo};
