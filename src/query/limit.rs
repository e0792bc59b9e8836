//! Row limits and result ordering.

use serde::Serialize;
use serde_json::{json, Map, Value};

pub use super::filter::SortingOrder;

/// Row cap meaning "no real limit".
///
/// Matches the engine's own `Long.MAX_VALUE` default. Only limits strictly
/// below this value make a query eligible for topN.
pub const UNBOUNDED_LIMIT: u64 = i64::MAX as u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// A single order-by column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBy {
    pub dimension: String,
    pub direction: SortDirection,
    pub dimension_order: SortingOrder,
}

impl OrderBy {
    pub fn new(dimension: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            dimension: dimension.into(),
            direction,
            dimension_order: SortingOrder::default(),
        }
    }

    pub fn asc(dimension: impl Into<String>) -> Self {
        Self::new(dimension, SortDirection::Ascending)
    }

    pub fn desc(dimension: impl Into<String>) -> Self {
        Self::new(dimension, SortDirection::Descending)
    }

    pub fn with_order(mut self, order: SortingOrder) -> Self {
        self.dimension_order = order;
        self
    }
}

/// Maximum rows plus ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct Limit {
    pub cap: u64,
    pub offset: Option<u64>,
    pub columns: Vec<OrderBy>,
}

impl Limit {
    pub fn new(cap: u64) -> Self {
        Self {
            cap,
            offset: None,
            columns: Vec::new(),
        }
    }

    pub fn unbounded() -> Self {
        Self::new(UNBOUNDED_LIMIT)
    }

    pub fn is_bounded(&self) -> bool {
        self.cap < UNBOUNDED_LIMIT
    }

    /// The only order-by column, if exactly one is present.
    pub fn single_order_by(&self) -> Option<&OrderBy> {
        match self.columns.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// groupBy `limitSpec`.
    pub fn to_limit_spec(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("type".to_string(), json!("default"));
        obj.insert("columns".to_string(), json!(self.columns));
        if self.is_bounded() {
            obj.insert("limit".to_string(), json!(self.cap));
        }
        if let Some(offset) = self.offset {
            obj.insert("offset".to_string(), json!(offset));
        }
        Value::Object(obj)
    }
}
