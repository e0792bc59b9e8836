//! Query shape selection.
//!
//! The engine has three native aggregation query types with very different
//! costs. [`select_shape`] picks the cheapest one that can answer a spec:
//!
//! 1. `timeseries` when the only dimension is the bare time column.
//! 2. `topN` when there is exactly one (non-time) dimension, a bounded limit
//!    and exactly one order-by column.
//! 3. `groupBy` for everything else.
//!
//! Only dimensions, limit and order-by take part in the decision.

use std::fmt;

use tracing::debug;

use crate::query::QuerySpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryShape {
    TimeSeries,
    TopN,
    GroupBy,
}

impl QueryShape {
    /// The `queryType` value for this shape.
    pub fn query_type(&self) -> &'static str {
        match self {
            QueryShape::TimeSeries => "timeseries",
            QueryShape::TopN => "topN",
            QueryShape::GroupBy => "groupBy",
        }
    }
}

impl fmt::Display for QueryShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.query_type())
    }
}

pub fn select_shape(spec: &QuerySpec) -> QueryShape {
    let shape = match spec.dimensions() {
        [only] if only.is_time() => QueryShape::TimeSeries,
        [_] => match spec.limit() {
            Some(limit) if limit.is_bounded() && limit.single_order_by().is_some() => {
                QueryShape::TopN
            }
            _ => QueryShape::GroupBy,
        },
        _ => QueryShape::GroupBy,
    };
    debug!(
        data_source = spec.data_source(),
        dimensions = spec.dimensions().len(),
        shape = %shape,
        "selected query shape"
    );
    shape
}
