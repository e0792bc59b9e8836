//! `topN` bodies.

use serde_json::{json, Value};

use super::{append_common, header};
use crate::query::{Dimension, OrderBy, QuerySpec, SortDirection};

/// The parts of a spec that a topN query is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct TopNPlan<'a> {
    pub dimension: &'a Dimension,
    pub order_by: &'a OrderBy,
    pub threshold: u64,
}

impl<'a> TopNPlan<'a> {
    /// Extract the single dimension, single order-by and bounded cap.
    ///
    /// Returns `None` for specs the selector would not send to topN.
    pub fn resolve(spec: &'a QuerySpec) -> Option<Self> {
        let [dimension] = spec.dimensions() else {
            return None;
        };
        let limit = spec.limit().filter(|l| l.is_bounded())?;
        let order_by = limit.single_order_by()?;
        Some(Self {
            dimension,
            order_by,
            threshold: limit.cap,
        })
    }

    /// The topN `metric` spec.
    ///
    /// Ordering by an aggregation gives its bare name (descending) or an
    /// inverted spec (ascending). Ordering by the dimension itself gives a
    /// dimension spec.
    pub fn metric(&self) -> Value {
        let descending = self.order_by.direction == SortDirection::Descending;
        let by_dimension = self.order_by.dimension == self.dimension.output_name()
            || self.order_by.dimension == self.dimension.column;

        if by_dimension {
            let metric = json!({
                "type": "dimension",
                "ordering": self.order_by.dimension_order,
            });
            return if descending { inverted(metric) } else { metric };
        }

        let metric = json!(self.order_by.dimension);
        if descending {
            metric
        } else {
            inverted(metric)
        }
    }
}

fn inverted(metric: Value) -> Value {
    json!({"type": "inverted", "metric": metric})
}

pub(super) fn serialize(spec: &QuerySpec, plan: &TopNPlan<'_>) -> Value {
    let mut body = header("topN", spec);
    body.insert("dimension".to_string(), plan.dimension.to_json());
    body.insert("threshold".to_string(), json!(plan.threshold));
    body.insert("metric".to_string(), plan.metric());
    append_common(&mut body, spec);
    Value::Object(body)
}
