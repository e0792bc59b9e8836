//! Having filters, applied to groupBy result rows after aggregation.

use serde::Serialize;

use super::filter::Filter;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Having {
    GreaterThan { aggregation: String, value: f64 },
    LessThan { aggregation: String, value: f64 },
    EqualTo { aggregation: String, value: f64 },
    DimSelector { dimension: String, value: String },
    /// Any row filter, evaluated against the aggregated row.
    Filter { filter: Filter },
    And { having_specs: Vec<Having> },
    Or { having_specs: Vec<Having> },
    Not { having_spec: Box<Having> },
}

impl Having {
    pub fn greater_than(aggregation: impl Into<String>, value: f64) -> Self {
        Having::GreaterThan {
            aggregation: aggregation.into(),
            value,
        }
    }

    pub fn less_than(aggregation: impl Into<String>, value: f64) -> Self {
        Having::LessThan {
            aggregation: aggregation.into(),
            value,
        }
    }

    pub fn equal_to(aggregation: impl Into<String>, value: f64) -> Self {
        Having::EqualTo {
            aggregation: aggregation.into(),
            value,
        }
    }

    pub fn and(self, other: Having) -> Self {
        match self {
            Having::And { mut having_specs } => {
                having_specs.push(other);
                Having::And { having_specs }
            }
            first => Having::And {
                having_specs: vec![first, other],
            },
        }
    }

    pub fn or(self, other: Having) -> Self {
        match self {
            Having::Or { mut having_specs } => {
                having_specs.push(other);
                Having::Or { having_specs }
            }
            first => Having::Or {
                having_specs: vec![first, other],
            },
        }
    }
}
