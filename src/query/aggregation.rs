//! Aggregations.

use serde::{Serialize, Serializer};
use serde_json::{json, Value};

use super::filter::Filter;

/// Numeric type an aggregation accumulates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumericType {
    #[default]
    Long,
    Double,
    Float,
}

impl NumericType {
    fn prefix(&self) -> &'static str {
        match self {
            NumericType::Long => "long",
            NumericType::Double => "double",
            NumericType::Float => "float",
        }
    }
}

/// Default sketch size for distinct counts.
pub const DEFAULT_SKETCH_SIZE: u32 = 16384;

/// An aggregation over the rows of a time bucket or group.
///
/// Typed aggregations (`sum`, `min`, ...) map to the engine's
/// `longSum` / `doubleMin` / ... family according to their [`NumericType`].
#[derive(Debug, Clone, PartialEq)]
pub enum Aggregation {
    Count {
        name: String,
    },
    Sum {
        name: String,
        field_name: String,
        numeric: NumericType,
    },
    Min {
        name: String,
        field_name: String,
        numeric: NumericType,
    },
    Max {
        name: String,
        field_name: String,
        numeric: NumericType,
    },
    First {
        name: String,
        field_name: String,
        numeric: NumericType,
    },
    Last {
        name: String,
        field_name: String,
        numeric: NumericType,
    },
    /// HyperLogLog cardinality over one or more dimensions.
    Cardinality {
        name: String,
        fields: Vec<String>,
        by_row: bool,
        round: bool,
    },
    /// Theta sketch distinct count.
    DistinctCount {
        name: String,
        field_name: String,
        size: u32,
    },
    Javascript {
        name: String,
        field_names: Vec<String>,
        fn_aggregate: String,
        fn_combine: String,
        fn_reset: String,
    },
    /// Wrapped aggregation applied only to rows matching `filter`.
    Filtered {
        filter: Filter,
        aggregator: Box<Aggregation>,
    },
}

impl Aggregation {
    pub fn count(name: impl Into<String>) -> Self {
        Aggregation::Count { name: name.into() }
    }

    pub fn sum(name: impl Into<String>, field_name: impl Into<String>, numeric: NumericType) -> Self {
        Aggregation::Sum {
            name: name.into(),
            field_name: field_name.into(),
            numeric,
        }
    }

    pub fn min(name: impl Into<String>, field_name: impl Into<String>, numeric: NumericType) -> Self {
        Aggregation::Min {
            name: name.into(),
            field_name: field_name.into(),
            numeric,
        }
    }

    pub fn max(name: impl Into<String>, field_name: impl Into<String>, numeric: NumericType) -> Self {
        Aggregation::Max {
            name: name.into(),
            field_name: field_name.into(),
            numeric,
        }
    }

    pub fn distinct_count(name: impl Into<String>, field_name: impl Into<String>) -> Self {
        Aggregation::DistinctCount {
            name: name.into(),
            field_name: field_name.into(),
            size: DEFAULT_SKETCH_SIZE,
        }
    }

    pub fn filtered(filter: Filter, aggregator: Aggregation) -> Self {
        Aggregation::Filtered {
            filter,
            aggregator: Box::new(aggregator),
        }
    }

    /// Output column name of this aggregation.
    pub fn name(&self) -> &str {
        match self {
            Aggregation::Count { name }
            | Aggregation::Sum { name, .. }
            | Aggregation::Min { name, .. }
            | Aggregation::Max { name, .. }
            | Aggregation::First { name, .. }
            | Aggregation::Last { name, .. }
            | Aggregation::Cardinality { name, .. }
            | Aggregation::DistinctCount { name, .. }
            | Aggregation::Javascript { name, .. } => name,
            Aggregation::Filtered { aggregator, .. } => aggregator.name(),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Aggregation::Count { name } => json!({"type": "count", "name": name}),
            Aggregation::Sum {
                name,
                field_name,
                numeric,
            } => typed(numeric, "Sum", name, field_name),
            Aggregation::Min {
                name,
                field_name,
                numeric,
            } => typed(numeric, "Min", name, field_name),
            Aggregation::Max {
                name,
                field_name,
                numeric,
            } => typed(numeric, "Max", name, field_name),
            Aggregation::First {
                name,
                field_name,
                numeric,
            } => typed(numeric, "First", name, field_name),
            Aggregation::Last {
                name,
                field_name,
                numeric,
            } => typed(numeric, "Last", name, field_name),
            Aggregation::Cardinality {
                name,
                fields,
                by_row,
                round,
            } => json!({
                "type": "cardinality",
                "name": name,
                "fields": fields,
                "byRow": by_row,
                "round": round,
            }),
            Aggregation::DistinctCount {
                name,
                field_name,
                size,
            } => json!({
                "type": "thetaSketch",
                "name": name,
                "fieldName": field_name,
                "size": size,
            }),
            Aggregation::Javascript {
                name,
                field_names,
                fn_aggregate,
                fn_combine,
                fn_reset,
            } => json!({
                "type": "javascript",
                "name": name,
                "fieldNames": field_names,
                "fnAggregate": fn_aggregate,
                "fnCombine": fn_combine,
                "fnReset": fn_reset,
            }),
            Aggregation::Filtered { filter, aggregator } => json!({
                "type": "filtered",
                "filter": filter,
                "aggregator": aggregator.to_json(),
            }),
        }
    }
}

fn typed(numeric: &NumericType, op: &str, name: &str, field_name: &str) -> Value {
    json!({
        "type": format!("{}{}", numeric.prefix(), op),
        "name": name,
        "fieldName": field_name,
    })
}

impl Serialize for Aggregation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
