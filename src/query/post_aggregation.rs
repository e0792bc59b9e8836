//! Post-aggregations: computations over already-aggregated values.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PostAggregation {
    /// `fn` is one of `+`, `-`, `*`, `/`, `quotient`.
    Arithmetic {
        name: String,
        #[serde(rename = "fn")]
        function: String,
        fields: Vec<PostAggregation>,
        #[serde(skip_serializing_if = "Option::is_none")]
        ordering: Option<String>,
    },
    FieldAccess {
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        field_name: String,
    },
    FinalizingFieldAccess {
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        field_name: String,
    },
    Constant {
        name: String,
        value: f64,
    },
    Expression {
        name: String,
        expression: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        ordering: Option<String>,
    },
    DoubleGreatest {
        name: String,
        fields: Vec<PostAggregation>,
    },
    DoubleLeast {
        name: String,
        fields: Vec<PostAggregation>,
    },
    Javascript {
        name: String,
        field_names: Vec<String>,
        function: String,
    },
    HyperUniqueCardinality {
        name: String,
        field_name: String,
    },
    ThetaSketchEstimate {
        name: String,
        field: Box<PostAggregation>,
    },
    /// Quantile of a doubles sketch at `fraction`.
    #[serde(rename = "quantilesDoublesSketchToQuantile")]
    Quantile {
        name: String,
        field: Box<PostAggregation>,
        fraction: f64,
    },
    /// Rank of `value` within a doubles sketch.
    #[serde(rename = "quantilesDoublesSketchToRank")]
    Rank {
        name: String,
        field: Box<PostAggregation>,
        value: f64,
    },
}

impl PostAggregation {
    pub fn field(field_name: impl Into<String>) -> Self {
        PostAggregation::FieldAccess {
            name: None,
            field_name: field_name.into(),
        }
    }

    pub fn constant(name: impl Into<String>, value: f64) -> Self {
        PostAggregation::Constant {
            name: name.into(),
            value,
        }
    }

    pub fn arithmetic(
        name: impl Into<String>,
        function: impl Into<String>,
        fields: Vec<PostAggregation>,
    ) -> Self {
        PostAggregation::Arithmetic {
            name: name.into(),
            function: function.into(),
            fields,
            ordering: None,
        }
    }

    /// `numerator / denominator` over two aggregation outputs.
    pub fn ratio(
        name: impl Into<String>,
        numerator: impl Into<String>,
        denominator: impl Into<String>,
    ) -> Self {
        Self::arithmetic(
            name,
            "/",
            vec![Self::field(numerator), Self::field(denominator)],
        )
    }

    pub fn expression(name: impl Into<String>, expression: impl Into<String>) -> Self {
        PostAggregation::Expression {
            name: name.into(),
            expression: expression.into(),
            ordering: None,
        }
    }

    /// Output name, if this post-aggregation produces a named column.
    pub fn name(&self) -> Option<&str> {
        match self {
            PostAggregation::FieldAccess { name, .. }
            | PostAggregation::FinalizingFieldAccess { name, .. } => name.as_deref(),
            PostAggregation::Arithmetic { name, .. }
            | PostAggregation::Constant { name, .. }
            | PostAggregation::Expression { name, .. }
            | PostAggregation::DoubleGreatest { name, .. }
            | PostAggregation::DoubleLeast { name, .. }
            | PostAggregation::Javascript { name, .. }
            | PostAggregation::HyperUniqueCardinality { name, .. }
            | PostAggregation::ThetaSketchEstimate { name, .. }
            | PostAggregation::Quantile { name, .. }
            | PostAggregation::Rank { name, .. } => Some(name),
        }
    }
}
