//! Row filters.
//!
//! [`Filter`] is a closed tree of leaf filters and logical combinators. It
//! serializes directly to the engine's `filter` JSON, so adding a variant here
//! is the only step needed to support a new filter type.

use serde::Serialize;

use super::extraction::ExtractionFn;
use super::interval::Interval;

/// Ordering used by bound filters and order-by specs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortingOrder {
    #[default]
    Lexicographic,
    Alphanumeric,
    Numeric,
    Strlen,
    Version,
}

/// Search predicate used by search filters and search-query extractions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SearchQuery {
    Contains {
        value: String,
        case_sensitive: bool,
    },
    InsensitiveContains {
        value: String,
    },
    Fragment {
        values: Vec<String>,
        case_sensitive: bool,
    },
}

/// Geometric bound for spatial filters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SpatialBound {
    Rectangular {
        min_coords: Vec<f64>,
        max_coords: Vec<f64>,
    },
    Radius {
        coords: Vec<f64>,
        radius: f64,
    },
    Polygon {
        abscissa: Vec<f64>,
        ordinate: Vec<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Filter {
    /// `dimension = value`; a `None` value matches nulls.
    Selector {
        dimension: String,
        value: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        extraction_fn: Option<ExtractionFn>,
    },
    In {
        dimension: String,
        values: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        extraction_fn: Option<ExtractionFn>,
    },
    /// SQL `LIKE` pattern (`%` and `_` wildcards).
    Like {
        dimension: String,
        pattern: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        escape: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        extraction_fn: Option<ExtractionFn>,
    },
    Regex {
        dimension: String,
        pattern: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        extraction_fn: Option<ExtractionFn>,
    },
    Bound {
        dimension: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        lower: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        upper: Option<String>,
        lower_strict: bool,
        upper_strict: bool,
        ordering: SortingOrder,
        #[serde(skip_serializing_if = "Option::is_none")]
        extraction_fn: Option<ExtractionFn>,
    },
    Interval {
        dimension: String,
        intervals: Vec<Interval>,
        #[serde(skip_serializing_if = "Option::is_none")]
        extraction_fn: Option<ExtractionFn>,
    },
    Spatial {
        dimension: String,
        bound: SpatialBound,
    },
    Null {
        column: String,
    },
    True,
    Expression {
        expression: String,
    },
    Search {
        dimension: String,
        query: SearchQuery,
        #[serde(skip_serializing_if = "Option::is_none")]
        extraction_fn: Option<ExtractionFn>,
    },
    Javascript {
        dimension: String,
        function: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        extraction_fn: Option<ExtractionFn>,
    },
    And {
        fields: Vec<Filter>,
    },
    Or {
        fields: Vec<Filter>,
    },
    Not {
        field: Box<Filter>,
    },
}

impl Filter {
    pub fn selector(dimension: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Selector {
            dimension: dimension.into(),
            value: Some(value.into()),
            extraction_fn: None,
        }
    }

    pub fn in_values<I, S>(dimension: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Filter::In {
            dimension: dimension.into(),
            values: values.into_iter().map(Into::into).collect(),
            extraction_fn: None,
        }
    }

    pub fn like(dimension: impl Into<String>, pattern: impl Into<String>) -> Self {
        Filter::Like {
            dimension: dimension.into(),
            pattern: pattern.into(),
            escape: None,
            extraction_fn: None,
        }
    }

    pub fn regex(dimension: impl Into<String>, pattern: impl Into<String>) -> Self {
        Filter::Regex {
            dimension: dimension.into(),
            pattern: pattern.into(),
            extraction_fn: None,
        }
    }

    /// Inclusive numeric range; either side may be open.
    pub fn between_numeric(
        dimension: impl Into<String>,
        lower: Option<f64>,
        upper: Option<f64>,
    ) -> Self {
        Filter::Bound {
            dimension: dimension.into(),
            lower: lower.map(|v| v.to_string()),
            upper: upper.map(|v| v.to_string()),
            lower_strict: false,
            upper_strict: false,
            ordering: SortingOrder::Numeric,
            extraction_fn: None,
        }
    }

    pub fn null(column: impl Into<String>) -> Self {
        Filter::Null {
            column: column.into(),
        }
    }

    pub fn expression(expression: impl Into<String>) -> Self {
        Filter::Expression {
            expression: expression.into(),
        }
    }

    pub fn contains(dimension: impl Into<String>, value: impl Into<String>, case_sensitive: bool) -> Self {
        Filter::Search {
            dimension: dimension.into(),
            query: SearchQuery::Contains {
                value: value.into(),
                case_sensitive,
            },
            extraction_fn: None,
        }
    }

    pub fn interval(dimension: impl Into<String>, intervals: Vec<Interval>) -> Self {
        Filter::Interval {
            dimension: dimension.into(),
            intervals,
            extraction_fn: None,
        }
    }

    /// Combine with another filter using AND, flattening nested ANDs.
    pub fn and(self, other: Filter) -> Self {
        match self {
            Filter::And { mut fields } => {
                fields.push(other);
                Filter::And { fields }
            }
            first => Filter::And {
                fields: vec![first, other],
            },
        }
    }

    /// Combine with another filter using OR, flattening nested ORs.
    pub fn or(self, other: Filter) -> Self {
        match self {
            Filter::Or { mut fields } => {
                fields.push(other);
                Filter::Or { fields }
            }
            first => Filter::Or {
                fields: vec![first, other],
            },
        }
    }

    pub fn negate(self) -> Self {
        match self {
            Filter::Not { field } => *field,
            other => Filter::Not {
                field: Box::new(other),
            },
        }
    }

    /// Attach an extraction function to a leaf filter that supports one.
    ///
    /// Filters without an `extractionFn` slot are returned unchanged.
    pub fn with_extraction(mut self, extraction: ExtractionFn) -> Self {
        match &mut self {
            Filter::Selector { extraction_fn, .. }
            | Filter::In { extraction_fn, .. }
            | Filter::Like { extraction_fn, .. }
            | Filter::Regex { extraction_fn, .. }
            | Filter::Bound { extraction_fn, .. }
            | Filter::Interval { extraction_fn, .. }
            | Filter::Search { extraction_fn, .. }
            | Filter::Javascript { extraction_fn, .. } => *extraction_fn = Some(extraction),
            _ => {}
        }
        self
    }
}
