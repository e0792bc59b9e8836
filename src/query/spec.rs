//! The frozen, shape-agnostic query description.

use std::collections::HashSet;

use serde_json::Value;

use super::aggregation::Aggregation;
use super::context::QueryContext;
use super::dimension::Dimension;
use super::error::{QueryError, QueryResult};
use super::filter::Filter;
use super::granularity::Granularity;
use super::having::Having;
use super::interval::Interval;
use super::limit::{Limit, OrderBy};
use super::post_aggregation::PostAggregation;
use crate::serializer;
use crate::shape::{select_shape, QueryShape};

/// An immutable snapshot of everything a [`QueryBuilder`](super::QueryBuilder)
/// accumulated.
///
/// A `QuerySpec` is only produced by `QueryBuilder::build`, which validates
/// it. It is plain data and can be shared freely once built.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    pub(crate) data_source: String,
    pub(crate) intervals: Vec<Interval>,
    pub(crate) granularity: Granularity,
    pub(crate) dimensions: Vec<Dimension>,
    pub(crate) filter: Option<Filter>,
    pub(crate) aggregations: Vec<Aggregation>,
    pub(crate) post_aggregations: Vec<PostAggregation>,
    pub(crate) having: Option<Having>,
    pub(crate) limit: Option<Limit>,
    pub(crate) context: QueryContext,
    pub(crate) subtotals: Option<Vec<Vec<String>>>,
}

/// A spec paired with the shape chosen for it and its wire body.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub shape: QueryShape,
    pub body: Value,
}

impl QuerySpec {
    pub fn data_source(&self) -> &str {
        &self.data_source
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn filter(&self) -> Option<&Filter> {
        self.filter.as_ref()
    }

    pub fn aggregations(&self) -> &[Aggregation] {
        &self.aggregations
    }

    pub fn post_aggregations(&self) -> &[PostAggregation] {
        &self.post_aggregations
    }

    pub fn having(&self) -> Option<&Having> {
        self.having.as_ref()
    }

    pub fn limit(&self) -> Option<&Limit> {
        self.limit.as_ref()
    }

    /// Order-by columns, empty when no limit was configured.
    pub fn order_by(&self) -> &[OrderBy] {
        self.limit.as_ref().map(|l| l.columns.as_slice()).unwrap_or(&[])
    }

    pub fn context(&self) -> &QueryContext {
        &self.context
    }

    pub fn subtotals(&self) -> Option<&[Vec<String>]> {
        self.subtotals.as_deref()
    }

    /// Check the invariants every spec must hold before dispatch.
    pub(crate) fn validate(&self) -> QueryResult<()> {
        if self.data_source.trim().is_empty() {
            return Err(QueryError::MissingDataSource);
        }
        if self.intervals.is_empty() {
            return Err(QueryError::MissingIntervals(self.data_source.clone()));
        }

        let mut seen = HashSet::new();
        let names = self
            .dimensions
            .iter()
            .map(|d| d.output_name())
            .chain(self.aggregations.iter().map(|a| a.name()))
            .chain(self.post_aggregations.iter().filter_map(|p| p.name()));
        for name in names {
            if !seen.insert(name) {
                return Err(QueryError::DuplicateOutputName(name.to_string()));
            }
        }
        self.context.validate()
    }

    /// Choose the query shape and render the wire body, without any I/O.
    pub fn compile(&self) -> QueryResult<CompiledQuery> {
        let shape = select_shape(self);
        if self.having.is_some() && shape != QueryShape::GroupBy {
            return Err(QueryError::HavingRequiresGroupBy(shape.to_string()));
        }
        Ok(CompiledQuery {
            shape,
            body: serializer::serialize(shape, self),
        })
    }
}
