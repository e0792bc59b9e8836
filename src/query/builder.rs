//! Fluent query builder.
//!
//! ```ignore
//! use druidkit::query::{QueryBuilder, Interval, Granularity, OrderBy};
//!
//! let spec = QueryBuilder::new("wikipedia")
//!     .interval(Interval::between("2015-09-12", "2015-09-13")?)
//!     .granularity(Granularity::All)
//!     .dimension("channel")
//!     .long_sum("edits", "count")
//!     .order_by(OrderBy::desc("edits"))
//!     .limit(10)
//!     .build()?;
//! ```
//!
//! A builder is owned by one caller and is not meant to be shared between
//! threads; `build` hands back an immutable [`QuerySpec`].

use super::aggregation::{Aggregation, NumericType};
use super::context::{ContextValue, QueryContext};
use super::dimension::Dimension;
use super::error::QueryResult;
use super::extraction::ExtractionFn;
use super::filter::Filter;
use super::granularity::Granularity;
use super::having::Having;
use super::interval::Interval;
use super::limit::{Limit, OrderBy};
use super::post_aggregation::PostAggregation;
use super::spec::QuerySpec;

#[derive(Debug, Clone)]
#[must_use = "builders have no effect until used"]
pub struct QueryBuilder {
    data_source: String,
    intervals: Vec<Interval>,
    granularity: Granularity,
    dimensions: Vec<Dimension>,
    filter: Option<Filter>,
    aggregations: Vec<Aggregation>,
    post_aggregations: Vec<PostAggregation>,
    having: Option<Having>,
    limit: Option<Limit>,
    context: QueryContext,
    subtotals: Option<Vec<Vec<String>>>,
}

impl QueryBuilder {
    pub fn new(data_source: impl Into<String>) -> Self {
        Self {
            data_source: data_source.into(),
            intervals: Vec::new(),
            granularity: Granularity::default(),
            dimensions: Vec::new(),
            filter: None,
            aggregations: Vec::new(),
            post_aggregations: Vec::new(),
            having: None,
            limit: None,
            context: QueryContext::default(),
            subtotals: None,
        }
    }

    pub fn interval(mut self, interval: Interval) -> Self {
        self.intervals.push(interval);
        self
    }

    pub fn intervals(mut self, intervals: impl IntoIterator<Item = Interval>) -> Self {
        self.intervals.extend(intervals);
        self
    }

    pub fn granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    /// Group by a column, keeping its name in the output.
    pub fn dimension(self, column: impl Into<String>) -> Self {
        self.dimension_spec(Dimension::new(column))
    }

    /// Group by a column under a different output name.
    pub fn dimension_as(self, column: impl Into<String>, output_name: impl Into<String>) -> Self {
        self.dimension_spec(Dimension::new(column).with_output_name(output_name))
    }

    pub fn dimension_with_extraction(
        self,
        column: impl Into<String>,
        output_name: impl Into<String>,
        extraction: ExtractionFn,
    ) -> Self {
        self.dimension_spec(
            Dimension::new(column)
                .with_output_name(output_name)
                .with_extraction(extraction),
        )
    }

    pub fn dimension_spec(mut self, dimension: Dimension) -> Self {
        self.dimensions.push(dimension);
        self
    }

    /// Add a filter. Repeated calls are combined with AND.
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(match self.filter.take() {
            Some(existing) => existing.and(filter),
            None => filter,
        });
        self
    }

    /// Add a filter combined with the existing one using OR.
    pub fn or_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(match self.filter.take() {
            Some(existing) => existing.or(filter),
            None => filter,
        });
        self
    }

    pub fn aggregate(mut self, aggregation: Aggregation) -> Self {
        self.aggregations.push(aggregation);
        self
    }

    pub fn count(self, name: impl Into<String>) -> Self {
        self.aggregate(Aggregation::count(name))
    }

    pub fn long_sum(self, name: impl Into<String>, field: impl Into<String>) -> Self {
        self.aggregate(Aggregation::sum(name, field, NumericType::Long))
    }

    pub fn double_sum(self, name: impl Into<String>, field: impl Into<String>) -> Self {
        self.aggregate(Aggregation::sum(name, field, NumericType::Double))
    }

    pub fn min(self, name: impl Into<String>, field: impl Into<String>, numeric: NumericType) -> Self {
        self.aggregate(Aggregation::min(name, field, numeric))
    }

    pub fn max(self, name: impl Into<String>, field: impl Into<String>, numeric: NumericType) -> Self {
        self.aggregate(Aggregation::max(name, field, numeric))
    }

    pub fn distinct_count(self, name: impl Into<String>, field: impl Into<String>) -> Self {
        self.aggregate(Aggregation::distinct_count(name, field))
    }

    pub fn post_aggregate(mut self, post_aggregation: PostAggregation) -> Self {
        self.post_aggregations.push(post_aggregation);
        self
    }

    /// Add a having filter. Repeated calls are combined with AND.
    pub fn having(mut self, having: Having) -> Self {
        self.having = Some(match self.having.take() {
            Some(existing) => existing.and(having),
            None => having,
        });
        self
    }

    /// Cap the number of result rows.
    pub fn limit(mut self, cap: u64) -> Self {
        self.limit.get_or_insert_with(Limit::unbounded).cap = cap;
        self
    }

    /// Skip rows before applying the limit (groupBy only).
    pub fn offset(mut self, offset: u64) -> Self {
        self.limit.get_or_insert_with(Limit::unbounded).offset = Some(offset);
        self
    }

    /// Append an order-by column. Without an explicit `limit` the cap stays
    /// unbounded.
    pub fn order_by(mut self, order_by: OrderBy) -> Self {
        self.limit
            .get_or_insert_with(Limit::unbounded)
            .columns
            .push(order_by);
        self
    }

    pub fn context(mut self, context: QueryContext) -> Self {
        self.context = context;
        self
    }

    pub fn context_value(mut self, key: impl Into<String>, value: impl Into<ContextValue>) -> Self {
        self.context.set(key, value);
        self
    }

    /// Request subtotals over the given dimension subsets (groupBy only).
    pub fn subtotals(mut self, subtotals: Vec<Vec<String>>) -> Self {
        self.subtotals = Some(subtotals);
        self
    }

    /// Freeze the builder into a validated [`QuerySpec`].
    pub fn build(&self) -> QueryResult<QuerySpec> {
        let spec = QuerySpec {
            data_source: self.data_source.clone(),
            intervals: self.intervals.clone(),
            granularity: self.granularity,
            dimensions: self.dimensions.clone(),
            filter: self.filter.clone(),
            aggregations: self.aggregations.clone(),
            post_aggregations: self.post_aggregations.clone(),
            having: self.having.clone(),
            limit: self.limit.clone(),
            context: self.context.clone(),
            subtotals: self.subtotals.clone(),
        };
        spec.validate()?;
        Ok(spec)
    }
}
