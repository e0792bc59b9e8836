//! Query model error types.

use thiserror::Error;

/// Result type for query construction.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors raised while building or validating a [`QuerySpec`](super::QuerySpec).
///
/// All of these are caller errors and are reported before anything is sent
/// to the broker.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// The data source name is empty.
    #[error("query has no data source")]
    MissingDataSource,

    /// No intervals were added to the query.
    #[error("query for data source '{0}' has no intervals")]
    MissingIntervals(String),

    /// An interval whose start is not strictly before its end.
    #[error("invalid interval: start {start} is not before end {end}")]
    InvalidInterval { start: String, end: String },

    /// An interval or timestamp that could not be parsed as ISO 8601.
    #[error("failed to parse interval '{input}': {reason}")]
    IntervalParse { input: String, reason: String },

    /// A granularity name outside the supported set.
    #[error("unknown granularity: {0}")]
    UnknownGranularity(String),

    /// Two dimensions, aggregations or post-aggregations share an output name.
    #[error("output name '{0}' is used more than once")]
    DuplicateOutputName(String),

    /// A having filter was set on a query that is not executed as a groupBy.
    #[error("having filters require a groupBy query, but this query runs as {0}")]
    HavingRequiresGroupBy(String),

    /// A context value that is not a JSON scalar.
    #[error("context value for '{0}' must be a string, number or boolean")]
    InvalidContextValue(String),
}
