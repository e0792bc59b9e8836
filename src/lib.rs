//! # druidkit
//!
//! A query builder and blocking HTTP client for Apache Druid native queries.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                  QueryBuilder                            │
//! │  (dimensions, filters, aggregations, limit, context)     │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [build]
//! ┌─────────────────────────────────────────────────────────┐
//! │                 QuerySpec (immutable)                    │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [shape::select_shape]
//! ┌─────────────────────────────────────────────────────────┐
//! │          QueryShape: timeseries | topN | groupBy         │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [serializer]
//! ┌─────────────────────────────────────────────────────────┐
//! │                 Native JSON body                         │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [client::RequestExecutor, retries]
//! ┌─────────────────────────────────────────────────────────┐
//! │                 Raw JSON response                        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [response::normalize]
//! ┌─────────────────────────────────────────────────────────┐
//! │                 Rows + metadata                          │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod client;
pub mod config;
pub mod query;
pub mod response;
pub mod serializer;
pub mod shape;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::client::{DruidClient, DruidError, DruidResult, Method, RetryPolicy};
    pub use crate::config::Settings;
    pub use crate::query::{
        Aggregation, ContextValue, Dimension, ExtractionFn, Filter, Granularity, Having,
        Interval, Limit, NumericType, OrderBy, PagingSpec, PostAggregation, QueryBuilder,
        QueryContext, QueryError, QuerySpec, SortDirection, TIME_COLUMN,
    };
    pub use crate::response::{NormalizedResult, Row};
    pub use crate::shape::QueryShape;
}

// Also export at crate root for convenience
pub use client::{DruidClient, DruidError, DruidResult};
pub use query::{QueryBuilder, QueryError, QuerySpec};
pub use response::{normalize, NormalizedResult, ResponseKind};
pub use shape::{select_shape, QueryShape};
