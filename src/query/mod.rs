//! Query specification model.
//!
//! - [`builder`] - fluent [`QueryBuilder`]
//! - [`spec`] - the frozen [`QuerySpec`] and [`CompiledQuery`]
//! - [`filter`], [`having`], [`aggregation`], [`post_aggregation`],
//!   [`extraction`] - closed sum types that serialize to the engine's JSON
//! - [`dimension`], [`limit`], [`context`], [`granularity`], [`interval`],
//!   [`paging`]

pub mod aggregation;
pub mod builder;
pub mod context;
pub mod dimension;
mod error;
pub mod extraction;
pub mod filter;
pub mod granularity;
pub mod having;
pub mod interval;
pub mod limit;
pub mod paging;
pub mod post_aggregation;
pub mod spec;

pub use aggregation::{Aggregation, NumericType};
pub use builder::QueryBuilder;
pub use context::{ContextValue, QueryContext};
pub use dimension::{Dimension, OutputType, TIME_COLUMN};
pub use error::{QueryError, QueryResult};
pub use extraction::ExtractionFn;
pub use filter::{Filter, SearchQuery, SortingOrder, SpatialBound};
pub use granularity::Granularity;
pub use having::Having;
pub use interval::Interval;
pub use limit::{Limit, OrderBy, SortDirection, UNBOUNDED_LIMIT};
pub use paging::PagingSpec;
pub use post_aggregation::PostAggregation;
pub use spec::{CompiledQuery, QuerySpec};
