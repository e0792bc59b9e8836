//! Query execution against a Druid broker.

use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use super::error::DruidResult;
use super::executor::{RequestExecutor, RetryPolicy};
use super::transport::{HttpTransport, Transport};
use crate::config::Settings;
use crate::query::{PagingSpec, QueryBuilder, QuerySpec, TIME_COLUMN};
use crate::response::{normalize, NormalizedResult, ResponseKind};
use crate::serializer;
use crate::shape::QueryShape;

/// Blocking client for a Druid cluster.
///
/// Holds the settings and a [`RequestExecutor`]; both are read-only after
/// construction. Calls block the current thread until the response (or the
/// final failure after retries) arrives.
///
/// # Example
///
/// ```ignore
/// use druidkit::prelude::*;
///
/// let client = DruidClient::from_settings(Settings::load()?)?;
/// let spec = QueryBuilder::new("wikipedia")
///     .interval(Interval::between("2020-01-01", "2020-01-02")?)
///     .dimension("channel")
///     .long_sum("added", "added")
///     .order_by(OrderBy::desc("added"))
///     .limit(10)
///     .build()?;
///
/// for row in client.query(&spec)? {
///     println!("{row:?}");
/// }
/// ```
pub struct DruidClient<T = HttpTransport> {
    settings: Settings,
    executor: RequestExecutor<T>,
}

impl DruidClient<HttpTransport> {
    /// Create a client over HTTP using `settings`.
    pub fn from_settings(settings: Settings) -> DruidResult<Self> {
        settings.validate()?;
        let executor = RequestExecutor::from_settings(&settings)?;
        Ok(Self { settings, executor })
    }

    /// Create a client from the default config file locations.
    pub fn connect() -> DruidResult<Self> {
        Self::from_settings(Settings::load()?)
    }
}

impl<T: Transport> DruidClient<T> {
    /// Create a client that sends every request through `transport`.
    pub fn with_transport(settings: Settings, transport: T) -> Self {
        let policy = RetryPolicy::from_settings(&settings);
        Self {
            settings,
            executor: RequestExecutor::new(transport, policy),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn executor(&self) -> &RequestExecutor<T> {
        &self.executor
    }

    /// Compile `spec`, send it to the broker and normalize the rows.
    pub fn query(&self, spec: &QuerySpec) -> DruidResult<NormalizedResult> {
        let compiled = spec.compile()?;
        debug!(
            data_source = spec.data_source(),
            query_type = compiled.shape.query_type(),
            "executing query"
        );

        let raw = self.post_query(compiled.body)?;
        let time_output = match (compiled.shape, spec.dimensions()) {
            (QueryShape::TimeSeries, [time]) => time.output_name(),
            _ => TIME_COLUMN,
        };
        Ok(normalize(
            &ResponseKind::for_shape(compiled.shape, time_output),
            raw,
        ))
    }

    /// Fetch one page of raw events.
    ///
    /// Feed [`NormalizedResult::paging_identifiers`] into
    /// [`PagingSpec::next_page`] to request the following page; an empty
    /// result marks the end.
    pub fn select_page(
        &self,
        spec: &QuerySpec,
        paging: &PagingSpec,
    ) -> DruidResult<NormalizedResult> {
        spec.validate()?;
        let raw = self.post_query(serializer::select(spec, paging))?;
        Ok(normalize(&ResponseKind::Select, raw))
    }

    /// Send a hand-written native query and normalize it by its `queryType`.
    pub fn execute_native(&self, body: Value) -> DruidResult<NormalizedResult> {
        let kind = body
            .get("queryType")
            .and_then(Value::as_str)
            .map(ResponseKind::from_query_type)
            .unwrap_or(ResponseKind::Raw);
        let raw = self.post_query(body)?;
        Ok(normalize(&kind, raw))
    }

    /// POST a native query body to the broker and return the raw response.
    pub fn post_query(&self, mut body: Value) -> DruidResult<Value> {
        if self.settings.assign_query_ids {
            assign_query_id(&mut body);
        }
        self.executor.post(&self.settings.query_url(), body)
    }
}

impl QueryBuilder {
    /// Build the spec and run it with `client`.
    pub fn execute<T: Transport>(&self, client: &DruidClient<T>) -> DruidResult<NormalizedResult> {
        let spec = self.build()?;
        client.query(&spec)
    }
}

/// Add `context.queryId` unless the body already has one.
fn assign_query_id(body: &mut Value) {
    let Some(obj) = body.as_object_mut() else {
        return;
    };
    let context = obj.entry("context").or_insert_with(|| json!({}));
    if let Some(context) = context.as_object_mut() {
        context
            .entry("queryId")
            .or_insert_with(|| json!(Uuid::new_v4().to_string()));
    }
}
