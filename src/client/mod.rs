//! Druid HTTP client.
//!
//! Requests go through a [`Transport`] (reqwest-blocking by default) wrapped
//! in a [`RequestExecutor`], which retries connection failures and 5xx
//! responses with a constant delay and classifies the final outcome into a
//! [`DruidError`]. [`DruidClient`] ties the executor to the configured
//! broker, coordinator and overlord endpoints.
//!
//! # Example
//!
//! ```ignore
//! use druidkit::client::{DruidClient, Method};
//!
//! let client = DruidClient::connect()?;
//! let structure = client.describe("wikipedia")?;
//! let raw = client.executor().execute(Method::Get, "http://localhost:8081/status", None)?;
//! ```

mod druid;
mod error;
pub mod executor;
mod metadata;
mod task;
pub mod transport;

pub use druid::DruidClient;
pub use error::{DruidError, DruidResult, TransportError};
pub use executor::{RequestExecutor, RetryPolicy};
pub use metadata::Structure;
pub use task::{TaskState, TaskStatus};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Method, Transport};
