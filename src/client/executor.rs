//! Request execution with bounded retries and error classification.

use std::thread;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use super::error::{DruidError, DruidResult, TransportError};
use super::transport::{HttpRequest, HttpResponse, HttpTransport, Method, Transport};
use crate::config::Settings;

/// Default number of retries after the first attempt.
pub const DEFAULT_RETRIES: u32 = 2;

/// Default delay between attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// How often and how patiently to retry.
///
/// The delay is constant across attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: DEFAULT_RETRIES,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(retries: u32, delay: Duration) -> Self {
        Self { retries, delay }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.retries, settings.retry_delay())
    }

    /// Upper bound on transport calls for one request.
    pub fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }
}

/// Sends requests through a [`Transport`] and turns responses into JSON or a
/// classified [`DruidError`].
///
/// `execute` blocks the calling thread, including for any retry delays. The
/// executor holds no per-request state, so one instance can serve any number
/// of sequential calls.
pub struct RequestExecutor<T = HttpTransport> {
    transport: T,
    policy: RetryPolicy,
}

impl RequestExecutor<HttpTransport> {
    /// Executor over a reqwest transport configured from `settings`.
    pub fn from_settings(settings: &Settings) -> DruidResult<Self> {
        Ok(Self::new(
            HttpTransport::from_settings(settings)?,
            RetryPolicy::from_settings(settings),
        ))
    }
}

impl<T: Transport> RequestExecutor<T> {
    pub fn new(transport: T, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn get(&self, url: &str, params: Option<Value>) -> DruidResult<Value> {
        self.execute(Method::Get, url, params)
    }

    pub fn post(&self, url: &str, body: Value) -> DruidResult<Value> {
        self.execute(Method::Post, url, Some(body))
    }

    /// Send one request, retrying connection failures and 5xx responses.
    ///
    /// # Errors
    ///
    /// * [`DruidError::Transport`] - no response after the last attempt.
    /// * [`DruidError::BadGateway`] - the last response was a 502.
    /// * [`DruidError::Engine`] - an error response with an `{error, errorMessage}` body.
    /// * [`DruidError::Http`] - any other error response.
    /// * [`DruidError::Decode`] - a successful response that is not JSON.
    pub fn execute(&self, method: Method, url: &str, body: Option<Value>) -> DruidResult<Value> {
        let request = HttpRequest {
            method,
            url: url.to_string(),
            body,
        };

        let outcome = self.send_with_retries(&request);
        let payload = request.body.unwrap_or(Value::Null);

        match outcome {
            Ok(response) => classify(url, response, payload),
            Err(source) => Err(DruidError::Transport {
                url: url.to_string(),
                payload,
                source,
            }),
        }
    }

    fn send_with_retries(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            debug!(method = %request.method, url = %request.url, attempt, "sending request");

            let result = self.transport.send(request);
            let failure = match &result {
                Ok(response) if response.status >= 500 => Some(format!("status {}", response.status)),
                Ok(_) => None,
                Err(err) => Some(err.to_string()),
            };
            let Some(failure) = failure else {
                return result;
            };
            if attempt > self.policy.retries {
                return result;
            }

            warn!(
                url = %request.url,
                attempt,
                error = %failure,
                delay_ms = self.policy.delay.as_millis() as u64,
                "request failed, retrying"
            );
            if !self.policy.delay.is_zero() {
                thread::sleep(self.policy.delay);
            }
        }
    }
}

fn classify(url: &str, response: HttpResponse, payload: Value) -> DruidResult<Value> {
    let HttpResponse { status, body } = response;

    if status == 204 {
        return Ok(Value::Array(Vec::new()));
    }

    if (200..300).contains(&status) {
        return serde_json::from_str(&body).map_err(|source| DruidError::Decode {
            url: url.to_string(),
            status,
            body,
            payload,
            source,
        });
    }

    // 502 wins over whatever the body says.
    if status == 502 {
        return Err(DruidError::BadGateway {
            url: url.to_string(),
            payload,
        });
    }

    match engine_error(&body) {
        Some((code, message)) => Err(DruidError::Engine {
            code,
            message,
            payload,
        }),
        None => Err(DruidError::Http {
            status,
            body,
            payload,
        }),
    }
}

/// `(error, errorMessage)` of a structured engine error body.
fn engine_error(body: &str) -> Option<(String, String)> {
    let value: Value = serde_json::from_str(body).ok()?;
    let obj = value.as_object()?;
    let code = obj.get("error")?.as_str()?.to_string();
    let message = match obj.get("errorMessage")? {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    };
    Some((code, message))
}
