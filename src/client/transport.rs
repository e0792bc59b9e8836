//! HTTP transport seam.

use std::fmt;

use serde_json::Value;

use super::error::TransportError;
use crate::config::{Settings, SettingsError};

/// HTTP method used by the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// One outbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    /// JSON body for POST; query parameters for GET.
    pub body: Option<Value>,
}

/// Status and raw body of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Sends a single request. Implementations do not retry.
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<F> Transport for F
where
    F: Fn(&HttpRequest) -> Result<HttpResponse, TransportError>,
{
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self(request)
    }
}

/// Blocking reqwest transport.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    auth: Option<(String, String)>,
}

impl HttpTransport {
    /// Build a transport with the timeouts and credentials from `settings`.
    pub fn from_settings(settings: &Settings) -> Result<Self, SettingsError> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(settings.timeout.connect())
            .timeout(settings.timeout.request())
            .user_agent(concat!("druidkit/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SettingsError::InvalidConfig(format!("http client: {}", e)))?;

        let auth = match &settings.auth {
            Some(auth) => Some((auth.username.clone(), auth.resolved_password()?)),
            None => None,
        };

        Ok(Self { client, auth })
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = match request.method {
            Method::Post => {
                let builder = self.client.post(&request.url);
                match &request.body {
                    Some(body) => builder.json(body),
                    None => builder,
                }
            }
            Method::Get => {
                let builder = self.client.get(&request.url);
                match request.body.as_ref().map(query_params) {
                    Some(params) if !params.is_empty() => builder.query(&params),
                    _ => builder,
                }
            }
        };
        if let Some((username, password)) = &self.auth {
            builder = builder.basic_auth(username, Some(password));
        }

        let response = builder.send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(HttpResponse { status, body })
    }
}

/// Flatten a JSON object into query parameters. Strings are passed as-is,
/// other scalars use their JSON text; nested values and nulls are skipped.
pub(crate) fn query_params(body: &Value) -> Vec<(String, String)> {
    let Some(obj) = body.as_object() else {
        return Vec::new();
    };
    obj.iter()
        .filter_map(|(key, value)| match value {
            Value::String(s) => Some((key.clone(), s.clone())),
            Value::Bool(_) | Value::Number(_) => Some((key.clone(), value.to_string())),
            _ => None,
        })
        .collect()
}
