//! Query context: engine hints sent alongside every query.
//!
//! Well-known flags get typed fields. Anything else goes in the extension bag
//! and is passed through verbatim, so newer engine flags work without a
//! client release. The bag only accepts finite scalar values, and a
//! well-known key set through the bag lands in its typed field.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use super::error::{QueryError, QueryResult};

/// A scalar context value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ContextValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl ContextValue {
    /// Convert an arbitrary JSON value, rejecting arrays, objects, null and
    /// non-finite numbers.
    pub fn from_json(key: &str, value: &Value) -> QueryResult<Self> {
        match value {
            Value::Bool(b) => Ok(ContextValue::Bool(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(ContextValue::Int(i)),
                None => n
                    .as_f64()
                    .filter(|f| f.is_finite())
                    .map(ContextValue::Float)
                    .ok_or_else(|| QueryError::InvalidContextValue(key.to_string())),
            },
            Value::String(s) => Ok(ContextValue::String(s.clone())),
            _ => Err(QueryError::InvalidContextValue(key.to_string())),
        }
    }

    fn is_finite(&self) -> bool {
        match self {
            ContextValue::Float(f) => f.is_finite(),
            _ => true,
        }
    }

    fn to_json(&self) -> Value {
        match self {
            ContextValue::Bool(b) => Value::from(*b),
            ContextValue::Int(i) => Value::from(*i),
            ContextValue::Float(f) => Value::from(*f),
            ContextValue::String(s) => Value::from(s.as_str()),
        }
    }
}

/// Wire names of the typed fields.
const WELL_KNOWN_KEYS: [&str; 8] = [
    "timeout",
    "priority",
    "queryId",
    "useCache",
    "populateCache",
    "finalize",
    "skipEmptyBuckets",
    "minTopNThreshold",
];

impl From<bool> for ContextValue {
    fn from(v: bool) -> Self {
        ContextValue::Bool(v)
    }
}

impl From<i64> for ContextValue {
    fn from(v: i64) -> Self {
        ContextValue::Int(v)
    }
}

impl From<i32> for ContextValue {
    fn from(v: i32) -> Self {
        ContextValue::Int(v.into())
    }
}

impl From<u32> for ContextValue {
    fn from(v: u32) -> Self {
        ContextValue::Int(v.into())
    }
}

impl From<f64> for ContextValue {
    fn from(v: f64) -> Self {
        ContextValue::Float(v)
    }
}

impl From<&str> for ContextValue {
    fn from(v: &str) -> Self {
        ContextValue::String(v.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(v: String) -> Self {
        ContextValue::String(v)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryContext {
    /// Query timeout in milliseconds.
    pub timeout: Option<u64>,
    pub priority: Option<i64>,
    pub query_id: Option<String>,
    pub use_cache: Option<bool>,
    pub populate_cache: Option<bool>,
    pub finalize: Option<bool>,
    /// timeseries only.
    pub skip_empty_buckets: Option<bool>,
    /// topN only.
    pub min_top_n_threshold: Option<u64>,
    pub extra: BTreeMap<String, ContextValue>,
}

impl QueryContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, millis: u64) -> Self {
        self.timeout = Some(millis);
        self
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_query_id(mut self, id: impl Into<String>) -> Self {
        self.query_id = Some(id.into());
        self
    }

    pub fn with_cache(mut self, use_cache: bool, populate_cache: bool) -> Self {
        self.use_cache = Some(use_cache);
        self.populate_cache = Some(populate_cache);
        self
    }

    /// Set an arbitrary flag. Keys are not checked against a known list.
    ///
    /// A well-known key with a value of the right type fills the typed
    /// field instead. One with the wrong type stays in the bag and is
    /// rejected by [`QueryContext::validate`].
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ContextValue>) {
        let key = key.into();
        if let Some(value) = self.assign_known(&key, value.into()) {
            self.extra.insert(key, value);
        }
    }

    /// Set a flag from a JSON value, which must be a finite scalar.
    pub fn set_json(&mut self, key: &str, value: &Value) -> QueryResult<()> {
        let value = ContextValue::from_json(key, value)?;
        self.set(key, value);
        Ok(())
    }

    /// Returns the value back when `key` is not a typed field or the type
    /// does not match.
    fn assign_known(&mut self, key: &str, value: ContextValue) -> Option<ContextValue> {
        match (key, value) {
            ("timeout", ContextValue::Int(v)) if v >= 0 => self.timeout = Some(v.unsigned_abs()),
            ("priority", ContextValue::Int(v)) => self.priority = Some(v),
            ("queryId", ContextValue::String(v)) => self.query_id = Some(v),
            ("useCache", ContextValue::Bool(v)) => self.use_cache = Some(v),
            ("populateCache", ContextValue::Bool(v)) => self.populate_cache = Some(v),
            ("finalize", ContextValue::Bool(v)) => self.finalize = Some(v),
            ("skipEmptyBuckets", ContextValue::Bool(v)) => self.skip_empty_buckets = Some(v),
            ("minTopNThreshold", ContextValue::Int(v)) if v >= 0 => {
                self.min_top_n_threshold = Some(v.unsigned_abs())
            }
            (_, value) => return Some(value),
        }
        None
    }

    /// Value of an extension flag. Typed fields are read directly.
    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.extra.get(key)
    }

    pub fn is_empty(&self) -> bool {
        *self == QueryContext::default()
    }

    /// Reject non-finite floats and extension keys that shadow a typed field.
    pub fn validate(&self) -> QueryResult<()> {
        for (key, value) in &self.extra {
            if !value.is_finite() || WELL_KNOWN_KEYS.contains(&key.as_str()) {
                return Err(QueryError::InvalidContextValue(key.clone()));
            }
        }
        Ok(())
    }

    /// Typed fields first, then extension flags in key order. Unset fields
    /// are omitted.
    pub fn to_map(&self) -> Map<String, Value> {
        let typed = [
            self.timeout.map(Value::from),
            self.priority.map(Value::from),
            self.query_id.as_deref().map(Value::from),
            self.use_cache.map(Value::from),
            self.populate_cache.map(Value::from),
            self.finalize.map(Value::from),
            self.skip_empty_buckets.map(Value::from),
            self.min_top_n_threshold.map(Value::from),
        ];
        let mut map = Map::new();
        for (key, value) in WELL_KNOWN_KEYS.iter().zip(typed) {
            if let Some(value) = value {
                map.insert(key.to_string(), value);
            }
        }
        for (key, value) in &self.extra {
            map.insert(key.clone(), value.to_json());
        }
        map
    }

    pub fn to_json(&self) -> Value {
        Value::Object(self.to_map())
    }

    /// Merge these flags into the `context` of a native query body,
    /// overriding keys already there. Non-object bodies are left alone.
    pub fn apply_to(&self, body: &mut Value) {
        let Some(obj) = body.as_object_mut() else {
            return;
        };
        let context = obj
            .entry("context")
            .or_insert_with(|| Value::Object(Map::new()));
        if let Some(existing) = context.as_object_mut() {
            existing.extend(self.to_map());
            return;
        }
        *context = self.to_json();
    }
}
