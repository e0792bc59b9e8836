//! Dimension specs.

use serde::Serialize;
use serde_json::{json, Map, Value};

use super::extraction::ExtractionFn;

/// The implicit event-time column.
pub const TIME_COLUMN: &str = "__time";

/// Output type of a dimension value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutputType {
    String,
    Long,
    Float,
    Double,
}

/// A grouping column with optional renaming, typing and extraction.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct Dimension {
    pub column: String,
    pub output_name: Option<String>,
    pub output_type: Option<OutputType>,
    pub extraction: Option<ExtractionFn>,
}

impl Dimension {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            output_name: None,
            output_type: None,
            extraction: None,
        }
    }

    /// The event-time dimension, bucketed by the query granularity.
    pub fn time() -> Self {
        Self::new(TIME_COLUMN)
    }

    pub fn with_output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }

    pub fn with_output_type(mut self, output_type: OutputType) -> Self {
        self.output_type = Some(output_type);
        self
    }

    pub fn with_extraction(mut self, extraction: ExtractionFn) -> Self {
        self.extraction = Some(extraction);
        self
    }

    /// Name of the column in the result rows.
    pub fn output_name(&self) -> &str {
        self.output_name.as_deref().unwrap_or(&self.column)
    }

    /// True for the bare time column (no extraction applied).
    pub fn is_time(&self) -> bool {
        self.column == TIME_COLUMN && self.extraction.is_none()
    }

    /// Wire dimension spec: `default`, or `extraction` when a function is set.
    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        let kind = if self.extraction.is_some() {
            "extraction"
        } else {
            "default"
        };
        obj.insert("type".to_string(), Value::from(kind));
        obj.insert("dimension".to_string(), Value::from(self.column.as_str()));
        obj.insert("outputName".to_string(), Value::from(self.output_name()));
        if let Some(output_type) = self.output_type {
            obj.insert("outputType".to_string(), json!(output_type));
        }
        if let Some(extraction) = &self.extraction {
            obj.insert("extractionFn".to_string(), json!(extraction));
        }
        Value::Object(obj)
    }
}

impl From<&str> for Dimension {
    fn from(column: &str) -> Self {
        Dimension::new(column)
    }
}

impl From<String> for Dimension {
    fn from(column: String) -> Self {
        Dimension::new(column)
    }
}
