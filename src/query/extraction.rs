//! Extraction functions applied to dimension values.

use serde::Serialize;

use super::filter::SearchQuery;
use super::granularity::Granularity;

/// How `stringFormat` treats null input values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NullHandling {
    NullString,
    EmptyString,
    ReturnNull,
}

/// A transform applied to a dimension's raw value before grouping or filtering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ExtractionFn {
    /// First capture group of `expr` (or group `index`).
    Regex {
        expr: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        index: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        replace_missing_value: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        replace_missing_value_with: Option<String>,
    },
    /// Keeps values matching `expr`, nulls the rest.
    Partial { expr: String },
    /// Keeps values matching a search query.
    SearchQuery { query: SearchQuery },
    Substring {
        index: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        length: Option<u32>,
    },
    Strlen,
    /// Formats `__time` (or a millisecond column) with a Joda pattern.
    TimeFormat {
        #[serde(skip_serializing_if = "Option::is_none")]
        format: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        time_zone: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        locale: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        granularity: Option<Granularity>,
        #[serde(skip_serializing_if = "Option::is_none")]
        as_millis: Option<bool>,
    },
    Javascript {
        function: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        injective: Option<bool>,
    },
    /// Maps values through a lookup registered on the cluster.
    RegisteredLookup {
        lookup: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        retain_missing_value: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        replace_missing_value_with: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        injective: Option<bool>,
    },
    /// Applies each function in order.
    Cascade { extraction_fns: Vec<ExtractionFn> },
    StringFormat {
        format: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        null_handling: Option<NullHandling>,
    },
    Upper {
        #[serde(skip_serializing_if = "Option::is_none")]
        locale: Option<String>,
    },
    Lower {
        #[serde(skip_serializing_if = "Option::is_none")]
        locale: Option<String>,
    },
    /// Buckets numeric values into ranges of `size` starting at `offset`.
    Bucket {
        #[serde(skip_serializing_if = "Option::is_none")]
        size: Option<u64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        offset: Option<u64>,
    },
}

impl ExtractionFn {
    pub fn regex(expr: impl Into<String>) -> Self {
        ExtractionFn::Regex {
            expr: expr.into(),
            index: None,
            replace_missing_value: None,
            replace_missing_value_with: None,
        }
    }

    pub fn time_format(format: impl Into<String>) -> Self {
        ExtractionFn::TimeFormat {
            format: Some(format.into()),
            time_zone: None,
            locale: None,
            granularity: None,
            as_millis: None,
        }
    }

    pub fn lookup(name: impl Into<String>) -> Self {
        ExtractionFn::RegisteredLookup {
            lookup: name.into(),
            retain_missing_value: Some(true),
            replace_missing_value_with: None,
            injective: None,
        }
    }

    pub fn substring(index: u32, length: Option<u32>) -> Self {
        ExtractionFn::Substring { index, length }
    }
}
