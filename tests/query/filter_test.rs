//! Wire format tests for filters, having specs and post-aggregations.

use druidkit::query::{ExtractionFn, Filter, Having, Interval, PostAggregation};
use serde_json::json;

fn to_json<T: serde::Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap()
}

// ============================================================================
// Leaf filters
// ============================================================================

#[test]
fn test_selector_filter() {
    assert_eq!(
        to_json(&Filter::selector("channel", "#en.wikipedia")),
        json!({"type": "selector", "dimension": "channel", "value": "#en.wikipedia"})
    );
}

#[test]
fn test_selector_with_extraction() {
    let filter = Filter::selector("page", "Main").with_extraction(ExtractionFn::regex("^(\\w+)"));
    assert_eq!(
        to_json(&filter),
        json!({
            "type": "selector",
            "dimension": "page",
            "value": "Main",
            "extractionFn": {"type": "regex", "expr": "^(\\w+)"}
        })
    );
}

#[test]
fn test_in_filter() {
    assert_eq!(
        to_json(&Filter::in_values("countryName", ["France", "Italy"])),
        json!({"type": "in", "dimension": "countryName", "values": ["France", "Italy"]})
    );
}

#[test]
fn test_numeric_bound_filter() {
    assert_eq!(
        to_json(&Filter::between_numeric("added", Some(10.0), None)),
        json!({
            "type": "bound",
            "dimension": "added",
            "lower": "10",
            "lowerStrict": false,
            "upperStrict": false,
            "ordering": "numeric"
        })
    );
}

#[test]
fn test_interval_filter() {
    let filter = Filter::interval(
        "__time",
        vec![Interval::between("2020-01-01", "2020-01-02").unwrap()],
    );
    assert_eq!(
        to_json(&filter),
        json!({
            "type": "interval",
            "dimension": "__time",
            "intervals": ["2020-01-01T00:00:00.000Z/2020-01-02T00:00:00.000Z"]
        })
    );
}

#[test]
fn test_search_and_null_filters() {
    assert_eq!(
        to_json(&Filter::contains("page", "wiki", false)),
        json!({
            "type": "search",
            "dimension": "page",
            "query": {"type": "contains", "value": "wiki", "caseSensitive": false}
        })
    );
    assert_eq!(
        to_json(&Filter::null("cityName")),
        json!({"type": "null", "column": "cityName"})
    );
    assert_eq!(to_json(&Filter::True), json!({"type": "true"}));
}

// ============================================================================
// Logical combinators
// ============================================================================

#[test]
fn test_and_flattens() {
    let filter = Filter::selector("a", "1")
        .and(Filter::selector("b", "2"))
        .and(Filter::selector("c", "3"));
    let json = to_json(&filter);
    assert_eq!(json["type"], "and");
    assert_eq!(json["fields"].as_array().unwrap().len(), 3);
}

#[test]
fn test_negate_twice_is_identity() {
    let filter = Filter::like("page", "Talk:%");
    assert_eq!(
        to_json(&filter.clone().negate()),
        json!({"type": "not", "field": {"type": "like", "dimension": "page", "pattern": "Talk:%"}})
    );
    assert_eq!(filter.clone().negate().negate(), filter);
}

#[test]
fn test_or_of_ands_keeps_structure() {
    let filter = Filter::selector("a", "1")
        .and(Filter::selector("b", "2"))
        .or(Filter::selector("c", "3"));
    let json = to_json(&filter);
    assert_eq!(json["type"], "or");
    assert_eq!(json["fields"][0]["type"], "and");
    assert_eq!(json["fields"][1]["type"], "selector");
}

// ============================================================================
// Having and post-aggregations
// ============================================================================

#[test]
fn test_having_wire_format() {
    let having = Having::greater_than("edits", 5.0).or(Having::equal_to("edits", 0.0));
    assert_eq!(
        to_json(&having),
        json!({
            "type": "or",
            "havingSpecs": [
                {"type": "greaterThan", "aggregation": "edits", "value": 5.0},
                {"type": "equalTo", "aggregation": "edits", "value": 0.0}
            ]
        })
    );
}

#[test]
fn test_ratio_post_aggregation() {
    assert_eq!(
        to_json(&PostAggregation::ratio("avg_added", "added", "edits")),
        json!({
            "type": "arithmetic",
            "name": "avg_added",
            "fn": "/",
            "fields": [
                {"type": "fieldAccess", "fieldName": "added"},
                {"type": "fieldAccess", "fieldName": "edits"}
            ]
        })
    );
}
