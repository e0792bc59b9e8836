//! Integration tests for the fluent query builder and spec validation.

use druidkit::query::{
    Aggregation, Dimension, ExtractionFn, Filter, Granularity, Having, Interval, NumericType,
    OrderBy, PostAggregation, QueryBuilder, QueryContext, QueryError, SortDirection,
};

fn day() -> Interval {
    Interval::between("2020-01-01", "2020-01-02").unwrap()
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_missing_data_source() {
    let err = QueryBuilder::new("  ").interval(day()).build().unwrap_err();
    assert_eq!(err, QueryError::MissingDataSource);
}

#[test]
fn test_missing_intervals() {
    let err = QueryBuilder::new("wikipedia").count("rows").build().unwrap_err();
    assert_eq!(err, QueryError::MissingIntervals("wikipedia".to_string()));
}

#[test]
fn test_duplicate_dimension_and_aggregation_name() {
    let err = QueryBuilder::new("wikipedia")
        .interval(day())
        .dimension("channel")
        .count("channel")
        .build()
        .unwrap_err();
    assert_eq!(err, QueryError::DuplicateOutputName("channel".to_string()));
}

#[test]
fn test_duplicate_post_aggregation_name() {
    let err = QueryBuilder::new("wikipedia")
        .interval(day())
        .long_sum("added", "added")
        .post_aggregate(PostAggregation::constant("added", 1.0))
        .build()
        .unwrap_err();
    assert_eq!(err, QueryError::DuplicateOutputName("added".to_string()));
}

#[test]
fn test_renamed_dimension_avoids_collision() {
    let spec = QueryBuilder::new("wikipedia")
        .interval(day())
        .dimension_as("channel", "channel_name")
        .count("channel")
        .build()
        .unwrap();
    assert_eq!(spec.dimensions()[0].output_name(), "channel_name");
}

#[test]
fn test_invalid_interval() {
    let err = Interval::between("2020-02-01", "2020-01-01").unwrap_err();
    assert!(matches!(err, QueryError::InvalidInterval { .. }));
    assert!(matches!(
        Interval::parse("yesterday/today"),
        Err(QueryError::IntervalParse { .. })
    ));
}

// ============================================================================
// Accumulation
// ============================================================================

#[test]
fn test_builder_collects_everything() {
    let spec = QueryBuilder::new("wikipedia")
        .interval(day())
        .interval(Interval::parse("2020-01-05/2020-01-06").unwrap())
        .granularity(Granularity::Hour)
        .dimension("channel")
        .dimension_with_extraction("page", "page_prefix", ExtractionFn::substring(0, Some(3)))
        .filter(Filter::selector("isRobot", "false"))
        .long_sum("added", "added")
        .double_sum("delta", "delta")
        .min("smallest", "delta", NumericType::Double)
        .max("largest", "delta", NumericType::Double)
        .distinct_count("users", "user")
        .post_aggregate(PostAggregation::ratio("avg_added", "added", "delta"))
        .having(Having::greater_than("added", 100.0))
        .order_by(OrderBy::desc("added"))
        .limit(50)
        .offset(10)
        .context(QueryContext::new().with_timeout(30_000))
        .context_value("vectorize", true)
        .build()
        .unwrap();

    assert_eq!(spec.data_source(), "wikipedia");
    assert_eq!(spec.intervals().len(), 2);
    assert_eq!(spec.granularity(), Granularity::Hour);
    assert_eq!(spec.dimensions().len(), 2);
    assert_eq!(spec.aggregations().len(), 5);
    assert_eq!(spec.post_aggregations().len(), 1);
    assert!(spec.having().is_some());

    let limit = spec.limit().unwrap();
    assert_eq!(limit.cap, 50);
    assert_eq!(limit.offset, Some(10));
    assert_eq!(spec.order_by()[0].direction, SortDirection::Descending);

    assert_eq!(spec.context().timeout, Some(30_000));
    assert!(spec.context().get("vectorize").is_some());
}

#[test]
fn test_repeated_having_is_anded() {
    let spec = QueryBuilder::new("wikipedia")
        .interval(day())
        .dimension("channel")
        .dimension("page")
        .long_sum("added", "added")
        .count("edits")
        .having(Having::greater_than("added", 10.0))
        .having(Having::less_than("edits", 1000.0))
        .build()
        .unwrap();
    match spec.having().unwrap() {
        Having::And { having_specs } => assert_eq!(having_specs.len(), 2),
        other => panic!("expected and having, got {:?}", other),
    }
}

#[test]
fn test_or_filter() {
    let spec = QueryBuilder::new("wikipedia")
        .interval(day())
        .filter(Filter::selector("channel", "#en"))
        .or_filter(Filter::selector("channel", "#de"))
        .build()
        .unwrap();
    match spec.filter().unwrap() {
        Filter::Or { fields } => assert_eq!(fields.len(), 2),
        other => panic!("expected or filter, got {:?}", other),
    }
}

#[test]
fn test_build_does_not_consume_builder() {
    let builder = QueryBuilder::new("wikipedia").interval(day()).count("rows");
    let first = builder.build().unwrap();
    let second = builder.clone().dimension("channel").build().unwrap();
    assert!(first.dimensions().is_empty());
    assert_eq!(second.dimensions().len(), 1);
}

#[test]
fn test_generic_aggregate_and_dimension_spec() {
    let spec = QueryBuilder::new("wikipedia")
        .interval(day())
        .dimension_spec(Dimension::time().with_output_name("ts"))
        .aggregate(Aggregation::filtered(
            Filter::selector("isNew", "true"),
            Aggregation::count("new_edits"),
        ))
        .build()
        .unwrap();
    assert_eq!(spec.aggregations()[0].name(), "new_edits");
    assert!(spec.dimensions()[0].is_time());
}

#[test]
fn test_having_on_topn_rejected_at_compile() {
    let spec = QueryBuilder::new("wikipedia")
        .interval(day())
        .dimension("channel")
        .count("edits")
        .having(Having::greater_than("edits", 5.0))
        .order_by(OrderBy::desc("edits"))
        .limit(5)
        .build()
        .unwrap();
    assert_eq!(
        spec.compile().unwrap_err(),
        QueryError::HavingRequiresGroupBy("topN".to_string())
    );
}

#[test]
fn test_non_finite_context_value_rejected() {
    let err = QueryBuilder::new("wikipedia")
        .interval(day())
        .dimension("__time")
        .count("edits")
        .context_value("ratio", f64::NAN)
        .build()
        .unwrap_err();
    assert_eq!(err, QueryError::InvalidContextValue("ratio".to_string()));
}

#[test]
fn test_context_value_on_well_known_key_replaces_typed_field() {
    let spec = QueryBuilder::new("wikipedia")
        .interval(day())
        .dimension("__time")
        .count("edits")
        .context(QueryContext::new().with_query_id("typed"))
        .context_value("queryId", "extra")
        .build()
        .unwrap();
    let body = spec.compile().unwrap().body;
    assert_eq!(body["context"], serde_json::json!({"queryId": "extra"}));
}

#[test]
fn test_mistyped_well_known_context_key_rejected() {
    let err = QueryBuilder::new("wikipedia")
        .interval(day())
        .count("edits")
        .context_value("timeout", "soon")
        .build()
        .unwrap_err();
    assert_eq!(err, QueryError::InvalidContextValue("timeout".to_string()));
}
