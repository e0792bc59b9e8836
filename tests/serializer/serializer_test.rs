//! Wire body tests for each query shape.

use druidkit::query::{
    Dimension, ExtractionFn, Filter, Granularity, Having, Interval, OrderBy, PagingSpec,
    QueryBuilder, QueryContext, QuerySpec,
};
use druidkit::serializer::{self, TopNPlan};
use druidkit::QueryShape;
use insta::assert_snapshot;
use serde_json::{json, Value};

fn wiki() -> QueryBuilder {
    QueryBuilder::new("wikipedia").interval(Interval::between("2015-09-12", "2015-09-13").unwrap())
}

fn compile(builder: QueryBuilder) -> (QueryShape, Value) {
    let compiled = builder.build().unwrap().compile().unwrap();
    (compiled.shape, compiled.body)
}

// ============================================================================
// timeseries
// ============================================================================

#[test]
fn test_timeseries_body() {
    let (shape, body) = compile(
        wiki()
            .granularity(Granularity::Day)
            .dimension("__time")
            .filter(Filter::selector("channel", "en"))
            .long_sum("added", "added"),
    );
    assert_eq!(shape, QueryShape::TimeSeries);
    assert_snapshot!(body.to_string(), @r#"{"queryType":"timeseries","dataSource":"wikipedia","intervals":["2015-09-12T00:00:00.000Z/2015-09-13T00:00:00.000Z"],"granularity":"day","filter":{"type":"selector","dimension":"channel","value":"en"},"aggregations":[{"type":"longSum","name":"added","fieldName":"added"}]}"#);
}

#[test]
fn test_timeseries_descending_with_limit() {
    let (_, body) = compile(
        wiki()
            .granularity(Granularity::Hour)
            .dimension_spec(Dimension::time().with_output_name("hour"))
            .count("edits")
            .order_by(OrderBy::desc("hour"))
            .limit(24),
    );
    assert_eq!(body["descending"], true);
    assert_eq!(body["limit"], 24);
    assert!(body.get("dimensions").is_none());
}

#[test]
fn test_timeseries_ascending_has_no_descending_flag() {
    let (_, body) = compile(wiki().dimension("__time").count("edits"));
    assert!(body.get("descending").is_none());
    assert!(body.get("limit").is_none());
    assert!(body.get("filter").is_none());
    assert!(body.get("postAggregations").is_none());
    assert!(body.get("context").is_none());
}

// ============================================================================
// topN
// ============================================================================

#[test]
fn test_topn_body() {
    let (shape, body) = compile(
        wiki()
            .dimension("browser")
            .long_sum("edits", "count")
            .order_by(OrderBy::desc("edits"))
            .limit(10),
    );
    assert_eq!(shape, QueryShape::TopN);
    assert_eq!(body["metric"], "edits");
    assert_eq!(body["threshold"], 10);
    assert_snapshot!(body.to_string(), @r#"{"queryType":"topN","dataSource":"wikipedia","intervals":["2015-09-12T00:00:00.000Z/2015-09-13T00:00:00.000Z"],"granularity":"all","dimension":{"type":"default","dimension":"browser","outputName":"browser"},"threshold":10,"metric":"edits","aggregations":[{"type":"longSum","name":"edits","fieldName":"count"}]}"#);
}

#[test]
fn test_topn_ascending_is_inverted() {
    let (_, body) = compile(
        wiki()
            .dimension("browser")
            .count("edits")
            .order_by(OrderBy::asc("edits"))
            .limit(3),
    );
    assert_eq!(body["metric"], json!({"type": "inverted", "metric": "edits"}));
}

#[test]
fn test_topn_ordered_by_dimension() {
    let (_, body) = compile(
        wiki()
            .dimension_as("page", "title")
            .count("edits")
            .order_by(OrderBy::asc("title"))
            .limit(3),
    );
    assert_eq!(
        body["metric"],
        json!({"type": "dimension", "ordering": "lexicographic"})
    );
}

#[test]
fn test_topn_plan_resolve() {
    let spec: QuerySpec = wiki()
        .dimension("browser")
        .count("edits")
        .order_by(OrderBy::desc("edits"))
        .limit(7)
        .build()
        .unwrap();
    let plan = TopNPlan::resolve(&spec).unwrap();
    assert_eq!(plan.threshold, 7);
    assert_eq!(plan.dimension.column, "browser");

    let unbounded = wiki().dimension("browser").count("edits").build().unwrap();
    assert!(TopNPlan::resolve(&unbounded).is_none());
}

#[test]
fn test_topn_with_extraction_dimension() {
    let (shape, body) = compile(
        wiki()
            .dimension_with_extraction("page", "prefix", ExtractionFn::substring(0, Some(2)))
            .count("edits")
            .order_by(OrderBy::desc("edits"))
            .limit(5),
    );
    assert_eq!(shape, QueryShape::TopN);
    assert_eq!(
        body["dimension"],
        json!({
            "type": "extraction",
            "dimension": "page",
            "outputName": "prefix",
            "extractionFn": {"type": "substring", "index": 0, "length": 2}
        })
    );
}

// ============================================================================
// groupBy
// ============================================================================

#[test]
fn test_group_by_body() {
    let (shape, body) = compile(
        wiki()
            .dimension("channel")
            .dimension_as("cityName", "city")
            .count("rows")
            .having(Having::greater_than("rows", 10.0))
            .order_by(OrderBy::desc("rows"))
            .limit(5)
            .context(QueryContext::new().with_priority(10)),
    );
    assert_eq!(shape, QueryShape::GroupBy);
    assert_snapshot!(body.to_string(), @r#"{"queryType":"groupBy","dataSource":"wikipedia","intervals":["2015-09-12T00:00:00.000Z/2015-09-13T00:00:00.000Z"],"granularity":"all","dimensions":[{"type":"default","dimension":"channel","outputName":"channel"},{"type":"default","dimension":"cityName","outputName":"city"}],"limitSpec":{"type":"default","columns":[{"dimension":"rows","direction":"descending","dimensionOrder":"lexicographic"}],"limit":5},"having":{"type":"greaterThan","aggregation":"rows","value":10.0},"aggregations":[{"type":"count","name":"rows"}],"context":{"priority":10}}"#);
}

#[test]
fn test_group_by_unbounded_limit_spec() {
    let (_, body) = compile(
        wiki()
            .dimension("channel")
            .dimension("page")
            .count("rows")
            .order_by(OrderBy::desc("rows"))
            .offset(20),
    );
    let limit_spec = &body["limitSpec"];
    assert!(limit_spec.get("limit").is_none());
    assert_eq!(limit_spec["offset"], 20);
}

#[test]
fn test_group_by_without_dimensions_or_limit() {
    let (shape, body) = compile(wiki().count("rows"));
    assert_eq!(shape, QueryShape::GroupBy);
    assert_eq!(body["dimensions"], json!([]));
    assert!(body.get("limitSpec").is_none());
    assert!(body.get("having").is_none());
}

#[test]
fn test_group_by_subtotals() {
    let (_, body) = compile(
        wiki()
            .dimension("channel")
            .dimension("page")
            .count("rows")
            .subtotals(vec![vec!["channel".into()], vec![]]),
    );
    assert_eq!(body["subtotalsSpec"], json!([["channel"], []]));
}

#[test]
fn test_context_extra_keys() {
    let (_, body) = compile(
        wiki()
            .dimension("__time")
            .count("rows")
            .context(QueryContext::new().with_timeout(60_000))
            .context_value("vectorize", "force")
            .context_value("maxOnDiskStorage", 0),
    );
    assert_eq!(
        body["context"],
        json!({"timeout": 60000, "maxOnDiskStorage": 0, "vectorize": "force"})
    );
}

// ============================================================================
// select and segmentMetadata
// ============================================================================

#[test]
fn test_select_body() {
    let spec = wiki()
        .dimension("channel")
        .order_by(OrderBy::desc("__time"))
        .build()
        .unwrap();
    let body = serializer::select(&spec, &PagingSpec::first_page(5));
    assert_snapshot!(body.to_string(), @r#"{"queryType":"select","dataSource":"wikipedia","intervals":["2015-09-12T00:00:00.000Z/2015-09-13T00:00:00.000Z"],"granularity":"all","descending":true,"dimensions":["channel"],"metrics":[],"pagingSpec":{"pagingIdentifiers":{},"threshold":5,"fromNext":true}}"#);
}

#[test]
fn test_select_next_page() {
    let spec = wiki().build().unwrap();
    let mut ids = serde_json::Map::new();
    ids.insert("wikipedia_2015-09-12_v1_0".into(), json!(4));
    let paging = PagingSpec::first_page(5).next_page(ids);
    let body = serializer::select(&spec, &paging);
    assert_eq!(
        body["pagingSpec"]["pagingIdentifiers"],
        json!({"wikipedia_2015-09-12_v1_0": 4})
    );
    assert_eq!(body["descending"], false);
}

#[test]
fn test_segment_metadata_body() {
    let interval = Interval::between("2015-09-12", "2015-09-13").unwrap();
    assert_eq!(
        serializer::segment_metadata("wikipedia", &[interval]),
        json!({
            "queryType": "segmentMetadata",
            "dataSource": "wikipedia",
            "intervals": ["2015-09-12T00:00:00.000Z/2015-09-13T00:00:00.000Z"],
            "merge": true,
            "lenientAggregatorMerge": true,
            "analysisTypes": ["aggregators"]
        })
    );
}
