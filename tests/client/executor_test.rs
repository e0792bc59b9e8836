//! Retry and error classification tests for the request executor.

use std::cell::{Cell, RefCell};
use std::time::Duration;

use druidkit::client::{
    DruidError, HttpRequest, HttpResponse, Method, RequestExecutor, RetryPolicy, TransportError,
};
use serde_json::json;

fn stub<F>(f: F) -> F
where
    F: Fn(&HttpRequest) -> Result<HttpResponse, TransportError>,
{
    f
}

fn policy(retries: u32) -> RetryPolicy {
    RetryPolicy::new(retries, Duration::ZERO)
}

const ENGINE_ERROR: &str = r#"{"error":"Query timeout","errorMessage":"Timeout waiting for task.","errorClass":"java.util.concurrent.TimeoutException"}"#;

// ============================================================================
// Retry bound
// ============================================================================

#[test]
fn test_persistent_500_makes_retries_plus_one_attempts() {
    for retries in [0, 1, 2, 5] {
        let attempts = Cell::new(0u32);
        let executor = RequestExecutor::new(
            stub(|_| {
                attempts.set(attempts.get() + 1);
                Ok(HttpResponse::new(500, "internal error"))
            }),
            policy(retries),
        );
        let err = executor.post("http://broker/druid/v2", json!({})).unwrap_err();
        assert_eq!(attempts.get(), retries + 1);
        assert!(matches!(err, DruidError::Http { status: 500, .. }));
        assert!(!matches!(err, DruidError::BadGateway { .. }));
    }
}

#[test]
fn test_persistent_500_with_engine_body() {
    let attempts = Cell::new(0u32);
    let executor = RequestExecutor::new(
        stub(|_| {
            attempts.set(attempts.get() + 1);
            Ok(HttpResponse::new(500, ENGINE_ERROR))
        }),
        policy(2),
    );
    let err = executor.post("http://broker/druid/v2", json!({})).unwrap_err();
    assert_eq!(attempts.get(), 3);
    match err {
        DruidError::Engine { code, message, .. } => {
            assert_eq!(code, "Query timeout");
            assert_eq!(message, "Timeout waiting for task.");
        }
        other => panic!("expected engine error, got {other:?}"),
    }
}

#[test]
fn test_502_is_bad_gateway_even_with_engine_body() {
    let attempts = Cell::new(0u32);
    let executor = RequestExecutor::new(
        stub(|_| {
            attempts.set(attempts.get() + 1);
            Ok(HttpResponse::new(502, ENGINE_ERROR))
        }),
        policy(2),
    );
    let payload = json!({"queryType": "topN"});
    let err = executor
        .post("http://broker/druid/v2", payload.clone())
        .unwrap_err();
    assert_eq!(attempts.get(), 3);
    assert!(matches!(err, DruidError::BadGateway { .. }));
    assert!(err.is_retriable());
    assert_eq!(err.payload(), Some(&payload));
}

#[test]
fn test_502_then_success() {
    let statuses = RefCell::new(vec![200, 502]);
    let executor = RequestExecutor::new(
        stub(|_| {
            let status = statuses.borrow_mut().pop().unwrap_or(200);
            let body = if status == 200 { "[]" } else { "" };
            Ok(HttpResponse::new(status, body))
        }),
        policy(2),
    );
    assert_eq!(executor.post("http://x", json!({})).unwrap(), json!([]));
    assert!(statuses.borrow().is_empty());
}

#[test]
fn test_client_errors_are_not_retried() {
    for status in [400, 404, 413] {
        let attempts = Cell::new(0u32);
        let executor = RequestExecutor::new(
            stub(|_| {
                attempts.set(attempts.get() + 1);
                Ok(HttpResponse::new(status, "nope"))
            }),
            policy(3),
        );
        let err = executor.post("http://x", json!({})).unwrap_err();
        assert_eq!(attempts.get(), 1);
        match err {
            DruidError::Http { status: got, body, .. } => {
                assert_eq!(got, status);
                assert_eq!(body, "nope");
            }
            other => panic!("expected http error, got {other:?}"),
        }
    }
}

#[test]
fn test_timeouts_are_retried_then_reported() {
    let attempts = Cell::new(0u32);
    let executor = RequestExecutor::new(
        stub(|_| {
            attempts.set(attempts.get() + 1);
            Err(TransportError::Timeout("read timed out".into()))
        }),
        policy(2),
    );
    let err = executor.get("http://coordinator", None).unwrap_err();
    assert_eq!(attempts.get(), 3);
    match err {
        DruidError::Transport { source, .. } => {
            assert!(matches!(source, TransportError::Timeout(_)));
        }
        other => panic!("expected transport error, got {other:?}"),
    }
}

// ============================================================================
// Request shape and success path
// ============================================================================

#[test]
fn test_request_passes_method_url_and_body() {
    let seen = RefCell::new(Vec::new());
    let executor = RequestExecutor::new(
        stub(|req| {
            seen.borrow_mut().push(req.clone());
            Ok(HttpResponse::new(200, "{}"))
        }),
        policy(0),
    );
    executor
        .execute(
            Method::Get,
            "http://coordinator/druid/coordinator/v1/datasources",
            Some(json!({"simple": true})),
        )
        .unwrap();
    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, Method::Get);
    assert_eq!(seen[0].url, "http://coordinator/druid/coordinator/v1/datasources");
    assert_eq!(seen[0].body, Some(json!({"simple": true})));
}

#[test]
fn test_204_skips_body_parsing() {
    let executor = RequestExecutor::new(stub(|_| Ok(HttpResponse::new(204, ""))), policy(0));
    assert_eq!(executor.post("http://x", json!({})).unwrap(), json!([]));
}

#[test]
fn test_malformed_success_body_is_decode_error() {
    let executor = RequestExecutor::new(
        stub(|_| Ok(HttpResponse::new(200, "[{\"truncated\":"))),
        policy(2),
    );
    let err = executor.post("http://x", json!({"q": true})).unwrap_err();
    match err {
        DruidError::Decode {
            status,
            body,
            payload,
            ..
        } => {
            assert_eq!(status, 200);
            assert_eq!(body, "[{\"truncated\":");
            assert_eq!(payload, json!({"q": true}));
        }
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[test]
fn test_delay_is_applied_between_attempts() {
    let attempts = Cell::new(0u32);
    let executor = RequestExecutor::new(
        stub(|_| {
            attempts.set(attempts.get() + 1);
            Ok(HttpResponse::new(503, ""))
        }),
        RetryPolicy::new(2, Duration::from_millis(5)),
    );
    let started = std::time::Instant::now();
    let _ = executor.post("http://x", json!({}));
    assert_eq!(attempts.get(), 3);
    assert!(started.elapsed() >= Duration::from_millis(10));
}
