#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use axum::body::Body;
use axum::http::StatusCode;
use common::{build_app, build_app_with, get, post, send};
use metrix_server::dispatch::CounterPolicy;

#[tokio::test]
async fn gauge_update_then_query() {
    let app = build_app();

    let (status, body) = post(&app, "/update/gauge/Temp/36.6").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Metric Temp updated successfully");

    let (status, body) = get(&app, "/value/gauge/Temp").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "36.6");
}

#[tokio::test]
async fn gauge_last_write_wins() {
    let app = build_app();
    post(&app, "/update/gauge/Load/1.5").await;
    post(&app, "/update/gauge/Load/0.25").await;
    assert_eq!(get(&app, "/value/gauge/Load").await.1, "0.25");
}

#[tokio::test]
async fn counter_accumulates() {
    let app = build_app();
    assert_eq!(post(&app, "/update/counter/Hits/5").await.0, StatusCode::OK);
    assert_eq!(post(&app, "/update/counter/Hits/3").await.0, StatusCode::OK);

    let (status, body) = get(&app, "/value/counter/Hits").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "8");
}

#[tokio::test]
async fn counter_overflow_wraps() {
    let app = build_app();
    assert_eq!(post(&app, "/update/counter/O/9223372036854775807").await.0, StatusCode::OK);
    assert_eq!(post(&app, "/update/counter/O/1").await.0, StatusCode::OK);
    assert_eq!(get(&app, "/value/counter/O").await.1, "-9223372036854775808");
}

#[tokio::test]
async fn unknown_metric_is_404() {
    let app = build_app();
    assert_eq!(get(&app, "/value/gauge/Unknown").await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn kinds_do_not_leak_into_each_other() {
    let app = build_app();
    post(&app, "/update/gauge/Shared/2.5").await;
    assert_eq!(get(&app, "/value/counter/Shared").await.0, StatusCode::NOT_FOUND);

    post(&app, "/update/counter/Shared/4").await;
    assert_eq!(get(&app, "/value/gauge/Shared").await.1, "2.5");
    assert_eq!(get(&app, "/value/counter/Shared").await.1, "4");
}

#[tokio::test]
async fn bogus_kind_rejected_without_write() {
    let app = build_app();

    let (status, body) = post(&app, "/update/bogus/X/1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("invalid metric type"));

    assert_eq!(get(&app, "/value/bogus/X").await.0, StatusCode::NOT_FOUND);
    assert_eq!(get(&app, "/value/gauge/X").await.0, StatusCode::NOT_FOUND);
    assert_eq!(get(&app, "/value/counter/X").await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unparsable_values_are_bad_requests() {
    let app = build_app();
    assert_eq!(post(&app, "/update/gauge/Temp/warm").await.0, StatusCode::BAD_REQUEST);
    assert_eq!(post(&app, "/update/counter/Hits/1.5").await.0, StatusCode::BAD_REQUEST);
    assert_eq!(post(&app, "/update/counter/Hits/none").await.0, StatusCode::BAD_REQUEST);
    assert_eq!(get(&app, "/value/counter/Hits").await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_segments() {
    let app = build_app();
    assert_eq!(post(&app, "/update/gauge").await.0, StatusCode::NOT_FOUND);
    assert_eq!(post(&app, "/update/gauge/Temp").await.0, StatusCode::BAD_REQUEST);
    assert_eq!(post(&app, "/update/bogus/Temp").await.0, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn negative_counter_follows_policy() {
    let strict = build_app();
    post(&strict, "/update/counter/C/8").await;
    assert_eq!(post(&strict, "/update/counter/C/-2").await.0, StatusCode::BAD_REQUEST);
    assert_eq!(get(&strict, "/value/counter/C").await.1, "8");

    let lax = build_app_with(CounterPolicy::AllowNegative);
    post(&lax, "/update/counter/C/8").await;
    assert_eq!(post(&lax, "/update/counter/C/-2").await.0, StatusCode::OK);
    assert_eq!(get(&lax, "/value/counter/C").await.1, "6");
}

#[tokio::test]
async fn update_requires_post() {
    let app = build_app();
    assert_eq!(get(&app, "/update/gauge/Temp/1").await.0, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn json_batch_applies_everything() {
    let app = build_app();
    let body = r#"[
        {"id": "Temp", "type": "gauge", "value": 36.6},
        {"id": "Hits", "type": "counter", "delta": 5},
        {"id": "Hits", "type": "counter", "delta": 3}
    ]"#;
    let (status, resp) = send(&app, "POST", "/updates", Body::from(body)).await;
    assert_eq!(status, StatusCode::OK);
    let v: serde_json::Value = serde_json::from_str(&resp).unwrap();
    assert_eq!(v["applied"], 3);

    assert_eq!(get(&app, "/value/counter/Hits").await.1, "8");
    assert_eq!(get(&app, "/value/gauge/Temp").await.1, "36.6");
}

#[tokio::test]
async fn json_batch_with_bad_item_writes_nothing() {
    let app = build_app();
    let body = r#"[
        {"id": "Temp", "type": "gauge", "value": 1.0},
        {"id": "Bad", "type": "bogus", "value": 1.0}
    ]"#;
    assert_eq!(send(&app, "POST", "/updates", Body::from(body)).await.0, StatusCode::BAD_REQUEST);
    assert_eq!(get(&app, "/value/gauge/Temp").await.0, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "POST", "/updates", Body::from("not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn listings_show_stored_metrics() {
    let app = build_app();
    post(&app, "/update/gauge/testGauge/123.45").await;
    post(&app, "/update/counter/testCounter/100").await;

    let (status, html) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<td>testGauge</td><td>gauge</td><td>123.45</td>"));
    assert!(html.contains("<td>testCounter</td><td>counter</td><td>100</td>"));

    let (status, json) = get(&app, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    let v: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(v["gauges"]["testGauge"], 123.45);
    assert_eq!(v["counters"]["testCounter"], 100);
}

#[tokio::test]
async fn ops_endpoints() {
    let app = build_app();
    post(&app, "/update/gauge/A/1").await;
    post(&app, "/update/bogus/A/1").await;
    get(&app, "/value/gauge/Missing").await;

    assert_eq!(get(&app, "/healthz").await, (StatusCode::OK, "ok".to_string()));

    let (status, text) = get(&app, "/ops/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(text.contains("metrix_updates_total{kind=\"gauge\",outcome=\"ok\"} 1"));
    assert!(text.contains("metrix_updates_total{kind=\"invalid\",outcome=\"INVALID_KIND\"} 1"));
    assert!(text.contains("metrix_queries_total{outcome=\"NOT_FOUND\"} 1"));
    assert!(text.contains("metrix_stored_metrics 1"));
}

#[tokio::test]
async fn unknown_route_is_404() {
    let app = build_app();
    assert_eq!(get(&app, "/nope").await.0, StatusCode::NOT_FOUND);
}
