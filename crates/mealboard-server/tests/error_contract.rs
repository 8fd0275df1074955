// SPDX-License-Identifier: Apache-2.0

mod support;

use serde_json::Value;
use support::{header_value, seeded_store, send_raw, send_raw_with_method, serve};

fn error_code(body: &str) -> String {
    let json: Value = serde_json::from_str(body).expect("error json");
    json["error"]["code"].as_str().expect("code").to_string()
}

#[tokio::test]
async fn malformed_scope_parameters_are_validation_failures() {
    let addr = serve(seeded_store()).await;
    for path in [
        "/v1/registrations?tenant=0&department=west&year=2025&week=47",
        "/v1/registrations?tenant=1&department=west&year=1999&week=47",
        "/v1/registrations?tenant=1&department=west&year=2025&week=54",
        "/v1/registrations?tenant=1&department=bad%20name&year=2025&week=47",
        "/v1/registrations?tenant=1&year=2025",
    ] {
        let (status, _, body) = send_raw(addr, path, &[]).await;
        assert_eq!(status, 400, "expected 400 for {path}");
        assert_eq!(error_code(&body), "validation_failed");
    }
}

#[tokio::test]
async fn unknown_department_and_tenant_are_404_not_defaults() {
    let addr = serve(seeded_store()).await;

    let (status, _, body) = send_raw(
        addr,
        "/v1/registrations?tenant=1&department=north&year=2025&week=47",
        &[],
    )
    .await;
    assert_eq!(status, 404);
    assert_eq!(error_code(&body), "not_found");

    let (status, _, body) = send_raw(addr, "/v1/reports/weekly?tenant=9&year=2025&week=47", &[]).await;
    assert_eq!(status, 404);
    assert_eq!(error_code(&body), "not_found");
}

#[tokio::test]
async fn malformed_preconditions_are_400_and_leave_no_trace() {
    let addr = serve(seeded_store()).await;
    let scope = "tenant=1&department=west&year=2025&week=47";

    for bad in [
        "\"not-a-validator\"",
        "\"mealboard:reg:1:east:2025:47:v0\"",
        "\"mealboard:choice:1:west:2025:47:v0\"",
        "\"mealboard:reg:1:west:2025:47:vNaN\"",
    ] {
        let (status, _, body) = send_raw_with_method(
            addr,
            "PATCH",
            &format!("/v1/registrations/marks?{scope}"),
            &[("If-Match", bad)],
            Some(r#"{"marks":[{"day":1,"meal":"lunch","diet_type":"gluten","marked":true}]}"#),
        )
        .await;
        assert_eq!(status, 400, "expected 400 for precondition {bad}");
        assert_eq!(error_code(&body), "precondition_malformed");
    }

    let (status, head, _) = send_raw(addr, &format!("/v1/registrations?{scope}"), &[]).await;
    assert_eq!(status, 200);
    assert_eq!(
        header_value(&head, "etag").as_deref(),
        Some("\"mealboard:reg:1:west:2025:47:v0\"")
    );
}

#[tokio::test]
async fn invalid_bodies_name_the_offending_field() {
    let addr = serve(seeded_store()).await;
    let scope = "tenant=1&department=west&year=2025&week=47";
    let if_match = ("If-Match", "\"mealboard:reg:1:west:2025:47:v0\"");

    // Unknown fields are rejected outright.
    let (status, _, body) = send_raw_with_method(
        addr,
        "PATCH",
        &format!("/v1/registrations/marks?{scope}"),
        &[if_match],
        Some(r#"{"marks":[],"surprise":1}"#),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(error_code(&body), "validation_failed");

    // In-range types, out-of-range value: the field is named.
    let (status, _, body) = send_raw_with_method(
        addr,
        "PATCH",
        &format!("/v1/registrations/marks?{scope}"),
        &[if_match],
        Some(r#"{"marks":[{"day":8,"meal":"lunch","diet_type":"gluten","marked":true}]}"#),
    )
    .await;
    assert_eq!(status, 400);
    let json: Value = serde_json::from_str(&body).expect("json");
    assert_eq!(
        json["error"]["details"]["field_errors"][0]["parameter"],
        "marks.day"
    );

    let (status, _, body) = send_raw_with_method(
        addr,
        "PUT",
        "/v1/menu-choices?department=west&week=47",
        &[("If-Match", "\"mealboard:choice:west:47:v0\"")],
        Some(r#"{"day":1,"choice":"alt3"}"#),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(error_code(&body), "validation_failed");
}

#[tokio::test]
async fn unsupported_export_format_is_a_validation_failure() {
    let addr = serve(seeded_store()).await;
    let (status, _, body) = send_raw(
        addr,
        "/v1/exports/weekly?tenant=1&year=2025&week=47&format=pdf",
        &[],
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(error_code(&body), "validation_failed");
}

#[tokio::test]
async fn operational_endpoints_respond() {
    let addr = serve(seeded_store()).await;

    let (status, _, body) = send_raw(addr, "/healthz", &[]).await;
    assert_eq!(status, 200);
    assert_eq!(body, "ok");

    let (status, _, body) = send_raw(addr, "/v1/version", &[]).await;
    assert_eq!(status, 200);
    let json: Value = serde_json::from_str(&body).expect("json");
    assert_eq!(json["name"], "mealboard-server");

    let (status, _, body) = send_raw(addr, "/metrics", &[]).await;
    assert_eq!(status, 200);
    assert!(body.contains("mealboard_requests_total"));
}

#[tokio::test]
async fn every_response_carries_a_request_id() {
    let addr = serve(seeded_store()).await;

    let (_, head, _) = send_raw(addr, "/healthz", &[]).await;
    assert!(header_value(&head, "x-request-id").is_some());

    // Caller-supplied ids are propagated back.
    let (_, head, _) = send_raw(
        addr,
        "/v1/registrations?tenant=1&department=west&year=2025&week=47",
        &[("X-Request-Id", "req-caller-7")],
    )
    .await;
    assert_eq!(
        header_value(&head, "x-request-id").as_deref(),
        Some("req-caller-7")
    );
}
