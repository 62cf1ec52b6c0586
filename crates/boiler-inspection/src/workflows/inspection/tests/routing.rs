use super::common::*;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;

use crate::workflows::inspection::router::submit_handler;
use crate::workflows::inspection::InspectionService;

fn json_request(method: &str, uri: &str, body: &impl serde::Serialize) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).expect("serialize body")))
        .expect("request builds")
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request builds")
}

#[tokio::test]
async fn submit_route_creates_records() {
    let (service, repository) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/inspections",
            &scenario_submission(),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["schema_version"], 1);
    assert_eq!(payload["address"], "서울특별시 강남구");
    assert_eq!(payload["total_installed"], 2);
    assert_eq!(payload["badge"], "success");
    assert_eq!(payload["products"][0]["name"], "NCB790");
    assert_eq!(
        payload["checklist_answers"]["install_location"]["answer"],
        "unanswered"
    );
    assert_eq!(repository.len(), 1);
}

#[tokio::test]
async fn submit_handler_lists_violations() {
    let service = Arc::new(InspectionService::new(Arc::new(MemoryRepository::default())));
    let mut submission = scenario_submission();
    submission.form.region = Some("경기도".to_string());

    let response =
        submit_handler::<MemoryRepository>(State(service), axum::Json(submission)).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["violations"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn submit_handler_reports_unavailable_storage() {
    let service = Arc::new(InspectionService::new(Arc::new(UnavailableRepository)));

    let response = submit_handler::<UnavailableRepository>(
        State(service),
        axum::Json(scenario_submission()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn unknown_inspection_is_not_found() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(get("/api/v1/inspections/missing"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn patch_and_delete_routes() {
    let (service, repository) = build_service();
    let stored = service.submit(&scenario_submission(), now()).expect("stored");
    let router = router_with_service(service);
    let uri = format!("/api/v1/inspections/{}", stored.id());

    let response = router
        .clone()
        .oneshot(json_request(
            "PATCH",
            &uri,
            &serde_json::json!({ "result": "불량", "summary": "열교환기 누수" }),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["result"], "불량");
    assert_eq!(payload["badge"], "danger");

    let response = router
        .clone()
        .oneshot(
            Request::delete(uri.as_str())
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(repository.len(), 0);

    let response = router
        .oneshot(get("/api/v1/inspections"))
        .await
        .expect("router responds");
    let payload = read_json_body(response).await;
    assert_eq!(payload, serde_json::json!([]));
}

#[tokio::test]
async fn report_text_route_sets_download_headers() {
    let (service, _) = build_service();
    let stored = service.submit(&scenario_submission(), now()).expect("stored");
    let router = router_with_service(service);

    let response = router
        .oneshot(get(&format!(
            "/api/v1/inspections/{}/report.txt",
            stored.id()
        )))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
        .expect("disposition header")
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"inspection-report-"));
    assert!(disposition.ends_with(
        urlencoding::encode("점검보고서_Plant A_2024-01-10.txt").as_ref()
    ));
    assert!(disposition.contains("filename*=UTF-8''%EC%A0%90%EA%B2%80"));

    let body = String::from_utf8(read_body(response).await).expect("utf-8");
    assert!(body.contains("[점검 체크리스트]"));
}

#[tokio::test]
async fn report_route_returns_structured_document() {
    let (service, _) = build_service();
    let stored = service.submit(&scenario_submission(), now()).expect("stored");
    let router = router_with_service(service);

    let response = router
        .oneshot(get(&format!("/api/v1/inspections/{}/report", stored.id())))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["sections"].as_array().map(Vec::len), Some(10));
    assert_eq!(payload["sections"][0]["kind"], "header");
    assert_eq!(payload["sections"][6]["body"]["type"], "checklist");
}

#[tokio::test]
async fn reference_and_export_routes() {
    let (service, _) = build_service();
    service.submit(&scenario_submission(), now()).expect("stored");
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(get("/api/v1/reference"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["checklist"].as_array().map(Vec::len), Some(23));
    assert_eq!(payload["technical_options"][0]["key"], "fuel");

    let response = router
        .oneshot(get("/api/v1/inspections/export.csv"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("text/csv; charset=utf-8")
    );
    let body = String::from_utf8(read_body(response).await).expect("utf-8");
    assert_eq!(body.lines().count(), 2);
}
