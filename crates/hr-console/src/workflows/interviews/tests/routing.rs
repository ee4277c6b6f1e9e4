use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use axum::response::IntoResponse;
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::workflows::interviews::router::JsonBody;
use crate::workflows::interviews::rubric::Rubric;
use crate::workflows::interviews::InterviewService;

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).expect("serialize body")))
        .expect("request")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

#[tokio::test]
async fn rubric_route_exposes_derived_maxima() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router.oneshot(get("/api/v1/rubric")).await.expect("route");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["max_total"], 40);
    assert_eq!(payload["categories"][0]["max_score"], 20);
    assert_eq!(payload["categories"][2]["criteria"].as_array().map(Vec::len), Some(4));
}

#[tokio::test]
async fn preview_route_computes_live_totals() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);
    let scores = serde_json::to_value(uniform_scores(4, 3, 5)).expect("scores json");

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/interviews/score-preview",
            scores,
        ))
        .await
        .expect("route");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["total_score"], 31.2);
    assert_eq!(payload["percentage"], 78);
    assert_eq!(payload["appreciation_label"], "Bon");
    assert_eq!(payload["color_tag"], "blue");
}

#[tokio::test]
async fn preview_route_rejects_out_of_range_notes() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/interviews/score-preview",
            json!({ "technical": { "expertise_technique": { "note": 9 } } }),
        ))
        .await
        .expect("route");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("application/json")
    );
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .unwrap_or_default()
        .contains("invalid rating 9"));
}

#[tokio::test]
async fn malformed_bodies_are_reported_as_json_errors() {
    let (service, _, _) = build_service();
    let record = service.create(draft()).expect("created");
    let router = router_with_service(service);

    let truncated = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/api/v1/interviews/{}/validate", record.id))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"reviewer\": "))
                .expect("request"),
        )
        .await
        .expect("route");
    assert_eq!(truncated.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(truncated).await;
    assert!(payload["error"].is_string());

    let untyped = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/interviews")
                .body(Body::from("{}"))
                .expect("request"),
        )
        .await
        .expect("route");
    assert_eq!(untyped.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let payload = read_json_body(untyped).await;
    assert!(payload["error"]
        .as_str()
        .unwrap_or_default()
        .contains("Content-Type"));
}

#[tokio::test]
async fn create_route_returns_detail_view() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);
    let body = serde_json::to_value(draft()).expect("draft json");

    let response = router
        .oneshot(json_request("POST", "/api/v1/interviews", body))
        .await
        .expect("route");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["status"], "in_progress");
    assert_eq!(payload["panel"]["hr_lead"], "---");
    assert_eq!(payload["summary"]["total_score"], 0.0);
}

#[tokio::test]
async fn score_route_validates_notes_and_criteria() {
    let (service, _, _) = build_service();
    let record = service.create(draft()).expect("created");
    let router = router_with_service(service);
    let base = format!("/api/v1/interviews/{}/scores", record.id);

    let invalid_note = router
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("{base}/technical/expertise_technique"),
            json!({ "note": -1 }),
        ))
        .await
        .expect("route");
    assert_eq!(invalid_note.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(invalid_note).await;
    assert!(payload["error"]
        .as_str()
        .unwrap_or_default()
        .contains("invalid rating"));

    let unknown = router
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("{base}/fit/ponctualite"),
            json!({ "note": 3 }),
        ))
        .await
        .expect("route");
    assert_eq!(unknown.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let unknown_category = router
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("{base}/langues/arabe"),
            json!({ "note": 3 }),
        ))
        .await
        .expect("route");
    assert_eq!(unknown_category.status(), StatusCode::NOT_FOUND);

    let accepted = router
        .oneshot(json_request(
            "PUT",
            &format!("{base}/technical/expertise_technique"),
            json!({ "note": 5, "observations": "Très solide sur Covadis" }),
        ))
        .await
        .expect("route");
    assert_eq!(accepted.status(), StatusCode::OK);
    let payload = read_json_body(accepted).await;
    assert_eq!(payload["summary"]["technical_score"], 4.0);
}

#[tokio::test]
async fn lifecycle_routes_map_errors_to_status_codes() {
    let (service, _, _) = build_service();
    let complete = service.create(scored_draft()).expect("created");
    let pending = service.create(draft()).expect("created");
    let router = router_with_service(service);
    let validation = json!({ "reviewer": "Direction Générale" });

    let premature = router
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/interviews/{}/validate", pending.id),
            validation.clone(),
        ))
        .await
        .expect("route");
    assert_eq!(premature.status(), StatusCode::CONFLICT);

    let validated = router
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/interviews/{}/validate", complete.id),
            validation,
        ))
        .await
        .expect("route");
    assert_eq!(validated.status(), StatusCode::OK);
    let payload = read_json_body(validated).await;
    assert_eq!(payload["status"], "validated");
    assert_eq!(payload["review"]["reviewer"], "Direction Générale");

    let locked = router
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/v1/interviews/{}/synthesis", complete.id),
            json!({ "strengths": "Ajout tardif" }),
        ))
        .await
        .expect("route");
    assert_eq!(locked.status(), StatusCode::CONFLICT);

    let missing = router
        .oneshot(get("/api/v1/interviews/int-404404"))
        .await
        .expect("route");
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_route_applies_query_filters() {
    let (service, _, _) = build_service();
    service.create(scored_draft()).expect("created");
    let mut other = draft();
    other.candidate.name = "Karim Berrada".to_string();
    service.create(other).expect("created");
    let router = router_with_service(service);

    let response = router
        .oneshot(get("/api/v1/interviews?q=berrada&status=in_progress&sort=score"))
        .await
        .expect("route");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let entries = payload.as_array().expect("array payload");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["candidate"], "Karim Berrada");
    assert_eq!(entries[0]["recommendation_label"], "---");
}

#[tokio::test]
async fn list_route_limits_to_recent_interviews() {
    let (service, _, _) = build_service();
    service.create(scored_draft()).expect("created");
    let mut current = draft();
    current.candidate.name = "Reda Chakir".to_string();
    current.interview_date = chrono::Utc::now().date_naive();
    service.create(current).expect("created");
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(get("/api/v1/interviews?recent_days=7"))
        .await
        .expect("route");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let entries = payload.as_array().expect("array payload");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["candidate"], "Reda Chakir");

    let invalid = router
        .oneshot(get("/api/v1/interviews?recent_days=-3"))
        .await
        .expect("route");
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn export_route_serves_plain_text() {
    let (service, _, _) = build_service();
    let record = service.create(scored_draft()).expect("created");
    let router = router_with_service(service);

    let response = router
        .oneshot(get(&format!("/api/v1/interviews/{}/export", record.id)))
        .await
        .expect("route");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("text/plain; charset=utf-8")
    );
    let text = read_text_body(response).await;
    assert!(text.contains("FICHE D'ÉVALUATION D'ENTRETIEN"));
    assert!(text.contains("Score total: 31.20 / 40 (78%)"));
}

#[tokio::test]
async fn create_handler_reports_repository_failures() {
    let service = Arc::new(InterviewService::new(
        Arc::new(UnavailableRepository),
        Arc::new(MemoryNotifier::default()),
        Rubric::standard(),
    ));

    let response = crate::workflows::interviews::router::create_handler::<
        UnavailableRepository,
        MemoryNotifier,
    >(State(service), JsonBody(draft()))
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .unwrap_or_default()
        .contains("unavailable"));
}
