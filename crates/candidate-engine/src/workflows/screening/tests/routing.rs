use super::common::*;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use crate::workflows::screening::router::{evaluate_handler, profiles_handler};
use crate::workflows::screening::signals::{SectionName, SectionSignal, SignalScores};
use crate::workflows::screening::{BaselineSignalScorer, ScreeningRequest};

fn screening_request(signals: Option<SignalScores>) -> ScreeningRequest {
    ScreeningRequest {
        job: job(),
        candidate: candidate(),
        evaluated_on: Some(evaluated_on()),
        signals,
    }
}

fn post_evaluation(body: Vec<u8>) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::post("/api/v1/screening/evaluations")
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn evaluate_route_returns_scored_result() {
    let router = router_with(BaselineSignalScorer::default());
    let request = screening_request(Some(signals(85, 85, 85, 85)));

    let response = router
        .oneshot(post_evaluation(serde_json::to_vec(&request).unwrap()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["decision"], "STRONG_MATCH");
    assert_eq!(payload["adjusted_score"], 85);
    assert_eq!(payload["job_id"], "job-ops-001");
    assert_eq!(payload["evaluated_on"], "2025-06-01");
    assert_eq!(payload["weight_profile"], "mid");
}

#[tokio::test]
async fn evaluate_route_falls_back_to_configured_scorer() {
    let scorer = CountingScorer::new(signals(70, 70, 70, 70));
    let service = service_with(scorer);

    let response = evaluate_handler::<CountingScorer>(
        State(service),
        Ok(axum::Json(screening_request(None))),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["base_score"], 70);
    assert_eq!(payload["section_scores"].as_array().map(Vec::len), Some(4));
}

#[tokio::test]
async fn precomputed_signals_bypass_the_scorer() {
    let service = service_with(CountingScorer::new(signals(10, 10, 10, 10)));

    let response = evaluate_handler::<CountingScorer>(
        State(service),
        Ok(axum::Json(screening_request(Some(signals(70, 70, 70, 70))))),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["base_score"], 70);
}

#[tokio::test]
async fn rejected_candidates_are_still_ok_responses() {
    let mut request = screening_request(Some(signals(85, 85, 85, 85)));
    request.candidate.visa_status = Some("Visit Visa".to_string());

    let response = evaluate_handler::<BaselineSignalScorer>(
        State(service_with(BaselineSignalScorer::default())),
        Ok(axum::Json(request)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["decision"], "REJECTED");
    assert_eq!(payload["rejection_rule_code"], "HR-001");
}

#[tokio::test]
async fn incomplete_signals_are_unprocessable() {
    let partial = SignalScores::new().with(SectionName::Skills, SectionSignal::new(80, "skills"));

    let response = evaluate_handler::<BaselineSignalScorer>(
        State(service_with(BaselineSignalScorer::default())),
        Ok(axum::Json(screening_request(Some(partial)))),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "signal scorers returned no experience section");
}

#[tokio::test]
async fn scorer_outage_is_service_unavailable() {
    let response = evaluate_handler::<OfflineScorer>(
        State(service_with(OfflineScorer)),
        Ok(axum::Json(screening_request(None))),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "semantic scorer unavailable: embedding model offline");
}

#[tokio::test]
async fn malformed_payloads_are_rejected_before_evaluation() {
    let router = router_with(BaselineSignalScorer::default());

    let response = router
        .oneshot(post_evaluation(b"{\"job\": ".to_vec()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert!(payload["error"].is_string(), "{payload}");
}

#[tokio::test]
async fn unknown_sections_in_signals_fail_to_deserialize() {
    let router = router_with(BaselineSignalScorer::default());
    let mut body = serde_json::to_value(screening_request(None)).unwrap();
    body["signals"] = json!({ "charisma": { "score": 90, "explanation": "n/a" } });

    let response = router
        .oneshot(post_evaluation(serde_json::to_vec(&body).unwrap()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    let message = payload["error"].as_str().expect("error message");
    assert!(message.contains("charisma"), "{message}");
}

#[tokio::test]
async fn profiles_route_publishes_weights_and_thresholds() {
    let router = router_with(BaselineSignalScorer::default());

    let response = router
        .oneshot(
            axum::http::Request::get("/api/v1/screening/profiles")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["profiles"]["mid"]["skills"], 0.4);
    assert_eq!(payload["profiles"]["executive"]["experience"], 0.3);
    assert_eq!(payload["decision_thresholds"]["strong"], 85);
}

#[tokio::test]
async fn profiles_handler_lists_every_band() {
    let response = profiles_handler::<BaselineSignalScorer>(State(service_with(
        BaselineSignalScorer::default(),
    )))
    .await;

    let payload = read_json_body(response).await;
    let bands: Vec<&str> = payload["profiles"]
        .as_object()
        .expect("profiles object")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(bands, vec!["entry", "executive", "mid", "senior"]);
}
