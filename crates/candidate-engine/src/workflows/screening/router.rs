use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::json;

use super::evaluation::{DecisionThresholds, EvaluationError, SectionWeights, SeniorityBand};
use super::service::{ScreeningRequest, ScreeningService, ScreeningServiceError};
use super::signals::SignalScorer;

/// Router builder exposing the screening endpoints.
pub fn screening_router<S>(service: Arc<ScreeningService<S>>) -> Router
where
    S: SignalScorer + 'static,
{
    Router::new()
        .route(
            "/api/v1/screening/evaluations",
            post(evaluate_handler::<S>),
        )
        .route("/api/v1/screening/profiles", get(profiles_handler::<S>))
        .with_state(service)
}

pub(crate) async fn evaluate_handler<S>(
    State(service): State<Arc<ScreeningService<S>>>,
    payload: Result<axum::Json<ScreeningRequest>, JsonRejection>,
) -> Response
where
    S: SignalScorer + 'static,
{
    let axum::Json(request) = match payload {
        Ok(request) => request,
        Err(rejection) => {
            let payload = json!({
                "error": rejection.body_text(),
            });
            return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
        }
    };

    match service.evaluate(request) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(ScreeningServiceError::Evaluation(EvaluationError::Signals(error))) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
    }
}

/// Active weight profiles and thresholds, published for audit.
#[derive(Debug, Serialize)]
pub struct ProfilesView {
    pub profiles: BTreeMap<&'static str, SectionWeights>,
    pub decision_thresholds: DecisionThresholds,
}

impl ProfilesView {
    pub fn from_service<S>(service: &ScreeningService<S>) -> Self
    where
        S: SignalScorer + 'static,
    {
        let config = service.config();
        Self {
            profiles: SeniorityBand::ALL
                .into_iter()
                .map(|band| (band.label(), *config.scoring_weights.for_band(band)))
                .collect(),
            decision_thresholds: config.decision_thresholds,
        }
    }
}

pub(crate) async fn profiles_handler<S>(
    State(service): State<Arc<ScreeningService<S>>>,
) -> Response
where
    S: SignalScorer + 'static,
{
    let view = ProfilesView::from_service(&service);
    (StatusCode::OK, axum::Json(view)).into_response()
}
