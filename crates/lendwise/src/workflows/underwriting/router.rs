use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{DecisionInput, Offer};
use super::repository::{DecisionId, DecisionStore};
use super::service::{UnderwritingService, UnderwritingServiceError};

/// Offer pricing request for a decision made earlier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferRequest {
    pub loan_amount: f64,
    pub score: i16,
    pub approved: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferMenu {
    pub offers: Vec<Offer>,
}

/// Router builder exposing the decision and offer endpoints.
pub fn underwriting_router<S>(service: Arc<UnderwritingService<S>>) -> Router
where
    S: DecisionStore + 'static,
{
    Router::new()
        .route("/api/v1/underwriting/decisions", post(decide_handler::<S>))
        .route(
            "/api/v1/underwriting/decisions/:decision_id",
            get(decision_handler::<S>),
        )
        .route("/api/v1/underwriting/offers", post(offers_handler::<S>))
        .with_state(service)
}

pub(crate) async fn decide_handler<S>(
    State(service): State<Arc<UnderwritingService<S>>>,
    axum::Json(input): axum::Json<DecisionInput>,
) -> Response
where
    S: DecisionStore + 'static,
{
    match service.decide(input) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn decision_handler<S>(
    State(service): State<Arc<UnderwritingService<S>>>,
    Path(decision_id): Path<String>,
) -> Response
where
    S: DecisionStore + 'static,
{
    match service.get(&DecisionId(decision_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn offers_handler<S>(
    State(service): State<Arc<UnderwritingService<S>>>,
    axum::Json(request): axum::Json<OfferRequest>,
) -> Response
where
    S: DecisionStore + 'static,
{
    match service.offers(request.loan_amount, request.score, request.approved) {
        Ok(offers) => (StatusCode::OK, axum::Json(OfferMenu { offers })).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: UnderwritingServiceError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (error.status_code(), axum::Json(payload)).into_response()
}
