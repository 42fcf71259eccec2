use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::workflows::underwriting::router::{decide_handler, decision_handler};
use crate::workflows::underwriting::{underwriting_router, UnderwritingService, UnderwritingTables};

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn provider_payload(loan_amount: f64) -> serde_json::Value {
    json!({
        "loanAmount": loan_amount,
        "accountSnapshot": {
            "institutionName": "Wells Fargo",
            "accountMask": "0042",
            "accountType": "checking",
            "balance": { "current": 6500.0, "available": 6000.0, "limit": null },
            "achNumbers": { "routing": "121000248", "account": "5550001234" }
        },
        "customerInfo": {
            "firstName": "Dana",
            "lastName": "Okafor",
            "email": "dana.okafor@example.com",
            "dateOfBirth": "1988-04-12"
        }
    })
}

#[tokio::test]
async fn decide_route_returns_created_with_offers() {
    let (service, store) = build_service();
    let app = underwriting_router(Arc::new(service));

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/underwriting/decisions",
            provider_payload(10_000.0),
        ))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    // 650 + 30 reserve + 10 balance + 5 institution + 10 ACH.
    assert_eq!(body["decision"]["score"], 705);
    assert_eq!(body["decision"]["approved"], true);
    assert_eq!(body["decision"]["policy"], "verified");
    assert_eq!(body["decision"]["dataUsed"]["hasBalance"], true);
    assert_eq!(body["offers"].as_array().map(Vec::len), Some(3));
    assert!(body.get("customer").is_none());
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn decide_route_rejects_non_positive_amounts() {
    let (service, _store) = build_service();
    let app = underwriting_router(Arc::new(service));

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/underwriting/decisions",
            provider_payload(0.0),
        ))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .is_some_and(|message| message.contains("loan amount")));
}

#[tokio::test]
async fn decision_lookup_round_trips_through_the_router() {
    let (service, _store) = build_service();
    let service = Arc::new(service);

    let created = decide_handler::<MemoryStore>(
        State(service.clone()),
        axum::Json(input(2_000.0, verified_snapshot(2_500.0))),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let created = read_json_body(created).await;
    let decision_id = created["decisionId"]
        .as_str()
        .expect("decision id")
        .to_string();

    let fetched = decision_handler::<MemoryStore>(State(service.clone()), Path(decision_id.clone()))
        .await;
    assert_eq!(fetched.status(), StatusCode::OK);
    let fetched = read_json_body(fetched).await;
    assert_eq!(fetched, created);

    let app = underwriting_router(service);
    let missing = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/underwriting/decisions/dec-does-not-exist")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router response");
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn offers_route_prices_the_menu() {
    let (service, _store) = build_service();
    let app = underwriting_router(Arc::new(service));

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/underwriting/offers",
            json!({ "loanAmount": 10000.0, "score": 760, "approved": true }),
        ))
        .await
        .expect("router response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["offers"][0]["termMonths"], 24);
    assert_eq!(body["offers"][0]["apr"], 7.9);
    assert_eq!(body["offers"][0]["originationFee"], 100.0);

    let invalid = app
        .oneshot(json_request(
            "POST",
            "/api/v1/underwriting/offers",
            json!({ "loanAmount": 10000.0, "score": 120, "approved": true }),
        ))
        .await
        .expect("router response");
    assert_eq!(invalid.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn store_conflicts_surface_as_409() {
    let service = UnderwritingService::new(Arc::new(ConflictStore), UnderwritingTables::standard());
    let app = underwriting_router(Arc::new(service));

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/underwriting/decisions",
            provider_payload(1_000.0),
        ))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn store_outages_surface_as_500() {
    let service =
        UnderwritingService::new(Arc::new(UnavailableStore), UnderwritingTables::standard());
    let app = underwriting_router(Arc::new(service));

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/underwriting/decisions",
            provider_payload(1_000.0),
        ))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .is_some_and(|message| message.contains("unavailable")));
}
