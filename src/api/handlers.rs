//! HTTP request handlers for the quote engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::quote;
use crate::error::EngineError;

use super::request::QuoteRequest;
use super::response::{ApiError, ApiErrorResponse, ENGINE_VERSION, HealthResponse, QuoteResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/quote", post(quote_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Handler for GET /health endpoint.
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        engine_version: ENGINE_VERSION.to_string(),
        tenants: state.config().tenants().map(str::to_string).collect(),
    })
}

/// Handler for POST /quote endpoint.
///
/// Accepts a quote request and returns the calculated quote.
async fn quote_handler(
    State(state): State<AppState>,
    payload: Result<Json<QuoteRequest>, JsonRejection>,
) -> Response {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing quote request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    // The body text carries serde's detailed message
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::validation_error(body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    warn!(correlation_id = %correlation_id, "Missing JSON content type");
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            return ApiErrorResponse::new(StatusCode::BAD_REQUEST, error).into_response();
        }
    };

    // Rates are chosen by the move date, or today when none was requested
    let rate_date = request
        .move_date
        .unwrap_or_else(|| Utc::now().date_naive());
    let config = match state.config().rate_configuration(&request.tenant, rate_date) {
        Ok(config) => config,
        Err(err) => return engine_error_response(correlation_id, err),
    };

    let facts = match request.into_move_facts(state.distance_resolver()) {
        Ok(facts) => facts,
        Err(err) => return engine_error_response(correlation_id, err),
    };

    let start_time = Instant::now();
    match quote(&facts, config) {
        Ok(result) => {
            let duration = start_time.elapsed();
            info!(
                correlation_id = %correlation_id,
                tenant = %config.tenant,
                config_version = %config.version,
                volume_m3 = %facts.volume_m3,
                net_min = %result.price.net.min,
                net_max = %result.price.net.max,
                gross_min = %result.price.gross.min,
                gross_max = %result.price.gross.max,
                duration_us = duration.as_micros(),
                "Quote completed successfully"
            );
            let response = QuoteResponse {
                quote_id: correlation_id,
                timestamp: Utc::now(),
                engine_version: ENGINE_VERSION.to_string(),
                tenant: config.tenant.clone(),
                config_version: config.version.clone(),
                result,
            };
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(response),
            )
                .into_response()
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

fn engine_error_response(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Quote request rejected"
    );
    ApiErrorResponse::from(err).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AddressRequest, DistanceResolver, Route};
    use crate::config::ConfigLoader;
    use axum::body::Body;
    use axum::http::Request;
    use rust_decimal::Decimal;
    use serde_json::{Value, json};
    use std::str::FromStr;
    use tower::ServiceExt;

    struct NoRoute;

    impl DistanceResolver for NoRoute {
        fn resolve(&self, _: &AddressRequest, _: &AddressRequest) -> Option<Route> {
            None
        }
    }

    fn create_test_state() -> AppState {
        let config = ConfigLoader::load("./config").expect("Failed to load config");
        AppState::new(config)
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_valid_request() -> Value {
        json!({
            "tenant": "default",
            "origin": {"city": "Berlin", "postal_code": "10115"},
            "destination": {"city": "Berlin", "postal_code": "10117", "has_elevator": true},
            "volume_m3": "40",
            "distance_km": "50",
            "base_travel_hours": "0.8",
            "move_date": "2025-06-16"
        })
    }

    async fn post_quote(router: Router, body: String) -> (StatusCode, Value) {
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/quote")
                    .header("Content-Type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_api_001_valid_request_returns_200() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/quote")
                    .header("Content-Type", "application/json")
                    .body(Body::from(create_valid_request().to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers().get("content-type").unwrap();
        assert_eq!(content_type, "application/json");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let quote: QuoteResponse = serde_json::from_slice(&body).unwrap();

        assert_eq!(quote.tenant, "default");
        assert_eq!(quote.config_version, "2025-01");
        assert_eq!(quote.engine_version, ENGINE_VERSION);
        assert_eq!(quote.result.price.net.min, dec("1378"));
        assert_eq!(quote.result.price.gross.max, dec("2253.86"));
    }

    #[tokio::test]
    async fn test_api_002_malformed_json_returns_400() {
        let router = create_router(create_test_state());
        let (status, body) = post_quote(router, "{invalid json".to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_api_003_missing_origin_returns_validation_error() {
        let router = create_router(create_test_state());
        let mut request = create_valid_request();
        request.as_object_mut().unwrap().remove("origin");

        let (status, body) = post_quote(router, request.to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["message"].as_str().unwrap().contains("missing field"));
    }

    #[tokio::test]
    async fn test_api_004_unknown_tenant_returns_404() {
        let router = create_router(create_test_state());
        let mut request = create_valid_request();
        request["tenant"] = json!("umzug-nirgendwo");

        let (status, body) = post_quote(router, request.to_string()).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "TENANT_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_api_005_unresolved_distance_returns_502() {
        let config = ConfigLoader::load("./config").unwrap();
        let router = create_router(AppState::with_resolver(config, NoRoute));
        let mut request = create_valid_request();
        request.as_object_mut().unwrap().remove("distance_km");

        let (status, body) = post_quote(router, request.to_string()).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["code"], "UNRESOLVED_DEPENDENCY");
    }

    #[tokio::test]
    async fn test_api_006_negative_floor_returns_400() {
        let router = create_router(create_test_state());
        let mut request = create_valid_request();
        request["origin"]["floor"] = json!(-1);

        let (status, body) = post_quote(router, request.to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_INPUT");
        assert_eq!(body["details"], "origin.floor");
    }

    #[tokio::test]
    async fn test_health_lists_tenants() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let health: HealthResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(health.status, "ok");
        assert_eq!(health.tenants, vec!["default", "muenchen-umzuege"]);
    }
}
