//! HTTP request handlers for the Earnings Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{RawQuery, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::calculate_input;
use crate::config::ConfigLoader;
use crate::error::{EngineError, EngineResult};
use crate::models::{CalculationInput, Term};
use crate::share::{decode_query, encode_query, share_link, share_message};

use super::request::CalculationRequest;
use super::response::{ApiError, ApiErrorResponse, CalculationResponse, ShareResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/calculate", post(calculate_handler).get(resolve_handler))
        .route("/share", post(share_handler))
        .with_state(state)
}

/// Handler for POST /calculate endpoint.
///
/// Accepts a calculation request and returns the breakdown for every term.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    match payload {
        Ok(Json(request)) => respond_with_calculation(correlation_id, request.into(), state.config()),
        Err(rejection) => rejection_response(correlation_id, rejection),
    }
}

/// Handler for GET /calculate endpoint.
///
/// Resolves a share query such as `?c=gb&v=standard&t=yearly&r=60000&h=8&d=5&l=25`
/// and returns the same response as the equivalent POST.
async fn resolve_handler(State(state): State<AppState>, RawQuery(query): RawQuery) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Resolving share link");

    match decode_query(query.as_deref().unwrap_or_default()) {
        Ok(input) => respond_with_calculation(correlation_id, input, state.config()),
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Share link rejected"
            );
            error_response(err)
        }
    }
}

/// Handler for POST /share endpoint.
///
/// Calculates the request and returns the share query, link and message.
async fn share_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing share request");

    let input: CalculationInput = match payload {
        Ok(Json(request)) => request.into(),
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    match perform_share(&input, state.config()) {
        Ok(response) => {
            info!(
                correlation_id = %correlation_id,
                country = %input.country,
                query = %response.query,
                "Share link created"
            );
            json_response(StatusCode::OK, response)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Share failed"
            );
            error_response(err)
        }
    }
}

fn respond_with_calculation(
    correlation_id: Uuid,
    input: CalculationInput,
    config: &ConfigLoader,
) -> Response {
    let start_time = Instant::now();

    match perform_calculation(&input, config) {
        Ok(response) => {
            let gross = response
                .result
                .period(Term::Yearly)
                .map(|period| period.gross.to_string())
                .unwrap_or_default();
            if response.result.has_negative_net() {
                warn!(
                    correlation_id = %correlation_id,
                    country = %input.country,
                    variant = %input.variant,
                    "Net pay is negative"
                );
            }
            info!(
                correlation_id = %correlation_id,
                country = %input.country,
                variant = %input.variant,
                term = input.rate.term.as_str(),
                gross = %gross,
                duration_us = start_time.elapsed().as_micros(),
                "Calculation completed successfully"
            );
            json_response(StatusCode::OK, response)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Calculation failed"
            );
            error_response(err)
        }
    }
}

/// Performs the calculation and wraps it in the response envelope.
fn perform_calculation(
    input: &CalculationInput,
    config: &ConfigLoader,
) -> EngineResult<CalculationResponse> {
    let result = calculate_input(input, config)?;

    Ok(CalculationResponse {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        country: input.country.clone(),
        variant: input.variant.clone(),
        share_query: encode_query(input),
        result,
    })
}

/// Calculates the input and renders its share link and message.
fn perform_share(input: &CalculationInput, config: &ConfigLoader) -> EngineResult<ShareResponse> {
    let country = config.get_country(&input.country)?;
    let result = calculate_input(input, config)?;

    let link = share_link(&config.app().share_uri_prefix, input);
    let message = share_message(config.app(), country, &input.rate, &result, Some(&link));

    Ok(ShareResponse {
        query: encode_query(input),
        link,
        message,
    })
}

fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
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
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };

    json_response(StatusCode::BAD_REQUEST, error)
}

fn error_response(err: EngineError) -> Response {
    ApiErrorResponse::from(err).into_response()
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}
