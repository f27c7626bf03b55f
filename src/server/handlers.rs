//! HTTP handlers.

use super::AppState;
use super::assets::INDEX_HTML;
use super::dto::{CalculateRequest, CalculateResponse};
use crate::expr::Evaluator;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

/// Evaluates `input` and builds the endpoint response.
///
/// Evaluation failures map to `400 Bad Request`; they never escape as
/// server errors.
#[must_use]
pub fn respond(evaluator: &Evaluator, input: String) -> (StatusCode, CalculateResponse) {
    match evaluator.evaluate(&input) {
        Ok(evaluation) => {
            tracing::debug!(
                input = %input,
                expression = %evaluation.expression,
                result = %evaluation.result,
                "expression evaluated"
            );
            (StatusCode::OK, CalculateResponse::success(input, evaluation))
        }
        Err(err) => {
            tracing::info!(input = %input, kind = err.kind(), error = %err, "evaluation failed");
            (
                StatusCode::BAD_REQUEST,
                CalculateResponse::failure(input, &err),
            )
        }
    }
}

/// Handler for `POST /calculate`.
pub async fn calculate(
    State(state): State<AppState>,
    payload: Result<Json<CalculateRequest>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(req)) => {
            let (status, body) = respond(&state.evaluator, req.expression);
            (status, Json(body)).into_response()
        }
        Err(rejection) => {
            let status = rejection.status();
            tracing::info!(%status, error = %rejection, "rejected request body");
            let body = CalculateResponse::rejected(
                String::new(),
                rejection.body_text(),
                "invalid_request",
            );
            (status, Json(body)).into_response()
        }
    }
}

/// Handler for `GET /`.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
