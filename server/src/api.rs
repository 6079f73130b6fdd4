//! HTTP boundary: request validation, routing and error mapping.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use coinconv_common::Currency;
use coinconv_fx::{ConversionRequest, ConversionResult, FxError, FxResult};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use crate::state::AppState;

/// Body of `POST /api/v1/convert`.
#[derive(Debug, Deserialize)]
pub struct ConvertBody {
    #[serde(alias = "currency_from")]
    pub from: String,
    #[serde(alias = "currency_to")]
    pub to: String,
    /// Exchange to try first, by wire name.
    #[serde(default, alias = "exchange")]
    pub source: Option<String>,
    pub amount: Decimal,
    #[serde(default)]
    pub cache_max_seconds: Option<u64>,
}

impl ConvertBody {
    /// Validate the body and turn it into an engine request.
    pub fn into_request(self) -> FxResult<ConversionRequest> {
        let from = Currency::new(self.from);
        let to = Currency::new(self.to);

        if from.is_blank() || to.is_blank() {
            return Err(FxError::InvalidRequest(
                "currency codes cannot be empty".to_string(),
            ));
        }

        if self.amount < Decimal::ZERO {
            return Err(FxError::InvalidRequest(
                "amount cannot be negative".to_string(),
            ));
        }

        let mut request = ConversionRequest::new(from, to, self.amount);

        if let Some(source) = self.source {
            request = request.with_source(source.parse()?);
        }

        if let Some(seconds) = self.cache_max_seconds {
            request = request.with_cache_max_seconds(seconds);
        }

        Ok(request)
    }
}

/// Error response wrapper.
#[derive(Debug)]
pub struct ApiError(FxError);

impl From<FxError> for ApiError {
    fn from(err: FxError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        if status.is_server_error() {
            error!(error = %self.0, "Conversion failed");
        } else {
            info!(code = self.0.error_code(), error = %self.0, "Conversion rejected");
        }

        let body = json!({
            "status": "error",
            "code": self.0.error_code(),
            "message": self.0.to_string(),
        });

        (status, Json(body)).into_response()
    }
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/convert", post(convert))
        .route("/metrics", get(metrics))
        .route("/health", get(health))
        .with_state(state)
}

async fn convert(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ConvertBody>, JsonRejection>,
) -> Result<Json<ConversionResult>, ApiError> {
    state.metrics.request_received();

    let request_id = Uuid::new_v4();
    let outcome = resolve(&state, body)
        .instrument(info_span!("convert_request", %request_id))
        .await;

    state.metrics.record(&outcome);
    outcome.map(Json).map_err(ApiError::from)
}

async fn resolve(
    state: &AppState,
    body: Result<Json<ConvertBody>, JsonRejection>,
) -> FxResult<ConversionResult> {
    let Json(body) = body.map_err(|e| FxError::InvalidRequest(e.body_text()))?;
    let request = body.into_request()?;
    state.resolver.convert(&request).await
}

async fn metrics(State(state): State<Arc<AppState>>) -> String {
    state.metrics.to_prometheus()
}

async fn health() -> &'static str {
    "ok"
}
