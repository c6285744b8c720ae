use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use cptrack_platforms::{Platform, ProfileHandles, RatingSummary};
use serde::Deserialize;
use serde_json::json;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": INTERNAL_ERROR_MESSAGE })),
    )
        .into_response()
}

/// `GET /api/fetch-profile?cf=&cc=&ac=&lc=`
///
/// The body is the bare aggregate object, keyed by platform name. Per-platform
/// failures are entries in that object, never a non-200 status.
pub(super) async fn fetch_profile(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<ProfileHandles>, QueryRejection>,
) -> Response {
    let Query(handles) = match query {
        Ok(query) => query,
        Err(rejection) => {
            tracing::error!(request_id = %req_id.0, error = %rejection, "fetch-profile query rejected");
            return internal_error();
        }
    };

    match state.aggregator.aggregate(&handles).await {
        Ok(response) => {
            tracing::info!(
                request_id = %req_id.0,
                platforms = response.len(),
                "profile aggregate complete"
            );
            Json(response).into_response()
        }
        Err(e) => {
            tracing::error!(request_id = %req_id.0, error = %e, "profile aggregate failed");
            internal_error()
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct VerifyQuery {
    platform: Option<String>,
    handle: Option<String>,
}

/// `GET /api/verify?platform=&handle=`
///
/// Runs one platform lookup and returns the rating summary a client would
/// persist for that handle.
pub(super) async fn verify_handle(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<VerifyQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<RatingSummary>>, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        tracing::warn!(request_id = %req_id.0, error = %rejection, "verify query rejected");
        ApiError::new(req_id.0.clone(), "bad_request", rejection.body_text())
    })?;

    let platform = query
        .platform
        .as_deref()
        .unwrap_or_default()
        .parse::<Platform>()
        .map_err(|e| ApiError::new(req_id.0.clone(), "bad_request", e.to_string()))?;

    let handle = query
        .handle
        .as_deref()
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "bad_request", "handle is required"))?;

    let stats = state
        .aggregator
        .lookup(platform, handle)
        .await
        .map_err(|e| {
            tracing::warn!(
                request_id = %req_id.0,
                %platform,
                handle,
                kind = ?e.kind(),
                error = %e,
                "handle verification failed"
            );
            ApiError::new(req_id.0.clone(), "not_found", e.public_message(platform))
        })?;

    Ok(Json(ApiResponse {
        data: RatingSummary::from(&stats),
        meta: ResponseMeta::new(req_id.0),
    }))
}
