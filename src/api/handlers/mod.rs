use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Extension, Form, Json,
};

use super::AppState;
use crate::auth::CallerContext;
use crate::error::IncidentError;
use crate::models::*;
use crate::notify::INCIDENT_LIST_VIEW;

// ============================================================
// Error Handling
// ============================================================

/// Map an operation failure to a status and a client-safe message.
fn error_response(e: IncidentError) -> (StatusCode, String) {
    let status = match e {
        IncidentError::Validation { .. } => StatusCode::BAD_REQUEST,
        IncidentError::Unauthorized => StatusCode::FORBIDDEN,
        IncidentError::NotFound(_) => StatusCode::NOT_FOUND,
    };
    (status, e.to_string())
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Incidents
// ============================================================

/// List every incident in submission order.
///
/// The response carries an `ETag` derived from the list view's revision, and
/// a matching `If-None-Match` short-circuits to 304.
pub async fn list_incidents(State(state): State<AppState>, headers: HeaderMap) -> Response {
    // Read the revision before the snapshot: a concurrent change can only
    // make the tag older than the data, never newer.
    let etag = format!("\"incidents-{}\"", state.revisions.revision(INCIDENT_LIST_VIEW));

    let fresh = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.split(',').any(|tag| tag.trim() == etag));
    if fresh {
        return StatusCode::NOT_MODIFIED.into_response();
    }

    let incidents = state.service.get_incidents();
    let mut response = Json(incidents).into_response();
    if let Ok(value) = HeaderValue::from_str(&etag) {
        response.headers_mut().insert(header::ETAG, value);
    }
    response
}

pub async fn submit_incident(
    State(state): State<AppState>,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<(StatusCode, Json<Incident>), (StatusCode, String)> {
    state
        .service
        .submit_incident(&fields)
        .map(|i| (StatusCode::CREATED, Json(i)))
        .map_err(error_response)
}

pub async fn resolve_incident(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<u64>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .service
        .resolve_incident(&caller, id)
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(error_response)
}
