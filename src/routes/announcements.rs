use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::AnnouncementError,
    models::announcement::{CreateAnnouncementRequest, UpdateAnnouncementRequest},
    AppState,
};

#[derive(Deserialize)]
pub struct ListParams {
    #[serde(default = "default_active_only")]
    pub active_only: bool,
}

fn default_active_only() -> bool {
    true
}

/// The caller-supplied teacher identity, taken from the query string and
/// verified against the directory inside the service.
#[derive(Deserialize)]
pub struct TeacherParams {
    pub teacher_username: String,
}

fn error_response(err: AnnouncementError) -> (StatusCode, Json<Value>) {
    let status = match err {
        AnnouncementError::Unauthorized => StatusCode::UNAUTHORIZED,
        AnnouncementError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        AnnouncementError::NotFound => StatusCode::NOT_FOUND,
        AnnouncementError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": err.to_string() })))
}

pub async fn list_announcements(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    state
        .announcements
        .list(params.active_only)
        .await
        .map(|list| Json(serde_json::to_value(list).unwrap()))
        .map_err(error_response)
}

pub async fn create_announcement(
    State(state): State<AppState>,
    Query(auth): Query<TeacherParams>,
    Json(body): Json<CreateAnnouncementRequest>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    state
        .announcements
        .create(&body, &auth.teacher_username)
        .await
        .map(|created| (StatusCode::CREATED, Json(serde_json::to_value(created).unwrap())))
        .map_err(error_response)
}

pub async fn update_announcement(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(auth): Query<TeacherParams>,
    Json(body): Json<UpdateAnnouncementRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    state
        .announcements
        .update(&id, &body, &auth.teacher_username)
        .await
        .map(|updated| Json(serde_json::to_value(updated).unwrap()))
        .map_err(error_response)
}

pub async fn delete_announcement(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(auth): Query<TeacherParams>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    state
        .announcements
        .delete(&id, &auth.teacher_username)
        .await
        .map(|_| Json(json!({ "message": "Announcement deleted successfully" })))
        .map_err(error_response)
}
