//! Request handlers.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, State};
use axum::Json;
use helper_knowledge::{SessionInfo, Upload};
use serde::{Deserialize, Serialize};

/// Multipart field carrying the document.
pub const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub session_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub result: String,
}

pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Board Game Helper API is running".to_string(),
    })
}

/// Read the `file` field, build its index, and hand back a new session id.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let mut upload = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;

        let mut received = Upload::new(filename, bytes.to_vec());
        if let Some(content_type) = content_type {
            received = received.with_content_type(content_type);
        }
        upload = Some(received);
        break;
    }

    let upload = upload.ok_or_else(|| {
        ApiError::bad_request(format!("Missing multipart field '{}'", UPLOAD_FIELD))
    })?;

    let info = state
        .service()
        .upload(upload)
        .await
        .map_err(|e| ApiError::with_context(e, "Error processing document"))?;

    Ok(Json(UploadResponse {
        session_id: info.session_id,
    }))
}

pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<Json<ChatResponse>> {
    let Json(request) = payload?;

    tracing::info!(session_id = %request.session_id, "Chat request");

    let result = state
        .service()
        .chat(&request.session_id, &request.query)
        .await
        .map_err(|e| ApiError::with_context(e, "Error processing query"))?;

    Ok(Json(ChatResponse { result }))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<SessionInfo>> {
    Ok(Json(state.service().session_info(&session_id)?))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.service().delete_session(&session_id)?;

    Ok(Json(MessageResponse {
        message: format!("Session {} deleted successfully", session_id),
    }))
}
