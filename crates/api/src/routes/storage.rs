//! Raw object storage endpoints.

use axum::{
    body::{Body, Bytes},
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tokio_util::io::ReaderStream;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::services::storage::{LocalStorage, StorageError};

pub fn router() -> Router<AppState> {
    Router::new().route("/:key", get(download).post(upload).delete(remove))
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidKey => ApiError::Validation("Invalid storage key".into()),
            StorageError::Io(e) => e.into(),
        }
    }
}

async fn upload(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(key): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    if body.is_empty() {
        return Err(ApiError::Validation("Empty body".into()));
    }
    state.storage.put(&key, &body).await?;
    Ok((StatusCode::CREATED, Json(json!({ "key": key }))))
}

async fn download(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response, ApiError> {
    if !LocalStorage::is_valid_key(&key) {
        return Err(ApiError::Validation("Invalid storage key".into()));
    }

    let file = state.storage.open(&key).await?;
    let stream = ReaderStream::new(file);

    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        Body::from_stream(stream),
    )
        .into_response())
}

async fn remove(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(key): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.storage.delete(&key).await?;
    Ok(StatusCode::NO_CONTENT)
}
