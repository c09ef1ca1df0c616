//! Quiz editor endpoints.
//!
//! Images are uploaded before the quiz referencing them is saved; every
//! upload is recorded so the cleanup job can collect the ones that are never
//! attached.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{post, put},
    Json, Router,
};
use persistence::repositories::{EditorImageRepository, QuizRepository};
use serde_json::json;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentUser;

/// Upload size cap for editor images.
const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/image", post(upload_image))
        .route("/image/:id/attach/:quiz_id", put(attach_image))
}

async fn upload_image(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    body: Bytes,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    if body.is_empty() {
        return Err(ApiError::Validation("Empty image body".into()));
    }
    if body.len() > MAX_IMAGE_BYTES {
        return Err(ApiError::Validation("Image exceeds the size limit".into()));
    }

    let key = format!("editor-{}.bin", Uuid::new_v4());
    state.storage.put(&key, &body).await?;

    let pool = state.db.pool().await?;
    let entity = EditorImageRepository::new(pool)
        .insert(user.id, &key)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": entity.id, "key": entity.storage_key })),
    ))
}

async fn attach_image(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((id, quiz_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let pool = state.db.pool().await?;

    let quiz = QuizRepository::new(pool.clone())
        .find_by_id(quiz_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Quiz not found".into()))?;
    if quiz.owner_id != user.id {
        return Err(ApiError::Forbidden("Not the quiz owner".into()));
    }

    let attached = EditorImageRepository::new(pool)
        .attach_to_quiz(id, quiz_id)
        .await?;
    if !attached {
        return Err(ApiError::NotFound(
            "Image not found or already attached".into(),
        ));
    }

    Ok(Json(json!({ "id": id, "quiz_id": quiz_id })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_keys_are_storage_safe() {
        let key = format!("editor-{}.bin", Uuid::new_v4());
        assert!(crate::services::storage::LocalStorage::is_valid_key(&key));
    }

    #[test]
    fn test_image_size_cap() {
        assert_eq!(MAX_IMAGE_BYTES, 5 * 1024 * 1024);
    }
}
