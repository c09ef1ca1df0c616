//! Quiz CRUD handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use domain::models::{Quiz, QuizQuestion, QuizVisibility};
use persistence::repositories::QuizRepository;
use serde::Deserialize;
use shared::pagination::{Page, PageParams};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentUser;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create))
        .route("/list", get(list_public))
        .route("/mine", get(list_mine))
        .route("/:id", get(fetch).put(update).delete(delete_quiz))
}

#[derive(Debug, Deserialize, Validate)]
struct QuizPayload {
    #[validate(length(min = 1, max = 200))]
    title: String,

    #[serde(default)]
    #[validate(length(max = 2000))]
    description: String,

    visibility: QuizVisibility,

    #[serde(default)]
    cover_image: Option<String>,

    #[serde(default)]
    questions: Vec<QuizQuestion>,
}

async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<QuizPayload>,
) -> Result<(StatusCode, Json<Quiz>), ApiError> {
    payload.validate()?;

    let pool = state.db.pool().await?;
    let entity = QuizRepository::new(pool)
        .create_quiz(
            user.id,
            &payload.title,
            &payload.description,
            payload.visibility,
            payload.cover_image.as_deref(),
            &payload.questions,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(entity.into())))
}

async fn fetch(
    State(state): State<AppState>,
    current_user: Option<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Quiz>, ApiError> {
    let pool = state.db.pool().await?;
    let quiz: Quiz = QuizRepository::new(pool)
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Quiz not found".into()))?
        .into();

    let is_owner = current_user
        .as_ref()
        .is_some_and(|CurrentUser(user)| user.id == quiz.owner_id);
    if !quiz.is_public() && !is_owner {
        // Private quizzes are indistinguishable from missing ones.
        return Err(ApiError::NotFound("Quiz not found".into()));
    }

    Ok(Json(quiz))
}

async fn list_public(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<Quiz>>, ApiError> {
    let params = params.clamped();
    let pool = state.db.pool().await?;
    let repo = QuizRepository::new(pool);

    let items: Vec<Quiz> = repo
        .list_public(params.limit(), params.offset())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let total = repo.count_public().await?;

    Ok(Json(Page::new(items, params, total)))
}

async fn list_mine(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Quiz>>, ApiError> {
    let pool = state.db.pool().await?;
    let quizzes = QuizRepository::new(pool)
        .list_by_owner(user.id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(quizzes))
}

async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<QuizPayload>,
) -> Result<Json<Quiz>, ApiError> {
    payload.validate()?;

    let pool = state.db.pool().await?;
    let repo = QuizRepository::new(pool);

    let existing = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Quiz not found".into()))?;
    if existing.owner_id != user.id {
        return Err(ApiError::Forbidden("Not the quiz owner".into()));
    }

    let entity = repo
        .update_quiz(
            id,
            &payload.title,
            &payload.description,
            payload.visibility,
            payload.cover_image.as_deref(),
            &payload.questions,
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Quiz not found".into()))?;

    Ok(Json(entity.into()))
}

async fn delete_quiz(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let pool = state.db.pool().await?;
    let repo = QuizRepository::new(pool);

    let existing = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Quiz not found".into()))?;
    if existing.owner_id != user.id {
        return Err(ApiError::Forbidden("Not the quiz owner".into()));
    }

    repo.delete_quiz(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_validation() {
        let ok = QuizPayload {
            title: "Capitals".to_string(),
            description: String::new(),
            visibility: QuizVisibility::Public,
            cover_image: None,
            questions: vec![],
        };
        assert!(ok.validate().is_ok());

        let empty_title = QuizPayload {
            title: String::new(),
            ..ok
        };
        assert!(empty_title.validate().is_err());
    }

    #[test]
    fn test_payload_deserialization_defaults() {
        let parsed: QuizPayload =
            serde_json::from_str(r#"{"title":"T","visibility":"private"}"#).unwrap();
        assert!(parsed.questions.is_empty());
        assert!(parsed.cover_image.is_none());
        assert_eq!(parsed.visibility, QuizVisibility::Private);
    }
}
