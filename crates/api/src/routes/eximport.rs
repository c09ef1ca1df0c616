//! Quiz export and import.
//!
//! The portable document deliberately excludes ownership, play counts and
//! timestamps: an imported quiz is a fresh private draft of the importer.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use domain::models::{Quiz, QuizQuestion, QuizVisibility};
use persistence::repositories::QuizRepository;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentUser;

/// Version tag of the portable document format.
const EXPORT_VERSION: u32 = 1;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(import_quiz))
        .route("/:quiz_id", get(export_quiz))
}

/// Portable quiz document.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct QuizDocument {
    pub version: u32,

    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub questions: Vec<QuizQuestion>,
}

impl From<Quiz> for QuizDocument {
    fn from(quiz: Quiz) -> Self {
        Self {
            version: EXPORT_VERSION,
            title: quiz.title,
            description: quiz.description,
            questions: quiz.questions,
        }
    }
}

async fn export_quiz(
    State(state): State<AppState>,
    current_user: Option<CurrentUser>,
    Path(quiz_id): Path<Uuid>,
) -> Result<Json<QuizDocument>, ApiError> {
    let pool = state.db.pool().await?;
    let quiz: Quiz = QuizRepository::new(pool)
        .find_by_id(quiz_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Quiz not found".into()))?
        .into();

    let is_owner = current_user
        .as_ref()
        .is_some_and(|CurrentUser(user)| user.id == quiz.owner_id);
    if !quiz.is_public() && !is_owner {
        return Err(ApiError::NotFound("Quiz not found".into()));
    }

    Ok(Json(quiz.into()))
}

async fn import_quiz(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(document): Json<QuizDocument>,
) -> Result<(StatusCode, Json<Quiz>), ApiError> {
    document.validate()?;
    if document.version != EXPORT_VERSION {
        return Err(ApiError::Validation(format!(
            "Unsupported document version {}",
            document.version
        )));
    }

    let pool = state.db.pool().await?;
    let entity = QuizRepository::new(pool)
        .create_quiz(
            user.id,
            &document.title,
            &document.description,
            QuizVisibility::Private,
            None,
            &document.questions,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(entity.into())))
}
