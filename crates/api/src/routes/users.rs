//! User registration and profile handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use domain::models::{PublicUser, User};
use persistence::repositories::UserRepository;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentUser;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(register))
        .route("/me", get(me))
        .route("/:id", get(profile))
}

#[derive(Debug, Deserialize, Validate)]
struct RegisterRequest {
    #[validate(custom(function = "shared::validation::validate_username"))]
    username: String,

    #[validate(email)]
    email: String,

    #[validate(length(min = 8, max = 128))]
    password: String,
}

async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<PublicUser>), ApiError> {
    payload.validate()?;

    let pool = state.db.pool().await?;
    let hash = shared::password::hash_password(&payload.password)?;

    // A duplicate username or email surfaces as a unique violation, which
    // the error type maps to 409.
    let entity = UserRepository::new(pool)
        .create_user(&payload.username, &payload.email, &hash)
        .await?;

    let user: User = entity.into();
    Ok((StatusCode::CREATED, Json(PublicUser::from(user))))
}

async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}

async fn profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PublicUser>, ApiError> {
    let pool = state.db.pool().await?;
    let entity = UserRepository::new(pool)
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    let user: User = entity.into();
    Ok(Json(PublicUser::from(user)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let ok = RegisterRequest {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "long enough".to_string(),
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_register_rejects_short_password() {
        let bad = RegisterRequest {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "short".to_string(),
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_register_rejects_bad_username() {
        let bad = RegisterRequest {
            username: "a b".to_string(),
            email: "alice@example.com".to_string(),
            password: "long enough".to_string(),
        };
        assert!(bad.validate().is_err());
    }
}
