//! Password login and logout handlers.

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderValue},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::Utc;
use domain::models::{PublicUser, User};
use persistence::repositories::UserRepository;
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::remember_me::rememberme_token;
use crate::middleware::session::build_cookie;
use crate::middleware::Session;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(login))
        .route("/logout", post(logout))
}

#[derive(Debug, Deserialize, Validate)]
struct LoginRequest {
    #[validate(email)]
    email: String,

    #[validate(length(min = 1))]
    password: String,

    #[serde(default)]
    remember_me: bool,
}

async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    payload.validate()?;

    let pool = state.db.pool().await?;
    let repo = UserRepository::new(pool);

    let entity = repo
        .find_by_email(&payload.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".into()))?;

    let hash = entity
        .password_hash
        .as_deref()
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".into()))?;

    if !shared::password::verify_password(&payload.password, hash)? {
        return Err(ApiError::Unauthorized("Invalid email or password".into()));
    }

    repo.update_last_login(entity.id, Utc::now()).await?;

    let user: User = entity.into();
    let user_id = user.id;
    session.insert("user_id", json!(user_id.to_string()));

    let mut response = Json(PublicUser::from(user)).into_response();

    if payload.remember_me {
        let config = &state.config.session;
        let token = rememberme_token(&config.secret_key, user_id);
        let cookie = build_cookie(
            config,
            &config.rememberme_cookie_name,
            &token,
            config.rememberme_max_age_secs,
        );
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(SET_COOKIE, value);
        }
    }

    Ok(response)
}

async fn logout(State(state): State<AppState>, session: Session) -> Response {
    session.clear();

    // Expire the remember-me cookie regardless of whether it was set.
    let config = &state.config.session;
    let clearing = format!(
        "{}=; Path=/; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT; HttpOnly; SameSite=Lax",
        config.rememberme_cookie_name
    );

    let mut response = Json(json!({ "status": "logged_out" })).into_response();
    if let Ok(value) = HeaderValue::from_str(&clearing) {
        response.headers_mut().append(SET_COOKIE, value);
    }
    response
}
