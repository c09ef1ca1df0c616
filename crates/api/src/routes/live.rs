//! HTTP boundary of the live game layer.
//!
//! Starting a game registers a pin with the hub; players then speak the
//! live protocol over the root-mounted socket transport.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use domain::models::LiveGameSummary;
use persistence::repositories::QuizRepository;
use serde::Deserialize;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentUser;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/start", post(start_game))
        .route("/:pin", get(game_info))
}

#[derive(Debug, Deserialize)]
struct StartGameRequest {
    quiz_id: Uuid,
}

fn generate_pin() -> String {
    // Six decimal digits, leading zeros allowed.
    let n: u32 = rand::Rng::gen_range(&mut rand::thread_rng(), 0..1_000_000);
    format!("{:06}", n)
}

async fn start_game(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<StartGameRequest>,
) -> Result<(StatusCode, Json<LiveGameSummary>), ApiError> {
    let pool = state.db.pool().await?;
    let quiz = QuizRepository::new(pool)
        .find_by_id(payload.quiz_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Quiz not found".into()))?;
    if quiz.owner_id != user.id {
        return Err(ApiError::Forbidden("Not the quiz owner".into()));
    }

    // Retry on pin collisions; the space is large relative to live games.
    for _ in 0..16 {
        let pin = generate_pin();
        if state.live.register_game(&pin, quiz.id).await {
            let summary = state
                .live
                .lookup(&pin)
                .await
                .ok_or_else(|| ApiError::Internal("Game vanished after registration".into()))?;
            return Ok((StatusCode::CREATED, Json(summary)));
        }
    }

    Err(ApiError::Conflict("Could not allocate a game pin".into()))
}

async fn game_info(
    State(state): State<AppState>,
    Path(pin): Path<String>,
) -> Result<Json<LiveGameSummary>, ApiError> {
    if !shared::validation::is_valid_game_pin(&pin) {
        return Err(ApiError::Validation("Malformed game pin".into()));
    }

    state
        .live
        .lookup(&pin)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("No running game with that pin".into()))
}
