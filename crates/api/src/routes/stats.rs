//! Public platform statistics.

use axum::{extract::State, routing::get, Json, Router};
use persistence::repositories::StatsRepository;
use serde::Serialize;

use crate::app::AppState;
use crate::error::ApiError;

pub fn router() -> Router<AppState> {
    Router::new().route("/combined", get(combined))
}

#[derive(Debug, Serialize)]
struct CombinedStats {
    users: i64,
    quizzes: i64,
    games_played: i64,
}

async fn combined(State(state): State<AppState>) -> Result<Json<CombinedStats>, ApiError> {
    let pool = state.db.pool().await?;
    let counts = StatsRepository::new(pool).platform_counts().await?;

    Ok(Json(CombinedStats {
        users: counts.users,
        quizzes: counts.quizzes,
        games_played: counts.games_played,
    }))
}
