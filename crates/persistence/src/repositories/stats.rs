//! Public statistics repository.

use sqlx::PgPool;

use crate::metrics::QueryTimer;

/// Aggregate counts exposed on the public stats endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformCounts {
    pub users: i64,
    pub quizzes: i64,
    pub games_played: i64,
}

/// Repository for platform-wide aggregate queries.
#[derive(Clone)]
pub struct StatsRepository {
    pool: PgPool,
}

impl StatsRepository {
    /// Creates a new StatsRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch the platform-wide counters in one round trip.
    pub async fn platform_counts(&self) -> Result<PlatformCounts, sqlx::Error> {
        let _timer = QueryTimer::new("platform_counts");
        let (users, quizzes, games_played) = sqlx::query_as::<_, (i64, i64, i64)>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users),
                (SELECT COUNT(*) FROM quizzes),
                (SELECT COALESCE(SUM(play_count), 0) FROM quizzes)
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(PlatformCounts {
            users,
            quizzes,
            games_played,
        })
    }
}
