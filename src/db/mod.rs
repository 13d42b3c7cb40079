use chrono::{DateTime, Duration, Utc};
use sqlx::{sqlite::SqlitePoolOptions, Row, SqlitePool};

use crate::{
    config::Config,
    constants::{WINDOW_LAST_DAY_HOURS, WINDOW_LAST_HOUR_HOURS, WINDOW_LAST_THREE_DAYS_HOURS},
    error::Result,
    models::{ScoreEvent, WindowedTotals},
};

/// Durable score store backed by SQLite.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let max_connections = if config.is_in_memory_database() {
            1
        } else {
            config.database_max_connections
        };
        Self::connect(&config.database_url, max_connections).await
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let mut options = SqlitePoolOptions::new().max_connections(max_connections);
        if max_connections == 1 {
            // an in-memory database is dropped together with its last connection
            options = options.idle_timeout(None).max_lifetime(None);
        }
        let pool = options.connect(database_url).await?;

        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

// ==================== SCORE WRITES ====================
impl Database {
    pub async fn append_score(
        &self,
        username: &str,
        score: i64,
        wallet_address: Option<&str>,
    ) -> Result<ScoreEvent> {
        self.append_score_at(username, score, wallet_address, Utc::now())
            .await
    }

    pub async fn append_score_at(
        &self,
        username: &str,
        score: i64,
        wallet_address: Option<&str>,
        timestamp: DateTime<Utc>,
    ) -> Result<ScoreEvent> {
        let result = sqlx::query(
            "INSERT INTO scores (username, score, wallet_address, timestamp)
             VALUES (?, ?, ?, ?)",
        )
        .bind(username)
        .bind(score)
        .bind(wallet_address)
        .bind(timestamp)
        .execute(&self.pool)
        .await?;

        Ok(ScoreEvent {
            id: result.last_insert_rowid(),
            username: username.to_string(),
            score,
            wallet_address: wallet_address.map(str::to_string),
            timestamp,
        })
    }
}

// ==================== SCORE QUERIES ====================
impl Database {
    pub async fn total_for(&self, username: &str) -> Result<i64> {
        let total: i64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(score), 0) FROM scores WHERE username = ?")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;
        Ok(total)
    }

    pub async fn grand_total(&self) -> Result<i64> {
        let total: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(score), 0) FROM scores")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    /// Left bounds are exclusive, right bounds inclusive, so a timestamp on a
    /// window edge lands in exactly one window.
    pub async fn windowed_totals(&self, now: DateTime<Utc>) -> Result<WindowedTotals> {
        let hour_ago = now - Duration::hours(WINDOW_LAST_HOUR_HOURS);
        let day_ago = now - Duration::hours(WINDOW_LAST_DAY_HOURS);
        let three_days_ago = now - Duration::hours(WINDOW_LAST_THREE_DAYS_HOURS);

        let row = sqlx::query(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN timestamp > ? THEN score END), 0) AS last_hour,
                COALESCE(SUM(CASE WHEN timestamp > ? AND timestamp <= ? THEN score END), 0) AS last_24_hours,
                COALESCE(SUM(CASE WHEN timestamp <= ? THEN score END), 0) AS last_72_hours
            FROM scores
            WHERE timestamp > ? AND timestamp <= ?
            "#,
        )
        .bind(hour_ago)
        .bind(day_ago)
        .bind(hour_ago)
        .bind(day_ago)
        .bind(three_days_ago)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(WindowedTotals {
            last_hour: row.try_get("last_hour")?,
            last_24_hours: row.try_get("last_24_hours")?,
            last_72_hours: row.try_get("last_72_hours")?,
        })
    }

    /// Username of the earliest stored score carrying this wallet.
    pub async fn first_username_for_wallet(&self, wallet_address: &str) -> Result<Option<String>> {
        let username: Option<String> = sqlx::query_scalar(
            "SELECT username FROM scores WHERE wallet_address = ? ORDER BY id ASC LIMIT 1",
        )
        .bind(wallet_address)
        .fetch_optional(&self.pool)
        .await?;
        Ok(username)
    }

    pub async fn all_score_events(&self) -> Result<Vec<ScoreEvent>> {
        let events = sqlx::query_as::<_, ScoreEvent>(
            "SELECT id, username, score, wallet_address, timestamp FROM scores ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(events)
    }
}

#[cfg(test)]
pub(crate) async fn test_database() -> Database {
    let db = Database::connect("sqlite::memory:", 1)
        .await
        .expect("in-memory database");
    db.run_migrations().await.expect("migrations");
    db
}
