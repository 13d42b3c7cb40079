use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ==================== SCORE EVENT ====================
/// One submitted game score. Rows are append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ScoreEvent {
    pub id: i64,
    pub username: String,
    pub score: i64,
    pub wallet_address: Option<String>,
    pub timestamp: DateTime<Utc>,
}

// ==================== STATS ====================
/// Score sums over three non-overlapping windows ending at "now".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WindowedTotals {
    /// `(now - 1h, now]`
    pub last_hour: i64,
    /// `(now - 24h, now - 1h]`
    pub last_24_hours: i64,
    /// `(now - 72h, now - 24h]`
    pub last_72_hours: i64,
}

impl WindowedTotals {
    pub fn combined(&self) -> i64 {
        self.last_hour
            .saturating_add(self.last_24_hours)
            .saturating_add(self.last_72_hours)
    }
}

// ==================== REQUESTS ====================
// Required fields are optional here so that a missing field is reported as
// our own 400 instead of a deserialization rejection.

#[derive(Debug, Default, Deserialize)]
pub struct UpdateWalletRequest {
    pub username: Option<String>,
    pub wallet_address: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WalletAddressRequest {
    pub wallet_address: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SubmitScoreRequest {
    pub username: Option<String>,
    pub score: Option<serde_json::Value>,
    pub wallet_address: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserScoreQuery {
    pub username: Option<String>,
}

// ==================== RESPONSES ====================
#[derive(Debug, Serialize)]
pub struct GeneratedName {
    pub name: String,
}

#[derive(Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UpdateWalletResponse {
    Bound {
        success: bool,
    },
    Locked {
        username: String,
        locked: bool,
        message: String,
    },
}

#[derive(Debug, Serialize)]
pub struct SubmitScoreResponse {
    pub message: String,
    pub total_score: i64,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct UserScoreResponse {
    pub total_score: i64,
}

#[derive(Debug, Serialize)]
pub struct TotalPointsResponse {
    pub total_points: i64,
}

/// Row of `/leaderboard`, grouped by (username, wallet).
#[derive(Debug, Serialize)]
pub struct LeaderboardRow {
    pub username: String,
    pub score: i64,
    pub wallet_address: Option<String>,
    pub timestamp: String,
}

/// Row of `/get_leaderboard`; the wallet is cut down to its last characters.
#[derive(Debug, Serialize)]
pub struct MaskedLeaderboardRow {
    pub username: String,
    pub score: i64,
    pub wallet_address: Option<String>,
}
