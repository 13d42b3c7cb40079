use axum::{extract::State, Json};

use crate::{
    constants::{LEADERBOARD_LIMIT, LEADERBOARD_TIMESTAMP_FORMAT},
    error::Result,
    models::{LeaderboardRow, MaskedLeaderboardRow},
    services::Grouping,
};

use super::AppState;

/// GET /leaderboard
///
/// Grouped by (username, wallet) with full wallet addresses.
pub async fn leaderboard(State(state): State<AppState>) -> Result<Json<Vec<LeaderboardRow>>> {
    let entries = state
        .leaderboard
        .top_entries(Grouping::UsernameAndWallet, LEADERBOARD_LIMIT)
        .await?;

    let rows = entries
        .into_iter()
        .map(|entry| LeaderboardRow {
            username: entry.username,
            score: entry.aggregate_score,
            wallet_address: entry.wallet_address,
            timestamp: entry
                .most_recent_timestamp
                .format(LEADERBOARD_TIMESTAMP_FORMAT)
                .to_string(),
        })
        .collect();

    Ok(Json(rows))
}

/// GET /get_leaderboard
///
/// Grouped by username only; wallets reduced to their last characters.
pub async fn get_leaderboard(
    State(state): State<AppState>,
) -> Result<Json<Vec<MaskedLeaderboardRow>>> {
    let entries = state
        .leaderboard
        .top_entries_masked(Grouping::Username, LEADERBOARD_LIMIT)
        .await?;

    let rows = entries
        .into_iter()
        .map(|entry| MaskedLeaderboardRow {
            username: entry.username,
            score: entry.aggregate_score,
            wallet_address: entry.wallet_suffix,
        })
        .collect();

    Ok(Json(rows))
}
