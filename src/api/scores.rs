use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use chrono::Utc;

use crate::{
    constants::SCORE_SUBMITTED_MESSAGE,
    error::{AppError, Result},
    models::{
        SubmitScoreRequest, SubmitScoreResponse, TotalPointsResponse, UserScoreQuery,
        UserScoreResponse, WindowedTotals,
    },
    utils::{optional_wallet_address, parse_score, require_username},
};

use super::AppState;

/// POST /submit_score
pub async fn submit_score(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SubmitScoreRequest>, JsonRejection>,
) -> Result<Json<SubmitScoreResponse>> {
    let Json(req) = payload?;
    let username = require_username(req.username)?;
    let score = parse_score(req.score.as_ref())?;
    let wallet = optional_wallet_address(req.wallet_address)?;

    let receipt = state
        .registry
        .record_score(&username, score, wallet.as_deref())
        .await?;

    Ok(Json(SubmitScoreResponse {
        message: SCORE_SUBMITTED_MESSAGE.to_string(),
        total_score: receipt.total_score,
        username: receipt.username,
    }))
}

/// GET /get_user_score?username=
pub async fn get_user_score(
    State(state): State<AppState>,
    query: std::result::Result<Query<UserScoreQuery>, QueryRejection>,
) -> Result<Json<UserScoreResponse>> {
    let Query(query) = query?;
    let username = query
        .username
        .filter(|name| !name.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing username".to_string()))?;

    let total_score = state.db.total_for(&username).await?;
    Ok(Json(UserScoreResponse { total_score }))
}

/// GET /get_total_points
pub async fn get_total_points(State(state): State<AppState>) -> Result<Json<TotalPointsResponse>> {
    let total_points = state.db.grand_total().await?;
    Ok(Json(TotalPointsResponse { total_points }))
}

/// GET /get_stats
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<WindowedTotals>> {
    let totals = state.db.windowed_totals(Utc::now()).await?;
    tracing::debug!("Stats over the last 72h: {}", totals.combined());
    Ok(Json(totals))
}
