use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::{
    error::{AppError, Result},
    models::{UpdateWalletRequest, UpdateWalletResponse, WalletAddressRequest},
    services::{
        identity_registry::{WalletStatus, WalletUsername},
        WalletBinding,
    },
    utils::{require_username, require_wallet_address},
};

use super::AppState;

/// POST /update_wallet
pub async fn update_wallet(
    State(state): State<AppState>,
    payload: std::result::Result<Json<UpdateWalletRequest>, JsonRejection>,
) -> Result<Json<UpdateWalletResponse>> {
    let Json(req) = payload?;
    let missing = |field: &Option<String>| field.as_deref().map_or(true, str::is_empty);
    if missing(&req.username) || missing(&req.wallet_address) {
        return Err(AppError::BadRequest(
            "Username and wallet address required".to_string(),
        ));
    }
    let username = require_username(req.username)?;
    let wallet = require_wallet_address(req.wallet_address)?;

    let response = match state.registry.bind_or_reject(&username, &wallet).await? {
        WalletBinding::Bound => UpdateWalletResponse::Bound { success: true },
        WalletBinding::Locked { username, message } => UpdateWalletResponse::Locked {
            username,
            locked: true,
            message,
        },
    };

    Ok(Json(response))
}

/// POST /check_wallet_username
pub async fn check_wallet_username(
    State(state): State<AppState>,
    payload: std::result::Result<Json<WalletAddressRequest>, JsonRejection>,
) -> Result<Json<WalletUsername>> {
    let Json(req) = payload?;
    let wallet = require_wallet_address(req.wallet_address)?;
    Ok(Json(state.registry.wallet_username(&wallet).await))
}

/// POST /check_wallet_status
pub async fn check_wallet_status(
    State(state): State<AppState>,
    payload: std::result::Result<Json<WalletAddressRequest>, JsonRejection>,
) -> Result<Json<WalletStatus>> {
    let Json(req) = payload?;
    let wallet = require_wallet_address(req.wallet_address)?;
    Ok(Json(state.registry.wallet_status(&wallet).await?))
}
