// Request validation helpers shared by the handlers.

use crate::{
    constants::{
        MASKED_WALLET_SUFFIX_LEN, MAX_SCORE_MAGNITUDE, MAX_USERNAME_LEN, MAX_WALLET_ADDRESS_LEN,
    },
    error::{AppError, Result},
};

/// Usernames are stored exactly as submitted; only emptiness and length are checked.
pub fn require_username(username: Option<String>) -> Result<String> {
    let username = username
        .filter(|name| !name.is_empty())
        .ok_or_else(|| AppError::BadRequest("Username required".to_string()))?;
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(AppError::BadRequest(format!(
            "Username must be at most {} characters",
            MAX_USERNAME_LEN
        )));
    }
    Ok(username)
}

/// Lowercases and trims a wallet address. Wallet keys are never compared or stored otherwise.
pub fn normalize_wallet_address(raw: &str) -> Result<String> {
    let normalized = raw.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        return Err(AppError::BadRequest("Wallet address required".to_string()));
    }
    if normalized.chars().count() > MAX_WALLET_ADDRESS_LEN {
        return Err(AppError::BadRequest(format!(
            "Wallet address must be at most {} characters",
            MAX_WALLET_ADDRESS_LEN
        )));
    }
    Ok(normalized)
}

pub fn require_wallet_address(wallet: Option<String>) -> Result<String> {
    match wallet {
        Some(raw) => normalize_wallet_address(&raw),
        None => Err(AppError::BadRequest("Wallet address required".to_string())),
    }
}

/// Optional wallet on score submission: absent, null or blank means "no wallet".
pub fn optional_wallet_address(wallet: Option<String>) -> Result<Option<String>> {
    match wallet {
        Some(raw) if !raw.trim().is_empty() => normalize_wallet_address(&raw).map(Some),
        _ => Ok(None),
    }
}

/// Accepts any JSON number within `±MAX_SCORE_MAGNITUDE`. Reals are truncated toward zero.
pub fn parse_score(value: Option<&serde_json::Value>) -> Result<i64> {
    let invalid = || AppError::BadRequest("Invalid username or score".to_string());
    let number = match value {
        Some(serde_json::Value::Number(number)) => number,
        _ => return Err(invalid()),
    };

    let score = match number.as_i64() {
        Some(score) => score,
        None => {
            let real = number.as_f64().ok_or_else(invalid)?.trunc();
            if !real.is_finite() || real.abs() > MAX_SCORE_MAGNITUDE as f64 {
                return Err(invalid());
            }
            real as i64
        }
    };

    if score.unsigned_abs() > MAX_SCORE_MAGNITUDE.unsigned_abs() {
        return Err(AppError::BadRequest(format!(
            "Score must be between -{} and {}",
            MAX_SCORE_MAGNITUDE, MAX_SCORE_MAGNITUDE
        )));
    }
    Ok(score)
}

/// Last few characters of a wallet for public display.
pub fn mask_wallet_address(wallet: Option<&str>) -> Option<String> {
    let wallet = wallet?;
    let len = wallet.chars().count();
    Some(
        wallet
            .chars()
            .skip(len.saturating_sub(MASKED_WALLET_SUFFIX_LEN))
            .collect(),
    )
}
