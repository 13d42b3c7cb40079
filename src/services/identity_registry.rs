use std::collections::HashMap;

use serde::Serialize;
use tokio::sync::Mutex;

use crate::{db::Database, error::Result};

/// What the server knows about a wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalletStatus {
    pub has_played: bool,
    pub username: Option<String>,
}

/// In-memory binding of a wallet, without consulting stored scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalletUsername {
    pub username: Option<String>,
    pub locked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletBinding {
    Bound,
    Locked { username: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreReceipt {
    /// Username the score was recorded under. Differs from the submitted one
    /// when the wallet was already locked to another player.
    pub username: String,
    pub total_score: i64,
}

#[derive(Default)]
struct RegistryState {
    wallet_to_username: HashMap<String, String>,
    scores_by_username: HashMap<String, Vec<i64>>,
}

impl RegistryState {
    fn has_played(&self, username: &str) -> bool {
        self.scores_by_username
            .get(username)
            .is_some_and(|scores| !scores.is_empty())
    }

    fn bind(&mut self, username: &str, wallet: Option<&str>) {
        self.scores_by_username
            .entry(username.to_string())
            .or_default();
        if let Some(wallet) = wallet {
            self.wallet_to_username
                .insert(wallet.to_string(), username.to_string());
        }
    }
}

/// Identity Registry - links wallets to the first username that played with them
///
/// Bindings live for the lifetime of the process. Stored scores are the
/// fallback for wallets this process has not seen yet. Every check-then-act
/// sequence runs under the one state lock.
pub struct IdentityRegistry {
    db: Database,
    state: Mutex<RegistryState>,
}

impl IdentityRegistry {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            state: Mutex::new(RegistryState::default()),
        }
    }

    /// Resolve the username and played flag for a wallet.
    pub async fn wallet_status(&self, wallet: &str) -> Result<WalletStatus> {
        let wallet = wallet.to_ascii_lowercase();
        let state = self.state.lock().await;
        self.resolve(&state, &wallet).await
    }

    /// Bind a wallet to a username unless the wallet already belongs to a player with scores.
    pub async fn bind_or_reject(&self, username: &str, wallet: &str) -> Result<WalletBinding> {
        let wallet = wallet.to_ascii_lowercase();
        let mut state = self.state.lock().await;

        if let WalletStatus {
            has_played: true,
            username: Some(owner),
        } = self.resolve(&state, &wallet).await?
        {
            tracing::info!(
                "Wallet {} is locked to {}; rejected rebinding to {}",
                wallet,
                owner,
                username
            );
            return Ok(WalletBinding::Locked {
                message: format!("This wallet is linked to username: {}", owner),
                username: owner,
            });
        }

        state.bind(username, Some(&wallet));
        tracing::debug!("Bound wallet {} to {}", wallet, username);
        Ok(WalletBinding::Bound)
    }

    /// The in-memory binding only; no storage lookup.
    pub async fn wallet_username(&self, wallet: &str) -> WalletUsername {
        let wallet = wallet.to_ascii_lowercase();
        let state = self.state.lock().await;
        let username = state.wallet_to_username.get(&wallet).cloned();
        let locked = username
            .as_deref()
            .is_some_and(|name| state.has_played(name));
        WalletUsername { username, locked }
    }

    /// Record a score, renaming it to the wallet's canonical username when
    /// the wallet is already locked to someone else.
    pub async fn record_score(
        &self,
        username: &str,
        score: i64,
        wallet: Option<&str>,
    ) -> Result<ScoreReceipt> {
        let wallet = wallet.map(str::to_ascii_lowercase);
        let mut state = self.state.lock().await;

        let mut canonical = username.to_string();
        if let Some(wallet) = wallet.as_deref() {
            if let WalletStatus {
                has_played: true,
                username: Some(owner),
            } = self.resolve(&state, wallet).await?
            {
                if owner != username {
                    tracing::warn!(
                        "Score from {} recorded under {}: wallet {} is locked",
                        username,
                        owner,
                        wallet
                    );
                    canonical = owner;
                }
            }
        }

        // memory is only touched once the event is durable
        self.db
            .append_score(&canonical, score, wallet.as_deref())
            .await?;
        state.bind(&canonical, wallet.as_deref());
        state
            .scores_by_username
            .entry(canonical.clone())
            .or_default()
            .push(score);

        let total_score = self.db.total_for(&canonical).await?;
        tracing::info!(
            "Score recorded: user={}, score={}, total={}",
            canonical,
            score,
            total_score
        );

        Ok(ScoreReceipt {
            username: canonical,
            total_score,
        })
    }

    async fn resolve(&self, state: &RegistryState, wallet: &str) -> Result<WalletStatus> {
        match state.wallet_to_username.get(wallet) {
            None => {
                let username = self.db.first_username_for_wallet(wallet).await?;
                Ok(WalletStatus {
                    has_played: username.is_some(),
                    username,
                })
            }
            Some(username) => {
                let has_played = state.has_played(username)
                    || self.db.first_username_for_wallet(wallet).await?.is_some();
                Ok(WalletStatus {
                    has_played,
                    username: Some(username.clone()),
                })
            }
        }
    }
}
