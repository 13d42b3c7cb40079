// src/api/mod.rs

pub mod health;
pub mod leaderboard;
pub mod names;
pub mod scores;
pub mod wallet;

use std::sync::Arc;

use crate::config::Config;
use crate::db::Database;
use crate::services::{IdentityRegistry, LeaderboardAggregator};

// AppState definition
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub registry: Arc<IdentityRegistry>,
    pub leaderboard: Arc<LeaderboardAggregator>,
    pub config: Config,
}

impl AppState {
    /// Services are built once per process and shared by every request.
    pub fn new(db: Database, config: Config) -> Self {
        Self {
            registry: Arc::new(IdentityRegistry::new(db.clone())),
            leaderboard: Arc::new(LeaderboardAggregator::new(db.clone())),
            db,
            config,
        }
    }
}
