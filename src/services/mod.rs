// All service modules
pub mod identity_registry;
pub mod leaderboard;
pub mod name_generator;

// Re-export for convenience
pub use identity_registry::{IdentityRegistry, WalletBinding};
pub use leaderboard::{Grouping, LeaderboardAggregator};
