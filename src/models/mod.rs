// src/models/mod.rs
pub mod score;

pub use score::{
    GeneratedName,
    LeaderboardRow,
    MaskedLeaderboardRow,
    ScoreEvent,
    SubmitScoreRequest,
    SubmitScoreResponse,
    TotalPointsResponse,
    UpdateWalletRequest,
    UpdateWalletResponse,
    UserScoreQuery,
    UserScoreResponse,
    WalletAddressRequest,
    WindowedTotals,
};
