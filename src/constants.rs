/// Application constants

// Leaderboard
pub const LEADERBOARD_LIMIT: usize = 10;
pub const MASKED_WALLET_SUFFIX_LEN: usize = 4;
pub const LEADERBOARD_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// Stats windows (hours, measured back from now)
pub const WINDOW_LAST_HOUR_HOURS: i64 = 1;
pub const WINDOW_LAST_DAY_HOURS: i64 = 24;
pub const WINDOW_LAST_THREE_DAYS_HOURS: i64 = 72;

// Largest accepted score magnitude per submission
pub const MAX_SCORE_MAGNITUDE: i64 = i32::MAX as i64;

// Column limits of the scores table
pub const MAX_USERNAME_LEN: usize = 50;
pub const MAX_WALLET_ADDRESS_LEN: usize = 42;

// Name generator
pub const NAME_SUFFIX_MIN: u32 = 1;
pub const NAME_SUFFIX_MAX: u32 = 999;

pub const NAME_ADJECTIVES: [&str; 16] = [
    "Diamond", "Moon", "Rocket", "Crypto", "Hodl", "Degen", "Based", "Alpha", "Beta", "Gamma",
    "Whale", "Ninja", "Shadow", "Golden", "Silver", "Cosmic",
];

pub const NAME_NOUNS: [&str; 16] = [
    "Shiba", "Doge", "Paw", "Coin", "Token", "Wallet", "Chain", "Block", "Hash", "Mine", "Gem",
    "Hand", "Ape", "Bull", "Bear", "Wolf",
];

// Response messages
pub const SCORE_SUBMITTED_MESSAGE: &str = "Score submitted successfully";
