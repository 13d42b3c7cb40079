use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::{
    db::Database,
    error::{AppError, Result},
    models::ScoreEvent,
    utils::mask_wallet_address,
};

/// Key that score events are summed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    /// Same username with different wallets are separate entries.
    UsernameAndWallet,
    Username,
}

impl Grouping {
    fn key(self, event: &ScoreEvent) -> (String, Option<String>) {
        match self {
            Grouping::UsernameAndWallet => (event.username.clone(), event.wallet_address.clone()),
            Grouping::Username => (event.username.clone(), None),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub username: String,
    pub wallet_address: Option<String>,
    pub aggregate_score: i64,
    pub most_recent_timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskedLeaderboardEntry {
    pub username: String,
    pub wallet_suffix: Option<String>,
    pub aggregate_score: i64,
}

struct Group {
    entry: LeaderboardEntry,
    /// Timestamp of the event the shown wallet came from.
    wallet_seen_at: Option<DateTime<Utc>>,
}

/// Sum scores per group and keep the top `limit`, highest first.
///
/// Ties keep the order in which each group first appears in `events`.
/// Under [`Grouping::Username`] an entry shows the wallet of its most recent
/// event that carried one. A sum past `i64::MAX` is an error, never a wrap.
pub fn rank(
    events: &[ScoreEvent],
    grouping: Grouping,
    limit: usize,
) -> Result<Vec<LeaderboardEntry>> {
    let mut index: HashMap<(String, Option<String>), usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();

    for event in events {
        let key = grouping.key(event);
        match index.get(&key) {
            Some(&i) => {
                let group = &mut groups[i];
                group.entry.aggregate_score = group
                    .entry
                    .aggregate_score
                    .checked_add(event.score)
                    .ok_or_else(|| {
                        AppError::Internal(format!(
                            "score total for {} overflows",
                            event.username
                        ))
                    })?;
                if event.wallet_address.is_some()
                    && group
                        .wallet_seen_at
                        .map_or(true, |seen_at| event.timestamp >= seen_at)
                {
                    group.entry.wallet_address = event.wallet_address.clone();
                    group.wallet_seen_at = Some(event.timestamp);
                }
                if event.timestamp > group.entry.most_recent_timestamp {
                    group.entry.most_recent_timestamp = event.timestamp;
                }
            }
            None => {
                index.insert(key, groups.len());
                groups.push(Group {
                    entry: LeaderboardEntry {
                        username: event.username.clone(),
                        wallet_address: event.wallet_address.clone(),
                        aggregate_score: event.score,
                        most_recent_timestamp: event.timestamp,
                    },
                    wallet_seen_at: event.wallet_address.as_ref().map(|_| event.timestamp),
                });
            }
        }
    }

    let mut entries: Vec<LeaderboardEntry> = groups.into_iter().map(|group| group.entry).collect();
    // stable sort keeps first-appearance order among equal scores
    entries.sort_by(|a, b| b.aggregate_score.cmp(&a.aggregate_score));
    entries.truncate(limit);
    Ok(entries)
}

pub fn mask(entries: Vec<LeaderboardEntry>) -> Vec<MaskedLeaderboardEntry> {
    entries
        .into_iter()
        .map(|entry| MaskedLeaderboardEntry {
            wallet_suffix: mask_wallet_address(entry.wallet_address.as_deref()),
            username: entry.username,
            aggregate_score: entry.aggregate_score,
        })
        .collect()
}

/// Leaderboard Aggregator - ranked views recomputed from stored scores on every read
pub struct LeaderboardAggregator {
    db: Database,
}

impl LeaderboardAggregator {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn top_entries(
        &self,
        grouping: Grouping,
        limit: usize,
    ) -> Result<Vec<LeaderboardEntry>> {
        let events = self.db.all_score_events().await?;
        rank(&events, grouping, limit)
    }

    pub async fn top_entries_masked(
        &self,
        grouping: Grouping,
        limit: usize,
    ) -> Result<Vec<MaskedLeaderboardEntry>> {
        Ok(mask(self.top_entries(grouping, limit).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{constants::LEADERBOARD_LIMIT, db::test_database};
    use chrono::{Duration, TimeZone};

    fn event(id: i64, username: &str, score: i64, wallet: Option<&str>, minute: i64) -> ScoreEvent {
        ScoreEvent {
            id,
            username: username.to_string(),
            score,
            wallet_address: wallet.map(str::to_string),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()
                + Duration::minutes(minute),
        }
    }

    #[test]
    fn groups_by_username_and_wallet() {
        let events = vec![
            event(1, "Alice", 10, Some("0xaaaa1111"), 0),
            event(2, "Alice", 5, Some("0xaaaa1111"), 5),
            event(3, "Alice", 7, Some("0xbbbb2222"), 1),
            event(4, "Alice", 1, None, 2),
        ];

        let entries = rank(&events, Grouping::UsernameAndWallet, LEADERBOARD_LIMIT).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].aggregate_score, 15);
        assert_eq!(entries[0].wallet_address.as_deref(), Some("0xaaaa1111"));
        assert_eq!(entries[0].most_recent_timestamp, events[1].timestamp);
        assert_eq!(entries[1].aggregate_score, 7);
        assert_eq!(entries[2].wallet_address, None);
    }

    #[test]
    fn groups_by_username_only() {
        let events = vec![
            event(1, "Alice", 10, Some("0xaaaa1111"), 0),
            event(2, "Alice", 7, Some("0xbbbb2222"), 9),
            event(3, "Alice", 1, None, 10),
            event(4, "Bob", 3, None, 1),
        ];

        let entries = rank(&events, Grouping::Username, LEADERBOARD_LIMIT).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].username, "Alice");
        assert_eq!(entries[0].aggregate_score, 18);
        assert_eq!(entries[0].wallet_address.as_deref(), Some("0xbbbb2222"));
        assert_eq!(entries[0].most_recent_timestamp, events[2].timestamp);
        assert_eq!(entries[1].username, "Bob");
    }

    #[test]
    fn ranking_is_non_increasing_and_truncated() {
        let events: Vec<ScoreEvent> = (0..25)
            .map(|i| event(i, &format!("p{}", i), (i * 7) % 11, None, i))
            .collect();

        let entries = rank(&events, Grouping::UsernameAndWallet, LEADERBOARD_LIMIT).unwrap();
        assert_eq!(entries.len(), LEADERBOARD_LIMIT);
        assert!(entries
            .windows(2)
            .all(|pair| pair[0].aggregate_score >= pair[1].aggregate_score));
    }

    #[test]
    fn ties_keep_first_appearance_order() {
        let events = vec![
            event(1, "first", 5, None, 0),
            event(2, "second", 5, None, 1),
            event(3, "third", 5, None, 2),
        ];

        let names: Vec<String> = rank(&events, Grouping::Username, 10)
            .unwrap()
            .into_iter()
            .map(|entry| entry.username)
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn masked_wallets_are_four_characters_or_none() {
        let events = vec![
            event(1, "Alice", 10, Some("0x52908400098527886e0f7030069857d2e4169ee7"), 0),
            event(2, "Bob", 3, None, 1),
        ];

        let masked = mask(rank(&events, Grouping::Username, 10).unwrap());
        assert_eq!(masked[0].wallet_suffix.as_deref(), Some("9ee7"));
        assert_eq!(masked[0].aggregate_score, 10);
        assert_eq!(masked[1].wallet_suffix, None);
    }

    #[test]
    fn username_grouping_shows_latest_wallet_even_out_of_order() {
        // a wallet-less event at minute 20 must not hide the newer wallet at minute 10
        let events = vec![
            event(1, "Alice", 1, Some("0xold00001"), 0),
            event(2, "Alice", 1, None, 20),
            event(3, "Alice", 1, Some("0xnew00002"), 10),
            event(4, "Alice", 1, Some("0xlate0003"), 5),
        ];

        let entries = rank(&events, Grouping::Username, LEADERBOARD_LIMIT).unwrap();
        assert_eq!(entries[0].wallet_address.as_deref(), Some("0xnew00002"));
        assert_eq!(entries[0].most_recent_timestamp, events[1].timestamp);
    }

    #[test]
    fn overflowing_total_is_an_error() {
        let events = vec![
            event(1, "A", i64::MAX / 2 + 1, None, 0),
            event(2, "A", i64::MAX / 2 + 1, None, 1),
        ];

        let result = rank(&events, Grouping::Username, LEADERBOARD_LIMIT);
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn aggregator_reads_from_store() {
        let db = test_database().await;
        db.append_score("Alice", 10, Some("0xabcd1234")).await.unwrap();
        db.append_score("Bob", 30, None).await.unwrap();
        db.append_score("Alice", 25, Some("0xabcd1234")).await.unwrap();

        let aggregator = LeaderboardAggregator::new(db);
        let entries = aggregator
            .top_entries(Grouping::UsernameAndWallet, LEADERBOARD_LIMIT)
            .await
            .unwrap();
        assert_eq!(entries[0].username, "Alice");
        assert_eq!(entries[0].aggregate_score, 35);
        assert_eq!(entries[1].username, "Bob");

        let masked = aggregator
            .top_entries_masked(Grouping::Username, 1)
            .await
            .unwrap();
        assert_eq!(masked.len(), 1);
        assert_eq!(masked[0].wallet_suffix.as_deref(), Some("1234"));
    }

    #[tokio::test]
    async fn empty_store_gives_empty_leaderboard() {
        let aggregator = LeaderboardAggregator::new(test_database().await);
        let entries = aggregator
            .top_entries(Grouping::Username, LEADERBOARD_LIMIT)
            .await
            .unwrap();
        assert!(entries.is_empty());
    }
}
