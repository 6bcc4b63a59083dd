use serde::Serialize;

/// Derived ranking row, never persisted. Rank is implicit: the position in a
/// sequence ordered by total descending, ties broken by first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub total: i64,
}

impl LeaderboardEntry {
    pub fn new(username: impl Into<String>, total: i64) -> Self {
        Self {
            username: username.into(),
            total,
        }
    }
}
