use chrono::{DateTime, Utc};

pub const DEFAULT_PLAYER_NAME: &str = "PacFan";
pub const DEFAULT_SCORE: i32 = 0;
pub const DEFAULT_LEVEL: i32 = 1;
pub const PLAYER_NAME_MAX_CHARS: usize = 50;

/// A stored leaderboard entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighScore {
    pub id: i64,
    pub player_name: String,
    pub score: i32,
    pub level: i32,
    pub timestamp: DateTime<Utc>,
}

/// Validated input for a new entry. `id` and `timestamp` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHighScore {
    pub player_name: String,
    pub score: i32,
    pub level: i32,
}

impl std::fmt::Display for HighScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} (Level {})", self.player_name, self.score, self.level)
    }
}
