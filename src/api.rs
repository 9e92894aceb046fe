use crate::model::HighScore;
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

/// Wire form of a [`HighScore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreDto {
    pub id: i64,
    pub player_name: String,
    pub score: i32,
    pub level: i32,
    pub timestamp: String,
}

impl From<HighScore> for ScoreDto {
    fn from(record: HighScore) -> Self {
        ScoreDto {
            id: record.id,
            player_name: record.player_name,
            score: record.score,
            level: record.level,
            timestamp: record.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DetailResponse {
    pub detail: String,
}

impl DetailResponse {
    pub fn new(msg: &str) -> Self {
        DetailResponse {
            detail: msg.to_owned(),
        }
    }
}
