use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use libsql::Row;

use crate::db::Database;
use crate::error::StoreError;
use crate::model::{HighScore, NewHighScore};

/// Persistence for [`HighScore`] records.
///
/// Implementations assign `id` and `timestamp` on insert and always rank
/// `query_top` results by score, then timestamp, then id, all descending.
pub trait ScoreStore: Send + Sync + 'static {
    fn insert(&self, new: NewHighScore) -> impl Future<Output = Result<HighScore, StoreError>> + Send;

    fn query_top(&self, limit: u32) -> impl Future<Output = Result<Vec<HighScore>, StoreError>> + Send;

    fn count(&self) -> impl Future<Output = Result<u64, StoreError>> + Send;
}

pub struct LibsqlScoreStore {
    db: Arc<Database>,
}

impl LibsqlScoreStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn row_to_high_score(row: &Row) -> Result<HighScore, StoreError> {
        let raw_timestamp: String = row.get(4)?;
        let timestamp = DateTime::parse_from_rfc3339(&raw_timestamp)
            .map_err(|e| StoreError::Decode(format!("timestamp {:?}: {}", raw_timestamp, e)))?
            .with_timezone(&Utc);

        Ok(HighScore {
            id: row.get(0)?,
            player_name: row.get(1)?,
            score: row.get(2)?,
            level: row.get(3)?,
            timestamp,
        })
    }
}

/// Fixed-width UTC text, so lexical order in SQL equals chronological order.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl ScoreStore for LibsqlScoreStore {
    async fn insert(&self, new: NewHighScore) -> Result<HighScore, StoreError> {
        let query = r#"
            INSERT INTO high_scores (player_name, score, level, timestamp)
            VALUES (?, ?, ?, ?)
            RETURNING id, player_name, score, level, timestamp
        "#;

        let timestamp = format_timestamp(&Utc::now());
        let mut rows = self
            .db
            .connection()
            .query(query, libsql::params![new.player_name, new.score, new.level, timestamp])
            .await?;

        match rows.next().await? {
            Some(row) => Self::row_to_high_score(&row),
            None => Err(StoreError::NoRowReturned),
        }
    }

    async fn query_top(&self, limit: u32) -> Result<Vec<HighScore>, StoreError> {
        let query = r#"
            SELECT id, player_name, score, level, timestamp
            FROM high_scores
            ORDER BY score DESC, timestamp DESC, id DESC
            LIMIT ?
        "#;

        let mut rows = self
            .db
            .connection()
            .query(query, libsql::params![limit as i64])
            .await?;

        let mut scores = Vec::new();
        while let Some(row) = rows.next().await? {
            scores.push(Self::row_to_high_score(&row)?);
        }
        Ok(scores)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let mut rows = self
            .db
            .connection()
            .query("SELECT COUNT(*) FROM high_scores", ())
            .await?;

        match rows.next().await? {
            Some(row) => Ok(row.get::<i64>(0)? as u64),
            None => Ok(0),
        }
    }
}
