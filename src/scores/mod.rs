//! Scores Module
//!
//! The leaderboard resource: submitting a score and listing the best ones.
//!
//! - [`gateway::ScoreGateway`] validates submissions and maps stored records to
//!   their wire form.
//! - [`routes`] mounts `GET` and `POST` on `/api/scores/`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use highscores::scores;
//!
//! let app = Router::new()
//!     .merge(scores::routes())
//!     .with_state(app_state);
//! ```

pub mod gateway;
mod handler;
mod routes;

pub use gateway::{ScoreGateway, TOP_SCORES_LIMIT};
pub use routes::routes;
