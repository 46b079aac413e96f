//! Minefield Client Library
//!
//! This library drives single-player minefield games on top of the engine and
//! talks to the score leaderboard server over HTTP.
//!
//! ## Usage
//!
//! ### High-Level Interface (Recommended)
//!
//! The `MinefieldGame` struct owns the running session, keeps the one-second
//! clock ticking in the background and submits finished games to the
//! leaderboard fire-and-forget:
//!
//! ```rust,no_run
//! use minefield_client::{GameParams, MinefieldGame, Pos};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let game = MinefieldGame::with_leaderboard("ada", "http://localhost:8000")?;
//!
//!     // Start a new game
//!     let params = GameParams { rows: 9, cols: 9, mines: 10 };
//!     game.new_game(params).await?;
//!
//!     // Make moves
//!     game.reveal(Pos { row: 4, col: 4 }).await?;
//!     game.flag(Pos { row: 0, col: 0 }).await?;
//!
//!     // Check game state
//!     if let Some(phase) = game.phase().await {
//!         println!("Phase: {:?}", phase);
//!     }
//!
//!     game.abandon().await;
//!     Ok(())
//! }
//! ```
//!
//! ### Low-Level Interface
//!
//! For more control, drive a `GameSession` directly and use the
//! `LeaderboardClient` on its own:
//!
//! ```rust,no_run
//! use minefield_client::{GameParams, GameSession, LeaderboardClient, LeaderboardQuery, Pos};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let mut session = GameSession::new(GameParams::default())?;
//!     let events = session.reveal(Pos { row: 4, col: 4 })?;
//!     println!("First reveal produced {} events", events.len());
//!
//!     let leaderboard = LeaderboardClient::new("http://localhost:8000")?;
//!     if let Some(record) = session.score_record("ada") {
//!         leaderboard.submit(&record).await?;
//!     }
//!
//!     let top = leaderboard.top_scores(&LeaderboardQuery::default()).await?;
//!     println!("Top scores: {}", top.len());
//!     Ok(())
//! }
//! ```

mod client;
mod game;

pub use client::LeaderboardClient;
pub use game::MinefieldGame;

pub use minefield_engine::{EngineError, GameSession, Phase};

// Re-export common types for convenience
pub use minefield_common::{models::*, protocol::*};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;
