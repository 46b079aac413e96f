//! Minefield Engine
//!
//! A pure, single-player minesweeper state machine. The engine owns one board
//! per [`GameSession`], defers mine placement until the first player action so
//! that the first move can never lose, and reports every state change as a
//! batch of [`GameEvent`]s for a presentation layer to render.
//!
//! ```rust
//! use minefield_engine::{GameParams, GameSession, Phase, Pos};
//!
//! fn main() -> Result<(), minefield_engine::EngineError> {
//!     let mut session = GameSession::new(GameParams::default())?;
//!
//!     // The first reveal places the mines around a guaranteed-safe center.
//!     let events = session.reveal(Pos { row: 4, col: 4 })?;
//!     assert!(!events.is_empty());
//!     assert_ne!(session.phase(), Phase::Lost);
//!
//!     // One tick per second while the game is running.
//!     session.tick();
//!     Ok(())
//! }
//! ```

mod board;
mod error;
mod session;

pub use error::EngineError;
pub use session::{GameSession, Phase};

// Re-export common types for convenience
pub use minefield_common::{models::*, protocol::*};
