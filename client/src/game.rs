use std::sync::Arc;

use minefield_common::{
    models::{CellView, Difficulty, GameParams, Pos},
    protocol::GameEvent,
};
use minefield_engine::{EngineError, GameSession, Phase};
use tokio::sync::{RwLock, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{self, Duration};
use tracing::{debug, info, warn};

use crate::{LeaderboardClient, Result};

/// The one-second clock driving a session. Owned by the game handle and
/// stopped on every terminal transition, on session replacement and on
/// abandon.
struct TickTask {
    handle: JoinHandle<()>,
}

impl TickTask {
    fn spawn(session: Arc<RwLock<Option<GameSession>>>) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = time::interval(Duration::from_secs(1));
            // The first tick of a tokio interval fires immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                let mut slot = session.write().await;
                match slot.as_mut() {
                    Some(session) if !session.is_finished() => {
                        session.tick();
                    }
                    _ => break,
                }
            }
        });
        Self { handle }
    }

    /// Abort the clock task and wait for it to finish
    async fn abort_and_wait(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }
}

/// High-level game handle that owns the running session, keeps its clock
/// ticking and reports finished games to the leaderboard
pub struct MinefieldGame {
    leaderboard: Option<LeaderboardClient>,
    player_name: String,
    session: Arc<RwLock<Option<GameSession>>>,
    ticker: Arc<RwLock<Option<TickTask>>>,
    event_sender: Arc<RwLock<Option<mpsc::UnboundedSender<GameEvent>>>>,
}

impl MinefieldGame {
    /// Create a game handle that plays offline, without score submission
    pub fn new(player_name: &str) -> Self {
        Self {
            leaderboard: None,
            player_name: player_name.to_string(),
            session: Arc::new(RwLock::new(None)),
            ticker: Arc::new(RwLock::new(None)),
            event_sender: Arc::new(RwLock::new(None)),
        }
    }

    /// Create a game handle that submits finished games to the leaderboard
    /// server at `server_url`
    pub fn with_leaderboard(player_name: &str, server_url: &str) -> Result<Self> {
        let mut game = Self::new(player_name);
        game.leaderboard = Some(LeaderboardClient::new(server_url)?);
        Ok(game)
    }

    /// Subscribe to game events. Returns a receiver for game events.
    pub async fn subscribe_to_events(&self) -> mpsc::UnboundedReceiver<GameEvent> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut event_sender = self.event_sender.write().await;
        *event_sender = Some(sender);
        receiver
    }

    /// Start a new game, discarding any session in progress
    pub async fn new_game(&self, params: GameParams) -> Result<()> {
        info!(
            "Starting new game: {}x{} with {} mines",
            params.rows, params.cols, params.mines
        );
        let session = GameSession::new(params)?;

        // Replace the session and its clock atomically.
        let mut ticker = self.ticker.write().await;
        if let Some(old) = ticker.take() {
            old.abort_and_wait().await;
        }
        *self.session.write().await = Some(session);
        *ticker = Some(TickTask::spawn(self.session.clone()));

        Ok(())
    }

    /// Start a new game on a preset difficulty
    pub async fn new_game_with_difficulty(&self, difficulty: Difficulty) -> Result<()> {
        self.new_game(difficulty.params()).await
    }

    /// Reveal a cell at the specified position
    pub async fn reveal(&self, pos: Pos) -> Result<Vec<GameEvent>> {
        debug!("Revealing cell at ({}, {})", pos.row, pos.col);
        self.apply(|session| session.reveal(pos)).await
    }

    /// Flag/unflag a cell at the specified position
    pub async fn flag(&self, pos: Pos) -> Result<Vec<GameEvent>> {
        debug!("Flagging cell at ({}, {})", pos.row, pos.col);
        self.apply(|session| session.toggle_flag(pos)).await
    }

    /// Get the current phase, if a game is active
    pub async fn phase(&self) -> Option<Phase> {
        self.session.read().await.as_ref().map(GameSession::phase)
    }

    pub async fn is_finished(&self) -> bool {
        self.session
            .read()
            .await
            .as_ref()
            .is_some_and(GameSession::is_finished)
    }

    pub async fn elapsed_seconds(&self) -> Option<u64> {
        self.session
            .read()
            .await
            .as_ref()
            .map(GameSession::elapsed_seconds)
    }

    pub async fn mines_remaining(&self) -> Option<i64> {
        self.session
            .read()
            .await
            .as_ref()
            .map(GameSession::mines_remaining)
    }

    /// Final score of the current game, once it has ended
    pub async fn score(&self) -> Option<u32> {
        self.session.read().await.as_ref().and_then(GameSession::score)
    }

    pub async fn cell_view(&self, pos: Pos) -> Option<CellView> {
        self.session
            .read()
            .await
            .as_ref()
            .and_then(|session| session.cell_view(pos).ok())
    }

    /// Snapshot of the whole board as the player is allowed to see it
    pub async fn board_view(&self) -> Option<Vec<Vec<CellView>>> {
        let slot = self.session.read().await;
        let session = slot.as_ref()?;
        let params = session.params();

        let mut board = Vec::with_capacity(params.rows);
        for row in 0..params.rows {
            let mut cells = Vec::with_capacity(params.cols);
            for col in 0..params.cols {
                cells.push(session.cell_view(Pos { row, col }).ok()?);
            }
            board.push(cells);
        }
        Some(board)
    }

    /// Drop the current session and stop its clock without submitting
    pub async fn abandon(&self) {
        let mut ticker = self.ticker.write().await;
        if let Some(old) = ticker.take() {
            old.abort_and_wait().await;
        }
        *self.session.write().await = None;
        *self.event_sender.write().await = None;
        info!("Abandoned current game");
    }

    /// Run one engine operation, then handle events and a possible game end
    async fn apply<F>(&self, op: F) -> Result<Vec<GameEvent>>
    where
        F: FnOnce(&mut GameSession) -> std::result::Result<Vec<GameEvent>, EngineError>,
    {
        let events = {
            let mut slot = self.session.write().await;
            let session = slot
                .as_mut()
                .ok_or("No active game. Call new_game() first.")?;
            op(session)?
        };

        let finished = events
            .iter()
            .any(|event| matches!(event, GameEvent::GameWon { .. } | GameEvent::GameLost { .. }));
        if finished {
            self.finish_game().await;
        }

        self.forward_events(&events).await;
        Ok(events)
    }

    /// Stop the clock and hand the result to the leaderboard. Submission is
    /// fire-and-forget: failures are logged and never reach the caller.
    async fn finish_game(&self) {
        let mut ticker = self.ticker.write().await;
        if let Some(old) = ticker.take() {
            old.abort_and_wait().await;
        }

        let record = self
            .session
            .read()
            .await
            .as_ref()
            .and_then(|session| session.score_record(&self.player_name));

        if let (Some(record), Some(client)) = (record, self.leaderboard.clone()) {
            tokio::spawn(async move {
                if let Err(e) = client.submit(&record).await {
                    warn!("Score submission failed: {}", e);
                }
            });
        }
    }

    async fn forward_events(&self, events: &[GameEvent]) {
        if events.is_empty() {
            return;
        }
        if let Some(sender) = self.event_sender.read().await.as_ref() {
            for event in events {
                let _ = sender.send(event.clone());
            }
        }
    }
}
