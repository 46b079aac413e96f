use minefield_common::{
    models::{CellView, Difficulty, GameParams, Pos, ScoreRecord},
    protocol::{GameEvent, RevealedCell},
};
use tracing::{debug, info, instrument, warn};

use crate::{board::Board, error::EngineError};

/// Cells blocked out around the first action so it can never lose.
const SAFE_ZONE_CELLS: usize = 9;

const SCORE_PER_SAFE_CELL: usize = 50;
const SCORE_PAR_SECONDS: f64 = 300.0;

/// Coarse lifecycle state of one game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Running,
    Won,
    Lost,
}

impl Phase {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// One single-player game: a board plus its session state. Construct a fresh
/// session for every new game or difficulty change; nothing is reused.
#[derive(Debug)]
pub struct GameSession {
    board: Board,
    params: GameParams,
    difficulty: Difficulty,
    phase: Phase,
    revealed_safe: usize,
    flag_count: usize,
    elapsed_seconds: u64,
    mines_placed: bool,
    triggered_mine: Option<Pos>,
    score: Option<u32>,
}

impl GameSession {
    #[instrument(level = "trace")]
    pub fn new(params: GameParams) -> Result<Self, EngineError> {
        if params.rows == 0 || params.cols == 0 {
            return Err(EngineError::EmptyBoard);
        }

        let placeable = params.cell_count().saturating_sub(SAFE_ZONE_CELLS);
        if params.mines > placeable {
            return Err(EngineError::InvalidMineCount {
                mines: params.mines,
                rows: params.rows,
                cols: params.cols,
                max: placeable,
            });
        }

        info!(
            "Creating new game: {}x{} with {} mines",
            params.rows, params.cols, params.mines
        );
        Ok(Self {
            board: Board::new(params.rows, params.cols),
            difficulty: Difficulty::from_params(&params),
            params,
            phase: Phase::NotStarted,
            revealed_safe: 0,
            flag_count: 0,
            elapsed_seconds: 0,
            mines_placed: false,
            triggered_mine: None,
            score: None,
        })
    }

    pub fn with_difficulty(difficulty: Difficulty) -> Result<Self, EngineError> {
        let mut session = Self::new(difficulty.params())?;
        session.difficulty = difficulty;
        Ok(session)
    }

    pub fn params(&self) -> GameParams {
        self.params
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn revealed_safe_count(&self) -> usize {
        self.revealed_safe
    }

    pub fn flag_count(&self) -> usize {
        self.flag_count
    }

    /// Remaining mine counter for display. Goes negative when the player has
    /// placed more flags than there are mines.
    pub fn mines_remaining(&self) -> i64 {
        self.params.mines as i64 - self.flag_count as i64
    }

    /// The mine that ended the game, if it was lost.
    pub fn triggered_mine(&self) -> Option<Pos> {
        self.triggered_mine
    }

    /// Final score: set once when the game ends, 0 for a loss.
    pub fn score(&self) -> Option<u32> {
        self.score
    }

    pub fn cell_view(&self, pos: Pos) -> Result<CellView, EngineError> {
        self.ensure_in_bounds(pos)?;
        let cell = self.board.cell(pos);
        Ok(if cell.revealed && cell.mine {
            CellView::Mine
        } else if cell.revealed {
            CellView::Revealed {
                adjacent: cell.adjacent,
            }
        } else if cell.flagged {
            CellView::Flagged
        } else {
            CellView::Hidden
        })
    }

    /// Reveal a cell. Returns the resulting event batch: a single reveal, a
    /// cascade over a zero region, or a mine hit, plus the terminal event if
    /// this reveal ended the game.
    #[instrument(level = "trace", skip(self), fields(row = pos.row, col = pos.col))]
    pub fn reveal(&mut self, pos: Pos) -> Result<Vec<GameEvent>, EngineError> {
        self.ensure_in_bounds(pos)?;

        if self.phase.is_terminal() {
            debug!(
                "Ignoring reveal on finished game at ({}, {})",
                pos.row, pos.col
            );
            return Ok(Vec::new());
        }

        {
            let cell = self.board.cell(pos);
            if cell.revealed || cell.flagged {
                debug!(
                    "Ignoring reveal on already revealed or flagged cell ({}, {})",
                    pos.row, pos.col
                );
                return Ok(Vec::new());
            }
        }

        self.ensure_mines_placed(pos);

        if self.board.cell(pos).mine {
            self.board.cell_mut(pos).revealed = true;
            self.triggered_mine = Some(pos);
            self.phase = Phase::Lost;
            self.score = Some(0);
            self.board.reveal_all_mines();
            warn!("Mine hit at ({}, {}) - game over", pos.row, pos.col);
            return Ok(vec![
                GameEvent::CellRevealed {
                    pos,
                    is_mine: true,
                    adjacent: 0,
                },
                GameEvent::GameLost { trigger: pos },
            ]);
        }

        let revealed = self.reveal_flood(pos);
        debug!(
            "Revealed {} cells from ({}, {})",
            revealed.len(),
            pos.row,
            pos.col
        );

        let mut events = Vec::new();
        if revealed.len() == 1 {
            let cell = revealed[0];
            events.push(GameEvent::CellRevealed {
                pos: cell.pos,
                is_mine: false,
                adjacent: cell.adjacent,
            });
        } else {
            events.push(GameEvent::CascadeRevealed { cells: revealed });
        }

        if self.revealed_safe == self.params.safe_cell_count() {
            self.phase = Phase::Won;
            let score = self.compute_score();
            self.score = Some(score);
            info!(
                "Game won with score {} after {}s",
                score, self.elapsed_seconds
            );
            events.push(GameEvent::GameWon {
                score,
                elapsed_seconds: self.elapsed_seconds,
            });
        }

        Ok(events)
    }

    /// Toggle the flag on an unrevealed cell. As the session's first action
    /// this also triggers mine placement, with the flagged cell as the safe
    /// center.
    #[instrument(level = "trace", skip(self), fields(row = pos.row, col = pos.col))]
    pub fn toggle_flag(&mut self, pos: Pos) -> Result<Vec<GameEvent>, EngineError> {
        self.ensure_in_bounds(pos)?;

        if self.phase.is_terminal() {
            debug!(
                "Ignoring flag on finished game at ({}, {})",
                pos.row, pos.col
            );
            return Ok(Vec::new());
        }

        if self.board.cell(pos).revealed {
            debug!("Ignoring flag on revealed cell ({}, {})", pos.row, pos.col);
            return Ok(Vec::new());
        }

        self.ensure_mines_placed(pos);

        let cell = self.board.cell_mut(pos);
        cell.flagged = !cell.flagged;
        let flagged = cell.flagged;
        if flagged {
            self.flag_count += 1;
        } else {
            self.flag_count -= 1;
        }
        debug!(
            "Cell ({}, {}) {}",
            pos.row,
            pos.col,
            if flagged { "flagged" } else { "unflagged" }
        );

        Ok(vec![GameEvent::FlagToggled {
            pos,
            flagged,
            mines_remaining: self.mines_remaining(),
        }])
    }

    /// Advance the clock by one second. Driven by an external timer; only
    /// counts while the game is running.
    pub fn tick(&mut self) -> u64 {
        if self.phase == Phase::Running {
            self.elapsed_seconds += 1;
        }
        self.elapsed_seconds
    }

    /// Build the leaderboard submission for a finished game.
    pub fn score_record(&self, player_name: &str) -> Option<ScoreRecord> {
        if !self.phase.is_terminal() {
            return None;
        }
        Some(ScoreRecord {
            id: None,
            player_name: player_name.to_string(),
            score: self.score.unwrap_or(0),
            elapsed_seconds: self.elapsed_seconds,
            rows: self.params.rows,
            cols: self.params.cols,
            mine_count: self.params.mines,
            difficulty: self.difficulty,
            won: self.phase == Phase::Won,
            timestamp: None,
        })
    }

    fn ensure_in_bounds(&self, pos: Pos) -> Result<(), EngineError> {
        if self.board.contains(pos) {
            Ok(())
        } else {
            warn!(
                "Position ({}, {}) is outside the {}x{} board",
                pos.row,
                pos.col,
                self.board.rows(),
                self.board.cols()
            );
            Err(EngineError::OutOfBounds {
                row: pos.row,
                col: pos.col,
                rows: self.board.rows(),
                cols: self.board.cols(),
            })
        }
    }

    fn ensure_mines_placed(&mut self, safe: Pos) {
        if self.mines_placed {
            return;
        }
        self.board
            .place_mines(self.params.mines, safe, &mut rand::rng());
        self.mines_placed = true;
        self.phase = Phase::Running;
        info!(
            "Placed {} mines around safe cell ({}, {})",
            self.params.mines, safe.row, safe.col
        );
    }

    /// Open `origin` and, if it has no mine neighbors, its whole connected
    /// zero region plus the numbered border. Iterative worklist; the
    /// `revealed` flag doubles as the visited marker.
    fn reveal_flood(&mut self, origin: Pos) -> Vec<RevealedCell> {
        let mut revealed = Vec::new();
        let mut frontier = vec![origin];

        while let Some(pos) = frontier.pop() {
            {
                let cell = self.board.cell(pos);
                if cell.revealed || cell.flagged {
                    continue;
                }
            }

            let cell = self.board.cell_mut(pos);
            cell.revealed = true;
            let adjacent = cell.adjacent;
            self.revealed_safe += 1;
            revealed.push(RevealedCell { pos, adjacent });

            if adjacent == 0 {
                let board = &self.board;
                frontier.extend(board.neighbors(pos).filter(|&neighbor| {
                    let cell = board.cell(neighbor);
                    !cell.revealed && !cell.flagged
                }));
            }
        }

        revealed
    }

    fn compute_score(&self) -> u32 {
        let base = (self.params.safe_cell_count() * SCORE_PER_SAFE_CELL) as f64;
        let multiplier = self.difficulty.multiplier() as f64;
        let time_factor =
            (1.0 + (SCORE_PAR_SECONDS - self.elapsed_seconds as f64) / SCORE_PAR_SECONDS).max(1.0);
        (base * multiplier * time_factor).round() as u32
    }

    #[cfg(test)]
    fn with_mines(params: GameParams, mines: &[Pos]) -> Self {
        assert_eq!(params.mines, mines.len());
        let mut board = Board::new(params.rows, params.cols);
        board.place_mines_at(mines);
        Self {
            board,
            difficulty: Difficulty::from_params(&params),
            params,
            phase: Phase::Running,
            revealed_safe: 0,
            flag_count: 0,
            elapsed_seconds: 0,
            mines_placed: true,
            triggered_mine: None,
            score: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: usize, col: usize) -> Pos {
        Pos { row, col }
    }

    fn params(rows: usize, cols: usize, mines: usize) -> GameParams {
        GameParams { rows, cols, mines }
    }

    /// 9x9 beginner board with a full mine column down the middle plus one
    /// corner mine: two separate zero regions, so no single cascade wins.
    fn beginner_session() -> GameSession {
        let mut mines: Vec<Pos> = (0..9).map(|row| pos(row, 4)).collect();
        mines.push(pos(0, 0));
        GameSession::with_mines(params(9, 9, 10), &mines)
    }

    fn reveal_all_safe(session: &mut GameSession) {
        for row in 0..session.params().rows {
            for col in 0..session.params().cols {
                let p = pos(row, col);
                if !session.board.cell(p).mine {
                    session.reveal(p).unwrap();
                }
            }
        }
    }

    #[test]
    fn session_rejects_impossible_mine_counts() {
        // A 9x9 board keeps 72 cells once the safe zone is excluded.
        assert!(GameSession::new(params(9, 9, 72)).is_ok());
        assert_eq!(
            GameSession::new(params(9, 9, 73)).unwrap_err(),
            EngineError::InvalidMineCount {
                mines: 73,
                rows: 9,
                cols: 9,
                max: 72,
            }
        );
        assert_eq!(
            GameSession::new(params(3, 3, 1)).unwrap_err(),
            EngineError::InvalidMineCount {
                mines: 1,
                rows: 3,
                cols: 3,
                max: 0,
            }
        );
        assert_eq!(
            GameSession::new(params(0, 9, 0)).unwrap_err(),
            EngineError::EmptyBoard
        );
    }

    #[test]
    fn out_of_bounds_actions_are_errors() {
        let mut session = GameSession::new(params(9, 9, 10)).unwrap();
        let outside = pos(9, 0);

        assert!(matches!(
            session.reveal(outside),
            Err(EngineError::OutOfBounds { .. })
        ));
        assert!(matches!(
            session.toggle_flag(outside),
            Err(EngineError::OutOfBounds { .. })
        ));
        assert!(matches!(
            session.cell_view(outside),
            Err(EngineError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn first_reveal_places_mines_outside_the_safe_neighborhood() {
        for _ in 0..25 {
            let mut session = GameSession::new(params(9, 9, 10)).unwrap();
            assert_eq!(session.phase(), Phase::NotStarted);

            session.reveal(pos(4, 4)).unwrap();
            assert_ne!(session.phase(), Phase::Lost);

            for row in 3..=5 {
                for col in 3..=5 {
                    assert!(
                        !session.board.cell(pos(row, col)).mine,
                        "mine at ({row}, {col}) inside the safe zone"
                    );
                }
            }
        }
    }

    #[test]
    fn first_flag_places_mines_and_leaves_the_cell_flagged() {
        let mut session = GameSession::new(params(9, 9, 10)).unwrap();

        let events = session.toggle_flag(pos(0, 0)).unwrap();
        assert_eq!(
            events,
            vec![GameEvent::FlagToggled {
                pos: pos(0, 0),
                flagged: true,
                mines_remaining: 9,
            }]
        );
        assert_eq!(session.phase(), Phase::Running);

        for row in 0..2 {
            for col in 0..2 {
                assert!(!session.board.cell(pos(row, col)).mine);
            }
        }
        assert_eq!(session.cell_view(pos(0, 0)).unwrap(), CellView::Flagged);
        assert_eq!(session.revealed_safe_count(), 0);

        // The flag also blocks reveals until it is removed.
        assert!(session.reveal(pos(0, 0)).unwrap().is_empty());
        session.toggle_flag(pos(0, 0)).unwrap();
        let events = session.reveal(pos(0, 0)).unwrap();
        assert!(!events.is_empty());
    }

    #[test]
    fn flag_round_trip_restores_counters() {
        let mut session = GameSession::new(params(9, 9, 10)).unwrap();

        session.toggle_flag(pos(2, 3)).unwrap();
        assert_eq!(session.flag_count(), 1);
        assert_eq!(session.mines_remaining(), 9);

        session.toggle_flag(pos(2, 3)).unwrap();
        assert_eq!(session.flag_count(), 0);
        assert_eq!(session.mines_remaining(), 10);
    }

    #[test]
    fn over_flagging_drives_the_counter_negative() {
        let mut session = beginner_session();
        for col in 0..12 {
            session.toggle_flag(pos(col / 9, col % 9)).unwrap();
        }
        assert_eq!(session.mines_remaining(), -2);
    }

    #[test]
    fn revealing_a_numbered_cell_does_not_cascade() {
        let mut session = GameSession::with_mines(params(3, 3, 1), &[pos(1, 1)]);

        let events = session.reveal(pos(0, 0)).unwrap();
        assert_eq!(
            events,
            vec![GameEvent::CellRevealed {
                pos: pos(0, 0),
                is_mine: false,
                adjacent: 1,
            }]
        );
        assert_eq!(session.revealed_safe_count(), 1);
        assert_eq!(session.cell_view(pos(0, 1)).unwrap(), CellView::Hidden);
    }

    #[test]
    fn zero_reveal_opens_the_region_and_its_numbered_border_only() {
        // Row of seven with a single mine in the middle: two zero regions
        // separated by the numbered cells around the mine.
        let mut session = GameSession::with_mines(params(1, 7, 1), &[pos(0, 3)]);

        let events = session.reveal(pos(0, 0)).unwrap();
        let [GameEvent::CascadeRevealed { cells }] = events.as_slice() else {
            panic!("expected a single cascade event, got {events:?}");
        };

        let mut opened: Vec<usize> = cells.iter().map(|cell| cell.pos.col).collect();
        opened.sort_unstable();
        assert_eq!(opened, vec![0, 1, 2]);

        assert_eq!(session.cell_view(pos(0, 4)).unwrap(), CellView::Hidden);
        assert_eq!(session.cell_view(pos(0, 5)).unwrap(), CellView::Hidden);
        assert_eq!(session.cell_view(pos(0, 6)).unwrap(), CellView::Hidden);
        assert_eq!(session.phase(), Phase::Running);
    }

    #[test]
    fn cascade_stops_at_flagged_cells() {
        let mut session = GameSession::with_mines(params(1, 7, 1), &[pos(0, 6)]);

        session.toggle_flag(pos(0, 2)).unwrap();
        session.reveal(pos(0, 0)).unwrap();

        assert_eq!(session.cell_view(pos(0, 2)).unwrap(), CellView::Flagged);
        assert_eq!(session.cell_view(pos(0, 3)).unwrap(), CellView::Hidden);
        assert_eq!(session.cell_view(pos(0, 4)).unwrap(), CellView::Hidden);
    }

    #[test]
    fn win_exactly_when_all_safe_cells_are_revealed() {
        let mut session = beginner_session();

        session.reveal(pos(4, 0)).unwrap();
        assert!(session.revealed_safe_count() < session.params().safe_cell_count());
        assert_eq!(session.phase(), Phase::Running);

        reveal_all_safe(&mut session);
        assert_eq!(session.revealed_safe_count(), 71);
        assert_eq!(session.phase(), Phase::Won);
    }

    #[test]
    fn win_event_carries_the_score() {
        let mut session = beginner_session();
        let mut won_events = Vec::new();
        for row in 0..9 {
            for col in 0..9 {
                let p = pos(row, col);
                if !session.board.cell(p).mine {
                    won_events.extend(
                        session
                            .reveal(p)
                            .unwrap()
                            .into_iter()
                            .filter(|event| matches!(event, GameEvent::GameWon { .. })),
                    );
                }
            }
        }

        assert_eq!(
            won_events,
            vec![GameEvent::GameWon {
                score: 7100,
                elapsed_seconds: 0,
            }]
        );
    }

    #[test]
    fn instant_beginner_win_scores_7100() {
        let mut session = beginner_session();
        reveal_all_safe(&mut session);

        assert_eq!(session.phase(), Phase::Won);
        assert_eq!(session.score(), Some(7100));
    }

    #[test]
    fn slow_beginner_win_scores_3550() {
        let mut session = beginner_session();
        session.reveal(pos(0, 8)).unwrap();
        for _ in 0..300 {
            session.tick();
        }
        reveal_all_safe(&mut session);

        assert_eq!(session.phase(), Phase::Won);
        assert_eq!(session.elapsed_seconds(), 300);
        assert_eq!(session.score(), Some(3550));
    }

    #[test]
    fn mine_hit_loses_and_reveals_every_mine() {
        let mut session = beginner_session();
        session.reveal(pos(4, 0)).unwrap();
        let safe_revealed = session.revealed_safe_count();

        let events = session.reveal(pos(4, 4)).unwrap();
        assert_eq!(
            events,
            vec![
                GameEvent::CellRevealed {
                    pos: pos(4, 4),
                    is_mine: true,
                    adjacent: 0,
                },
                GameEvent::GameLost {
                    trigger: pos(4, 4),
                },
            ]
        );

        assert_eq!(session.phase(), Phase::Lost);
        assert_eq!(session.triggered_mine(), Some(pos(4, 4)));
        assert_eq!(session.score(), Some(0));
        assert_eq!(session.revealed_safe_count(), safe_revealed);
        for row in 0..9 {
            for col in 0..9 {
                let p = pos(row, col);
                if session.board.cell(p).mine {
                    assert_eq!(session.cell_view(p).unwrap(), CellView::Mine);
                }
            }
        }
    }

    #[test]
    fn terminal_phase_ignores_further_actions() {
        let mut session = beginner_session();
        session.reveal(pos(4, 4)).unwrap();
        assert_eq!(session.phase(), Phase::Lost);

        let revealed_before = session.revealed_safe_count();
        assert!(session.reveal(pos(4, 0)).unwrap().is_empty());
        assert!(session.toggle_flag(pos(4, 0)).unwrap().is_empty());
        assert_eq!(session.revealed_safe_count(), revealed_before);
        assert_eq!(session.flag_count(), 0);
        assert_eq!(session.tick(), 0);
    }

    #[test]
    fn tick_only_counts_while_running() {
        let mut session = GameSession::new(params(9, 9, 10)).unwrap();
        assert_eq!(session.tick(), 0);

        session.reveal(pos(4, 4)).unwrap();
        if session.phase() == Phase::Running {
            assert_eq!(session.tick(), 1);
            assert_eq!(session.tick(), 2);
        }
    }

    #[test]
    fn score_record_reports_the_outcome() {
        let mut session = beginner_session();
        assert_eq!(session.score_record("ada"), None);

        session.reveal(pos(4, 4)).unwrap();
        let record = session.score_record("ada").unwrap();
        assert_eq!(record.player_name, "ada");
        assert_eq!(record.score, 0);
        assert!(!record.won);
        assert_eq!(record.difficulty, Difficulty::Beginner);
        assert_eq!(record.rows, 9);
        assert_eq!(record.mine_count, 10);
        assert!(record.timestamp.is_none());
    }

    #[test]
    fn flagging_a_revealed_cell_is_ignored() {
        let mut session = GameSession::with_mines(params(3, 3, 1), &[pos(1, 1)]);
        session.reveal(pos(0, 0)).unwrap();

        assert!(session.toggle_flag(pos(0, 0)).unwrap().is_empty());
        assert_eq!(session.flag_count(), 0);
        assert_eq!(
            session.cell_view(pos(0, 0)).unwrap(),
            CellView::Revealed { adjacent: 1 }
        );
    }
}
