use serde::{Deserialize, Serialize};

use crate::models::{Difficulty, Pos};

/// A single cell opened during a reveal, with its mine-neighbor count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealedCell {
    pub pos: Pos,
    pub adjacent: u8,
}

/// Events produced by the engine for the presentation layer. Every engine
/// operation returns the full batch it caused, in order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    #[serde(rename = "cell_revealed")]
    CellRevealed {
        pos: Pos,
        is_mine: bool,
        adjacent: u8,
    },
    #[serde(rename = "cascade_revealed")]
    CascadeRevealed { cells: Vec<RevealedCell> },
    #[serde(rename = "flag_toggled")]
    FlagToggled {
        pos: Pos,
        flagged: bool,
        mines_remaining: i64,
    },
    #[serde(rename = "game_won")]
    GameWon { score: u32, elapsed_seconds: u64 },
    #[serde(rename = "game_lost")]
    GameLost { trigger: Pos },
}

/// Sort order for leaderboard queries. Score is the default; time ascending
/// matches the original per-difficulty speed boards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Score,
    Time,
}

impl SortOrder {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "score" => Some(Self::Score),
            "time" => Some(Self::Time),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: usize,
    pub difficulty: Option<Difficulty>,
    pub order: SortOrder,
}

impl Default for LeaderboardQuery {
    fn default() -> Self {
        Self {
            limit: 10,
            difficulty: None,
            order: SortOrder::Score,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
}
