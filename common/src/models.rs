use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Grid coordinates, row-major with (0, 0) in the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameParams {
    pub rows: usize,
    pub cols: usize,
    pub mines: usize,
}

impl GameParams {
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Number of non-mine cells, which is also the reveal target for a win.
    pub fn safe_cell_count(&self) -> usize {
        self.cell_count().saturating_sub(self.mines)
    }
}

impl Default for GameParams {
    fn default() -> Self {
        Difficulty::Beginner.params()
    }
}

/// Board presets with their scoring weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Expert,
    Custom,
}

impl Difficulty {
    pub fn params(self) -> GameParams {
        let (rows, cols, mines) = match self {
            Self::Beginner => (9, 9, 10),
            Self::Intermediate => (16, 16, 40),
            Self::Expert => (16, 30, 99),
            Self::Custom => (12, 12, 20),
        };
        GameParams { rows, cols, mines }
    }

    /// Classify arbitrary parameters: exact preset dimensions map back to
    /// their preset, everything else counts as a custom board.
    pub fn from_params(params: &GameParams) -> Self {
        [Self::Beginner, Self::Intermediate, Self::Expert]
            .into_iter()
            .find(|difficulty| difficulty.params() == *params)
            .unwrap_or(Self::Custom)
    }

    pub fn multiplier(self) -> u32 {
        match self {
            Self::Beginner | Self::Custom => 1,
            Self::Intermediate => 2,
            Self::Expert => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Expert => "expert",
            Self::Custom => "custom",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "expert" => Some(Self::Expert),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }
}

/// A cell as the presentation layer is allowed to see it. Unrevealed mines
/// stay hidden until the game is over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state")]
pub enum CellView {
    #[serde(rename = "hidden")]
    Hidden,
    #[serde(rename = "flagged")]
    Flagged,
    #[serde(rename = "revealed")]
    Revealed { adjacent: u8 },
    #[serde(rename = "mine")]
    Mine,
}

/// One finished game as stored on the leaderboard. `id` and `timestamp` are
/// assigned by the store on insert and absent on submission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub player_name: String,
    pub score: u32,
    pub elapsed_seconds: u64,
    pub rows: usize,
    pub cols: usize,
    pub mine_count: usize,
    pub difficulty: Difficulty,
    pub won: bool,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}
