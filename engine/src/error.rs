use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("position ({row}, {col}) is outside the {rows}x{cols} board")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    #[error(
        "{mines} mines do not fit a {rows}x{cols} board with a protected first move (max {max})"
    )]
    InvalidMineCount {
        mines: usize,
        rows: usize,
        cols: usize,
        max: usize,
    },
    #[error("board must have at least one row and one column")]
    EmptyBoard,
}
