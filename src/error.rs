use minesweeper_common::models::Pos;
use thiserror::Error;

/// Rejections from board construction and board operations.
///
/// Everything else a player can do (clicking a revealed cell, chording with
/// the wrong number of flags, acting after the game ended) is a no-op, not
/// an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("position {pos} is outside the {width}x{height} board")]
    InvalidCoordinate {
        pos: Pos,
        width: usize,
        height: usize,
    },
    #[error("cannot place {mines} mines on a {width}x{height} board")]
    InvalidConfiguration {
        width: usize,
        height: usize,
        mines: usize,
    },
}

pub type Result<T> = std::result::Result<T, BoardError>;
