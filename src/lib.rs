//! Minesweeper board state machine.
//!
//! [`Board`] owns the grid and implements every rule of the game: lazy mine
//! placement that keeps the first revealed cell safe, neighbor counting,
//! flood-fill reveal, flagging, chording and win/loss detection. Drawing,
//! input devices and persistence stay outside; they talk to the board through
//! the view and command types of `minesweeper-common`.
//!
//! ```rust
//! use minesweeper_board::{Board, GameParams, Pos, Status};
//!
//! let mut board = Board::new(GameParams { width: 9, height: 9, mines: 10 })?;
//! board.reveal(Pos { x: 4, y: 4 })?;
//! assert_ne!(board.status(), Status::Lost);
//! # Ok::<(), minesweeper_board::BoardError>(())
//! ```

pub mod clock;
pub mod config;
pub mod data;
pub mod error;
pub mod logic;
pub mod results;
pub mod session;

pub use error::{BoardError, Result};
pub use logic::Board;
pub use session::{Game, SharedGame};

// Re-export common types for convenience
pub use minesweeper_common::{models::*, protocol::*};
