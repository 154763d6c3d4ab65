//! View and command types shared between the minesweeper board and the
//! front-ends that draw it and feed it input.

pub mod models;
pub mod protocol;
