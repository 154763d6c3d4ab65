use std::sync::Arc;

use minesweeper_common::{
    models::{GameParams, Pos, Status},
    protocol::{Command, PointerAction, PointerButton, Snapshot},
};
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::{error::Result, logic::Board, results::ResultSink};

/// A game shared between the input loop and the clock task.
///
/// Every board operation mutates the grid without locking, so each one runs
/// under this mutex.
pub type SharedGame = Arc<Mutex<Game>>;

/// A board plus the host-side state around it: whether a pointer button is
/// held (for the face) and where finished games are reported.
pub struct Game {
    board: Board,
    pointer_down: bool,
    sink: Option<Box<dyn ResultSink>>,
}

impl Game {
    pub fn new(params: GameParams) -> Result<Self> {
        Ok(Self::from_board(Board::new(params)?))
    }

    pub fn from_board(board: Board) -> Self {
        Self {
            board,
            pointer_down: false,
            sink: None,
        }
    }

    pub fn with_sink(mut self, sink: impl ResultSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn shared(self) -> SharedGame {
        Arc::new(Mutex::new(self))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn snapshot(&self) -> Snapshot {
        self.board.snapshot(self.pointer_down)
    }

    #[instrument(skip(self), level = "debug")]
    pub fn apply(&mut self, command: Command) -> Result<()> {
        let before = self.board.status();

        match command {
            Command::Reveal { pos } => self.board.reveal(pos)?,
            Command::Flag { pos } => self.board.flag(pos)?,
            Command::Chord { pos } => self.board.chord(pos)?,
            Command::Reset => {
                self.board.reset();
                self.pointer_down = false;
            }
        }

        if before != Status::Won && self.board.status() == Status::Won {
            self.report_win();
        }

        Ok(())
    }

    /// Feeds one pointer event over a cell. Presses and releases update the
    /// face; the ones bound to a board operation also run it.
    #[instrument(skip(self), level = "debug")]
    pub fn pointer(
        &mut self,
        button: PointerButton,
        action: PointerAction,
        pos: Pos,
    ) -> Result<()> {
        self.board.cell(pos)?;
        self.pointer_down = action == PointerAction::Press;

        match Command::from_pointer(button, action, pos) {
            Some(command) => self.apply(command),
            None => Ok(()),
        }
    }

    fn report_win(&mut self) {
        let Some(record) = self.board.record() else {
            return;
        };

        info!(
            "Recording win: {}x{} with {} mines in {}s",
            record.width, record.height, record.mines, record.elapsed_seconds
        );

        if let Some(sink) = self.sink.as_mut()
            && let Err(e) = sink.record(&record)
        {
            warn!("Failed to record result: {}", e);
        }
    }
}
