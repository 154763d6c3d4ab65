use std::{collections::HashSet, fmt, time::Duration};

use rand::{SeedableRng, rngs::StdRng, seq::index};
use tracing::{debug, info};

use minesweeper_common::{
    models::{CellView, Face, GameParams, GameRecord, Pos, Status},
    protocol::Snapshot,
};

use crate::{
    data::{Cell, Grid, RevealState},
    error::{BoardError, Result},
};

/// One game of Minesweeper.
///
/// Mines are placed lazily on the first reveal so that the first revealed
/// cell is never a mine. All operations run to completion before returning
/// and none of them lock internally; hosts that touch the board from more
/// than one thread must wrap it in a mutex (see [`crate::session::SharedGame`]).
#[derive(Debug, Clone)]
pub struct Board {
    grid: Grid,
    mines: usize,
    status: Status,
    mines_placed: bool,
    flags: usize,
    revealed_safe: usize,
    elapsed: Duration,
    rng: StdRng,
}

fn validate_params(params: &GameParams) -> Result<()> {
    let invalid = || BoardError::InvalidConfiguration {
        width: params.width,
        height: params.height,
        mines: params.mines,
    };

    let area = params
        .width
        .checked_mul(params.height)
        .ok_or_else(invalid)?;

    if params.width == 0 || params.height == 0 || params.mines == 0 || params.mines >= area {
        return Err(invalid());
    }

    Ok(())
}

impl From<&Cell> for CellView {
    fn from(value: &Cell) -> Self {
        match value.state {
            RevealState::Hidden => Self::Hidden,
            RevealState::Flagged => Self::Flagged,
            RevealState::Revealed if value.mine => Self::Mine,
            RevealState::Revealed => Self::Revealed {
                adjacent: value.adjacent,
            },
        }
    }
}

impl Board {
    /// Creates an empty board whose mines will be drawn from OS entropy.
    pub fn new(params: GameParams) -> Result<Self> {
        Self::with_rng(params, StdRng::from_os_rng())
    }

    /// Creates an empty board whose mines will be drawn from `rng`.
    pub fn with_rng(params: GameParams, rng: StdRng) -> Result<Self> {
        validate_params(&params)?;

        Ok(Self {
            grid: Grid::new(params.width, params.height),
            mines: params.mines,
            status: Status::NotStarted,
            mines_placed: false,
            flags: 0,
            revealed_safe: 0,
            elapsed: Duration::ZERO,
            rng,
        })
    }

    /// Creates a board with mines already at `mines`.
    ///
    /// No placement happens on the first reveal, so first-click safety does
    /// not apply to the given layout. [`Board::reset`] goes back to random
    /// placement with the same dimensions and mine count.
    pub fn with_layout(width: usize, height: usize, mines: &[Pos]) -> Result<Self> {
        let params = GameParams {
            width,
            height,
            mines: mines.len(),
        };
        let mut board = Self::with_rng(params, StdRng::from_os_rng())?;

        let invalid = BoardError::InvalidConfiguration {
            width,
            height,
            mines: mines.len(),
        };
        let mut seen = HashSet::with_capacity(mines.len());
        for &pos in mines {
            if !seen.insert(pos) {
                return Err(invalid);
            }
            match board.grid.get_mut(pos) {
                Some(cell) => cell.mine = true,
                None => return Err(invalid),
            }
        }

        board.grid.compute_adjacent_counts();
        board.mines_placed = true;
        Ok(board)
    }

    pub fn params(&self) -> GameParams {
        GameParams {
            width: self.grid.width(),
            height: self.grid.height(),
            mines: self.mines,
        }
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn mine_count(&self) -> usize {
        self.mines
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn flags_placed(&self) -> usize {
        self.flags
    }

    /// Mine count minus flags. Goes negative when the player over-flags.
    pub fn mines_remaining(&self) -> i64 {
        self.mines as i64 - self.flags as i64
    }

    pub fn revealed_count(&self) -> usize {
        self.grid.count_state(RevealState::Revealed)
    }

    pub fn mines_placed(&self) -> bool {
        self.mines_placed
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Whole seconds played, as shown on the timer.
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed.as_secs()
    }

    pub fn cell(&self, pos: Pos) -> Result<&Cell> {
        self.grid.get(pos).ok_or_else(|| self.invalid_coordinate(pos))
    }

    pub fn view(&self, pos: Pos) -> Result<CellView> {
        self.cell(pos).map(CellView::from)
    }

    /// The view of every cell, one inner `Vec` per row.
    pub fn field(&self) -> Vec<Vec<CellView>> {
        self.grid
            .cells()
            .iter()
            .map(CellView::from)
            .collect::<Vec<_>>()
            .chunks(self.grid.width())
            .map(<[CellView]>::to_vec)
            .collect()
    }

    pub fn face(&self, pointer_down: bool) -> Face {
        match self.status {
            Status::Won => Face::Solved,
            Status::Lost => Face::Dead,
            _ if pointer_down => Face::Pressed,
            _ => Face::Normal,
        }
    }

    pub fn snapshot(&self, pointer_down: bool) -> Snapshot {
        Snapshot {
            width: self.grid.width(),
            height: self.grid.height(),
            mines: self.mines,
            status: self.status,
            face: self.face(pointer_down),
            mines_remaining: self.mines_remaining(),
            elapsed_seconds: self.elapsed_seconds(),
            field: self.field(),
        }
    }

    /// The finished-game record, available only once the game is won.
    pub fn record(&self) -> Option<GameRecord> {
        (self.status == Status::Won).then(|| GameRecord {
            width: self.grid.width(),
            height: self.grid.height(),
            mines: self.mines,
            elapsed_seconds: self.elapsed_seconds(),
        })
    }

    /// Advances the game clock. Ignored unless the game is being played.
    pub fn tick(&mut self, delta: Duration) {
        if self.status == Status::Playing {
            self.elapsed += delta;
        }
    }

    pub fn reveal(&mut self, pos: Pos) -> Result<()> {
        let state = self.cell(pos)?.state;

        if self.status.is_finished() || state == RevealState::Flagged {
            return Ok(());
        }

        if self.status == Status::NotStarted {
            if !self.mines_placed {
                self.place_mines(pos);
            }
            self.status = Status::Playing;
            info!(
                "Game started at {} on {}x{} with {} mines",
                pos,
                self.grid.width(),
                self.grid.height(),
                self.mines
            );
        }

        self.open(pos);
        self.check_win();
        Ok(())
    }

    pub fn flag(&mut self, pos: Pos) -> Result<()> {
        self.cell(pos)?;

        if self.status != Status::Playing {
            return Ok(());
        }

        if let Some(cell) = self.grid.get_mut(pos) {
            match cell.state {
                RevealState::Hidden => {
                    cell.state = RevealState::Flagged;
                    self.flags += 1;
                }
                RevealState::Flagged => {
                    cell.state = RevealState::Hidden;
                    self.flags -= 1;
                }
                RevealState::Revealed => return Ok(()),
            }
            debug!("Toggled flag at {}, {} flags placed", pos, self.flags);
        }

        Ok(())
    }

    /// Reveals every hidden neighbor of a revealed number once exactly that
    /// many neighbors are flagged. A wrong flag makes this lose the game.
    pub fn chord(&mut self, pos: Pos) -> Result<()> {
        let cell = *self.cell(pos)?;

        if self.status != Status::Playing || cell.state != RevealState::Revealed || cell.mine {
            return Ok(());
        }

        let flagged = self
            .grid
            .neighbors(pos)
            .filter(|&n| {
                self.grid
                    .get(n)
                    .is_some_and(|c| c.state == RevealState::Flagged)
            })
            .count();

        if flagged != usize::from(cell.adjacent) {
            debug!(
                "Chord at {} skipped: {} flags around {}",
                pos, flagged, cell.adjacent
            );
            return Ok(());
        }

        for neighbor in self.grid.neighbors(pos) {
            if self.status != Status::Playing {
                break;
            }
            self.open(neighbor);
        }

        self.check_win();
        Ok(())
    }

    /// Discards the current game and starts over with the same dimensions
    /// and mine count.
    pub fn reset(&mut self) {
        self.grid = Grid::new(self.grid.width(), self.grid.height());
        self.status = Status::NotStarted;
        self.mines_placed = false;
        self.flags = 0;
        self.revealed_safe = 0;
        self.elapsed = Duration::ZERO;
        info!("Board reset");
    }

    fn invalid_coordinate(&self, pos: Pos) -> BoardError {
        BoardError::InvalidCoordinate {
            pos,
            width: self.grid.width(),
            height: self.grid.height(),
        }
    }

    /// Samples `mines` distinct cells uniformly from every cell but `excluded`.
    fn place_mines(&mut self, excluded: Pos) {
        let Some(skip) = self.grid.index(excluded) else {
            return;
        };

        let area = self.grid.area();
        let cells = self.grid.cells_mut();
        for i in index::sample(&mut self.rng, area - 1, self.mines).into_iter() {
            let i = if i >= skip { i + 1 } else { i };
            cells[i].mine = true;
        }

        self.grid.compute_adjacent_counts();
        self.mines_placed = true;
        debug!("Placed {} mines avoiding {}", self.mines, excluded);
    }

    /// Reveals `start` and, if it borders no mines, flood fills outward.
    ///
    /// Only hidden cells are touched. A cell is pushed onto the worklist at
    /// the moment it turns revealed, so each cell is expanded at most once.
    fn open(&mut self, start: Pos) {
        let Some(cell) = self.grid.get_mut(start) else {
            return;
        };
        if cell.state != RevealState::Hidden {
            return;
        }

        cell.state = RevealState::Revealed;
        if cell.mine {
            self.status = Status::Lost;
            info!("Mine hit at {}, game lost", start);
            return;
        }
        self.revealed_safe += 1;

        let mut opened = 1usize;
        let mut stack = vec![start];
        while let Some(pos) = stack.pop() {
            if self.grid.get(pos).is_none_or(|c| c.adjacent != 0) {
                continue;
            }

            for neighbor in self.grid.neighbors(pos) {
                if let Some(cell) = self.grid.get_mut(neighbor)
                    && cell.state == RevealState::Hidden
                {
                    cell.state = RevealState::Revealed;
                    self.revealed_safe += 1;
                    opened += 1;
                    stack.push(neighbor);
                }
            }
        }

        if opened > 1 {
            debug!("Flood fill from {} opened {} cells", start, opened);
        }
    }

    fn has_won(&self) -> bool {
        self.grid.area() == self.mines + self.revealed_safe
    }

    fn check_win(&mut self) {
        if self.status != Status::Playing || !self.has_won() {
            return;
        }

        self.status = Status::Won;
        for cell in self.grid.cells_mut() {
            if cell.mine && cell.state != RevealState::Flagged {
                cell.state = RevealState::Flagged;
                self.flags += 1;
            }
        }
        info!("Game won in {}s", self.elapsed_seconds());
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.field().iter().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for view in row {
                let c = match view {
                    CellView::Hidden => '.',
                    CellView::Flagged => 'F',
                    CellView::Mine => '*',
                    CellView::Revealed { adjacent: 0 } => ' ',
                    CellView::Revealed { adjacent } => char::from(b'0' + adjacent),
                };
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}
