use minesweeper_common::models::Pos;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevealState {
    #[default]
    Hidden,
    Revealed,
    Flagged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    pub mine: bool,
    /// Only meaningful while `mine` is false.
    pub adjacent: u8,
    pub state: RevealState,
}

/// Row-major cell storage with bounds-checked access.
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn area(&self) -> usize {
        self.cells.len()
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    pub fn index(&self, pos: Pos) -> Option<usize> {
        self.contains(pos).then(|| pos.x + pos.y * self.width)
    }

    pub fn pos(&self, index: usize) -> Pos {
        Pos {
            x: index % self.width,
            y: index / self.width,
        }
    }

    pub fn get(&self, pos: Pos) -> Option<&Cell> {
        self.index(pos).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, pos: Pos) -> Option<&mut Cell> {
        self.index(pos).map(|i| &mut self.cells[i])
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// The 8-connected neighbors of `pos`, clamped to the grid.
    ///
    /// Corners yield 3 positions, edges 5, interior cells 8. Every
    /// neighborhood walk on the board goes through here.
    pub fn neighbors(&self, pos: Pos) -> impl Iterator<Item = Pos> + use<> {
        let (width, height) = (self.width, self.height);

        (-1isize..=1).flat_map(move |dy| {
            (-1isize..=1).filter_map(move |dx| {
                if dx == 0 && dy == 0 {
                    return None;
                }

                let x = pos.x.checked_add_signed(dx)?;
                let y = pos.y.checked_add_signed(dy)?;
                (x < width && y < height).then_some(Pos { x, y })
            })
        })
    }

    /// Number of mines among the neighbors of `pos`.
    pub fn count_adjacent_mines(&self, pos: Pos) -> u8 {
        self.neighbors(pos)
            .filter(|&n| self.get(n).is_some_and(|cell| cell.mine))
            .count() as u8
    }

    /// Recomputes `adjacent` for every non-mine cell from the current mines.
    pub fn compute_adjacent_counts(&mut self) {
        for index in 0..self.cells.len() {
            if self.cells[index].mine {
                continue;
            }
            let count = self.count_adjacent_mines(self.pos(index));
            self.cells[index].adjacent = count;
        }
    }

    pub fn count_state(&self, state: RevealState) -> usize {
        self.cells.iter().filter(|cell| cell.state == state).count()
    }

    pub fn count_mines(&self) -> usize {
        self.cells.iter().filter(|cell| cell.mine).count()
    }
}
