use std::error::Error;
use std::fmt::{self, Debug, Display, Formatter};

use crate::data::{MapCell, Pos};
use crate::map_formatter::MapFormatter;
use crate::state::State;
use crate::vec2d::Vec2d;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfBounds(pub Pos);

impl Display for OutOfBounds {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Position [{}, {}] is outside the map", self.0.r, self.0.c)
    }
}

impl Error for OutOfBounds {}

/// The static part of a level - walls, floor and goals.
///
/// Never changes after construction, every state of a search shares the same grid.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec2d<MapCell>,
    goals: Vec<Pos>,
}

impl Grid {
    pub(crate) fn new(cells: Vec2d<MapCell>) -> Self {
        let goals = cells
            .positions()
            .filter(|&pos| cells[pos] == MapCell::Goal)
            .collect();
        Grid { cells, goals }
    }

    pub fn rows(&self) -> i32 {
        self.cells.rows()
    }

    pub fn cols(&self) -> i32 {
        self.cells.cols()
    }

    pub fn goals(&self) -> &[Pos] {
        &self.goals
    }

    pub fn kind_at(&self, pos: Pos) -> Result<MapCell, OutOfBounds> {
        self.cells.get(pos).cloned().ok_or(OutOfBounds(pos))
    }

    /// Anything a box or the player can't enter - walls and everything outside the grid
    pub(crate) fn is_blocked(&self, pos: Pos) -> bool {
        match self.kind_at(pos) {
            Ok(MapCell::Wall) | Err(_) => true,
            Ok(_) => false,
        }
    }

    pub(crate) fn cells(&self) -> &Vec2d<MapCell> {
        &self.cells
    }

    pub fn format_with_state<'a>(&'a self, state: &'a State) -> MapFormatter<'a> {
        MapFormatter::new(&self.cells, Some(state))
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", MapFormatter::new(&self.cells, None))
    }
}

impl Debug for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
