use std::fmt::{self, Debug, Display, Formatter};

use crate::map::Grid;
use crate::moves::Moves;
use crate::state::State;

/// Writes every state along a solution, either after each push or after each move
pub struct SolutionFormatter<'a> {
    grid: &'a Grid,
    initial_state: &'a State,
    moves: &'a Moves,
    include_steps: bool,
}

impl<'a> SolutionFormatter<'a> {
    pub(crate) fn new(
        grid: &'a Grid,
        initial_state: &'a State,
        moves: &'a Moves,
        include_steps: bool,
    ) -> Self {
        Self {
            grid,
            initial_state,
            moves,
            include_steps,
        }
    }
}

impl Display for SolutionFormatter<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.grid.format_with_state(self.initial_state))?;
        let mut last_state = self.initial_state.clone();
        for mov in self.moves {
            if !last_state.is_move_legal(self.grid, mov.dir) {
                // moves from a different level
                writeln!(f, "Illegal move: {}", mov.dir)?;
                return Ok(());
            }
            let (new_state, _) = last_state.apply(self.grid, mov.dir);
            if mov.is_push || self.include_steps {
                writeln!(f, "{}", self.grid.format_with_state(&new_state))?;
            }
            last_state = new_state;
        }
        Ok(())
    }
}

impl Debug for SolutionFormatter<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
