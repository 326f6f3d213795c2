use std::error::Error;
use std::fmt::{self, Debug, Display, Formatter};

use crate::data::Dir;
use crate::map::Grid;
use crate::map_formatter::MapFormatter;
use crate::moves::Moves;
use crate::parser::{self, ParserErr};
use crate::solution_formatter::SolutionFormatter;
use crate::state::State;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayErr {
    InvalidChar(usize, char),
    IllegalMove(usize, Dir),
}

impl Display for ReplayErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            ReplayErr::InvalidChar(i, c) => write!(f, "Invalid move '{}' at index {}", c, i),
            ReplayErr::IllegalMove(i, dir) => write!(f, "Illegal move '{}' at index {}", dir, i),
        }
    }
}

impl Error for ReplayErr {}

#[derive(Clone)]
pub struct Level {
    pub grid: Grid,
    pub state: State,
}

impl Level {
    pub fn new(grid: Grid, state: State) -> Self {
        Level { grid, state }
    }

    /// See [`parser::parse_layers`] for the glyphs allowed in each layer
    pub fn from_layers(map_rows: &[&str], item_rows: &[&str]) -> Result<Self, ParserErr> {
        parser::parse_layers(map_rows, item_rows)
    }

    pub fn xsb(&self) -> MapFormatter<'_> {
        self.grid.format_with_state(&self.state)
    }

    pub fn format_solution<'a>(
        &'a self,
        moves: &'a Moves,
        include_steps: bool,
    ) -> SolutionFormatter<'a> {
        SolutionFormatter::new(&self.grid, &self.state, moves, include_steps)
    }

    /// Plays a move string (either case) from the initial state using the same rules as the solver.
    pub fn replay(&self, moves: &str) -> Result<State, ReplayErr> {
        let mut state = self.state.clone();
        for (i, c) in moves.chars().enumerate() {
            let dir = Dir::from_char(c).ok_or(ReplayErr::InvalidChar(i, c))?;
            if !state.is_move_legal(&self.grid, dir) {
                return Err(ReplayErr::IllegalMove(i, dir));
            }
            state = state.apply(&self.grid, dir).0;
        }
        Ok(state)
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.xsb())
    }
}

impl Debug for Level {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.xsb())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Pos;

    #[test]
    fn formatting_level() {
        let xsb: &str = r"
*###*
#@$.#
*###*#
"
        .trim_start_matches('\n');

        let level: Level = xsb.parse().unwrap();
        assert_eq!(level.to_string(), xsb);
        assert_eq!(level.xsb().to_string(), xsb);
        assert_eq!(format!("{}", level), xsb);
        assert_eq!(format!("{:?}", level), xsb);
        assert_eq!(level.grid.format_with_state(&level.state).to_string(), xsb);
    }

    #[test]
    fn layers_match_combined() {
        let combined: Level = r"
#######
#.@ $ #
#  *  #
#######
"
        .parse()
        .unwrap();
        let layered = Level::from_layers(
            &["#######", "#.    #", "#  .  #", "#######"],
            &["       ", "  @ $  ", "   $   ", "       "],
        )
        .unwrap();
        assert_eq!(layered.grid, combined.grid);
        assert_eq!(layered.state, combined.state);
    }

    #[test]
    fn replaying() {
        let level: Level = r"
######
#@$ .#
######
"
        .parse()
        .unwrap();

        let end = level.replay("rr").unwrap();
        assert!(end.is_goal(&level.grid));
        assert_eq!(end.player_pos, Pos::new(1, 3));

        // uppercase pushes are accepted too
        assert_eq!(level.replay("RR").unwrap(), end);
        assert_eq!(level.replay("").unwrap(), level.state);

        assert_eq!(level.replay("rrr"), Err(ReplayErr::IllegalMove(2, Dir::Right)));
        assert_eq!(level.replay("u"), Err(ReplayErr::IllegalMove(0, Dir::Up)));
        assert_eq!(level.replay("rx"), Err(ReplayErr::InvalidChar(1, 'x')));
    }
}
