mod a_star;
mod backtracking;
mod deadlocks;
mod heuristic;

use std::error::Error;
use std::fmt::{self, Debug, Display, Formatter};

use log::debug;
use typed_arena::Arena;

use crate::level::Level;
use crate::map::Grid;
use crate::moves::Moves;
use crate::state::State;
use crate::vec2d::Vec2d;
use crate::Solve;

use self::a_star::{Search, Step};

pub use self::a_star::Stats;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverErr {
    NoBoxes,
    BoxesGoals,
    PlayerOnWall,
    BoxOnWall,
    PlayerOnBox,
    OverlappingBoxes,
}

impl Display for SolverErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            SolverErr::NoBoxes => write!(f, "No boxes"),
            SolverErr::BoxesGoals => write!(f, "Different number of boxes and goals"),
            SolverErr::PlayerOnWall => write!(f, "Player is on a wall or outside the map"),
            SolverErr::BoxOnWall => write!(f, "Some boxes are on a wall or outside the map"),
            SolverErr::PlayerOnBox => write!(f, "Player is on a box"),
            SolverErr::OverlappingBoxes => write!(f, "Multiple boxes on the same cell"),
        }
    }
}

impl Error for SolverErr {}

/// How a search ended. Running out of states and being stopped are both normal outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Solved(Moves),
    NoSolution,
    TimedOut,
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Outcome::Solved(ref moves) => write!(f, "{}", moves),
            Outcome::NoSolution => write!(f, "No solution"),
            Outcome::TimedOut => write!(f, "Timed out"),
        }
    }
}

pub struct SolverOk {
    pub outcome: Outcome,
    pub stats: Stats,
}

impl SolverOk {
    fn new(outcome: Outcome, stats: Stats) -> Self {
        Self { outcome, stats }
    }

    pub fn moves(&self) -> Option<&Moves> {
        match self.outcome {
            Outcome::Solved(ref moves) => Some(moves),
            _ => None,
        }
    }
}

impl Debug for SolverOk {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.outcome {
            Outcome::Solved(ref moves) => writeln!(
                f,
                "Moves: {}, pushes: {}",
                moves.move_cnt(),
                moves.push_cnt()
            )?,
            ref outcome => writeln!(f, "{}", outcome)?,
        }
        write!(f, "{}", self.stats)
    }
}

/// Everything about a level that doesn't change during the search
#[derive(Debug)]
pub(crate) struct StaticData {
    pub(crate) grid: Grid,
    pub(crate) dead_ends: Vec2d<bool>,
}

#[derive(Debug)]
pub struct Solver {
    sd: StaticData,
    initial_state: State,
}

impl Solver {
    pub fn new(level: &Level) -> Result<Self, SolverErr> {
        debug!("Processing level...");
        check_level(level)?;
        let dead_ends = deadlocks::find_dead_ends(&level.grid);
        debug!("Dead ends:\n{}", dead_ends);
        debug!("Processed level");

        Ok(Solver {
            sd: StaticData {
                grid: level.grid.clone(),
                dead_ends,
            },
            initial_state: level.state.clone(),
        })
    }

    /// Runs until the level is solved, every reachable state has been expanded
    /// or `stop` returns true. `stop` is asked before each expansion.
    pub fn search<F>(&self, print_status: bool, mut stop: F) -> SolverOk
    where
        F: FnMut(&Stats) -> bool,
    {
        debug!("Search called");

        let arena = Arena::new();
        let mut search = Search::new(&self.sd, &arena, &self.initial_state, print_status);
        loop {
            if stop(search.stats()) {
                debug!("Search stopped");
                return SolverOk::new(Outcome::TimedOut, search.into_stats());
            }

            let outcome = match search.step() {
                Step::Continue => continue,
                Step::Solved(moves) => Outcome::Solved(moves),
                Step::Exhausted => Outcome::NoSolution,
            };
            debug!("Search ended: {:?}", search.phase());
            return SolverOk::new(outcome, search.into_stats());
        }
    }
}

impl Solve for Level {
    fn solve(&self, print_status: bool) -> Result<SolverOk, SolverErr> {
        Ok(Solver::new(self)?.search(print_status, |_| false))
    }
}

fn check_level(level: &Level) -> Result<(), SolverErr> {
    let grid = &level.grid;
    let state = &level.state;

    if state.boxes.is_empty() {
        return Err(SolverErr::NoBoxes);
    }
    if state.boxes.len() != grid.goals().len() {
        return Err(SolverErr::BoxesGoals);
    }
    if grid.is_blocked(state.player_pos) {
        return Err(SolverErr::PlayerOnWall);
    }
    if state.boxes.iter().any(|&pos| grid.is_blocked(pos)) {
        return Err(SolverErr::BoxOnWall);
    }
    if state.has_box(state.player_pos) {
        return Err(SolverErr::PlayerOnBox);
    }
    // boxes are sorted
    if state.boxes.windows(2).any(|pair| pair[0] == pair[1]) {
        return Err(SolverErr::OverlappingBoxes);
    }
    Ok(())
}
