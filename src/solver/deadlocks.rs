use crate::data::{Dir, MapCell};
use crate::map::Grid;
use crate::state::State;
use crate::vec2d::Vec2d;

/// Cells from which a box can never be pushed out again.
///
/// Only simple corners: blocked above or below and at the same time blocked left or right.
/// The boundary of the grid counts as blocked. Goals are never dead ends,
/// a box in a corner goal is already where it belongs.
pub(crate) fn find_dead_ends(grid: &Grid) -> Vec2d<bool> {
    let cells = grid.cells();
    let mut dead_ends = cells.scratchpad();

    for pos in cells.positions() {
        if cells[pos] != MapCell::Floor {
            continue;
        }

        let vertical = grid.is_blocked(pos + Dir::Up) || grid.is_blocked(pos + Dir::Down);
        let horizontal = grid.is_blocked(pos + Dir::Left) || grid.is_blocked(pos + Dir::Right);
        if vertical && horizontal {
            dead_ends[pos] = true;
        }
    }

    dead_ends
}

/// Never true for a state that can still be solved, might be false for some that can't.
pub(crate) fn is_deadlocked(dead_ends: &Vec2d<bool>, state: &State) -> bool {
    state.boxes.iter().any(|&pos| dead_ends[pos])
}
