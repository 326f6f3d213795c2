use crate::map::Grid;
use crate::state::State;

/// Sum of Manhattan distances from each box to its closest goal.
///
/// Ignores walls, push directions and other boxes so it's only a guide,
/// distances are not weighted by what the box currently stands on.
pub(crate) fn manhattan_goals(grid: &Grid, state: &State) -> u32 {
    // less is better
    let mut goal_dist_sum = 0;
    for box_pos in &state.boxes {
        let mut min = u32::max_value();
        for goal in grid.goals() {
            let dist = box_pos.dist(*goal);
            if dist < min {
                min = dist;
            }
        }
        goal_dist_sum += min;
    }
    goal_dist_sum
}
