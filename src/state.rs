use crate::data::{Dir, MapCell, Pos};
use crate::map::Grid;
use crate::moves::Move;

/// The dynamic part of a level - one point in the search space.
///
/// Boxes are kept sorted so that equality and hashing only depend on which cells are occupied,
/// not on the order in which boxes were found or pushed.
#[derive(Debug, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct State {
    pub player_pos: Pos,
    pub boxes: Vec<Pos>,
}

impl State {
    pub fn new(player_pos: Pos, mut boxes: Vec<Pos>) -> State {
        boxes.sort();
        State { player_pos, boxes }
    }

    pub fn has_box(&self, pos: Pos) -> bool {
        self.boxes.binary_search(&pos).is_ok()
    }

    /// The cell ahead is inside the grid and not a wall,
    /// if there's a box on it the cell behind that box must be free too.
    pub fn is_move_legal(&self, grid: &Grid, dir: Dir) -> bool {
        let ahead = self.player_pos + dir;
        if grid.is_blocked(ahead) {
            return false;
        }
        if !self.has_box(ahead) {
            return true;
        }
        let push_dest = ahead + dir;
        !grid.is_blocked(push_dest) && !self.has_box(push_dest)
    }

    /// Only call this with legal moves - anything else is a bug in the caller.
    pub fn apply(&self, grid: &Grid, dir: Dir) -> (State, Move) {
        assert!(
            self.is_move_legal(grid, dir),
            "Illegal move {} from {:?}",
            dir,
            self.player_pos
        );

        let new_player_pos = self.player_pos + dir;
        match self.boxes.binary_search(&new_player_pos) {
            Ok(index) => {
                let mut new_boxes = self.boxes.clone();
                new_boxes[index] = new_player_pos + dir;
                (State::new(new_player_pos, new_boxes), Move::new(dir, true))
            }
            Err(_) => (
                State {
                    player_pos: new_player_pos,
                    boxes: self.boxes.clone(),
                },
                Move::new(dir, false),
            ),
        }
    }

    pub fn is_goal(&self, grid: &Grid) -> bool {
        // all boxes on a goal, not all goals having a box
        self.boxes
            .iter()
            .all(|&pos| grid.kind_at(pos) == Ok(MapCell::Goal))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    use super::*;
    use crate::data::DIRECTIONS;
    use crate::level::Level;

    fn hash(state: &State) -> u64 {
        let mut hasher = DefaultHasher::new();
        state.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn equality_ignores_box_order() {
        let a = State::new(Pos::new(1, 1), vec![Pos::new(2, 2), Pos::new(1, 3)]);
        let b = State::new(Pos::new(1, 1), vec![Pos::new(1, 3), Pos::new(2, 2)]);
        let c = State::new(Pos::new(1, 2), vec![Pos::new(1, 3), Pos::new(2, 2)]);
        let d = State::new(Pos::new(1, 1), vec![Pos::new(1, 3), Pos::new(2, 3)]);

        assert_eq!(a, b);
        assert_eq!(hash(&a), hash(&b));
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn legal_moves() {
        let level: Level = r"
#######
#  $  #
# $@$$#
#  .  #
#######
"
        .parse()
        .unwrap();
        let state = &level.state;

        // box against a wall
        assert!(!state.is_move_legal(&level.grid, Dir::Up));
        // push left into free floor
        assert!(state.is_move_legal(&level.grid, Dir::Left));
        // box behind box
        assert!(!state.is_move_legal(&level.grid, Dir::Right));
        // step onto goal
        assert!(state.is_move_legal(&level.grid, Dir::Down));
    }

    #[test]
    fn blocked_by_walls_and_boundary() {
        let level: Level = "@$\n#.".parse().unwrap();
        let state = &level.state;

        // out of the grid
        assert!(!state.is_move_legal(&level.grid, Dir::Up));
        assert!(!state.is_move_legal(&level.grid, Dir::Left));
        // box would leave the grid
        assert!(!state.is_move_legal(&level.grid, Dir::Right));
        // wall
        assert!(!state.is_move_legal(&level.grid, Dir::Down));
    }

    #[test]
    fn applying_moves() {
        let level: Level = r"
######
#@$ .#
#    #
######
"
        .parse()
        .unwrap();
        let grid = &level.grid;

        let (pushed, mov) = level.state.apply(grid, Dir::Right);
        assert!(mov.is_push);
        assert_eq!(pushed.player_pos, Pos::new(1, 2));
        assert_eq!(pushed.boxes, vec![Pos::new(1, 3)]);
        assert!(!pushed.is_goal(grid));

        let (stepped, mov) = level.state.apply(grid, Dir::Down);
        assert!(!mov.is_push);
        assert_eq!(stepped.player_pos, Pos::new(2, 1));
        assert_eq!(stepped.boxes, level.state.boxes);

        let (solved, _) = pushed.apply(grid, Dir::Right);
        assert!(solved.is_goal(grid));

        // parent is untouched
        assert_eq!(level.state.player_pos, Pos::new(1, 1));
        assert_eq!(level.state.boxes, vec![Pos::new(1, 2)]);
    }

    #[test]
    fn pushing_keeps_boxes_sorted() {
        let level: Level = r"
#####
# . #
#$$@#
# . #
#####
"
        .parse()
        .unwrap();
        let grid = &level.grid;

        let (state, _) = level.state.apply(grid, Dir::Up);
        let (state, _) = state.apply(grid, Dir::Left);
        let (state, _) = state.apply(grid, Dir::Down);
        assert_eq!(state.boxes, vec![Pos::new(2, 1), Pos::new(3, 2)]);
        let mut sorted = state.boxes.clone();
        sorted.sort();
        assert_eq!(state.boxes, sorted);

        for &dir in &DIRECTIONS {
            if state.is_move_legal(grid, dir) {
                let (next, _) = state.apply(grid, dir);
                assert_eq!(next.boxes.len(), 2);
            }
        }
    }

    #[test]
    #[should_panic]
    fn applying_illegal_move() {
        let level: Level = "#@$#\n#. #".parse().unwrap();
        level.state.apply(&level.grid, Dir::Left);
    }
}
