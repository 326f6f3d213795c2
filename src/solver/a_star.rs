use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt::{self, Debug, Display, Formatter};

use fnv::FnvHashMap;
use log::{debug, trace};
use prettytable::{format, Cell, Row, Table};
use separator::Separatable;
use typed_arena::Arena;

use crate::data::DIRECTIONS;
use crate::moves::Moves;
use crate::state::State;

use super::backtracking::{self, Link};
use super::{deadlocks, heuristic, StaticData};

#[derive(Clone, PartialEq, Eq)]
pub struct Stats {
    created_states: Vec<u64>,
    visited_states: Vec<u64>,
    duplicate_states: Vec<u64>,
    deadlocked_states: u64,
    reopened_states: u64,
}

impl Stats {
    pub(crate) fn new() -> Self {
        Stats {
            created_states: vec![],
            visited_states: vec![],
            duplicate_states: vec![],
            deadlocked_states: 0,
            reopened_states: 0,
        }
    }

    pub fn total_created(&self) -> u64 {
        self.created_states.iter().sum::<u64>()
    }

    pub fn total_unique_visited(&self) -> u64 {
        self.visited_states.iter().sum::<u64>()
    }

    pub fn total_reached_duplicates(&self) -> u64 {
        self.duplicate_states.iter().sum::<u64>()
    }

    /// Children thrown away right after creation because a box ended up in a dead end
    pub fn total_deadlocked(&self) -> u64 {
        self.deadlocked_states
    }

    /// Already expanded states that were reached again using fewer moves
    pub fn total_reopened(&self) -> u64 {
        self.reopened_states
    }

    fn add_created(&mut self, node: &SearchNode<'_>) -> bool {
        Self::add(&mut self.created_states, node)
    }

    fn add_unique_visited(&mut self, node: &SearchNode<'_>) -> bool {
        Self::add(&mut self.visited_states, node)
    }

    fn add_reached_duplicate(&mut self, node: &SearchNode<'_>) -> bool {
        Self::add(&mut self.duplicate_states, node)
    }

    fn add(counts: &mut Vec<u64>, node: &SearchNode<'_>) -> bool {
        let mut ret = false;

        // while because some depths might be skipped
        while node.dist as usize >= counts.len() {
            counts.push(0);
            ret = true;
        }
        counts[node.dist as usize] += 1;
        ret
    }
}

impl Debug for Stats {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "total created / unique visited / reached duplicates:")?;
        writeln!(
            f,
            "{:<16}{:<16}{}",
            self.total_created().separated_string(),
            self.total_unique_visited().separated_string(),
            self.total_reached_duplicates().separated_string()
        )
    }
}

impl Display for Stats {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let created = self.total_created();
        let visited = self.total_unique_visited();
        let duplicates = self.total_reached_duplicates();
        let left = created - visited - duplicates;
        writeln!(f, "States created total: {}", created.separated_string())?;
        writeln!(f, "Unique visited total: {}", visited.separated_string())?;
        writeln!(f, "Reached duplicates total: {}", duplicates.separated_string())?;
        writeln!(f, "Created but not reached total: {}", left.separated_string())?;
        writeln!(f, "Deadlocked total: {}", self.deadlocked_states.separated_string())?;
        writeln!(f, "Reopened total: {}", self.reopened_states.separated_string())?;
        writeln!(f)?;

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_CLEAN);
        table.set_titles(Row::new(vec![
            Cell::new("Depth"),
            Cell::new("Created"),
            Cell::new("Unique"),
            Cell::new("Duplicates"),
            Cell::new("Unknown (not reached)"),
        ]));
        // created_states should be the longest vec
        for (depth, &created) in self.created_states.iter().enumerate() {
            let visited = self.visited_states.get(depth).cloned().unwrap_or(0);
            let duplicates = self.duplicate_states.get(depth).cloned().unwrap_or(0);
            let left = created - visited - duplicates;
            table.add_row(Row::new(vec![
                Cell::new(&format!("{}:", depth)),
                Cell::new(&created.separated_string()),
                Cell::new(&visited.separated_string()),
                Cell::new(&duplicates.separated_string()),
                Cell::new(&left.separated_string()),
            ]));
        }
        write!(f, "{}", table)
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct SearchNode<'a> {
    pub(crate) state: &'a State,
    /// Index of the move that created this node, `None` for the initial state
    pub(crate) link: Option<usize>,
    pub(crate) dist: u32,
    pub(crate) h: u32,
    /// Insertion order, breaks ties between equal costs
    seq: u64,
}

impl<'a> SearchNode<'a> {
    fn cost(&self) -> u32 {
        self.dist + self.h
    }
}

impl Ord for SearchNode<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        // intentionally reversed for BinaryHeap
        (other.cost(), other.seq).cmp(&(self.cost(), self.seq))
    }
}

impl PartialOrd for SearchNode<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SearchNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SearchNode<'_> {}

/// Lowest known distance of a state and whether it has been expanded with it
#[derive(Debug, Clone, Copy)]
struct Best {
    dist: u32,
    closed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Initialized,
    Searching,
    Solved,
    Exhausted,
}

#[derive(Debug)]
pub(crate) enum Step {
    Continue,
    Solved(Moves),
    Exhausted,
}

/// Best-first search over single moves, one `step` per expanded node.
///
/// The frontier can contain several entries of the same state, only the cheapest one
/// gets expanded and the rest are dropped when popped.
pub(crate) struct Search<'a> {
    sd: &'a StaticData,
    arena: &'a Arena<State>,
    to_visit: BinaryHeap<SearchNode<'a>>,
    best: FnvHashMap<&'a State, Best>,
    links: Vec<Link>,
    stats: Stats,
    phase: Phase,
    next_seq: u64,
    print_status: bool,
}

impl<'a> Search<'a> {
    pub(crate) fn new(
        sd: &'a StaticData,
        arena: &'a Arena<State>,
        initial_state: &State,
        print_status: bool,
    ) -> Self {
        let mut search = Search {
            sd,
            arena,
            to_visit: BinaryHeap::new(),
            best: FnvHashMap::default(),
            links: Vec::new(),
            stats: Stats::new(),
            phase: Phase::Initialized,
            next_seq: 0,
            print_status,
        };

        let start: &'a State = arena.alloc(initial_state.clone());
        search.best.insert(
            start,
            Best {
                dist: 0,
                closed: false,
            },
        );
        search.queue(start, None, 0);
        search
    }

    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn stats(&self) -> &Stats {
        &self.stats
    }

    pub(crate) fn into_stats(self) -> Stats {
        self.stats
    }

    fn queue(&mut self, state: &'a State, link: Option<usize>, dist: u32) {
        let node = SearchNode {
            state,
            link,
            dist,
            h: heuristic::manhattan_goals(&self.sd.grid, state),
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.stats.add_created(&node);
        self.to_visit.push(node);
    }

    pub(crate) fn step(&mut self) -> Step {
        match self.phase {
            Phase::Initialized => self.phase = Phase::Searching,
            Phase::Searching => {}
            Phase::Solved | Phase::Exhausted => panic!("Search already finished: {:?}", self.phase),
        }

        let cur_node = match self.to_visit.pop() {
            Some(node) => node,
            None => {
                debug!("Frontier empty, no solution");
                self.phase = Phase::Exhausted;
                return Step::Exhausted;
            }
        };

        // a cheaper copy was queued later or this one was already expanded
        let best = self.best[cur_node.state];
        if best.dist < cur_node.dist || (best.closed && best.dist <= cur_node.dist) {
            self.stats.add_reached_duplicate(&cur_node);
            return Step::Continue;
        }

        if self.stats.add_unique_visited(&cur_node) && self.print_status {
            println!("Visited new depth: {}", cur_node.dist);
            println!("{:?}", self.stats);
        }

        if cur_node.state.is_goal(&self.sd.grid) {
            debug!("Solved, backtracking path");
            self.phase = Phase::Solved;
            return Step::Solved(backtracking::reconstruct_moves(
                &self.links,
                cur_node.link,
            ));
        }

        self.best.insert(
            cur_node.state,
            Best {
                dist: cur_node.dist,
                closed: true,
            },
        );

        let new_dist = cur_node.dist + 1;
        for &dir in &DIRECTIONS {
            if !cur_node.state.is_move_legal(&self.sd.grid, dir) {
                continue;
            }

            let (new_state, mov) = cur_node.state.apply(&self.sd.grid, dir);
            if deadlocks::is_deadlocked(&self.sd.dead_ends, &new_state) {
                self.stats.deadlocked_states += 1;
                continue;
            }

            let key: &'a State = match self.best.get_key_value(&new_state) {
                Some((&key, known)) => {
                    if known.dist <= new_dist {
                        continue;
                    }
                    if known.closed {
                        trace!("Reopening state at depth {} (was {})", new_dist, known.dist);
                        self.stats.reopened_states += 1;
                    }
                    key
                }
                None => {
                    let arena: &'a Arena<State> = self.arena;
                    arena.alloc(new_state)
                }
            };

            let link = self.links.len();
            self.links.push(Link {
                prev: cur_node.link,
                mov,
            });
            self.best.insert(
                key,
                Best {
                    dist: new_dist,
                    closed: false,
                },
            );
            self.queue(key, Some(link), new_dist);
        }

        Step::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Dir;
    use crate::level::Level;
    use crate::solver::Solver;

    fn run<'a>(search: &mut Search<'a>) -> Step {
        loop {
            match search.step() {
                Step::Continue => assert_eq!(search.phase(), Phase::Searching),
                step => return step,
            }
        }
    }

    #[test]
    fn phases() {
        let level: Level = r"
#####
#@$.#
#####
"
        .parse()
        .unwrap();
        let solver = Solver::new(&level).unwrap();
        let arena = Arena::new();
        let mut search = Search::new(&solver.sd, &arena, &solver.initial_state, false);
        assert_eq!(search.phase(), Phase::Initialized);

        match run(&mut search) {
            Step::Solved(moves) => assert_eq!(moves.to_string(), "r"),
            step => panic!("{:?}", step),
        }
        assert_eq!(search.phase(), Phase::Solved);
        assert_eq!(search.stats().total_unique_visited(), 2);
    }

    #[test]
    fn exhausting() {
        let level: Level = r"
######
#@  .#
# $  #
######
"
        .parse()
        .unwrap();
        let solver = Solver::new(&level).unwrap();
        let arena = Arena::new();
        let mut search = Search::new(&solver.sd, &arena, &solver.initial_state, false);

        match run(&mut search) {
            Step::Exhausted => {}
            step => panic!("{:?}", step),
        }
        assert_eq!(search.phase(), Phase::Exhausted);

        // 8 player positions with the box on (2,2) or (2,3), minus the box cells
        let stats = search.into_stats();
        assert_eq!(stats.total_unique_visited(), 14);
        assert!(stats.total_deadlocked() > 0);
    }

    #[test]
    fn stale_copies_are_dropped() {
        let level: Level = r"
######
#@  .#
# $  #
######
"
        .parse()
        .unwrap();
        let solver = Solver::new(&level).unwrap();
        let arena = Arena::new();
        let mut search = Search::new(&solver.sd, &arena, &solver.initial_state, false);

        // a second, more expensive copy of the initial state
        let start = search.to_visit.peek().unwrap().state;
        search.queue(start, None, 1);
        assert_eq!(search.stats().total_created(), 2);

        let mut dropped = 0;
        loop {
            let created = search.stats().total_created();
            let visited = search.stats().total_unique_visited();
            let duplicates = search.stats().total_reached_duplicates();
            let links = search.links.len();
            match search.step() {
                Step::Continue => {
                    if search.stats().total_reached_duplicates() > duplicates {
                        // popped but not expanded
                        assert_eq!(search.stats().total_created(), created);
                        assert_eq!(search.stats().total_unique_visited(), visited);
                        assert_eq!(search.links.len(), links);
                        dropped += 1;
                    }
                }
                Step::Exhausted => break,
                step => panic!("{:?}", step),
            }
        }

        assert_eq!(dropped, 1);
        let stats = search.into_stats();
        assert_eq!(stats.total_reached_duplicates(), 1);
        assert_eq!(stats.total_unique_visited(), 14);
        assert_eq!(stats.total_reopened(), 0);
    }

    #[test]
    fn cheaper_path_reopens_state() {
        let level: Level = r"
#####
#@  #
# $ #
#  .#
#####
"
        .parse()
        .unwrap();
        let solver = Solver::new(&level).unwrap();
        let arena = Arena::new();
        let mut search = Search::new(&solver.sd, &arena, &solver.initial_state, false);

        // pretend the state after the first step right was already expanded at depth 3
        let (right, _) = solver.initial_state.apply(&solver.sd.grid, Dir::Right);
        let right: &State = arena.alloc(right);
        search.best.insert(
            right,
            Best {
                dist: 3,
                closed: true,
            },
        );

        match search.step() {
            Step::Continue => {}
            step => panic!("{:?}", step),
        }
        assert_eq!(search.stats().total_reopened(), 1);
        let best = search.best[right];
        assert_eq!(best.dist, 1);
        assert!(!best.closed);
        assert!(search
            .to_visit
            .iter()
            .any(|node| node.state == right && node.dist == 1));

        match run(&mut search) {
            Step::Solved(moves) => assert_eq!(moves.move_cnt(), 5),
            step => panic!("{:?}", step),
        }
        assert_eq!(search.stats().total_reopened(), 1);
    }

    #[test]
    #[should_panic]
    fn single_use() {
        let level: Level = "#@*#".parse().unwrap();
        let solver = Solver::new(&level).unwrap();
        let arena = Arena::new();
        let mut search = Search::new(&solver.sd, &arena, &solver.initial_state, false);
        run(&mut search);
        search.step();
    }

    #[test]
    fn ties_prefer_older_nodes() {
        let state = State::new(crate::data::Pos::new(0, 0), vec![]);
        let mut heap = BinaryHeap::new();
        for (seq, &(dist, h)) in [(3, 1), (1, 3), (0, 2), (2, 2)].iter().enumerate() {
            heap.push(SearchNode {
                state: &state,
                link: None,
                dist,
                h,
                seq: seq as u64,
            });
        }
        let order: Vec<_> = ::std::iter::from_fn(|| heap.pop().map(|n| n.seq)).collect();
        assert_eq!(order, vec![2, 0, 1, 3]);
    }
}
