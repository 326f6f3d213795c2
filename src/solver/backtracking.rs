use crate::moves::{Move, Moves};

/// One entry in the append-only path arena.
///
/// Nodes don't own their path, they only point to the link of the move that created them
/// and the path is recovered by following `prev` indices back to the initial state.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Link {
    pub(crate) prev: Option<usize>,
    pub(crate) mov: Move,
}

pub(crate) fn reconstruct_moves(links: &[Link], last: Option<usize>) -> Moves {
    let mut moves = Vec::new();
    let mut cur = last;
    while let Some(index) = cur {
        let link = links[index];
        moves.push(link.mov);
        cur = link.prev;
    }
    moves.reverse();
    Moves::new(moves)
}
