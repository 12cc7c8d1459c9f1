//! Perft: exhaustive leaf counting through `make_move`/`unmake_move`.
//!
//! Every pseudo-legal move is attempted with `make_move`; only a move that
//! was committed is followed by `unmake_move`, so the snapshot stack is back
//! at its starting depth before the next sibling is tried.

use crate::board::Board;

/// Leaf nodes reachable from the current position in exactly `depth` plies.
pub fn perft(board: &mut Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut nodes = 0u64;
    for mv in board.generate_moves() {
        if board.make_move(mv).is_ok() {
            nodes += perft(board, depth - 1);
            board.unmake_move();
        }
    }
    nodes
}

/// Per-root-move breakdown of a perft run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerftReport {
    pub depth: u32,
    pub nodes: u64,
    /// (move text, subtree leaf count), sorted by move text.
    pub moves: Vec<(String, u64)>,
}

/// Root-level perft reporting the subtree count of every legal root move,
/// sorted by coordinate text, for comparing against a reference line by line.
pub fn divide(board: &mut Board, depth: u32) -> PerftReport {
    let mut moves = Vec::new();
    let mut nodes = 0u64;

    if depth == 0 {
        return PerftReport { depth, nodes: 1, moves };
    }

    for mv in board.generate_moves() {
        if board.make_move(mv).is_ok() {
            let count = perft(board, depth - 1);
            board.unmake_move();
            nodes += count;
            moves.push((mv.to_string(), count));
        }
    }
    moves.sort();

    PerftReport { depth, nodes, moves }
}
