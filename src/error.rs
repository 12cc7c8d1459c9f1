use thiserror::Error;

use crate::types::{Color, Move};

/// Why a move was refused by [`Board::make_move`](crate::board::Board::make_move).
/// A refused move leaves the board untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("no piece on source square {square}")]
    EmptySource { square: u8 },
    #[error("piece on {square} belongs to {owner:?}, but {to_move:?} is to move")]
    WrongSide { square: u8, owner: Color, to_move: Color },
    #[error("{mv} does not follow the piece's movement rules")]
    NotPseudoLegal { mv: Move },
    #[error("{mv} leaves the king in check")]
    LeavesKingInCheck { mv: Move },
}

/// Desynchronisation between the bitboards and the mailbox, or a broken
/// king count. Never produced by a well-behaved sequence of moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("square {square} is set in more than one piece bitboard")]
    Overlap { square: u8 },
    #[error("mailbox disagrees with the bitboards on square {square}")]
    MailboxMismatch { square: u8 },
    #[error("{color:?} has {count} kings")]
    KingCount { color: Color, count: u32 },
}
