pub mod bitboard;
pub mod board;
pub mod error;
pub mod legality;
pub mod magic;
pub mod movegen;
pub mod perft;
pub mod types;

pub use board::{Board, GameMetadata, Position, Snapshot};
pub use error::{BoardError, MoveError};
pub use legality::{DrawReason, GameStatus};
pub use magic::AttackTables;
pub use types::{Color, Move, Piece, PieceKind};
