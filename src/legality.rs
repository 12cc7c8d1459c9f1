// Check oracle and legality gates: attacked squares, check, king safety of
// a candidate move, and game-ending classification.

use crate::bitboard::{count_bits, lsb_index, square_bb, square_color};
use crate::board::{Board, Position};
use crate::error::MoveError;
use crate::magic::AttackTables;
use crate::types::{Color, Move, PieceKind};

/// Why a game without a checkmate has ended in a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    NoLegalMoves,
    FiftyMoveRule,
    InsufficientMaterial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Checkmate,
    Stalemate(DrawReason),
}

impl Position {
    /// True if any piece of `by` could capture on `sq`.
    ///
    /// Each movement rule is inverted: a pawn of `by` attacks `sq` iff a pawn
    /// of the other color on `sq` would attack it back, and likewise for the
    /// jump and sliding tables.
    pub fn is_square_attacked(&self, tables: &AttackTables, sq: usize, by: Color) -> bool {
        if tables.pawn_attacks(by.opponent(), sq) & self.piece_bb(PieceKind::Pawn, by) != 0 {
            return true;
        }
        if tables.knight_attacks(sq) & self.piece_bb(PieceKind::Knight, by) != 0 {
            return true;
        }
        if tables.king_attacks(sq) & self.piece_bb(PieceKind::King, by) != 0 {
            return true;
        }

        let occ = self.occ();
        let queens = self.piece_bb(PieceKind::Queen, by);
        let diagonal_attackers = self.piece_bb(PieceKind::Bishop, by) | queens;
        if diagonal_attackers != 0 && tables.bishop_attacks(sq, occ) & diagonal_attackers != 0 {
            return true;
        }
        let straight_attackers = self.piece_bb(PieceKind::Rook, by) | queens;
        straight_attackers != 0 && tables.rook_attacks(sq, occ) & straight_attackers != 0
    }

    /// True iff `side`'s king stands on a square the opponent attacks.
    pub fn is_in_check(&self, tables: &AttackTables, side: Color) -> bool {
        match self.king_square(side) {
            Some(king) => self.is_square_attacked(tables, king, side.opponent()),
            None => false,
        }
    }

    /// King vs king, a lone minor piece vs a bare king, or one bishop each
    /// standing on squares of the same color.
    pub fn has_insufficient_material(&self) -> bool {
        for color in [Color::White, Color::Black] {
            let heavy = self.piece_bb(PieceKind::Pawn, color)
                | self.piece_bb(PieceKind::Rook, color)
                | self.piece_bb(PieceKind::Queen, color);
            if heavy != 0 {
                return false;
            }
        }

        let knights = |c| count_bits(self.piece_bb(PieceKind::Knight, c));
        let bishops = |c| count_bits(self.piece_bb(PieceKind::Bishop, c));
        let white_minors = knights(Color::White) + bishops(Color::White);
        let black_minors = knights(Color::Black) + bishops(Color::Black);

        match (white_minors, black_minors) {
            (0, 0) | (1, 0) | (0, 1) => true,
            (1, 1) => {
                let white_bishop = lsb_index(self.piece_bb(PieceKind::Bishop, Color::White));
                let black_bishop = lsb_index(self.piece_bb(PieceKind::Bishop, Color::Black));
                match (white_bishop, black_bishop) {
                    (Some(w), Some(b)) => square_color(w) == square_color(b),
                    _ => false,
                }
            }
            _ => false,
        }
    }
}

impl Board {
    pub fn is_square_attacked(&self, sq: usize, by: Color) -> bool {
        self.pos.is_square_attacked(&self.tables, sq, by)
    }

    pub fn is_in_check(&self, side: Color) -> bool {
        self.pos.is_in_check(&self.tables, side)
    }

    /// Play `mv` on a scratch copy and report whether the mover's king is
    /// safe afterwards. Movement rules are not checked; an empty source
    /// square yields `false`.
    pub fn test_move(&self, mv: Move) -> bool {
        let mut scratch = self.pos;
        match scratch.apply_move(mv) {
            Some(_) => {
                let mover = self.pos.piece_at(mv.from_sq()).color().unwrap_or(self.pos.side());
                !scratch.is_in_check(&self.tables, mover)
            }
            None => false,
        }
    }

    /// Source holds a piece of the side to move and the destination is among
    /// that piece's pseudo-legal moves. King safety is left to `make_move`.
    pub fn is_move_legal(&self, mv: Move) -> bool {
        self.check_move(mv).is_ok()
    }

    pub(crate) fn check_move(&self, mv: Move) -> Result<(), MoveError> {
        let from = mv.from_sq();
        let piece = self.pos.piece_at(from);
        let Some(owner) = piece.color() else {
            return Err(MoveError::EmptySource { square: mv.from });
        };
        let to_move = self.pos.side();
        if owner != to_move {
            return Err(MoveError::WrongSide {
                square: mv.from,
                owner,
                to_move,
            });
        }

        let targets = self.pos.pseudo_destinations(&self.tables, from);
        if targets & square_bb(mv.to_sq()) == 0 {
            return Err(MoveError::NotPseudoLegal { mv });
        }
        Ok(())
    }

    /// Pseudo-legal moves that keep the mover's king safe, in generation order.
    pub fn legal_moves(&self) -> Vec<Move> {
        self.generate_moves()
            .into_iter()
            .filter(|&mv| self.test_move(mv))
            .collect()
    }

    /// Tries every pseudo-legal move through `make_move`, undoing the first
    /// that succeeds.
    pub fn has_legal_move(&mut self) -> bool {
        for mv in self.generate_moves() {
            if self.make_move(mv).is_ok() {
                self.unmake_move();
                return true;
            }
        }
        false
    }

    pub fn has_insufficient_material(&self) -> bool {
        self.pos.has_insufficient_material()
    }

    /// Side to move is in check and no move gets it out.
    pub fn is_checkmate(&mut self) -> bool {
        self.is_in_check(self.side_to_move()) && !self.has_legal_move()
    }

    /// Side to move is not in check and the game is drawn: by the fifty-move
    /// rule, by insufficient material, or for lack of a legal move.
    pub fn is_stalemate(&mut self) -> bool {
        self.draw_reason().is_some()
    }

    fn draw_reason(&mut self) -> Option<DrawReason> {
        if self.is_in_check(self.side_to_move()) {
            return None;
        }
        if self.halfmove_clock() >= 100 {
            return Some(DrawReason::FiftyMoveRule);
        }
        if self.has_insufficient_material() {
            return Some(DrawReason::InsufficientMaterial);
        }
        if !self.has_legal_move() {
            return Some(DrawReason::NoLegalMoves);
        }
        None
    }

    pub fn status(&mut self) -> GameStatus {
        if self.is_checkmate() {
            return GameStatus::Checkmate;
        }
        match self.draw_reason() {
            Some(reason) => GameStatus::Stalemate(reason),
            None => GameStatus::Ongoing,
        }
    }
}
