// Pseudo-legal move generation. Moves obey each piece's movement rule and
// never land on a friendly piece, but may leave the mover's king in check.
//
// Order: piece classes knights, pawns, rooks, bishops, queens, king; source
// squares ascending within a class; destinations ascending per source
// (pawns: single push, double push, then captures).

use crate::bitboard::{iter_bits, square_bb, Bitboard, RANK_1, RANK_2, RANK_7, RANK_8};
use crate::board::{Board, Position};
use crate::magic::{AttackTables, Slider};
use crate::types::{Color, Move, PieceKind};

const GENERATION_ORDER: [PieceKind; 6] = [
    PieceKind::Knight,
    PieceKind::Pawn,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
];

impl Position {
    /// Append pseudo-legal moves of `side` whose source lies in `sources`.
    pub(crate) fn generate_pseudo_moves(
        &self,
        tables: &AttackTables,
        side: Color,
        sources: Bitboard,
        out: &mut Vec<Move>,
    ) {
        for kind in GENERATION_ORDER {
            let pieces = self.piece_bb(kind, side) & sources;
            if pieces == 0 {
                continue;
            }
            match kind {
                PieceKind::Knight => self.generate_jump_pseudos(tables, side, pieces, kind, out),
                PieceKind::Pawn => self.generate_pawn_pseudos(tables, side, pieces, out),
                PieceKind::Rook => self.generate_slider_pseudos(tables, side, pieces, &[Slider::Rook], out),
                PieceKind::Bishop => {
                    self.generate_slider_pseudos(tables, side, pieces, &[Slider::Bishop], out)
                }
                PieceKind::Queen => self.generate_slider_pseudos(
                    tables,
                    side,
                    pieces,
                    &[Slider::Rook, Slider::Bishop],
                    out,
                ),
                PieceKind::King => self.generate_jump_pseudos(tables, side, pieces, kind, out),
            }
        }
    }

    /// Destinations of the piece on `from`, as generated for its own color.
    pub(crate) fn pseudo_destinations(&self, tables: &AttackTables, from: usize) -> Bitboard {
        let Some(color) = self.piece_at(from).color() else {
            return 0;
        };
        let mut moves = Vec::with_capacity(32);
        self.generate_pseudo_moves(tables, color, square_bb(from), &mut moves);
        moves.iter().fold(0, |acc, mv| acc | square_bb(mv.to_sq()))
    }

    fn generate_jump_pseudos(
        &self,
        tables: &AttackTables,
        side: Color,
        pieces: Bitboard,
        kind: PieceKind,
        out: &mut Vec<Move>,
    ) {
        let own = self.color_occ(side);
        for from in iter_bits(pieces) {
            let attacks = match kind {
                PieceKind::Knight => tables.knight_attacks(from),
                _ => tables.king_attacks(from),
            };
            for to in iter_bits(attacks & !own) {
                out.push(Move::new(from, to));
            }
        }
    }

    fn generate_pawn_pseudos(
        &self,
        tables: &AttackTables,
        side: Color,
        pawns: Bitboard,
        out: &mut Vec<Move>,
    ) {
        let empty = !self.occ();
        let enemy = self.color_occ(side.opponent());
        let (start_rank, last_rank) = match side {
            Color::White => (RANK_2, RANK_8),
            Color::Black => (RANK_7, RANK_1),
        };

        for from in iter_bits(pawns) {
            // A pawn on its last rank has nowhere to go
            if square_bb(from) & last_rank != 0 {
                continue;
            }
            let one = match side {
                Color::White => from + 8,
                Color::Black => from - 8,
            };
            if square_bb(one) & empty != 0 {
                out.push(Move::new(from, one));

                if square_bb(from) & start_rank != 0 {
                    let two = match side {
                        Color::White => from + 16,
                        Color::Black => from - 16,
                    };
                    if square_bb(two) & empty != 0 {
                        out.push(Move::new(from, two));
                    }
                }
            }

            for to in iter_bits(tables.pawn_attacks(side, from) & enemy) {
                out.push(Move::new(from, to));
            }
        }
    }

    fn generate_slider_pseudos(
        &self,
        tables: &AttackTables,
        side: Color,
        pieces: Bitboard,
        sliders: &[Slider],
        out: &mut Vec<Move>,
    ) {
        let own = self.color_occ(side);
        let occ = self.occ();
        for from in iter_bits(pieces) {
            let attacks = sliders
                .iter()
                .fold(0, |acc, &s| acc | tables.slider_attacks(s, from, occ));
            for to in iter_bits(attacks & !own) {
                // The table already stops at the first blocker; the path
                // check keeps the result honest against the occupancy.
                if tables.between(from, to) & occ == 0 {
                    out.push(Move::new(from, to));
                }
            }
        }
    }
}

impl Board {
    /// Every pseudo-legal move for the side to move.
    pub fn generate_moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(256);
        self.pos
            .generate_pseudo_moves(&self.tables, self.pos.side(), !0, &mut moves);
        moves
    }

    /// Pseudo-legal moves of the piece on `sq`, whichever side owns it.
    pub fn generate_moves_from(&self, sq: usize) -> Vec<Move> {
        let mut moves = Vec::new();
        if let Some(color) = self.pos.piece_at(sq).color() {
            self.pos
                .generate_pseudo_moves(&self.tables, color, square_bb(sq), &mut moves);
        }
        moves
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Piece;
    use std::sync::{Arc, OnceLock};

    fn tables() -> Arc<AttackTables> {
        static TABLES: OnceLock<Arc<AttackTables>> = OnceLock::new();
        TABLES.get_or_init(AttackTables::shared).clone()
    }

    fn texts(moves: &[Move]) -> Vec<String> {
        moves.iter().map(|m| m.to_string()).collect()
    }

    #[test]
    fn initial_position_has_twenty_moves_in_class_order() {
        let board = Board::new(tables());
        let moves = texts(&board.generate_moves());
        assert_eq!(moves.len(), 20);
        assert_eq!(&moves[..4], &["b1a3", "b1c3", "g1f3", "g1h3"]);
        assert_eq!(&moves[4..7], &["a2a3", "a2a4", "b2b3"]);
        assert_eq!(moves[19], "h2h4");
    }

    #[test]
    fn black_pawns_push_downward() {
        let mut board = Board::new(tables());
        board.make_move(Move::parse("e2e4").unwrap()).unwrap();
        let moves = texts(&board.generate_moves());
        assert_eq!(moves.len(), 20);
        assert!(moves.contains(&"e7e5".to_string()));
        assert!(moves.contains(&"e7e6".to_string()));
        assert!(moves.contains(&"g8f6".to_string()));
    }

    #[test]
    fn double_push_needs_both_squares_empty() {
        let mut board = Board::new(tables());
        board.put_piece(20, Piece::BlackKnight); // e3 blocks e2 entirely
        board.put_piece(27, Piece::BlackKnight); // d4 blocks only the double push
        let from_e2 = texts(&board.generate_moves_from(12));
        assert!(from_e2.is_empty());
        let from_d2 = texts(&board.generate_moves_from(11));
        assert_eq!(from_d2, vec!["d2d3", "d2e3"]);
    }

    #[test]
    fn pawn_on_last_rank_has_no_moves() {
        let mut board = Board::empty(tables());
        board.put_piece(4, Piece::WhiteKing);
        board.put_piece(7, Piece::BlackKing);
        board.put_piece(59, Piece::WhitePawn);
        board.put_piece(1, Piece::BlackPawn);
        assert!(board.generate_moves_from(59).is_empty());
        assert!(board.generate_moves_from(1).is_empty());
    }

    #[test]
    fn en_passant_target_is_not_captured() {
        let mut board = Board::new(tables());
        for mv in ["e2e4", "a7a6", "e4e5", "d7d5"] {
            board.make_move(Move::parse(mv).unwrap()).unwrap();
        }
        assert_eq!(board.en_passant(), Some(43)); // d6
        let from_e5 = texts(&board.generate_moves_from(36));
        assert_eq!(from_e5, vec!["e5e6"]);
    }

    #[test]
    fn sliders_stop_at_blockers_and_capture() {
        let mut board = Board::empty(tables());
        board.put_piece(0, Piece::WhiteKing);
        board.put_piece(63, Piece::BlackKing);
        board.put_piece(27, Piece::WhiteQueen); // d4
        board.put_piece(29, Piece::WhitePawn); // f4, own piece
        board.put_piece(45, Piece::BlackPawn); // f6, enemy
        let moves = texts(&board.generate_moves_from(27));
        // east stops before f4
        assert!(moves.contains(&"d4e4".to_string()));
        assert!(!moves.contains(&"d4f4".to_string()));
        assert!(!moves.contains(&"d4g4".to_string()));
        // north-east captures f6 and stops
        assert!(moves.contains(&"d4f6".to_string()));
        assert!(!moves.contains(&"d4g7".to_string()));
        // south-west runs into the a1 king, which is own
        assert!(moves.contains(&"d4b2".to_string()));
        assert!(!moves.contains(&"d4a1".to_string()));
        // west, east, north, south, then the four diagonals
        assert_eq!(moves.len(), 3 + 1 + 4 + 3 + 2 + 3 + 3 + 2);
    }

    #[test]
    fn knight_and_king_skip_own_pieces() {
        let board = Board::new(tables());
        assert_eq!(texts(&board.generate_moves_from(1)), vec!["b1a3", "b1c3"]);
        assert!(board.generate_moves_from(4).is_empty());
    }

    #[test]
    fn pseudo_legal_includes_moves_into_check() {
        let mut board = Board::empty(tables());
        board.put_piece(4, Piece::WhiteKing);
        board.put_piece(59, Piece::BlackRook);
        board.put_piece(63, Piece::BlackKing);
        let moves = texts(&board.generate_moves());
        assert!(moves.contains(&"e1d1".to_string()));
        assert_eq!(moves.len(), 5);
    }
}
