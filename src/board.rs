// Board state: twelve piece bitboards plus a mailbox kept in lockstep,
// game metadata and the snapshot stack used by unmake_move.

use std::fmt;
use std::sync::Arc;

use crate::bitboard::{count_bits, lsb_index, square_bb, Bitboard};
use crate::error::{BoardError, MoveError};
use crate::magic::AttackTables;
use crate::types::{
    castling_to_string, piece_index, square_name, Color, Move, Piece, PieceKind,
    CASTLE_ALL, CASTLE_BLACK_KING, CASTLE_BLACK_QUEEN, CASTLE_WHITE_KING, CASTLE_WHITE_QUEEN,
};

const KING_HOME: [usize; 2] = [4, 60]; // e1, e8
const ROOK_KS: [usize; 2] = [7, 63]; // h1, h8
const ROOK_QS: [usize; 2] = [0, 56]; // a1, a8

/// Everything about the game besides piece placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameMetadata {
    pub side: Color,
    pub castling: u8,   // 4 LSB: white kingside, white queenside, black ks, black qs
    pub ep: Option<u8>, // en-passant target square or None
    pub halfmove: u16,
    pub fullmove: u16,
}

impl GameMetadata {
    fn initial() -> Self {
        Self {
            side: Color::White,
            castling: CASTLE_ALL,
            ep: None,
            halfmove: 0,
            fullmove: 1,
        }
    }
}

/// Undo record pushed before every committed move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub meta: GameMetadata,
    pub captured: Piece,
    pub piece_bb: [Bitboard; 12],
}

/// Piece placement in both representations plus metadata. Small and `Copy`,
/// so move simulation runs on a scratch copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    // 0-5 = white p,n,b,r,q,k; 6-11 = black p,n,b,r,q,k
    pub(crate) piece_bb: [Bitboard; 12],
    pub(crate) mailbox: [Piece; 64],
    pub(crate) meta: GameMetadata,
}

impl Position {
    pub fn empty() -> Self {
        Self {
            piece_bb: [0; 12],
            mailbox: [Piece::Empty; 64],
            meta: GameMetadata::initial(),
        }
    }

    pub fn start() -> Self {
        let mut pos = Self::empty();
        pos.piece_bb = [
            0x000000000000FF00, // white pawns
            0x0000000000000042, // white knights
            0x0000000000000024, // white bishops
            0x0000000000000081, // white rooks
            0x0000000000000008, // white queen
            0x0000000000000010, // white king
            0x00FF000000000000, // black pawns
            0x4200000000000000, // black knights
            0x2400000000000000, // black bishops
            0x8100000000000000, // black rooks
            0x0800000000000000, // black queen
            0x1000000000000000, // black king
        ];
        pos.rebuild_mailbox();
        pos
    }

    #[inline]
    pub fn piece_bb(&self, kind: PieceKind, color: Color) -> Bitboard {
        self.piece_bb[piece_index(kind, color)]
    }

    #[inline]
    pub fn piece_at(&self, sq: usize) -> Piece {
        self.mailbox[sq]
    }

    pub fn color_occ(&self, color: Color) -> Bitboard {
        let base = color as usize * 6;
        self.piece_bb[base..base + 6].iter().fold(0, |acc, bb| acc | bb)
    }

    #[inline]
    pub fn occ(&self) -> Bitboard {
        self.color_occ(Color::White) | self.color_occ(Color::Black)
    }

    #[inline]
    pub fn side(&self) -> Color {
        self.meta.side
    }

    pub fn metadata(&self) -> &GameMetadata {
        &self.meta
    }

    /// Square of `color`'s king, taken from the lowest set bit of its bitboard.
    pub fn king_square(&self, color: Color) -> Option<usize> {
        lsb_index(self.piece_bb(PieceKind::King, color))
    }

    pub(crate) fn put(&mut self, sq: usize, piece: Piece) {
        self.remove(sq);
        if let Some(i) = piece.index() {
            self.piece_bb[i] |= square_bb(sq);
            self.mailbox[sq] = piece;
        }
    }

    pub(crate) fn remove(&mut self, sq: usize) -> Piece {
        let piece = self.mailbox[sq];
        if let Some(i) = piece.index() {
            self.piece_bb[i] &= !square_bb(sq);
        }
        self.mailbox[sq] = Piece::Empty;
        piece
    }

    /// Re-derive the mailbox from the bitboards, first matching piece wins.
    pub(crate) fn rebuild_mailbox(&mut self) {
        for sq in 0..64 {
            let mask = square_bb(sq);
            self.mailbox[sq] = Piece::ALL
                .iter()
                .copied()
                .find(|p| self.piece_bb[*p as usize] & mask != 0)
                .unwrap_or(Piece::Empty);
        }
    }

    /// Move the piece and update all metadata. Returns the captured piece
    /// (`Piece::Empty` for a quiet move), or `None` when `from` is empty.
    /// King safety is not checked here.
    pub(crate) fn apply_move(&mut self, mv: Move) -> Option<Piece> {
        let from = mv.from_sq();
        let to = mv.to_sq();
        let moving = self.mailbox[from];
        let kind = moving.kind()?;
        let color = moving.color()?;

        let captured = self.remove(to);
        self.remove(from);
        self.put(to, moving);

        self.update_castling_after_move(color, kind, from);
        if captured.kind() == Some(PieceKind::Rook) {
            self.update_castling_on_rook_capture(to);
        }

        self.meta.ep = if kind == PieceKind::Pawn && to.abs_diff(from) == 16 {
            Some(((from + to) / 2) as u8)
        } else {
            None
        };

        if kind == PieceKind::Pawn || !captured.is_empty() {
            self.meta.halfmove = 0;
        } else {
            self.meta.halfmove = self.meta.halfmove.saturating_add(1);
        }
        if color == Color::Black {
            self.meta.fullmove = self.meta.fullmove.saturating_add(1);
        }
        self.meta.side = color.opponent();

        Some(captured)
    }

    // King leaving its home square drops both rights; a rook leaving a corner drops that one
    fn update_castling_after_move(&mut self, side: Color, kind: PieceKind, from: usize) {
        let s = side as usize;
        match kind {
            PieceKind::King if from == KING_HOME[s] => {
                self.meta.castling &= match side {
                    Color::White => !(CASTLE_WHITE_KING | CASTLE_WHITE_QUEEN),
                    Color::Black => !(CASTLE_BLACK_KING | CASTLE_BLACK_QUEEN),
                };
            }
            PieceKind::Rook => self.revoke_corner(from),
            _ => {}
        }
    }

    // A rook captured on its home corner takes the owner's right with it
    fn update_castling_on_rook_capture(&mut self, captured_square: usize) {
        self.revoke_corner(captured_square);
    }

    fn revoke_corner(&mut self, sq: usize) {
        let bit = if sq == ROOK_KS[0] {
            CASTLE_WHITE_KING
        } else if sq == ROOK_QS[0] {
            CASTLE_WHITE_QUEEN
        } else if sq == ROOK_KS[1] {
            CASTLE_BLACK_KING
        } else if sq == ROOK_QS[1] {
            CASTLE_BLACK_QUEEN
        } else {
            0
        };
        self.meta.castling &= !bit;
    }

    /// Bitboards are pairwise disjoint and the mailbox mirrors them.
    pub fn check_occupancy(&self) -> Result<(), BoardError> {
        for sq in 0..64 {
            let mask = square_bb(sq);
            let mut owners = (0..12).filter(|&i| self.piece_bb[i] & mask != 0);
            let first = owners.next();
            if owners.next().is_some() {
                return Err(BoardError::Overlap { square: sq as u8 });
            }
            if first != self.mailbox[sq].index() {
                return Err(BoardError::MailboxMismatch { square: sq as u8 });
            }
        }
        Ok(())
    }

    /// Occupancy always; the king count once both sides have a king. Setup
    /// may leave a side without one, which the play path tolerates.
    pub(crate) fn check_play_invariants(&self) -> Result<(), BoardError> {
        let both_kings = [Color::White, Color::Black]
            .iter()
            .all(|&c| self.piece_bb(PieceKind::King, c) != 0);
        if both_kings {
            self.check_invariants()
        } else {
            self.check_occupancy()
        }
    }

    /// Occupancy consistency plus exactly one king per side.
    pub fn check_invariants(&self) -> Result<(), BoardError> {
        self.check_occupancy()?;
        for color in [Color::White, Color::Black] {
            let count = count_bits(self.piece_bb(PieceKind::King, color));
            if count != 1 {
                return Err(BoardError::KingCount { color, count });
            }
        }
        Ok(())
    }
}

/// A game in progress: the current position, the attack tables it is
/// evaluated against, and one [`Snapshot`] per committed move.
#[derive(Clone)]
pub struct Board {
    pub(crate) tables: Arc<AttackTables>,
    pub(crate) pos: Position,
    history: Vec<Snapshot>,
}

impl Board {
    /// Board in the standard initial position.
    pub fn new(tables: Arc<AttackTables>) -> Self {
        let mut board = Self::empty(tables);
        board.reset();
        board
    }

    /// Board with no pieces, to be populated with `put_piece`.
    pub fn empty(tables: Arc<AttackTables>) -> Self {
        Self {
            tables,
            pos: Position::empty(),
            history: Vec::with_capacity(256),
        }
    }

    pub fn tables(&self) -> &Arc<AttackTables> {
        &self.tables
    }

    pub fn position(&self) -> &Position {
        &self.pos
    }

    /// Standard initial position, all castling rights, no en-passant target,
    /// clocks (0, 1), White to move. Clears the undo history.
    pub fn reset(&mut self) {
        self.pos = Position::start();
        self.history.clear();
    }

    // Setup -------------------------------------------------------

    /// Remove every piece and clear the history; metadata returns to its
    /// initial values with no castling rights.
    pub fn clear(&mut self) {
        self.pos = Position::empty();
        self.pos.meta.castling = 0;
        self.history.clear();
    }

    /// Place `piece` on `sq`, replacing whatever stood there.
    pub fn put_piece(&mut self, sq: usize, piece: Piece) {
        self.pos.put(sq, piece);
        self.history.clear();
    }

    pub fn remove_piece(&mut self, sq: usize) -> Piece {
        self.history.clear();
        self.pos.remove(sq)
    }

    pub fn set_side_to_move(&mut self, side: Color) {
        self.pos.meta.side = side;
        self.history.clear();
    }

    pub fn set_castling_rights(&mut self, rights: u8) {
        self.pos.meta.castling = rights & CASTLE_ALL;
        self.history.clear();
    }

    pub fn set_en_passant(&mut self, sq: Option<usize>) {
        self.pos.meta.ep = sq.map(|s| s as u8);
        self.history.clear();
    }

    pub fn set_clocks(&mut self, halfmove: u16, fullmove: u16) {
        self.pos.meta.halfmove = halfmove;
        self.pos.meta.fullmove = fullmove;
        self.history.clear();
    }

    // Accessors ---------------------------------------------------

    pub fn white_pieces(&self) -> Bitboard {
        self.pos.color_occ(Color::White)
    }

    pub fn black_pieces(&self) -> Bitboard {
        self.pos.color_occ(Color::Black)
    }

    pub fn occupancy(&self) -> Bitboard {
        self.pos.occ()
    }

    pub fn pieces(&self, kind: PieceKind, color: Color) -> Bitboard {
        self.pos.piece_bb(kind, color)
    }

    pub fn piece_at(&self, sq: usize) -> Piece {
        self.pos.piece_at(sq)
    }

    pub fn king_square(&self, color: Color) -> Option<usize> {
        self.pos.king_square(color)
    }

    pub fn side_to_move(&self) -> Color {
        self.pos.meta.side
    }

    pub fn castling_rights(&self) -> u8 {
        self.pos.meta.castling
    }

    /// Castling rights as "KQkq"-style text.
    pub fn castling_string(&self) -> String {
        castling_to_string(self.pos.meta.castling)
    }

    pub fn en_passant(&self) -> Option<usize> {
        self.pos.meta.ep.map(usize::from)
    }

    pub fn halfmove_clock(&self) -> u16 {
        self.pos.meta.halfmove
    }

    pub fn fullmove_number(&self) -> u16 {
        self.pos.meta.fullmove
    }

    pub fn metadata(&self) -> &GameMetadata {
        &self.pos.meta
    }

    /// Number of committed moves that can still be undone.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn check_invariants(&self) -> Result<(), BoardError> {
        self.pos.check_invariants()
    }

    // Make / unmake -----------------------------------------------

    /// Commit `mv` if it is legal. On error nothing changes.
    ///
    /// The move is first played on a scratch copy of the position; only when
    /// the mover's king is safe there is the snapshot pushed and the copy
    /// installed.
    pub fn make_move(&mut self, mv: Move) -> Result<(), MoveError> {
        self.check_move(mv)?;

        let mover = self.pos.side();
        let mut scratch = self.pos;
        let captured = scratch
            .apply_move(mv)
            .ok_or(MoveError::EmptySource { square: mv.from })?;
        if scratch.is_in_check(&self.tables, mover) {
            return Err(MoveError::LeavesKingInCheck { mv });
        }

        self.history.push(Snapshot {
            meta: self.pos.meta,
            captured,
            piece_bb: self.pos.piece_bb,
        });
        self.pos = scratch;

        debug_assert_eq!(self.pos.check_play_invariants(), Ok(()));
        Ok(())
    }

    /// Undo the most recent committed move. Returns `false` (and does
    /// nothing) when there is no history.
    pub fn unmake_move(&mut self) -> bool {
        let Some(snapshot) = self.history.pop() else {
            return false;
        };
        self.pos.meta = snapshot.meta;
        self.pos.piece_bb = snapshot.piece_bb;
        self.pos.rebuild_mailbox();

        debug_assert_eq!(self.pos.check_play_invariants(), Ok(()));
        true
    }

    /// Most recent undo record, if any.
    pub fn last_snapshot(&self) -> Option<&Snapshot> {
        self.history.last()
    }

    // Display -----------------------------------------------------

    /// ASCII diagram, rank 8 at the top. With `debug` set, the metadata
    /// lines and the raw mailbox values are included as well.
    pub fn render(&self, debug: bool) -> String {
        Diagram { pos: &self.pos, debug }.to_string()
    }
}

struct Diagram<'a> {
    pos: &'a Position,
    debug: bool,
}

impl fmt::Display for Diagram<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let meta = &self.pos.meta;
        if self.debug {
            let ep = meta.ep.map(|s| square_name(s as usize)).unwrap_or_else(|| "-".to_string());
            writeln!(f, "Side to move: {:?}", meta.side)?;
            writeln!(f, "Castling rights: {}", castling_to_string(meta.castling))?;
            writeln!(f, "En passant: {}", ep)?;
            writeln!(f, "Half move clock: {}", meta.halfmove)?;
            writeln!(f, "Full move number: {}", meta.fullmove)?;
        }
        for rank in (0..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8 {
                write!(f, "{} ", self.pos.mailbox[rank * 8 + file].to_char())?;
            }
            writeln!(f)?;
        }
        writeln!(f, "  a b c d e f g h")?;
        if self.debug {
            writeln!(f, "\nMailbox values:")?;
            for rank in (0..8).rev() {
                write!(f, "{} ", rank + 1)?;
                for file in 0..8 {
                    write!(f, "{:>3}", self.pos.mailbox[rank * 8 + file] as u8)?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(AttackTables::shared())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let diagram = Diagram {
            pos: &self.pos,
            debug: false,
        };
        fmt::Display::fmt(&diagram, f)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("meta", &self.pos.meta)
            .field("history", &self.history.len())
            .finish()
    }
}
