#![allow(dead_code)]

use std::sync::{Arc, OnceLock};

use magicboard::types::{
    parse_square, CASTLE_BLACK_KING, CASTLE_BLACK_QUEEN, CASTLE_WHITE_KING, CASTLE_WHITE_QUEEN,
};
use magicboard::{AttackTables, Board, Color, Piece};
use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, Move as ShakMove, Position, Role};

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

pub fn tables() -> Arc<AttackTables> {
    static TABLES: OnceLock<Arc<AttackTables>> = OnceLock::new();
    TABLES.get_or_init(AttackTables::shared).clone()
}

/// Build a board from FEN text through the placement API.
pub fn board_from_fen(fen: &str) -> Board {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    assert!(fields.len() >= 4, "FEN needs at least four fields: {fen}");

    let mut board = Board::empty(tables());
    board.clear();

    let mut rank = 7usize;
    let mut file = 0usize;
    for ch in fields[0].chars() {
        match ch {
            '/' => {
                rank -= 1;
                file = 0;
            }
            '1'..='8' => file += ch as usize - '0' as usize,
            _ => {
                let piece = Piece::from_char(ch).unwrap_or_else(|| panic!("bad piece {ch}"));
                board.put_piece(rank * 8 + file, piece);
                file += 1;
            }
        }
    }

    let side = match fields[1] {
        "w" => Color::White,
        "b" => Color::Black,
        other => panic!("bad side {other}"),
    };
    board.set_side_to_move(side);

    let mut rights = 0u8;
    for ch in fields[2].chars() {
        rights |= match ch {
            'K' => CASTLE_WHITE_KING,
            'Q' => CASTLE_WHITE_QUEEN,
            'k' => CASTLE_BLACK_KING,
            'q' => CASTLE_BLACK_QUEEN,
            _ => 0,
        };
    }
    board.set_castling_rights(rights);
    board.set_en_passant(parse_square(fields[3]));

    let halfmove = fields.get(4).and_then(|s| s.parse().ok()).unwrap_or(0);
    let fullmove = fields.get(5).and_then(|s| s.parse().ok()).unwrap_or(1);
    board.set_clocks(halfmove, fullmove);

    board
}

/// FEN text of the board's placement, side and clocks. Castling and
/// en-passant fields are written as "-": neither is generated here, and the
/// reference enumerator filters those moves out anyway. Shakmaty rejects
/// pawns on a back rank, so only positions without one convert.
pub fn to_fen(board: &Board) -> String {
    let mut placement = String::new();
    for rank in (0..8).rev() {
        let mut empty = 0;
        for file in 0..8 {
            let piece = board.piece_at(rank * 8 + file);
            if piece.is_empty() {
                empty += 1;
                continue;
            }
            if empty > 0 {
                placement.push_str(&empty.to_string());
                empty = 0;
            }
            placement.push(piece.to_char());
        }
        if empty > 0 {
            placement.push_str(&empty.to_string());
        }
        if rank > 0 {
            placement.push('/');
        }
    }

    let side = match board.side_to_move() {
        Color::White => "w",
        Color::Black => "b",
    };
    format!(
        "{} {} - - {} {}",
        placement,
        side,
        board.halfmove_clock(),
        board.fullmove_number()
    )
}

pub fn to_shakmaty(board: &Board) -> Chess {
    let fen: Fen = to_fen(board).parse().expect("writer produces valid FEN");
    fen.into_position(CastlingMode::Standard)
        .expect("shakmaty should accept the position")
}

/// Shakmaty's legal moves under this crate's rules: no castling and no en
/// passant, and a pawn reaching the last rank stays a pawn. The four
/// promotion choices of a from/to pair collapse into one plain pawn move.
pub fn restricted_moves(pos: &Chess) -> Vec<ShakMove> {
    pos.legal_moves()
        .iter()
        .filter(|m| !m.is_castle() && !m.is_en_passant())
        .filter_map(|m| match m {
            ShakMove::Normal {
                role,
                from,
                capture,
                to,
                promotion: Some(Role::Queen),
            } => Some(ShakMove::Normal {
                role: *role,
                from: *from,
                capture: *capture,
                to: *to,
                promotion: None,
            }),
            ShakMove::Normal {
                promotion: Some(_), ..
            } => None,
            other => Some(other.clone()),
        })
        .collect()
}

pub fn shakmaty_text(m: &ShakMove) -> String {
    let from = m.from().expect("standard chess moves have a source");
    format!("{}{}", from, m.to())
}

/// Restricted reference moves as sorted coordinate text.
pub fn reference_moves(pos: &Chess) -> Vec<String> {
    let mut moves: Vec<String> = restricted_moves(pos).iter().map(shakmaty_text).collect();
    moves.sort();
    moves
}

pub fn reference_perft(pos: &Chess, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut nodes = 0;
    for m in restricted_moves(pos) {
        let mut next = pos.clone();
        next.play_unchecked(&m);
        nodes += reference_perft(&next, depth - 1);
    }
    nodes
}

/// The engine's legal moves as sorted coordinate text.
pub fn legal_texts(board: &Board) -> Vec<String> {
    let mut moves: Vec<String> = board.legal_moves().iter().map(|m| m.to_string()).collect();
    moves.sort();
    moves
}
