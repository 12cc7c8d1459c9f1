// Square mapping: A1=0, B1=1, ..., H8=63 (rank * 8 + file)

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];
}

/// Content of a single square: empty, or one of the twelve colored pieces.
///
/// The discriminant of a non-empty piece is its bitboard index
/// (white pawn..king = 0..5, black pawn..king = 6..11).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Piece {
    WhitePawn = 0,
    WhiteKnight = 1,
    WhiteBishop = 2,
    WhiteRook = 3,
    WhiteQueen = 4,
    WhiteKing = 5,
    BlackPawn = 6,
    BlackKnight = 7,
    BlackBishop = 8,
    BlackRook = 9,
    BlackQueen = 10,
    BlackKing = 11,
    #[default]
    Empty = 12,
}

impl Piece {
    /// Non-empty pieces in bitboard-index order.
    pub const ALL: [Piece; 12] = [
        Piece::WhitePawn,
        Piece::WhiteKnight,
        Piece::WhiteBishop,
        Piece::WhiteRook,
        Piece::WhiteQueen,
        Piece::WhiteKing,
        Piece::BlackPawn,
        Piece::BlackKnight,
        Piece::BlackBishop,
        Piece::BlackRook,
        Piece::BlackQueen,
        Piece::BlackKing,
    ];

    pub fn new(kind: PieceKind, color: Color) -> Piece {
        Piece::ALL[piece_index(kind, color)]
    }

    pub fn is_empty(self) -> bool {
        self == Piece::Empty
    }

    pub fn kind(self) -> Option<PieceKind> {
        if self.is_empty() {
            None
        } else {
            Some(PieceKind::ALL[self as usize % 6])
        }
    }

    pub fn color(self) -> Option<Color> {
        match self as usize {
            0..=5 => Some(Color::White),
            6..=11 => Some(Color::Black),
            _ => None,
        }
    }

    /// Bitboard index, `None` for an empty square.
    pub fn index(self) -> Option<usize> {
        if self.is_empty() {
            None
        } else {
            Some(self as usize)
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Piece::WhitePawn => 'P',
            Piece::WhiteKnight => 'N',
            Piece::WhiteBishop => 'B',
            Piece::WhiteRook => 'R',
            Piece::WhiteQueen => 'Q',
            Piece::WhiteKing => 'K',
            Piece::BlackPawn => 'p',
            Piece::BlackKnight => 'n',
            Piece::BlackBishop => 'b',
            Piece::BlackRook => 'r',
            Piece::BlackQueen => 'q',
            Piece::BlackKing => 'k',
            Piece::Empty => '.',
        }
    }

    pub fn from_char(ch: char) -> Option<Piece> {
        let piece = match ch {
            'P' => Piece::WhitePawn,
            'N' => Piece::WhiteKnight,
            'B' => Piece::WhiteBishop,
            'R' => Piece::WhiteRook,
            'Q' => Piece::WhiteQueen,
            'K' => Piece::WhiteKing,
            'p' => Piece::BlackPawn,
            'n' => Piece::BlackKnight,
            'b' => Piece::BlackBishop,
            'r' => Piece::BlackRook,
            'q' => Piece::BlackQueen,
            'k' => Piece::BlackKing,
            _ => return None,
        };
        Some(piece)
    }
}

// Index into the piece_bb array: white piece = kind; black piece = 6 + kind
pub fn piece_index(kind: PieceKind, color: Color) -> usize {
    (color as usize) * 6 + (kind as usize)
}

// Castling rights bits: KQkq
pub const CASTLE_WHITE_KING: u8 = 0b1000;
pub const CASTLE_WHITE_QUEEN: u8 = 0b0100;
pub const CASTLE_BLACK_KING: u8 = 0b0010;
pub const CASTLE_BLACK_QUEEN: u8 = 0b0001;
pub const CASTLE_ALL: u8 = 0b1111;

/// Castling rights in the usual "KQkq" text form, "-" when none remain.
pub fn castling_to_string(rights: u8) -> String {
    let mut s = String::new();
    for (bit, ch) in [
        (CASTLE_WHITE_KING, 'K'),
        (CASTLE_WHITE_QUEEN, 'Q'),
        (CASTLE_BLACK_KING, 'k'),
        (CASTLE_BLACK_QUEEN, 'q'),
    ] {
        if rights & bit != 0 {
            s.push(ch);
        }
    }
    if s.is_empty() {
        s.push('-');
    }
    s
}

#[inline]
pub fn rank_of(sq: usize) -> usize {
    sq / 8
}

#[inline]
pub fn file_of(sq: usize) -> usize {
    sq % 8
}

/// Convert a square index (0-63) to algebraic notation (e.g., 0 -> "a1", 63 -> "h8")
pub fn square_name(sq: usize) -> String {
    let file_char = (b'a' + file_of(sq) as u8) as char;
    let rank_char = (b'1' + rank_of(sq) as u8) as char;
    format!("{}{}", file_char, rank_char)
}

/// Convert algebraic notation to a square index (e.g., "e2" -> 12, "a1" -> 0)
pub fn parse_square(name: &str) -> Option<usize> {
    let bytes = name.as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    let (file, rank) = (bytes[0], bytes[1]);
    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return None;
    }
    Some((rank - b'1') as usize * 8 + (file - b'a') as usize)
}

/// A move as an ordered (from, to) pair of squares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: u8,
    pub to: u8,
}

impl Move {
    pub fn new(from: usize, to: usize) -> Move {
        Move {
            from: from as u8,
            to: to as u8,
        }
    }

    pub fn from_sq(self) -> usize {
        self.from as usize
    }

    pub fn to_sq(self) -> usize {
        self.to as usize
    }

    /// Parse coordinate text such as "e2e4".
    pub fn parse(text: &str) -> Option<Move> {
        if text.len() != 4 || !text.is_ascii() {
            return None;
        }
        let from = parse_square(&text[0..2])?;
        let to = parse_square(&text[2..4])?;
        Some(Move::new(from, to))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            square_name(self.from_sq()),
            square_name(self.to_sq())
        )
    }
}
