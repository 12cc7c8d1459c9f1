//! Attack tables for every piece class.
//!
//! Knights, kings and pawns get plain per-square jump tables. Rooks and
//! bishops use "magic bitboards": the occupancy bits that can block a slider
//! (its reachability mask) are multiplied by a per-square magic number and
//! shifted down, which hashes every blocker configuration to a slot in a
//! dense table holding the precomputed attack set.
//!
//! The tables are built once by [`AttackTables::new`] and are read-only
//! afterwards, so a single `Arc<AttackTables>` can back any number of boards.

use std::sync::Arc;

use crate::bitboard::{count_bits, iter_bits, square_bb, Bitboard, NOT_FILE_A, NOT_FILE_H};
use crate::types::Color;

/// Slots reserved per square in each sliding-piece table (2^12 covers the
/// largest rook mask).
pub const MAGIC_TABLE_SIZE: usize = 4096;

/// Sliding piece classes served by the magic tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slider {
    Rook,
    Bishop,
}

/// Magic entry for a single square
#[derive(Debug, Clone, Copy, Default)]
pub struct MagicEntry {
    pub mask: Bitboard, // Relevant occupancy mask (excludes edges)
    pub magic: u64,     // Magic number
    pub shift: u32,     // 64 - popcount(mask)
    offset: usize,      // Offset into attack table
}

impl MagicEntry {
    #[inline]
    fn index(&self, occ: Bitboard) -> usize {
        ((occ & self.mask).wrapping_mul(self.magic) >> self.shift) as usize
    }
}

/// Pseudo-random number generator based on the XORSHIFT64 algorithm.
struct Random(u64);

impl Random {
    fn new() -> Self {
        Self(0xFFAAB58C5833FE89)
    }

    fn next_u64(&mut self) -> u64 {
        let mut number = self.0;
        number ^= number << 13;
        number ^= number >> 7;
        number ^= number << 17;
        self.0 = number;
        number
    }

    /// Candidates with few set bits make good magics.
    fn sparse_u64(&mut self) -> u64 {
        self.next_u64() & self.next_u64() & self.next_u64()
    }
}

pub struct AttackTables {
    knight: [Bitboard; 64],
    king: [Bitboard; 64],
    pawn: [[Bitboard; 64]; 2],
    rook_entries: [MagicEntry; 64],
    bishop_entries: [MagicEntry; 64],
    rook_attacks: Vec<Bitboard>,
    bishop_attacks: Vec<Bitboard>,
    // between[a * 64 + b]: squares strictly between a and b on a shared line
    between: Vec<Bitboard>,
}

// ============================================================================
// MASK GENERATION (relevant occupancy squares, excluding edges)
// ============================================================================

/// Generate rook mask for a square (relevant blockers, excluding edge squares)
pub fn rook_mask(sq: usize) -> Bitboard {
    let mut mask = 0u64;
    let rank = sq / 8;
    let file = sq % 8;

    // North (exclude rank 8)
    for r in (rank + 1)..7 {
        mask |= square_bb(r * 8 + file);
    }
    // South (exclude rank 1)
    for r in 1..rank {
        mask |= square_bb(r * 8 + file);
    }
    // East (exclude file H)
    for f in (file + 1)..7 {
        mask |= square_bb(rank * 8 + f);
    }
    // West (exclude file A)
    for f in 1..file {
        mask |= square_bb(rank * 8 + f);
    }

    mask
}

/// Generate bishop mask for a square
pub fn bishop_mask(sq: usize) -> Bitboard {
    let rank = sq as i32 / 8;
    let file = sq as i32 % 8;
    let mut mask = 0u64;

    for (dr, df) in [(1, 1), (1, -1), (-1, 1), (-1, -1)] {
        let (mut r, mut f) = (rank + dr, file + df);
        while (1..7).contains(&r) && (1..7).contains(&f) {
            mask |= square_bb((r * 8 + f) as usize);
            r += dr;
            f += df;
        }
    }

    mask
}

// ============================================================================
// ATTACK GENERATION (ray casting, used to build and check the tables)
// ============================================================================

fn ray_attacks(sq: usize, occ: Bitboard, directions: &[(i32, i32); 4]) -> Bitboard {
    let rank = sq as i32 / 8;
    let file = sq as i32 % 8;
    let mut attacks = 0u64;

    for &(dr, df) in directions {
        let (mut r, mut f) = (rank + dr, file + df);
        while (0..8).contains(&r) && (0..8).contains(&f) {
            let bit = square_bb((r * 8 + f) as usize);
            attacks |= bit;
            if occ & bit != 0 {
                break;
            }
            r += dr;
            f += df;
        }
    }

    attacks
}

/// Rook attacks by ray casting until the first blocker (inclusive) or the edge.
pub fn rook_attacks_slow(sq: usize, occ: Bitboard) -> Bitboard {
    ray_attacks(sq, occ, &[(1, 0), (-1, 0), (0, 1), (0, -1)])
}

/// Bishop attacks by ray casting until the first blocker (inclusive) or the edge.
pub fn bishop_attacks_slow(sq: usize, occ: Bitboard) -> Bitboard {
    ray_attacks(sq, occ, &[(1, 1), (1, -1), (-1, 1), (-1, -1)])
}

/// Spread the low bits of `index` onto the set bits of `mask`, lowest first.
pub fn index_to_occupancy(index: usize, mask: Bitboard) -> Bitboard {
    let mut occ = 0u64;
    for (i, sq) in iter_bits(mask).enumerate() {
        if index & (1 << i) != 0 {
            occ |= square_bb(sq);
        }
    }
    occ
}

// ============================================================================
// TABLE INITIALIZATION
// ============================================================================

impl Slider {
    fn mask(self, sq: usize) -> Bitboard {
        match self {
            Slider::Rook => rook_mask(sq),
            Slider::Bishop => bishop_mask(sq),
        }
    }

    fn attacks_slow(self, sq: usize, occ: Bitboard) -> Bitboard {
        match self {
            Slider::Rook => rook_attacks_slow(sq, occ),
            Slider::Bishop => bishop_attacks_slow(sq, occ),
        }
    }
}

/// Search a magic for `sq` and fill its slice of `table` (starting at `offset`).
///
/// A candidate is accepted only when no two occupancy subsets with different
/// attack sets land on the same slot.
fn find_magic(
    slider: Slider,
    sq: usize,
    offset: usize,
    table: &mut [Bitboard],
    rng: &mut Random,
) -> MagicEntry {
    let mask = slider.mask(sq);
    let bits = count_bits(mask);
    let shift = 64 - bits;
    let subsets = 1usize << bits;

    let occupancies: Vec<Bitboard> = (0..subsets).map(|i| index_to_occupancy(i, mask)).collect();
    let reference: Vec<Bitboard> = occupancies
        .iter()
        .map(|&occ| slider.attacks_slow(sq, occ))
        .collect();

    // epoch[i] == attempt marks slot i as written during the current attempt
    let mut epoch = vec![0u32; subsets];
    let mut slots = vec![0u64; subsets];
    let mut attempt = 0u32;

    loop {
        let magic = rng.sparse_u64();
        if count_bits(mask.wrapping_mul(magic) & 0xFF00_0000_0000_0000) < 6 {
            continue;
        }
        attempt += 1;

        let entry = MagicEntry {
            mask,
            magic,
            shift,
            offset,
        };
        let mut ok = true;
        for (occ, &attacks) in occupancies.iter().zip(&reference) {
            let idx = entry.index(*occ);
            if epoch[idx] != attempt {
                epoch[idx] = attempt;
                slots[idx] = attacks;
            } else if slots[idx] != attacks {
                ok = false;
                break;
            }
        }

        if ok {
            for idx in 0..subsets {
                if epoch[idx] == attempt {
                    table[offset + idx] = slots[idx];
                }
            }
            return entry;
        }
    }
}

fn init_knight_attacks() -> [Bitboard; 64] {
    const KNIGHT_OFFSETS: [(i8, i8); 8] = [
        (-2, -1),
        (-2, 1),
        (-1, -2),
        (-1, 2),
        (1, -2),
        (1, 2),
        (2, -1),
        (2, 1),
    ];
    init_jump_attacks(&KNIGHT_OFFSETS)
}

fn init_king_attacks() -> [Bitboard; 64] {
    const KING_OFFSETS: [(i8, i8); 8] = [
        (-1, -1),
        (-1, 0),
        (-1, 1),
        (0, -1),
        (0, 1),
        (1, -1),
        (1, 0),
        (1, 1),
    ];
    init_jump_attacks(&KING_OFFSETS)
}

fn init_jump_attacks(offsets: &[(i8, i8); 8]) -> [Bitboard; 64] {
    let mut attacks = [0u64; 64];

    for (sq, attack_mask) in attacks.iter_mut().enumerate() {
        let file = (sq % 8) as i8;
        let rank = (sq / 8) as i8;

        for (dx, dy) in offsets {
            let new_file = file + dx;
            let new_rank = rank + dy;
            if (0..8).contains(&new_file) && (0..8).contains(&new_rank) {
                *attack_mask |= square_bb((new_rank as usize) * 8 + (new_file as usize));
            }
        }
    }
    attacks
}

// side 0: white (captures toward rank 8), side 1: black (toward rank 1)
fn init_pawn_attacks() -> [[Bitboard; 64]; 2] {
    let mut attacks = [[0u64; 64]; 2];
    for sq in 0..64 {
        let bb = square_bb(sq);
        attacks[Color::White as usize][sq] = ((bb & NOT_FILE_A) << 7) | ((bb & NOT_FILE_H) << 9);
        attacks[Color::Black as usize][sq] = ((bb & NOT_FILE_A) >> 9) | ((bb & NOT_FILE_H) >> 7);
    }
    attacks
}

fn init_between() -> Vec<Bitboard> {
    let mut between = vec![0u64; 64 * 64];
    for a in 0..64 {
        for b in 0..64 {
            if a == b {
                continue;
            }
            let target = square_bb(b);
            let line = if rook_attacks_slow(a, 0) & target != 0 {
                rook_attacks_slow(a, target) & rook_attacks_slow(b, square_bb(a))
            } else if bishop_attacks_slow(a, 0) & target != 0 {
                bishop_attacks_slow(a, target) & bishop_attacks_slow(b, square_bb(a))
            } else {
                0
            };
            between[a * 64 + b] = line;
        }
    }
    between
}

impl AttackTables {
    /// Build every table. Magic numbers are searched with a fixed seed, so
    /// the result is identical on every run.
    pub fn new() -> Self {
        let mut rng = Random::new();
        let mut rook_entries = [MagicEntry::default(); 64];
        let mut bishop_entries = [MagicEntry::default(); 64];
        let mut rook_attacks = vec![0u64; 64 * MAGIC_TABLE_SIZE];
        let mut bishop_attacks = vec![0u64; 64 * MAGIC_TABLE_SIZE];

        for sq in 0..64 {
            let offset = sq * MAGIC_TABLE_SIZE;
            rook_entries[sq] = find_magic(Slider::Rook, sq, offset, &mut rook_attacks, &mut rng);
            bishop_entries[sq] =
                find_magic(Slider::Bishop, sq, offset, &mut bishop_attacks, &mut rng);
        }

        Self {
            knight: init_knight_attacks(),
            king: init_king_attacks(),
            pawn: init_pawn_attacks(),
            rook_entries,
            bishop_entries,
            rook_attacks,
            bishop_attacks,
            between: init_between(),
        }
    }

    /// Build the tables behind a shared handle.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn magic_entry(&self, slider: Slider, sq: usize) -> &MagicEntry {
        match slider {
            Slider::Rook => &self.rook_entries[sq],
            Slider::Bishop => &self.bishop_entries[sq],
        }
    }

    /// Sliding attacks for `slider` on `sq`; own pieces are not excluded.
    #[inline]
    pub fn slider_attacks(&self, slider: Slider, sq: usize, occ: Bitboard) -> Bitboard {
        match slider {
            Slider::Rook => self.rook_attacks(sq, occ),
            Slider::Bishop => self.bishop_attacks(sq, occ),
        }
    }

    #[inline]
    pub fn rook_attacks(&self, sq: usize, occ: Bitboard) -> Bitboard {
        let entry = &self.rook_entries[sq];
        self.rook_attacks[entry.offset + entry.index(occ)]
    }

    #[inline]
    pub fn bishop_attacks(&self, sq: usize, occ: Bitboard) -> Bitboard {
        let entry = &self.bishop_entries[sq];
        self.bishop_attacks[entry.offset + entry.index(occ)]
    }

    #[inline]
    pub fn queen_attacks(&self, sq: usize, occ: Bitboard) -> Bitboard {
        self.rook_attacks(sq, occ) | self.bishop_attacks(sq, occ)
    }

    #[inline]
    pub fn knight_attacks(&self, sq: usize) -> Bitboard {
        self.knight[sq]
    }

    #[inline]
    pub fn king_attacks(&self, sq: usize) -> Bitboard {
        self.king[sq]
    }

    /// Squares a pawn of `color` on `sq` attacks.
    #[inline]
    pub fn pawn_attacks(&self, color: Color, sq: usize) -> Bitboard {
        self.pawn[color as usize][sq]
    }

    /// Squares strictly between `a` and `b`, empty unless they share a line.
    #[inline]
    pub fn between(&self, a: usize, b: usize) -> Bitboard {
        self.between[a * 64 + b]
    }
}

impl Default for AttackTables {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
