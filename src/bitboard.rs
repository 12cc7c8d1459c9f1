// Bitboard masks, iterators and helpers shared by the attack tables and move generation

pub type Bitboard = u64;

// File masks (A is column 0, H column 7)
pub const FILE_A: Bitboard = 0x0101010101010101;
pub const FILE_H: Bitboard = 0x8080808080808080;

pub const NOT_FILE_A: Bitboard = !FILE_A;
pub const NOT_FILE_H: Bitboard = !FILE_H;

// Rank masks (A1 is square 0)
pub const RANK_1: Bitboard = 0x00000000000000FF;
pub const RANK_2: Bitboard = 0x000000000000FF00;
pub const RANK_7: Bitboard = 0x00FF000000000000;
pub const RANK_8: Bitboard = 0xFF00000000000000;

// Squares where rank + file is even (a1, c1, ..., h8)
pub const DARK_SQUARES: Bitboard = 0xAA55AA55AA55AA55;

#[inline]
pub fn square_bb(sq: usize) -> Bitboard {
    1u64 << sq
}

// Bit operations
#[inline]
pub fn pop_lsb(bb: &mut Bitboard) -> Option<usize> {
    if *bb == 0 {
        return None;
    }
    let lsb = bb.trailing_zeros() as usize;
    *bb &= *bb - 1;
    Some(lsb)
}

#[inline]
pub fn lsb_index(bb: Bitboard) -> Option<usize> {
    if bb == 0 {
        None
    } else {
        Some(bb.trailing_zeros() as usize)
    }
}

#[inline]
pub fn count_bits(bb: Bitboard) -> u32 {
    bb.count_ones()
}

pub struct BitIter {
    bb: Bitboard,
}

impl Iterator for BitIter {
    type Item = usize;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        pop_lsb(&mut self.bb)
    }
}

/// Iterate set squares in ascending index order.
#[inline]
pub fn iter_bits(bb: Bitboard) -> BitIter {
    BitIter { bb }
}

/// Square color as the parity of rank + file (0 for a1's color, 1 otherwise).
#[inline]
pub fn square_color(sq: usize) -> usize {
    (sq / 8 + sq % 8) & 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iter_bits_is_ascending() {
        let bb = square_bb(40) | square_bb(3) | square_bb(17);
        assert_eq!(iter_bits(bb).collect::<Vec<_>>(), vec![3, 17, 40]);
        assert_eq!(iter_bits(0).next(), None);
    }

    #[test]
    fn pop_lsb_drains() {
        let mut bb = square_bb(0) | square_bb(63);
        assert_eq!(pop_lsb(&mut bb), Some(0));
        assert_eq!(pop_lsb(&mut bb), Some(63));
        assert_eq!(pop_lsb(&mut bb), None);
        assert_eq!(lsb_index(square_bb(9)), Some(9));
        assert_eq!(count_bits(RANK_2 | FILE_A), 15);
    }

    #[test]
    fn square_color_matches_dark_mask() {
        for sq in 0..64 {
            let dark = DARK_SQUARES & square_bb(sq) != 0;
            assert_eq!(dark, square_color(sq) == 0, "square {}", sq);
        }
    }
}
