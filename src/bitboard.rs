use crate::defs::Square;

pub struct BitBoard;

/// Constant values
/// Ranks and files are in 1-8 notation, rank 8 occupies the low byte
impl BitBoard {
    pub const EMPTY: u64 = 0;
    pub const FULL: u64 = !0;
    pub const RANK_8: u64 = 0x00000000000000FF;
    pub const RANK_7: u64 = BitBoard::RANK_8 << 8;
    pub const RANK_2: u64 = BitBoard::RANK_8 << 48;
    pub const RANK_1: u64 = BitBoard::RANK_8 << 56;
    pub const FILE_A: u64 = 0x0101010101010101;
    pub const FILE_H: u64 = BitBoard::FILE_A << 7;
}

impl BitBoard {
    pub const fn from_sq(sq: Square) -> u64 {
        1 << sq
    }

    pub fn set_bit(bb: &mut u64, sq: Square) {
        *bb |= 1 << sq;
    }

    pub fn pop_bit(bb: &mut u64, sq: Square) {
        *bb &= !(1 << sq);
    }

    pub const fn contains(bb: u64, sq: Square) -> bool {
        BitBoard::from_sq(sq) & bb != 0
    }

    pub const fn count(bb: u64) -> u32 {
        bb.count_ones()
    }

    /// Pop the lsb on the provided bitboard and return its index
    ///
    /// Must not be called on an empty bitboard
    pub fn pop_lsb(bb: &mut u64) -> Square {
        debug_assert!(*bb != 0);
        let lsb = bb.trailing_zeros() as Square;
        *bb &= *bb - 1;
        lsb
    }

    /// Index of the least significant bit, 64 if the bitboard is empty
    pub const fn to_sq(bb: u64) -> Square {
        bb.trailing_zeros() as Square
    }

    pub const fn more_than_one(bb: u64) -> bool {
        bb & bb.wrapping_sub(1) != 0
    }
}
