use crate::{
    bitboard::BitBoard,
    defs::{Color, Square, NUM_SIDES},
    utils::{coord_from_square, square_from_coord},
};

pub const KING_ATK: [u64; 64] = gen_leaper(&KING_STEPS);
pub const KNIGHT_ATK: [u64; 64] = gen_leaper(&KNIGHT_STEPS);
pub const PAWN_ATK: [[u64; 64]; NUM_SIDES] = gen_pawn();

const KING_STEPS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

const KNIGHT_STEPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

#[inline]
pub const fn knight_attacks(sq: Square) -> u64 {
    KNIGHT_ATK[sq as usize]
}

#[inline]
pub const fn king_attacks(sq: Square) -> u64 {
    KING_ATK[sq as usize]
}

/// Squares attacked by a pawn of `side` standing on `sq`
#[inline]
pub const fn pawn_attacks(sq: Square, side: Color) -> u64 {
    PAWN_ATK[side.as_usize()][sq as usize]
}

/// Set-wise attacks of all pawns in `pawns`
#[inline]
pub const fn pawn_caps(pawns: u64, side: Color) -> u64 {
    match side {
        Color::White => ((pawns & !BitBoard::FILE_A) >> 9) | ((pawns & !BitBoard::FILE_H) >> 7),
        Color::Black => ((pawns & !BitBoard::FILE_A) << 7) | ((pawns & !BitBoard::FILE_H) << 9),
    }
}

/// Set-wise single step forward
#[inline]
pub const fn pawn_push(pawns: u64, side: Color) -> u64 {
    match side {
        Color::White => pawns >> 8,
        Color::Black => pawns << 8,
    }
}

const fn gen_leaper(steps: &[(i8, i8); 8]) -> [u64; 64] {
    let mut table = [0; 64];
    let mut src = 0;

    while src < 64 {
        let (file, rank) = coord_from_square(src as Square);
        let mut i = 0;

        while i < steps.len() {
            let (df, dr) = steps[i];
            if let Some(target) = square_from_coord(file + df, rank + dr) {
                table[src] |= BitBoard::from_sq(target);
            }
            i += 1;
        }

        src += 1;
    }

    table
}

const fn gen_pawn() -> [[u64; 64]; NUM_SIDES] {
    let mut pawn_atk = [[0; 64]; NUM_SIDES];
    let mut src = 0;

    while src < 64 {
        let bb = BitBoard::from_sq(src as Square);
        pawn_atk[Color::White.as_usize()][src] = pawn_caps(bb, Color::White);
        pawn_atk[Color::Black.as_usize()][src] = pawn_caps(bb, Color::Black);
        src += 1;
    }

    pawn_atk
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{defs::sq, utils::square_from_string};

    fn bb_of(squares: &[&str]) -> u64 {
        squares
            .iter()
            .map(|s| BitBoard::from_sq(square_from_string(s).unwrap()))
            .fold(0, |acc, b| acc | b)
    }

    #[test]
    fn leaper_tables_respect_edges() {
        assert_eq!(knight_attacks(sq::A1), bb_of(&["b3", "c2"]));
        assert_eq!(king_attacks(sq::H8), bb_of(&["g8", "g7", "h7"]));
        assert_eq!(BitBoard::count(knight_attacks(square_from_string("d4").unwrap())), 8);
    }

    #[test]
    fn pawns_attack_forward_diagonals() {
        let e4 = square_from_string("e4").unwrap();
        assert_eq!(pawn_attacks(e4, Color::White), bb_of(&["d5", "f5"]));
        assert_eq!(pawn_attacks(e4, Color::Black), bb_of(&["d3", "f3"]));
        assert_eq!(pawn_attacks(sq::A1 - 8, Color::White), bb_of(&["b3"]));
    }
}
