use crate::defs::Square;

/// Returns `(file, rank)`, both zero based, so a1 is `(0, 0)` and h8 is `(7, 7)`
pub const fn coord_from_square(sq: Square) -> (i8, i8) {
    ((sq % 8) as i8, 7 - (sq / 8) as i8)
}

/// Inverse of [`coord_from_square`], `None` when the coordinate is off the board
pub const fn square_from_coord(file: i8, rank: i8) -> Option<Square> {
    if is_in_board(file, rank) {
        Some(((7 - rank) * 8 + file) as Square)
    } else {
        None
    }
}

pub const fn is_in_board(file: i8, rank: i8) -> bool {
    file >= 0 && file < 8 && rank >= 0 && rank < 8
}

/// Parse a square like `e4`
pub fn square_from_string(s: &str) -> Option<Square> {
    let bytes = s.as_bytes();
    if bytes.len() != 2 {
        return None;
    }

    let file = bytes[0].wrapping_sub(b'a') as i8;
    let rank = bytes[1].wrapping_sub(b'1') as i8;

    square_from_coord(file, rank)
}

pub fn square_to_string(sq: Square) -> String {
    let (file, rank) = coord_from_square(sq);
    let file_char = (b'a' + file as u8) as char;
    let rank_char = (b'1' + rank as u8) as char;

    format!("{file_char}{rank_char}")
}

/// `const` alternative to [`std::cmp::max`]
pub const fn b_max(a: i8, b: i8) -> i8 {
    if a > b {
        a
    } else {
        b
    }
}
