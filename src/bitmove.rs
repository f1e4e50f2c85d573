use std::fmt;

use crate::{
    defs::{Piece, PieceType, Square},
    utils::square_to_string,
};

/// Move packed into a `u32`
///
/// Bits 0-5 are for the source square,
///
/// Bits 6-11 are for the destination square,
///
/// Bits 12-15 hold the moving piece, bits 16-19 the captured piece and
/// bits 20-23 the promotion piece, each stored as index + 1 so that zero
/// means `Piece::None`
///
/// Bits 24-27 are flags
///
/// Two moves are equal iff every field matches
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BitMove(u32);

pub struct MoveFlag;

impl MoveFlag {
    pub const QUIET: u32 = 0;
    pub const DOUBLE_PAWN_PUSH: u32 = 1;
    pub const EN_PASSANT: u32 = 2;
    pub const CASTLE_SHORT: u32 = 4;
    pub const CASTLE_LONG: u32 = 8;
}

const SQ_MASK: u32 = 0b11_1111;
const PIECE_MASK: u32 = 0b1111;

const fn encode_piece(piece: Piece) -> u32 {
    match piece {
        Piece::None => 0,
        _ => piece.as_usize() as u32 + 1,
    }
}

const fn decode_piece(bits: u32) -> Piece {
    match bits {
        0 => Piece::None,
        _ => Piece::from_index(bits as usize - 1),
    }
}

impl BitMove {
    pub const NULL: BitMove = BitMove(0);

    pub const fn new(
        src: Square,
        dest: Square,
        piece: Piece,
        captured: Piece,
        promotion: Piece,
        flag: u32,
    ) -> Self {
        BitMove(
            src as u32
                | (dest as u32) << 6
                | encode_piece(piece) << 12
                | encode_piece(captured) << 16
                | encode_piece(promotion) << 20
                | flag << 24,
        )
    }

    pub const fn quiet(src: Square, dest: Square, piece: Piece) -> Self {
        BitMove::new(src, dest, piece, Piece::None, Piece::None, MoveFlag::QUIET)
    }

    pub const fn capture(src: Square, dest: Square, piece: Piece, captured: Piece) -> Self {
        BitMove::new(src, dest, piece, captured, Piece::None, MoveFlag::QUIET)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    pub const fn src(self) -> Square {
        (self.0 & SQ_MASK) as Square
    }

    pub const fn dest(self) -> Square {
        (self.0 >> 6 & SQ_MASK) as Square
    }

    pub const fn piece(self) -> Piece {
        decode_piece(self.0 >> 12 & PIECE_MASK)
    }

    pub const fn captured(self) -> Piece {
        decode_piece(self.0 >> 16 & PIECE_MASK)
    }

    pub const fn promotion(self) -> Piece {
        decode_piece(self.0 >> 20 & PIECE_MASK)
    }

    pub const fn flag(self) -> u32 {
        self.0 >> 24
    }

    pub const fn is_cap(self) -> bool {
        !self.captured().is_none()
    }

    pub const fn is_prom(self) -> bool {
        !self.promotion().is_none()
    }

    pub const fn is_double_push(self) -> bool {
        self.flag() & MoveFlag::DOUBLE_PAWN_PUSH != 0
    }

    pub const fn is_ep(self) -> bool {
        self.flag() & MoveFlag::EN_PASSANT != 0
    }

    pub const fn is_castle_short(self) -> bool {
        self.flag() & MoveFlag::CASTLE_SHORT != 0
    }

    pub const fn is_castle_long(self) -> bool {
        self.flag() & MoveFlag::CASTLE_LONG != 0
    }

    pub const fn is_castle(self) -> bool {
        self.flag() & (MoveFlag::CASTLE_SHORT | MoveFlag::CASTLE_LONG) != 0
    }
}

/// Long algebraic notation, `e2e4`, `e7e8q`, `NULL` for the null move
impl fmt::Display for BitMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return write!(f, "NULL");
        }

        write!(f, "{}{}", square_to_string(self.src()), square_to_string(self.dest()))?;

        if let Some(prom_type) = self.promotion().piece_type() {
            write!(f, "{}", prom_type.to_char())?;
        }

        Ok(())
    }
}

impl fmt::Debug for BitMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{self} ({:?} x {:?} = {:?}, flag {:04b})",
            self.piece(),
            self.captured(),
            self.promotion(),
            self.flag()
        )
    }
}

/// Split long algebraic text into its parts, without checking legality
pub fn parse_move_text(text: &str) -> Option<(Square, Square, Option<PieceType>)> {
    use crate::utils::square_from_string;

    if !text.is_ascii() || !(4..=5).contains(&text.len()) {
        return None;
    }

    let src = square_from_string(&text[0..2])?;
    let dest = square_from_string(&text[2..4])?;
    let promotion = match text.get(4..5) {
        None => None,
        Some("n") => Some(PieceType::Knight),
        Some("b") => Some(PieceType::Bishop),
        Some("r") => Some(PieceType::Rook),
        Some("q") => Some(PieceType::Queen),
        Some(_) => return None,
    };

    Some((src, dest, promotion))
}
