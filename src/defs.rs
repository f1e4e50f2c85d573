use std::ops::{Index, IndexMut};

use crate::bitboard::BitBoard;

pub const MAX_MOVES: usize = 256;
pub const NUM_PIECES: usize = 12;
pub const NUM_PIECE_TYPES: usize = 6;
pub const NUM_SIDES: usize = 2;
pub const NUM_SQUARES: usize = 64;

/// Square index, a8 is 0, h8 is 7 and h1 is 63
pub type Square = u8;
pub type Score = i32;
pub type Depth = i32;

pub const FEN_START_STRING: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[rustfmt::skip]
pub mod sq {
    use super::Square;

    pub const A8: Square = 0;  pub const B8: Square = 1;  pub const C8: Square = 2;
    pub const D8: Square = 3;  pub const E8: Square = 4;  pub const F8: Square = 5;
    pub const G8: Square = 6;  pub const H8: Square = 7;
    pub const A1: Square = 56; pub const B1: Square = 57; pub const C1: Square = 58;
    pub const D1: Square = 59; pub const E1: Square = 60; pub const F1: Square = 61;
    pub const G1: Square = 62; pub const H1: Square = 63;
}

pub struct Castling;

impl Castling {
    pub const WK: u8 = 1;
    pub const WQ: u8 = 2;
    pub const BK: u8 = 4;
    pub const BQ: u8 = 8;
    pub const WHITE_ALL: u8 = 3;
    pub const BLACK_ALL: u8 = 12;
    pub const NONE: u8 = 0;
    pub const ALL: u8 = 15;

    /// Rights that survive a move touching the given square
    #[rustfmt::skip]
    pub const RIGHTS: [u8; NUM_SQUARES] = [
        7, 15, 15, 15,  3, 15, 15, 11,
       15, 15, 15, 15, 15, 15, 15, 15,
       15, 15, 15, 15, 15, 15, 15, 15,
       15, 15, 15, 15, 15, 15, 15, 15,
       15, 15, 15, 15, 15, 15, 15, 15,
       15, 15, 15, 15, 15, 15, 15, 15,
       15, 15, 15, 15, 15, 15, 15, 15,
       13, 15, 15, 15, 12, 15, 15, 14,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    pub const fn as_usize(self) -> usize {
        self as usize
    }

    pub const fn opp(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// +1 for White, -1 for Black, used to turn white-relative scores into
    /// side-relative ones
    pub const fn sign(self) -> Score {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Rank on which this side's pawns start
    pub const fn pawn_rank(self) -> u64 {
        match self {
            Color::White => BitBoard::RANK_2,
            Color::Black => BitBoard::RANK_7,
        }
    }

    /// Rank on which this side's pawns promote
    pub const fn promotion_rank(self) -> u64 {
        match self {
            Color::White => BitBoard::RANK_8,
            Color::Black => BitBoard::RANK_1,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Color::White => "White",
            Color::Black => "Black",
        }
    }
}

impl<T> Index<Color> for [T; NUM_SIDES] {
    type Output = T;

    fn index(&self, index: Color) -> &Self::Output {
        &self[index.as_usize()]
    }
}

impl<T> IndexMut<Color> for [T; NUM_SIDES] {
    fn index_mut(&mut self, index: Color) -> &mut Self::Output {
        &mut self[index.as_usize()]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    pub const ALL: [PieceType; NUM_PIECE_TYPES] = [
        PieceType::Pawn,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
        PieceType::King,
    ];

    pub const fn as_usize(self) -> usize {
        self as usize
    }

    pub const fn to_char(self) -> char {
        match self {
            PieceType::Pawn => 'p',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Rook => 'r',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        }
    }

    pub const fn from_char(c: char) -> Option<PieceType> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceType::Pawn),
            'n' => Some(PieceType::Knight),
            'b' => Some(PieceType::Bishop),
            'r' => Some(PieceType::Rook),
            'q' => Some(PieceType::Queen),
            'k' => Some(PieceType::King),
            _ => None,
        }
    }
}

/// Colored piece, white pieces first so that `as_usize` can index
/// per-piece arrays directly
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Piece {
    WhitePawn,
    WhiteKnight,
    WhiteBishop,
    WhiteRook,
    WhiteQueen,
    WhiteKing,
    BlackPawn,
    BlackKnight,
    BlackBishop,
    BlackRook,
    BlackQueen,
    BlackKing,
    None,
}

impl Piece {
    pub const ALL: [Piece; NUM_PIECES] = [
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

    pub const fn new(piece_type: PieceType, color: Color) -> Self {
        Piece::ALL[piece_type.as_usize() + color.as_usize() * 6]
    }

    pub const fn as_usize(self) -> usize {
        self as usize
    }

    /// Inverse of `as_usize`, anything out of range maps to `Piece::None`
    pub const fn from_index(index: usize) -> Self {
        if index < NUM_PIECES {
            Piece::ALL[index]
        } else {
            Piece::None
        }
    }

    pub const fn is_none(self) -> bool {
        matches!(self, Piece::None)
    }

    pub const fn color(self) -> Option<Color> {
        match self {
            Piece::None => None,
            _ if (self as usize) < 6 => Some(Color::White),
            _ => Some(Color::Black),
        }
    }

    pub const fn piece_type(self) -> Option<PieceType> {
        match self {
            Piece::None => None,
            _ => Some(PieceType::ALL[self as usize % 6]),
        }
    }

    pub const fn to_char(self) -> char {
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
            Piece::None => '.',
        }
    }

    pub const fn from_char(c: char) -> Option<Piece> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };

        match PieceType::from_char(c) {
            Some(piece_type) => Some(Piece::new(piece_type, color)),
            None => None,
        }
    }
}

/// Which moves a generator call should produce
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenType {
    /// Every legal move
    All,
    /// Legal moves landing on an enemy piece, en passant included
    Captures,
}
