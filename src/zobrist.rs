use crate::defs::{Piece, Square};

include!(concat!(env!("OUT_DIR"), "/zobrist.rs"));

pub struct Zobrist;

impl Zobrist {
    pub const fn piece(piece: Piece, sq: Square) -> u64 {
        PIECES[piece.as_usize()][sq as usize]
    }

    /// Toggled whenever the side to move changes, present when Black is to move
    pub const fn side() -> u64 {
        SIDE
    }

    pub const fn castle(castling: u8) -> u64 {
        CASTLE[castling as usize]
    }

    pub const fn ep(ep_file: Square) -> u64 {
        EP[ep_file as usize]
    }
}
