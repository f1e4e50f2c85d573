use crate::defs::{Castling, Color};

/// Everything a move destroys that cannot be recovered from the move itself
///
/// `Board::make_move` hands back the value it held before the move, and
/// `Board::unmake_move` puts it back
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct State {
    pub turn: Color,
    /// Bit 0 is white king side, bit 1 white queen side,
    /// bit 2 black king side and bit 3 black queen side
    pub castling: u8,
    /// File behind a pawn that just made a double push
    pub ep_file: Option<u8>,
    /// Plies since the last pawn move or capture
    pub rule_fifty: u16,
    pub fullmove: u16,
    /// Zobrist key
    pub key: u64,
}

impl State {
    pub const fn new() -> Self {
        State {
            turn: Color::White,
            castling: Castling::NONE,
            ep_file: None,
            rule_fifty: 0,
            fullmove: 1,
            key: 0,
        }
    }

    pub const fn can_castle(&self, right: u8) -> bool {
        self.castling & right != 0
    }
}

impl Default for State {
    fn default() -> Self {
        State::new()
    }
}
