use std::fmt;

use crate::{
    bitboard::BitBoard,
    bitmove::BitMove,
    defs::{Castling, Color, Piece, PieceType, Square, FEN_START_STRING, NUM_PIECES, NUM_SQUARES},
    history::History,
    state::State,
    utils::square_to_string,
    zobrist::Zobrist,
};

#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    pieces: [u64; NUM_PIECES],
    mailbox: [Piece; NUM_SQUARES],

    white: u64,
    black: u64,
    empty: u64,
    white_or_empty: u64,
    black_or_empty: u64,
    occupied: u64,

    pub state: State,
    history: History,
}

/// Getter methods
impl Board {
    pub const fn turn(&self) -> Color {
        self.state.turn
    }

    pub const fn key(&self) -> u64 {
        self.state.key
    }

    pub const fn piece_on(&self, sq: Square) -> Piece {
        self.mailbox[sq as usize]
    }

    pub const fn pieces(&self, piece: Piece) -> u64 {
        self.pieces[piece.as_usize()]
    }

    pub const fn colored(&self, piece_type: PieceType, color: Color) -> u64 {
        self.pieces(Piece::new(piece_type, color))
    }

    /// Rooks and queens of `color`
    pub const fn cardinal_sliders(&self, color: Color) -> u64 {
        self.colored(PieceType::Rook, color) | self.colored(PieceType::Queen, color)
    }

    /// Bishops and queens of `color`
    pub const fn ordinal_sliders(&self, color: Color) -> u64 {
        self.colored(PieceType::Bishop, color) | self.colored(PieceType::Queen, color)
    }

    pub const fn color_bb(&self, color: Color) -> u64 {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    /// Squares a piece of `color` may land on
    pub const fn color_or_empty(&self, color: Color) -> u64 {
        match color {
            Color::White => self.black_or_empty,
            Color::Black => self.white_or_empty,
        }
    }

    pub const fn occupied(&self) -> u64 {
        self.occupied
    }

    pub const fn empty(&self) -> u64 {
        self.empty
    }

    pub const fn king_sq(&self, color: Color) -> Square {
        BitBoard::to_sq(self.colored(PieceType::King, color))
    }

    /// True when the current position already occurred twice with the same
    /// side to move since the last irreversible move
    pub fn is_repetition(&self) -> bool {
        self.history.occurrences(self.state.key, self.state.rule_fifty as usize) >= 2
    }

    pub fn is_fifty_move_draw(&self) -> bool {
        self.state.rule_fifty >= 100
    }

    pub fn is_draw(&self) -> bool {
        self.is_fifty_move_draw() || self.is_repetition()
    }

    /// Zobrist key computed from scratch, must always equal `key()`
    pub fn compute_key(&self) -> u64 {
        let mut key = 0;

        for sq in 0..NUM_SQUARES as Square {
            let piece = self.piece_on(sq);
            if !piece.is_none() {
                key ^= Zobrist::piece(piece, sq);
            }
        }

        if self.state.turn == Color::Black {
            key ^= Zobrist::side();
        }
        if let Some(file) = self.state.ep_file {
            key ^= Zobrist::ep(file);
        }

        key ^ Zobrist::castle(self.state.castling)
    }
}

/// Setter methods
impl Board {
    fn put_piece(&mut self, piece: Piece, sq: Square) {
        debug_assert!(!piece.is_none() && self.mailbox[sq as usize].is_none());

        BitBoard::set_bit(&mut self.pieces[piece.as_usize()], sq);
        self.mailbox[sq as usize] = piece;
        self.state.key ^= Zobrist::piece(piece, sq);
    }

    fn take_piece(&mut self, sq: Square) -> Piece {
        let piece = self.mailbox[sq as usize];
        debug_assert!(!piece.is_none());

        BitBoard::pop_bit(&mut self.pieces[piece.as_usize()], sq);
        self.mailbox[sq as usize] = Piece::None;
        self.state.key ^= Zobrist::piece(piece, sq);
        piece
    }

    /// Place a piece outside of move making, eg while reading a FEN
    pub fn add_piece(&mut self, piece: Piece, sq: Square) {
        self.put_piece(piece, sq);
        self.update_derived();
    }

    /// Recompute the occupancy sets from the twelve piece bitboards
    pub fn update_derived(&mut self) {
        self.white = self.pieces[..6].iter().fold(0, |acc, bb| acc | bb);
        self.black = self.pieces[6..].iter().fold(0, |acc, bb| acc | bb);
        self.occupied = self.white | self.black;
        self.empty = !self.occupied;
        self.white_or_empty = self.white | self.empty;
        self.black_or_empty = self.black | self.empty;
    }

    fn set_ep_file(&mut self, file: Option<u8>) {
        if let Some(old) = self.state.ep_file {
            self.state.key ^= Zobrist::ep(old);
        }
        if let Some(new) = file {
            self.state.key ^= Zobrist::ep(new);
        }
        self.state.ep_file = file;
    }

    pub fn set_castling(&mut self, castling: u8) {
        self.state.key ^= Zobrist::castle(self.state.castling);
        self.state.castling = castling;
        self.state.key ^= Zobrist::castle(castling);
    }

    fn flip_turn(&mut self) {
        self.state.turn = self.state.turn.opp();
        self.state.key ^= Zobrist::side();
    }

    /// Play `m`, which must be legal in this position, and return the state
    /// needed to take it back
    pub fn make_move(&mut self, m: BitMove) -> State {
        let prior = self.state;
        let us = self.state.turn;
        let src = m.src();
        let dest = m.dest();

        self.history.push(prior.key);
        self.set_ep_file(None);

        if m.is_ep() {
            self.take_piece(ep_victim_square(dest, us));
        } else if m.is_cap() {
            self.take_piece(dest);
        }

        let piece = self.take_piece(src);
        debug_assert_eq!(piece, m.piece());

        if m.is_prom() {
            self.put_piece(m.promotion(), dest);
        } else {
            self.put_piece(piece, dest);
        }

        if m.is_castle() {
            let (rook_src, rook_dest) = castle_rook_squares(m);
            let rook = self.take_piece(rook_src);
            self.put_piece(rook, rook_dest);
        }

        if m.is_double_push() {
            self.set_ep_file(Some(dest % 8));
        }

        let rights = self.state.castling & Castling::RIGHTS[src as usize] & Castling::RIGHTS[dest as usize];
        if rights != self.state.castling {
            self.set_castling(rights);
        }

        if piece.piece_type() == Some(PieceType::Pawn) || m.is_cap() {
            self.state.rule_fifty = 0;
        } else {
            self.state.rule_fifty += 1;
        }

        if us == Color::Black {
            self.state.fullmove += 1;
        }

        self.flip_turn();
        self.update_derived();

        prior
    }

    /// Take back `m`, `prior` is the value `make_move(m)` returned
    ///
    /// Moves must be taken back in the reverse order they were made
    pub fn unmake_move(&mut self, m: BitMove, prior: State) {
        let us = prior.turn;
        let src = m.src();
        let dest = m.dest();

        self.take_piece(dest);
        self.put_piece(m.piece(), src);

        if m.is_castle() {
            let (rook_src, rook_dest) = castle_rook_squares(m);
            let rook = self.take_piece(rook_dest);
            self.put_piece(rook, rook_src);
        }

        if m.is_ep() {
            self.put_piece(m.captured(), ep_victim_square(dest, us));
        } else if m.is_cap() {
            self.put_piece(m.captured(), dest);
        }

        self.history.pop();
        self.state = prior;
        self.update_derived();
    }

    /// Pass the turn without moving
    pub fn make_null_move(&mut self) -> State {
        let prior = self.state;

        self.history.push(prior.key);
        self.set_ep_file(None);
        self.state.rule_fifty += 1;
        if prior.turn == Color::Black {
            self.state.fullmove += 1;
        }
        self.flip_turn();

        prior
    }

    pub fn unmake_null_move(&mut self, prior: State) {
        self.history.pop();
        self.state = prior;
    }

    pub fn clear(&mut self) {
        *self = Board::new();
    }
}

impl Board {
    pub const fn new() -> Self {
        Board {
            pieces: [BitBoard::EMPTY; NUM_PIECES],
            mailbox: [Piece::None; NUM_SQUARES],
            white: BitBoard::EMPTY,
            black: BitBoard::EMPTY,
            empty: BitBoard::FULL,
            white_or_empty: BitBoard::FULL,
            black_or_empty: BitBoard::FULL,
            occupied: BitBoard::EMPTY,
            state: State::new(),
            history: History::new(),
        }
    }

    pub fn start_pos() -> Board {
        let mut board = Board::new();
        board
            .load_fen(FEN_START_STRING)
            .unwrap_or_else(|_| unreachable!("start position FEN is valid"));
        board
    }

    /// Same position seen from the other side: ranks mirrored, colors swapped
    pub fn mirrored(&self) -> Board {
        let mut board = Board::new();

        for sq in 0..NUM_SQUARES as Square {
            let piece = self.piece_on(sq);
            if let (Some(piece_type), Some(color)) = (piece.piece_type(), piece.color()) {
                board.put_piece(Piece::new(piece_type, color.opp()), sq ^ 56);
            }
        }

        let castling = self.state.castling;
        board.state.turn = self.state.turn.opp();
        board.state.castling = (castling & Castling::WHITE_ALL) << 2 | (castling & Castling::BLACK_ALL) >> 2;
        board.state.ep_file = self.state.ep_file;
        board.state.rule_fifty = self.state.rule_fifty;
        board.state.fullmove = self.state.fullmove;
        board.state.key = board.compute_key();
        board.update_derived();

        board
    }

    /// Board diagram, `flipped` puts rank 1 on top
    pub fn pretty_string(&self, flipped: bool) -> String {
        let mut output = String::from("\n");

        for y in 0..8u8 {
            let row = if flipped { 7 - y } else { y };
            output.push_str("+---+---+---+---+---+---+---+---+\n");

            for x in 0..8u8 {
                let file = if flipped { 7 - x } else { x };
                let piece = self.piece_on(row * 8 + file);

                output.push_str("| ");
                output.push(if piece.is_none() { ' ' } else { piece.to_char() });
                output.push(' ');
            }

            output.push_str(&format!("| {}\n", 8 - row));
        }

        output.push_str("+---+---+---+---+---+---+---+---+\n");
        if flipped {
            output.push_str("  h   g   f   e   d   c   b   a  \n");
        } else {
            output.push_str("  a   b   c   d   e   f   g   h  \n");
        }

        output
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

/// Square of the pawn removed by an en passant capture landing on `dest`
const fn ep_victim_square(dest: Square, us: Color) -> Square {
    match us {
        Color::White => dest + 8,
        Color::Black => dest - 8,
    }
}

/// Rook source and destination for a castling move
const fn castle_rook_squares(m: BitMove) -> (Square, Square) {
    let king_dest = m.dest();
    if m.is_castle_short() {
        (king_dest + 1, king_dest - 1)
    } else {
        (king_dest - 2, king_dest + 1)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pretty_string(false))
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pretty_string(false))?;
        writeln!(f, "Turn       : {}", self.state.turn.name())?;
        writeln!(f, "Key        : {:#018x}", self.state.key)?;
        writeln!(f, "Castling   : {:04b}", self.state.castling)?;
        match self.state.ep_file {
            Some(file) => writeln!(f, "EP File    : {}", (b'a' + file) as char)?,
            None => writeln!(f, "EP File    : -")?,
        }
        writeln!(f, "Rule fifty : {}", self.state.rule_fifty)?;
        writeln!(f, "King       : {}", square_to_string(self.king_sq(self.state.turn)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{bitmove::MoveFlag, defs::sq, utils::square_from_string};

    fn square(s: &str) -> Square {
        square_from_string(s).unwrap()
    }

    #[test]
    fn start_position_layout() {
        let board = Board::start_pos();

        assert_eq!(board.piece_on(sq::E1), Piece::WhiteKing);
        assert_eq!(board.piece_on(sq::D8), Piece::BlackQueen);
        assert_eq!(board.king_sq(Color::Black), sq::E8);
        assert_eq!(BitBoard::count(board.occupied()), 32);
        assert_eq!(board.color_bb(Color::White), BitBoard::RANK_1 | BitBoard::RANK_2);
        assert_eq!(board.key(), board.compute_key());
    }

    #[test]
    fn double_push_sets_and_clears_ep_file() {
        let mut board = Board::start_pos();
        let e4 = BitMove::new(
            square("e2"),
            square("e4"),
            Piece::WhitePawn,
            Piece::None,
            Piece::None,
            MoveFlag::DOUBLE_PAWN_PUSH,
        );

        let before = board.clone();
        let prior = board.make_move(e4);
        assert_eq!(board.state.ep_file, Some(4));
        assert_eq!(board.turn(), Color::Black);
        assert_eq!(board.key(), board.compute_key());

        let nf6 = BitMove::quiet(square("g8"), square("f6"), Piece::BlackKnight);
        let prior_nf6 = board.make_move(nf6);
        assert_eq!(board.state.ep_file, None);
        assert_eq!(board.state.fullmove, 2);
        assert_eq!(board.key(), board.compute_key());

        board.unmake_move(nf6, prior_nf6);
        board.unmake_move(e4, prior);
        assert_eq!(board, before);
    }

    #[test]
    fn castling_moves_the_rook_and_drops_rights() {
        let mut board = Board::new();
        board.load_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let before = board.clone();

        let castle = BitMove::new(sq::E1, sq::G1, Piece::WhiteKing, Piece::None, Piece::None, MoveFlag::CASTLE_SHORT);
        let prior = board.make_move(castle);

        assert_eq!(board.piece_on(sq::F1), Piece::WhiteRook);
        assert!(board.piece_on(sq::H1).is_none());
        assert_eq!(board.state.castling, Castling::BLACK_ALL);
        assert_eq!(board.key(), board.compute_key());

        board.unmake_move(castle, prior);
        assert_eq!(board, before);
    }

    #[test]
    fn rook_capture_removes_the_victims_right() {
        let mut board = Board::new();
        board.load_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();

        let capture = BitMove::capture(sq::A1, sq::A8, Piece::WhiteRook, Piece::BlackRook);
        board.make_move(capture);

        assert_eq!(board.state.castling, Castling::WK | Castling::BK);
        assert_eq!(board.state.rule_fifty, 0);
        assert_eq!(board.key(), board.compute_key());
    }

    #[test]
    fn en_passant_restores_the_captured_pawn() {
        let mut board = Board::new();
        board.load_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        let before = board.clone();

        let ep = BitMove::new(
            square("e5"),
            square("d6"),
            Piece::WhitePawn,
            Piece::BlackPawn,
            Piece::None,
            MoveFlag::EN_PASSANT,
        );
        let prior = board.make_move(ep);

        assert!(board.piece_on(square("d5")).is_none());
        assert_eq!(board.piece_on(square("d6")), Piece::WhitePawn);
        assert_eq!(board.key(), board.compute_key());

        board.unmake_move(ep, prior);
        assert_eq!(board, before);
    }

    #[test]
    fn promotion_replaces_the_pawn() {
        let mut board = Board::new();
        board.load_fen("1r2k3/P7/8/8/8/8/8/4K3 w - - 3 40").unwrap();
        let before = board.clone();

        let m = BitMove::new(sq::A8 + 8, sq::B8, Piece::WhitePawn, Piece::BlackRook, Piece::WhiteKnight, MoveFlag::QUIET);
        let prior = board.make_move(m);

        assert_eq!(board.piece_on(sq::B8), Piece::WhiteKnight);
        assert_eq!(board.pieces(Piece::WhitePawn), 0);
        assert_eq!(board.key(), board.compute_key());

        board.unmake_move(m, prior);
        assert_eq!(board, before);
    }

    #[test]
    fn null_move_only_passes_the_turn() {
        let mut board = Board::new();
        board.load_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        let before = board.clone();

        let prior = board.make_null_move();
        assert_eq!(board.turn(), Color::Black);
        assert_eq!(board.state.ep_file, None);
        assert_eq!(board.key(), board.compute_key());

        board.unmake_null_move(prior);
        assert_eq!(board, before);
    }

    #[test]
    fn shuffling_knights_repeats() {
        let mut board = Board::start_pos();
        let moves = [
            BitMove::quiet(sq::G1, square("f3"), Piece::WhiteKnight),
            BitMove::quiet(sq::G8, square("f6"), Piece::BlackKnight),
            BitMove::quiet(square("f3"), sq::G1, Piece::WhiteKnight),
            BitMove::quiet(square("f6"), sq::G8, Piece::BlackKnight),
        ];

        for m in moves {
            board.make_move(m);
        }
        assert!(!board.is_repetition());

        for m in moves {
            board.make_move(m);
        }
        assert!(board.is_repetition());
        assert!(board.is_draw());
    }

    #[test]
    fn mirrored_board_swaps_sides() {
        let mut board = Board::new();
        board.load_fen("r3k2r/8/8/8/8/8/8/R3K2R w Kq - 0 1").unwrap();
        let mirror = board.mirrored();

        assert_eq!(mirror.turn(), Color::Black);
        assert_eq!(mirror.state.castling, Castling::BK | Castling::WQ);
        assert_eq!(mirror.piece_on(sq::E8), Piece::BlackKing);
        assert_eq!(mirror.piece_on(sq::A1), Piece::WhiteRook);
        assert_eq!(mirror.key(), mirror.compute_key());
        assert_eq!(mirror.mirrored(), board);
    }
}
