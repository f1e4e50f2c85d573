//! Legal move generation
//!
//! Moves are produced fully legal in one pass: every destination set is
//! masked by the squares that resolve a check, by the ray a pinned piece is
//! bound to, and for the king by the squares the opponent does not attack.

use crate::{
    bitboard::BitBoard,
    bitmove::{parse_move_text, BitMove, MoveFlag},
    board::Board,
    defs::{Castling, Color, GenType, Piece, PieceType, Square},
    error::EngineError,
    gen::{
        attack::{king_attacks, knight_attacks, pawn_attacks, pawn_caps, pawn_push},
        between::between,
        magic::AttackTables,
    },
    movelist::MoveList,
};

const PROMOTIONS: [PieceType; 4] = [
    PieceType::Queen,
    PieceType::Rook,
    PieceType::Bishop,
    PieceType::Knight,
];

pub struct MoveGenerator<'a> {
    board: &'a Board,
    tables: &'a AttackTables,
    us: Color,
    opp: Color,
    king_sq: Square,
    /// Squares the king may step on
    safe: u64,
    /// Destinations that deal with the current check, everything when not in check
    resolvers: u64,
    /// Rays, pinner included, along which a pinned piece may still move
    cardinal_pins: u64,
    ordinal_pins: u64,
    /// Destinations allowed by the generation mode
    targets: u64,
    gen_type: GenType,
    move_list: MoveList,
}

/// All legal moves, or only the captures, for the side to move
pub fn generate(board: &Board, tables: &AttackTables, gen_type: GenType) -> MoveList {
    let mut generator = MoveGenerator::new(board, tables, gen_type);
    generator.generate_all();
    generator.move_list
}

pub fn legal_moves(board: &Board, tables: &AttackTables) -> MoveList {
    generate(board, tables, GenType::All)
}

pub fn captures(board: &Board, tables: &AttackTables) -> MoveList {
    generate(board, tables, GenType::Captures)
}

impl<'a> MoveGenerator<'a> {
    pub fn new(board: &'a Board, tables: &'a AttackTables, gen_type: GenType) -> Self {
        let us = board.turn();
        let opp = us.opp();
        let king_sq = board.king_sq(us);
        let king_bb = BitBoard::from_sq(king_sq);

        // Sliders have to see through the king, or it could step back along the check ray
        let safe = !attacked_squares(board, tables, opp, board.occupied() ^ king_bb);

        let checkers = attackers_to(board, tables, king_sq, board.occupied()) & board.color_bb(opp);
        let resolvers = if checkers == 0 {
            BitBoard::FULL
        } else if BitBoard::more_than_one(checkers) {
            BitBoard::EMPTY
        } else {
            between(king_sq, BitBoard::to_sq(checkers)) | checkers
        };

        let targets = match gen_type {
            GenType::All => board.color_or_empty(us),
            GenType::Captures => board.color_bb(opp),
        };

        let mut generator = MoveGenerator {
            board,
            tables,
            us,
            opp,
            king_sq,
            safe,
            resolvers,
            cardinal_pins: 0,
            ordinal_pins: 0,
            targets,
            gen_type,
            move_list: MoveList::new(),
        };
        generator.find_pins();
        generator
    }

    pub fn generate_all(&mut self) {
        // Only the king can answer a double check
        if self.resolvers != 0 {
            self.pawn_moves();
            self.en_passant();
            self.knight_moves();
            self.slider_moves();
        }

        self.king_moves();
    }

    /// Lift each own piece on the king's lines in turn and look for an
    /// enemy slider of the matching family that now sees the king
    fn find_pins(&mut self) {
        let board = self.board;
        let occ = board.occupied();
        let own = board.color_bb(self.us);

        let mut candidates = self.tables.rook_attacks(self.king_sq, occ) & own;
        while candidates != 0 {
            let blocker = BitBoard::pop_lsb(&mut candidates);
            let lifted = occ ^ BitBoard::from_sq(blocker);
            let mut pinners = self.tables.rook_attacks(self.king_sq, lifted) & board.cardinal_sliders(self.opp);

            while pinners != 0 {
                let pinner = BitBoard::pop_lsb(&mut pinners);
                let ray = between(self.king_sq, pinner);
                if BitBoard::contains(ray, blocker) {
                    self.cardinal_pins |= ray | BitBoard::from_sq(pinner);
                }
            }
        }

        let mut candidates = self.tables.bishop_attacks(self.king_sq, occ) & own;
        while candidates != 0 {
            let blocker = BitBoard::pop_lsb(&mut candidates);
            let lifted = occ ^ BitBoard::from_sq(blocker);
            let mut pinners = self.tables.bishop_attacks(self.king_sq, lifted) & board.ordinal_sliders(self.opp);

            while pinners != 0 {
                let pinner = BitBoard::pop_lsb(&mut pinners);
                let ray = between(self.king_sq, pinner);
                if BitBoard::contains(ray, blocker) {
                    self.ordinal_pins |= ray | BitBoard::from_sq(pinner);
                }
            }
        }
    }

    fn pawn_moves(&mut self) {
        let board = self.board;
        let enemies = board.color_bb(self.opp);
        let mut pawns = board.colored(PieceType::Pawn, self.us);

        while pawns != 0 {
            let src = BitBoard::pop_lsb(&mut pawns);
            let src_bb = BitBoard::from_sq(src);

            let single = pawn_push(src_bb, self.us) & board.empty();
            let mut pushes = single;
            if src_bb & self.us.pawn_rank() != 0 {
                pushes |= pawn_push(single, self.us) & board.empty();
            }
            let mut caps = pawn_attacks(src, self.us) & enemies;

            // A pawn pinned along a file may only push, one pinned on a
            // diagonal may only take
            if src_bb & self.cardinal_pins != 0 {
                pushes &= self.cardinal_pins;
                caps = 0;
            } else if src_bb & self.ordinal_pins != 0 {
                pushes = 0;
                caps &= self.ordinal_pins;
            }

            if self.gen_type == GenType::Captures {
                pushes = 0;
            }

            self.add_pawn_moves(src, (pushes | caps) & self.resolvers);
        }
    }

    fn add_pawn_moves(&mut self, src: Square, mut moves: u64) {
        let piece = Piece::new(PieceType::Pawn, self.us);

        while moves != 0 {
            let dest = BitBoard::pop_lsb(&mut moves);
            let captured = self.board.piece_on(dest);

            if BitBoard::contains(self.us.promotion_rank(), dest) {
                for prom_type in PROMOTIONS {
                    let promotion = Piece::new(prom_type, self.us);
                    self.move_list
                        .push(BitMove::new(src, dest, piece, captured, promotion, MoveFlag::QUIET));
                }
            } else if src.abs_diff(dest) == 16 {
                self.move_list.push(BitMove::new(
                    src,
                    dest,
                    piece,
                    Piece::None,
                    Piece::None,
                    MoveFlag::DOUBLE_PAWN_PUSH,
                ));
            } else {
                self.move_list.push(BitMove::capture(src, dest, piece, captured));
            }
        }
    }

    fn en_passant(&mut self) {
        let board = self.board;
        let Some(ep_file) = board.state.ep_file else {
            return;
        };

        let (ep_sq, victim_sq) = match self.us {
            Color::White => (16 + ep_file, 24 + ep_file),
            Color::Black => (40 + ep_file, 32 + ep_file),
        };
        let ep_bb = BitBoard::from_sq(ep_sq);
        let victim_bb = BitBoard::from_sq(victim_sq);

        // Neither capturing the checker nor blocking the check
        if self.resolvers & (ep_bb | victim_bb) == 0 {
            return;
        }

        let piece = Piece::new(PieceType::Pawn, self.us);
        let victim = Piece::new(PieceType::Pawn, self.opp);
        let mut candidates = pawn_attacks(ep_sq, self.opp) & board.colored(PieceType::Pawn, self.us);

        while candidates != 0 {
            let src = BitBoard::pop_lsb(&mut candidates);
            let occ = (board.occupied() ^ BitBoard::from_sq(src) ^ victim_bb) | ep_bb;

            // Two pawns leave the same rank at once, so pins alone don't catch
            // every discovered attack on the king
            let exposed = self.tables.rook_attacks(self.king_sq, occ) & board.cardinal_sliders(self.opp)
                | self.tables.bishop_attacks(self.king_sq, occ) & board.ordinal_sliders(self.opp);

            if exposed == 0 {
                self.move_list.push(BitMove::new(
                    src,
                    ep_sq,
                    piece,
                    victim,
                    Piece::None,
                    MoveFlag::EN_PASSANT,
                ));
            }
        }
    }

    fn knight_moves(&mut self) {
        let pinned = self.cardinal_pins | self.ordinal_pins;
        let mut knights = self.board.colored(PieceType::Knight, self.us) & !pinned;

        while knights != 0 {
            let src = BitBoard::pop_lsb(&mut knights);
            let moves = knight_attacks(src) & self.targets & self.resolvers;
            self.add_moves(src, moves);
        }
    }

    fn slider_moves(&mut self) {
        let occ = self.board.occupied();
        let mask = self.targets & self.resolvers;

        for piece_type in [PieceType::Bishop, PieceType::Rook, PieceType::Queen] {
            let mut pieces = self.board.colored(piece_type, self.us);

            while pieces != 0 {
                let src = BitBoard::pop_lsb(&mut pieces);
                let src_bb = BitBoard::from_sq(src);

                let cardinal = matches!(piece_type, PieceType::Rook | PieceType::Queen);
                let ordinal = matches!(piece_type, PieceType::Bishop | PieceType::Queen);

                let moves = if src_bb & self.cardinal_pins != 0 {
                    if cardinal {
                        self.tables.rook_attacks(src, occ) & self.cardinal_pins
                    } else {
                        0
                    }
                } else if src_bb & self.ordinal_pins != 0 {
                    if ordinal {
                        self.tables.bishop_attacks(src, occ) & self.ordinal_pins
                    } else {
                        0
                    }
                } else {
                    let mut attacks = 0;
                    if cardinal {
                        attacks |= self.tables.rook_attacks(src, occ);
                    }
                    if ordinal {
                        attacks |= self.tables.bishop_attacks(src, occ);
                    }
                    attacks
                };

                self.add_moves(src, moves & mask);
            }
        }
    }

    fn king_moves(&mut self) {
        let moves = king_attacks(self.king_sq) & self.safe & self.targets;
        self.add_moves(self.king_sq, moves);

        // Castling never captures and is illegal out of check
        if self.gen_type == GenType::Captures || self.resolvers != BitBoard::FULL {
            return;
        }

        let (short_right, long_right) = match self.us {
            Color::White => (Castling::WK, Castling::WQ),
            Color::Black => (Castling::BK, Castling::BQ),
        };
        let king = self.king_sq;
        let occ = self.board.occupied();
        let piece = Piece::new(PieceType::King, self.us);

        if self.board.state.can_castle(short_right) {
            let path = BitBoard::from_sq(king + 1) | BitBoard::from_sq(king + 2);
            if path & occ == 0 && path & !self.safe == 0 {
                self.move_list.push(BitMove::new(
                    king,
                    king + 2,
                    piece,
                    Piece::None,
                    Piece::None,
                    MoveFlag::CASTLE_SHORT,
                ));
            }
        }

        if self.board.state.can_castle(long_right) {
            let transit = BitBoard::from_sq(king - 1) | BitBoard::from_sq(king - 2);
            let path = transit | BitBoard::from_sq(king - 3);
            if path & occ == 0 && transit & !self.safe == 0 {
                self.move_list.push(BitMove::new(
                    king,
                    king - 2,
                    piece,
                    Piece::None,
                    Piece::None,
                    MoveFlag::CASTLE_LONG,
                ));
            }
        }
    }

    fn add_moves(&mut self, src: Square, mut moves: u64) {
        let piece = self.board.piece_on(src);

        while moves != 0 {
            let dest = BitBoard::pop_lsb(&mut moves);
            let captured = self.board.piece_on(dest);
            self.move_list.push(BitMove::capture(src, dest, piece, captured));
        }
    }
}

/// Every square attacked by `by`, sliders blocked by `occ`
pub fn attacked_squares(board: &Board, tables: &AttackTables, by: Color, occ: u64) -> u64 {
    let mut attacked = pawn_caps(board.colored(PieceType::Pawn, by), by);
    attacked |= king_attacks(board.king_sq(by));

    let mut knights = board.colored(PieceType::Knight, by);
    while knights != 0 {
        attacked |= knight_attacks(BitBoard::pop_lsb(&mut knights));
    }

    let mut cardinal = board.cardinal_sliders(by);
    while cardinal != 0 {
        attacked |= tables.rook_attacks(BitBoard::pop_lsb(&mut cardinal), occ);
    }

    let mut ordinal = board.ordinal_sliders(by);
    while ordinal != 0 {
        attacked |= tables.bishop_attacks(BitBoard::pop_lsb(&mut ordinal), occ);
    }

    attacked
}

/// Pieces of both colors attacking `sq`
pub fn attackers_to(board: &Board, tables: &AttackTables, sq: Square, occ: u64) -> u64 {
    pawn_attacks(sq, Color::White) & board.colored(PieceType::Pawn, Color::Black)
        | pawn_attacks(sq, Color::Black) & board.colored(PieceType::Pawn, Color::White)
        | knight_attacks(sq) & (board.pieces(Piece::WhiteKnight) | board.pieces(Piece::BlackKnight))
        | king_attacks(sq) & (board.pieces(Piece::WhiteKing) | board.pieces(Piece::BlackKing))
        | tables.bishop_attacks(sq, occ) & (board.ordinal_sliders(Color::White) | board.ordinal_sliders(Color::Black))
        | tables.rook_attacks(sq, occ) & (board.cardinal_sliders(Color::White) | board.cardinal_sliders(Color::Black))
}

pub fn is_square_attacked(board: &Board, tables: &AttackTables, sq: Square, by: Color) -> bool {
    attackers_to(board, tables, sq, board.occupied()) & board.color_bb(by) != 0
}

/// Is the side to move in check
pub fn in_check(board: &Board, tables: &AttackTables) -> bool {
    let us = board.turn();
    is_square_attacked(board, tables, board.king_sq(us), us.opp())
}

impl Board {
    /// Find the legal move written as `text`, eg `e2e4` or `e7e8q`
    pub fn parse_move(&self, tables: &AttackTables, text: &str) -> Result<BitMove, EngineError> {
        let (src, dest, promotion) =
            parse_move_text(text).ok_or_else(|| EngineError::MoveText(text.to_string()))?;

        legal_moves(self, tables)
            .iter()
            .find(|m| m.src() == src && m.dest() == dest && m.promotion().piece_type() == promotion)
            .ok_or_else(|| EngineError::IllegalMove(text.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::tables;

    fn moves_of(fen: &str) -> Vec<String> {
        let board = Board::from_fen(fen).unwrap();
        let mut moves: Vec<String> = legal_moves(&board, tables()).iter().map(|m| m.to_string()).collect();
        moves.sort();
        moves
    }

    #[test]
    fn start_position_has_twenty_moves() {
        let board = Board::start_pos();
        assert_eq!(legal_moves(&board, tables()).size(), 20);
        assert!(captures(&board, tables()).is_empty());
    }

    #[test]
    fn double_check_leaves_only_king_moves() {
        // Rook on e8 and knight on f3 both check the white king, Ra3xf3 won't do
        let board = Board::from_fen("4r2k/8/8/8/8/R4n2/8/4K3 w - - 0 1").unwrap();
        let moves = legal_moves(&board, tables());

        assert_eq!(moves.size(), 3);
        assert!(moves.iter().all(|m| m.piece() == Piece::WhiteKing));
    }

    #[test]
    fn pinned_pieces_stay_on_their_ray() {
        // The e2 rook can only slide along the file, the d2 knight is frozen
        let moves = moves_of("4r2k/8/8/b7/8/8/3NR3/4K3 w - - 0 1");
        let rook_moves: Vec<&String> = moves.iter().filter(|m| m.starts_with("e2")).collect();

        assert!(rook_moves.iter().all(|m| m.as_bytes()[2] == b'e'));
        assert!(moves.contains(&"e2e8".to_string()));
        assert!(!moves.contains(&"e2f2".to_string()));
        assert!(moves.iter().all(|m| !m.starts_with("d2")));
    }

    #[test]
    fn diagonal_pin_allows_capturing_the_pinner() {
        let moves = moves_of("7k/8/8/8/8/2b5/3P4/4K3 w - - 0 1");

        assert!(moves.contains(&"d2c3".to_string()));
        assert!(!moves.contains(&"d2d3".to_string()));
        assert!(!moves.contains(&"d2d4".to_string()));
    }

    #[test]
    fn en_passant_discovery_is_vetoed() {
        // Taking on d6 would clear the fifth rank between king and rook
        let moves = moves_of("8/8/8/K2pP2r/8/8/8/7k w - d6 0 1");
        assert!(!moves.contains(&"e5d6".to_string()));

        let moves = moves_of("8/8/8/K2pP3/8/8/8/7k w - d6 0 1");
        assert!(moves.contains(&"e5d6".to_string()));
    }

    #[test]
    fn en_passant_may_capture_a_checking_pawn() {
        let board = Board::from_fen("8/8/8/2k5/3Pp3/8/8/4K3 b - d3 0 1").unwrap();
        let ep: Vec<BitMove> = legal_moves(&board, tables()).iter().filter(|m| m.is_ep()).collect();

        assert_eq!(ep.len(), 1);
        assert_eq!(ep[0].captured(), Piece::WhitePawn);
        assert!(captures(&board, tables()).contains(ep[0]));
    }

    #[test]
    fn castling_respects_attacked_transit_squares() {
        let moves = moves_of("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        assert!(moves.contains(&"e1g1".to_string()));
        assert!(moves.contains(&"e1c1".to_string()));

        // Bishop on a6 covers f1
        let moves = moves_of("r3k2r/8/b7/8/8/8/8/R3K2R w KQkq - 0 1");
        assert!(!moves.contains(&"e1g1".to_string()));
        assert!(moves.contains(&"e1c1".to_string()));

        // b1 may be attacked but must be empty
        let moves = moves_of("r3k2r/8/8/8/8/8/8/RN2K2R w KQkq - 0 1");
        assert!(!moves.contains(&"e1c1".to_string()));
        let moves = moves_of("1r2k2r/8/8/8/8/8/8/R3K2R w Q - 0 1");
        assert!(moves.contains(&"e1c1".to_string()));
    }

    #[test]
    fn king_cannot_retreat_along_the_check_ray() {
        let moves = moves_of("4r2k/8/8/8/4K3/8/8/8 w - - 0 1");
        assert!(!moves.contains(&"e4e3".to_string()));
        assert!(!moves.contains(&"e4e5".to_string()));
        assert!(moves.contains(&"e4d4".to_string()));
    }

    #[test]
    fn promotions_come_in_fours() {
        let board = Board::from_fen("1r5k/P7/8/8/8/8/8/K7 w - - 0 1").unwrap();
        let moves = legal_moves(&board, tables());
        let promotions = moves.iter().filter(|m| m.is_prom()).count();
        assert_eq!(promotions, 8);

        // Captures mode keeps capturing promotions and drops quiet ones
        let caps = captures(&board, tables());
        assert_eq!(caps.iter().filter(|m| m.is_prom()).count(), 4);
        assert!(caps.iter().all(|m| m.is_cap()));
    }

    #[test]
    fn checkmate_and_stalemate_have_no_moves() {
        let mate = Board::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
        assert!(legal_moves(&mate, tables()).is_empty());
        assert!(in_check(&mate, tables()));

        let stalemate = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(legal_moves(&stalemate, tables()).is_empty());
        assert!(!in_check(&stalemate, tables()));
    }

    #[test]
    fn parse_move_separates_bad_text_from_illegal_moves() {
        let board = Board::start_pos();

        let m = board.parse_move(tables(), "e2e4").unwrap();
        assert!(m.is_double_push());

        assert!(matches!(board.parse_move(tables(), "e2e5"), Err(EngineError::IllegalMove(_))));
        assert!(matches!(board.parse_move(tables(), "zz"), Err(EngineError::MoveText(_))));
    }
}
