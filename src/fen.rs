//! Reading and writing Forsyth-Edwards Notation

use crate::{
    board::Board,
    defs::{sq, Castling, Color, Piece, PieceType, Square},
    error::FenError,
    utils::{square_from_string, square_to_string},
};

impl Board {
    pub fn from_fen(fen: &str) -> Result<Board, FenError> {
        let mut board = Board::new();
        board.load_fen(fen)?;
        Ok(board)
    }

    /// Replace the current position, on failure the board is left empty
    pub fn load_fen(&mut self, fen: &str) -> Result<(), FenError> {
        match parse(fen) {
            Ok(board) => {
                *self = board;
                Ok(())
            }
            Err(err) => {
                self.clear();
                Err(err)
            }
        }
    }

    pub fn to_fen(&self) -> String {
        let mut placement = String::new();

        for row in 0..8u8 {
            let mut empty = 0;

            for file in 0..8u8 {
                let piece = self.piece_on(row * 8 + file);
                if piece.is_none() {
                    empty += 1;
                    continue;
                }
                if empty > 0 {
                    placement.push_str(&empty.to_string());
                    empty = 0;
                }
                placement.push(piece.to_char());
            }

            if empty > 0 {
                placement.push_str(&empty.to_string());
            }
            if row < 7 {
                placement.push('/');
            }
        }

        let turn = match self.turn() {
            Color::White => "w",
            Color::Black => "b",
        };

        let mut castling = String::new();
        for (right, symbol) in [
            (Castling::WK, 'K'),
            (Castling::WQ, 'Q'),
            (Castling::BK, 'k'),
            (Castling::BQ, 'q'),
        ] {
            if self.state.can_castle(right) {
                castling.push(symbol);
            }
        }
        if castling.is_empty() {
            castling.push('-');
        }

        let ep = match self.state.ep_file {
            // The target square sits behind the pawn that just moved
            Some(file) => match self.turn() {
                Color::White => square_to_string(16 + file),
                Color::Black => square_to_string(40 + file),
            },
            None => String::from("-"),
        };

        format!(
            "{placement} {turn} {castling} {ep} {} {}",
            self.state.rule_fifty, self.state.fullmove
        )
    }
}

fn parse(fen: &str) -> Result<Board, FenError> {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    if fields.len() != 6 {
        return Err(FenError::FieldCount(fields.len()));
    }

    let mut board = Board::new();
    parse_placement(&mut board, fields[0])?;

    let turn = match fields[1] {
        "w" => Color::White,
        "b" => Color::Black,
        other => return Err(FenError::SideToMove(other.to_string())),
    };

    let castling = parse_castling(fields[2])?;
    if !castling_pieces_home(&board, castling) {
        return Err(FenError::Castling(fields[2].to_string()));
    }

    let ep_file = parse_ep(fields[3], turn)?;
    if let Some(file) = ep_file {
        if !double_push_possible(&board, file, turn) {
            return Err(FenError::EnPassant(fields[3].to_string()));
        }
    }

    let rule_fifty = fields[4]
        .parse::<u16>()
        .map_err(|_| FenError::Counter(fields[4].to_string()))?;
    let fullmove = fields[5]
        .parse::<u16>()
        .map_err(|_| FenError::Counter(fields[5].to_string()))?;

    for color in [Color::White, Color::Black] {
        if board.colored(PieceType::King, color).count_ones() != 1 {
            return Err(FenError::Kings);
        }
    }

    board.state.turn = turn;
    board.state.castling = castling;
    board.state.ep_file = ep_file;
    board.state.rule_fifty = rule_fifty;
    board.state.fullmove = fullmove.max(1);
    board.state.key = board.compute_key();

    Ok(board)
}

fn parse_placement(board: &mut Board, placement: &str) -> Result<(), FenError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::RankCount(ranks.len()));
    }

    // FEN lists rank 8 first, which is row 0 in our layout
    for (row, rank) in ranks.iter().enumerate() {
        let mut file = 0usize;

        for c in rank.chars() {
            if let Some(skip) = c.to_digit(10) {
                if !(1..=8).contains(&skip) {
                    return Err(FenError::PieceChar(c));
                }
                file += skip as usize;
            } else {
                let piece = Piece::from_char(c).ok_or(FenError::PieceChar(c))?;
                if file >= 8 {
                    return Err(FenError::RankLength { rank: 8 - row, files: file + 1 });
                }
                board.add_piece(piece, (row * 8 + file) as Square);
                file += 1;
            }
        }

        if file != 8 {
            return Err(FenError::RankLength { rank: 8 - row, files: file });
        }
    }

    Ok(())
}

fn parse_castling(field: &str) -> Result<u8, FenError> {
    if field == "-" {
        return Ok(Castling::NONE);
    }

    field.chars().try_fold(Castling::NONE, |rights, c| {
        let right = match c {
            'K' => Castling::WK,
            'Q' => Castling::WQ,
            'k' => Castling::BK,
            'q' => Castling::BQ,
            _ => return Err(FenError::Castling(field.to_string())),
        };
        Ok(rights | right)
    })
}

/// Every granted right needs its king and rook on their starting squares
fn castling_pieces_home(board: &Board, castling: u8) -> bool {
    [
        (Castling::WK, Color::White, sq::E1, sq::H1),
        (Castling::WQ, Color::White, sq::E1, sq::A1),
        (Castling::BK, Color::Black, sq::E8, sq::H8),
        (Castling::BQ, Color::Black, sq::E8, sq::A8),
    ]
    .into_iter()
    .filter(|&(right, ..)| castling & right != 0)
    .all(|(_, color, king, rook)| {
        board.piece_on(king) == Piece::new(PieceType::King, color)
            && board.piece_on(rook) == Piece::new(PieceType::Rook, color)
    })
}

/// The opponent's last move must have been a double push over the target square
fn double_push_possible(board: &Board, file: u8, turn: Color) -> bool {
    let (origin, target, victim) = match turn {
        Color::White => (8 + file, 16 + file, 24 + file),
        Color::Black => (48 + file, 40 + file, 32 + file),
    };

    board.piece_on(origin).is_none()
        && board.piece_on(target).is_none()
        && board.piece_on(victim) == Piece::new(PieceType::Pawn, turn.opp())
}

fn parse_ep(field: &str, turn: Color) -> Result<Option<u8>, FenError> {
    if field == "-" {
        return Ok(None);
    }

    let invalid = || FenError::EnPassant(field.to_string());
    let sq = square_from_string(field).ok_or_else(invalid)?;

    // Rank 6 when White is to move, rank 3 when Black is
    let expected_row = match turn {
        Color::White => 2,
        Color::Black => 5,
    };
    if sq / 8 != expected_row {
        return Err(invalid());
    }

    Ok(Some(sq % 8))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{defs::FEN_START_STRING, movegen::legal_moves, perft::perft, test_support::tables};

    #[test]
    fn start_position_round_trips() {
        let board = Board::from_fen(FEN_START_STRING).unwrap();
        assert_eq!(board.to_fen(), FEN_START_STRING);
        assert_eq!(board.state.castling, Castling::ALL);
    }

    #[test]
    fn en_passant_square_round_trips() {
        let fen = "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3";
        let board = Board::from_fen(fen).unwrap();
        assert_eq!(board.state.ep_file, Some(3));
        assert_eq!(board.to_fen(), fen);

        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        assert_eq!(Board::from_fen(fen).unwrap().to_fen(), fen);
    }

    #[test]
    fn placement_maps_to_squares() {
        let board = Board::from_fen("k7/8/8/8/8/8/8/7K b - - 12 40").unwrap();
        assert_eq!(board.piece_on(sq::A8), Piece::BlackKing);
        assert_eq!(board.piece_on(sq::H1), Piece::WhiteKing);
        assert_eq!(board.turn(), Color::Black);
        assert_eq!(board.state.rule_fifty, 12);
        assert_eq!(board.state.fullmove, 40);
    }

    #[test]
    fn malformed_input_is_rejected() {
        let cases = [
            ("8/8/8/8/8/8/8/8 w - -", FenError::FieldCount(4)),
            ("k7/8/8/8/8/8/8/7K x - - 0 1", FenError::SideToMove("x".to_string())),
            ("k7/8/8/8/8/8/8/7X w - - 0 1", FenError::PieceChar('X')),
            ("k7/8/8/8/8/8/7K w - - 0 1", FenError::RankCount(7)),
            ("k7/9/8/8/8/8/8/7K w - - 0 1", FenError::PieceChar('9')),
            ("k6/8/8/8/8/8/8/7K w - - 0 1", FenError::RankLength { rank: 8, files: 7 }),
            ("k7/8/8/8/8/8/8/7K w KX - 0 1", FenError::Castling("KX".to_string())),
            ("k7/8/8/8/8/8/8/7K w - e4 0 1", FenError::EnPassant("e4".to_string())),
            ("k7/8/8/8/8/8/8/7K w - - x 1", FenError::Counter("x".to_string())),
            ("8/8/8/8/8/8/8/7K w - - 0 1", FenError::Kings),
            ("4k3/8/8/8/8/8/8/4K3 w K - 0 1", FenError::Castling("K".to_string())),
            ("4k3/8/8/8/8/8/8/R3K3 w Qk - 0 1", FenError::Castling("Qk".to_string())),
            ("4k3/8/8/4P3/8/8/8/4K3 w - d6 0 1", FenError::EnPassant("d6".to_string())),
            ("4k3/3p4/8/3pP3/8/8/8/4K3 w - d6 0 1", FenError::EnPassant("d6".to_string())),
            ("4k3/8/8/8/4P3/8/8/4K3 b - d3 0 1", FenError::EnPassant("d3".to_string())),
        ];

        for (fen, expected) in cases {
            assert_eq!(Board::from_fen(fen).unwrap_err(), expected, "{fen}");
        }
    }

    #[test]
    fn accepted_special_moves_can_be_played() {
        for fen in [
            "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1",
            "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1",
            "4k3/8/8/8/3Pp3/8/8/4K3 b - d3 0 1",
        ] {
            let mut board = Board::from_fen(fen).unwrap();
            assert!(legal_moves(&board, tables()).iter().any(|m| m.is_castle() || m.is_ep()), "{fen}");
            assert!(perft(&mut board, tables(), 2) > 0);
        }
    }

    #[test]
    fn failed_load_clears_the_board() {
        let mut board = Board::start_pos();
        assert!(board.load_fen("not a fen").is_err());
        assert_eq!(board, Board::new());
        assert_eq!(board.occupied(), 0);
    }
}
