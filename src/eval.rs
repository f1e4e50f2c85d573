//! Static evaluation, in centipawns from White's point of view

use crate::{
    bitboard::BitBoard,
    board::Board,
    defs::{Color, PieceType, Score},
    gen::tables::{distance, CENTER_DISTANCE},
    params::{
        KING_CENTER_WEIGHT, MOPUP_EDGE_WEIGHT, MOPUP_MIN_LEAD, MOPUP_PROXIMITY_WEIGHT, PIECE_VALUE,
        START_MATERIAL,
    },
};

pub fn evaluate(board: &Board) -> Score {
    let white = material(board, Color::White);
    let black = material(board, Color::Black);

    white - black + king_activity(board, white, black)
}

pub fn material(board: &Board, color: Color) -> Score {
    PieceType::ALL
        .iter()
        .map(|&pt| BitBoard::count(board.colored(pt, color)) as Score * PIECE_VALUE[pt.as_usize()])
        .sum()
}

/// How far the game has progressed towards a bare endgame, 0 at the start
/// and 256 with only kings and pawns left
fn endgame_weight(board: &Board) -> Score {
    let pieces: Score = [Color::White, Color::Black]
        .iter()
        .flat_map(|&color| {
            [PieceType::Knight, PieceType::Bishop, PieceType::Rook, PieceType::Queen]
                .map(move |pt| BitBoard::count(board.colored(pt, color)) as Score * PIECE_VALUE[pt.as_usize()])
        })
        .sum();

    (START_MATERIAL - pieces).clamp(0, START_MATERIAL) * 256 / START_MATERIAL
}

/// Kings belong in the center once the board empties, and the side ahead
/// wants to drive the other king to the edge
fn king_activity(board: &Board, white: Score, black: Score) -> Score {
    let weight = endgame_weight(board);
    if weight == 0 {
        return 0;
    }

    let white_king = board.king_sq(Color::White);
    let black_king = board.king_sq(Color::Black);

    let mut score = (CENTER_DISTANCE[black_king as usize] - CENTER_DISTANCE[white_king as usize])
        * KING_CENTER_WEIGHT;

    let lead = white - black;
    if lead.abs() >= MOPUP_MIN_LEAD {
        let (winner, loser) = if lead > 0 {
            (white_king, black_king)
        } else {
            (black_king, white_king)
        };

        let mopup = CENTER_DISTANCE[loser as usize] * MOPUP_EDGE_WEIGHT
            + (14 - distance(winner, loser)) * MOPUP_PROXIMITY_WEIGHT;
        score += lead.signum() * mopup;
    }

    score * weight / 256
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_position_is_balanced() {
        assert_eq!(evaluate(&Board::start_pos()), 0);
    }

    #[test]
    fn material_counts_each_piece() {
        let board = Board::from_fen("4k3/8/8/8/8/8/PPP5/RN2K3 w - - 0 1").unwrap();
        assert_eq!(material(&board, Color::White), 300 + 500 + 320);
        assert_eq!(material(&board, Color::Black), 0);
    }

    #[test]
    fn mirrored_positions_negate() {
        for fen in [
            "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4",
            "8/8/3k4/8/8/8/1R6/6K1 w - - 0 1",
            "8/5k2/8/2p5/8/8/4K3/8 b - - 0 1",
        ] {
            let board = Board::from_fen(fen).unwrap();
            assert_eq!(evaluate(&board), -evaluate(&board.mirrored()), "{fen}");
        }
    }

    #[test]
    fn winning_side_prefers_cornered_king() {
        let centered = Board::from_fen("8/8/8/3k4/8/8/1R6/6K1 w - - 0 1").unwrap();
        let cornered = Board::from_fen("k7/8/8/8/8/8/1R6/6K1 w - - 0 1").unwrap();
        assert!(evaluate(&cornered) > evaluate(&centered));
    }
}
