use crate::{
    bitmove::BitMove,
    defs::{Piece, Score},
    movelist::MoveList,
    params::{CAPTURE_BONUS, HASH_BONUS, KILLER_1_BONUS, KILLER_2_BONUS, PIECE_VALUE},
};

fn value(piece: Piece) -> Score {
    piece.piece_type().map_or(0, |pt| PIECE_VALUE[pt.as_usize()])
}

pub fn score_move(m: BitMove, hash_move: BitMove, killers: &[BitMove; 2]) -> Score {
    if m == hash_move {
        return HASH_BONUS;
    }

    if m == killers[0] {
        return KILLER_1_BONUS;
    }
    if m == killers[1] {
        return KILLER_2_BONUS;
    }

    if m.is_cap() || m.is_prom() {
        // Victim minus attacker, a promotion also gains the new piece
        return CAPTURE_BONUS + value(m.captured()) - value(m.piece()) + value(m.promotion());
    }

    0
}

pub fn score_moves(move_list: &mut MoveList, hash_move: BitMove, killers: &[BitMove; 2]) {
    for i in 0..move_list.size() {
        let score = score_move(move_list.get(i), hash_move, killers);
        move_list.set_score(i, score);
    }
}

/// Swap the best scored move among `move_num..` into `move_num`
pub fn pick_next_move(move_list: &mut MoveList, move_num: usize) {
    let mut best_score = move_list.get_score(move_num);
    let mut best_index = move_num;

    for index in move_num + 1..move_list.size() {
        if move_list.get_score(index) > best_score {
            best_score = move_list.get_score(index);
            best_index = index;
        }
    }

    move_list.swap(move_num, best_index);
}
