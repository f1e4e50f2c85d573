use crate::{bitmove::BitMove, defs::{Score, MAX_MOVES}};

/// Fixed capacity list of moves, with an ordering score per entry
pub struct MoveList {
    moves: [BitMove; MAX_MOVES],
    scores: [Score; MAX_MOVES],
    count: usize,
}

impl MoveList {
    pub const fn new() -> Self {
        MoveList {
            moves: [BitMove::NULL; MAX_MOVES],
            scores: [0; MAX_MOVES],
            count: 0,
        }
    }

    pub fn push(&mut self, m: BitMove) {
        debug_assert!(self.count < MAX_MOVES);
        self.moves[self.count] = m;
        self.scores[self.count] = 0;
        self.count += 1;
    }

    pub const fn get(&self, index: usize) -> BitMove {
        self.moves[index]
    }

    pub const fn get_score(&self, index: usize) -> Score {
        self.scores[index]
    }

    pub fn set_score(&mut self, index: usize, score: Score) {
        self.scores[index] = score;
    }

    pub fn swap(&mut self, a: usize, b: usize) {
        self.moves.swap(a, b);
        self.scores.swap(a, b);
    }

    pub const fn size(&self) -> usize {
        self.count
    }

    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn contains(&self, m: BitMove) -> bool {
        self.as_slice().contains(&m)
    }

    pub fn as_slice(&self) -> &[BitMove] {
        &self.moves[..self.count]
    }

    pub fn iter(&self) -> impl Iterator<Item = BitMove> + '_ {
        self.as_slice().iter().copied()
    }
}

impl Default for MoveList {
    fn default() -> Self {
        MoveList::new()
    }
}
