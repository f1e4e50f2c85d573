use crate::defs::{Depth, Score, NUM_PIECE_TYPES};

/// Material, indexed by piece type
pub const PIECE_VALUE: [Score; NUM_PIECE_TYPES] = [100, 320, 330, 500, 900, 0];

/// Non-pawn material both sides start with
pub const START_MATERIAL: Score = 2 * (2 * 320 + 2 * 330 + 2 * 500 + 900);

/// Penalty per step of king distance from the center, in a bare endgame
pub const KING_CENTER_WEIGHT: Score = 10;
/// Mop-up bonus per step the losing king is pushed towards the edge
pub const MOPUP_EDGE_WEIGHT: Score = 47;
/// Mop-up bonus per step the kings get closer
pub const MOPUP_PROXIMITY_WEIGHT: Score = 16;
/// Material lead needed before mop-up kicks in
pub const MOPUP_MIN_LEAD: Score = 200;

/// Mate found with `depth` plies left scores `MATE + depth`
pub const MATE: Score = 100_000;
pub const INFINITY: Score = 1_000_000;
/// Returned by every frame once the search runs out of time
pub const TIMEOUT: Score = 2_000_000;

pub const MAX_DEPTH: Depth = 64;

/// Leaf nodes between two clock checks
pub const NODE_CHECK_INTERVAL: u64 = 8192;

/// Ordering bands: hash move, then killers, then captures and promotions
/// ranked within their band by material gained
pub const HASH_BONUS: Score = 20_000_000;
pub const KILLER_1_BONUS: Score = 10_000_000;
pub const KILLER_2_BONUS: Score = 9_000_000;
pub const CAPTURE_BONUS: Score = 5_000_000;

pub const DEFAULT_TT_ENTRIES: usize = 1 << 20;
pub const DEFAULT_MOVE_TIME_MS: u64 = 1000;
pub const DEFAULT_CONTEMPT: Score = 0;

pub const fn is_mate_score(score: Score) -> bool {
    score.abs() >= MATE && score.abs() < INFINITY
}
