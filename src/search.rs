//! Iterative deepening negamax with alpha-beta pruning
//!
//! The search is fail-hard. Running out of time sets `out_of_time`, after
//! which every frame returns `TIMEOUT` straight away and the result of the
//! last fully searched depth is kept.

use std::time::{Duration, Instant};

use fastrand::Rng;
use log::{debug, info};

use crate::{
    bitmove::BitMove,
    board::Board,
    defs::{Color, Depth, Score},
    eval::evaluate,
    gen::magic::AttackTables,
    movegen::{captures, in_check, legal_moves},
    order::{pick_next_move, score_moves},
    params::{
        is_mate_score, DEFAULT_CONTEMPT, INFINITY, MATE, MAX_DEPTH, NODE_CHECK_INTERVAL, TIMEOUT,
    },
    search_info::SearchInfo,
    table::TranspositionTable,
};

/// Expected growth of the search time from one depth to the next
const BRANCHING_ESTIMATE: u32 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchResult {
    pub best_move: BitMove,
    /// From the point of view of the side to move
    pub score: Score,
    pub depth: Depth,
    pub nodes: u64,
    pub elapsed: Duration,
}

impl SearchResult {
    const fn empty() -> Self {
        SearchResult {
            best_move: BitMove::NULL,
            score: 0,
            depth: 0,
            nodes: 0,
            elapsed: Duration::ZERO,
        }
    }
}

type Reporter<'a> = Box<dyn FnMut(&SearchResult) + 'a>;

pub struct Searcher<'a> {
    board: &'a mut Board,
    tables: &'a AttackTables,
    tt: &'a mut TranspositionTable,
    /// Quiet moves that caused a beta cutoff, per remaining depth
    killers: [[BitMove; 2]; MAX_DEPTH as usize + 1],
    contempt: Score,
    root_color: Color,
    rng: Rng,
    reporter: Option<Reporter<'a>>,

    nodes: u64,
    leaf_nodes: u64,
    started: Instant,
    deadline: Option<Instant>,
    out_of_time: bool,
}

impl<'a> Searcher<'a> {
    pub fn new(board: &'a mut Board, tables: &'a AttackTables, tt: &'a mut TranspositionTable) -> Self {
        let root_color = board.turn();
        Searcher {
            board,
            tables,
            tt,
            killers: [[BitMove::NULL; 2]; MAX_DEPTH as usize + 1],
            contempt: DEFAULT_CONTEMPT,
            root_color,
            rng: Rng::new(),
            reporter: None,
            nodes: 0,
            leaf_nodes: 0,
            started: Instant::now(),
            deadline: None,
            out_of_time: false,
        }
    }

    /// Score of a draw for the side that started the search, negative
    /// values make the engine seek draws
    pub fn with_contempt(mut self, contempt: Score) -> Self {
        self.contempt = contempt;
        self
    }

    /// Fixed seed for the choice between equally scored root moves
    pub fn with_seed(self, seed: u64) -> Self {
        self.rng.seed(seed);
        self
    }

    /// Called after every completed depth
    pub fn with_reporter(mut self, reporter: impl FnMut(&SearchResult) + 'a) -> Self {
        self.reporter = Some(Box::new(reporter));
        self
    }

    /// Run a search under the limits of a `go` command
    pub fn search(&mut self, info: &SearchInfo, default_move_time: u64) -> SearchResult {
        let max_depth = info.depth.unwrap_or(MAX_DEPTH).clamp(1, MAX_DEPTH);
        let budget = info.budget(self.root_color, default_move_time);
        self.iterate(max_depth, budget)
    }

    /// Deepen until the next depth is not expected to finish within `budget`
    pub fn search_by_time(&mut self, budget: Duration) -> SearchResult {
        self.iterate(MAX_DEPTH, Some(budget))
    }

    fn iterate(&mut self, max_depth: Depth, budget: Option<Duration>) -> SearchResult {
        self.started = Instant::now();
        self.out_of_time = false;
        self.nodes = 0;
        self.leaf_nodes = 0;

        // Depth one always completes, so there is a move to play
        self.deadline = None;
        let mut result = self.search_by_depth(1);
        self.report(&result);
        let mut last_depth_time = result.elapsed;

        self.deadline = budget.map(|b| self.started + b);

        for depth in 2..=max_depth {
            if result.best_move.is_null() || is_mate_score(result.score) {
                break;
            }

            if let Some(budget) = budget {
                let estimate = last_depth_time * BRANCHING_ESTIMATE;
                if self.started.elapsed() + estimate > budget {
                    break;
                }
            }

            let depth_started = Instant::now();
            let completed = self.search_by_depth(depth);
            if self.out_of_time {
                debug!("depth {depth} abandoned after {} nodes", self.nodes);
                break;
            }

            result = completed;
            last_depth_time = depth_started.elapsed();
            self.report(&result);
        }

        info!(
            "best move {} score {} depth {} nodes {} in {} ms",
            result.best_move,
            result.score,
            result.depth,
            result.nodes,
            result.elapsed.as_millis()
        );

        result
    }

    fn report(&mut self, result: &SearchResult) {
        info!("depth {} score {} nodes {} best {}", result.depth, result.score, result.nodes, result.best_move);
        if let Some(reporter) = self.reporter.as_mut() {
            reporter(result);
        }
    }

    /// Search every root move to `depth`, picking at random between the
    /// moves that tie for the best score
    ///
    /// The result is meaningless when `out_of_time` got set on the way
    pub fn search_by_depth(&mut self, depth: Depth) -> SearchResult {
        let color = self.board.turn();
        let mut moves = legal_moves(self.board, self.tables);

        if moves.is_empty() {
            let score = if in_check(self.board, self.tables) {
                -(MATE + depth)
            } else {
                self.draw_score(color)
            };
            return SearchResult {
                score,
                depth,
                nodes: self.nodes,
                elapsed: self.started.elapsed(),
                ..SearchResult::empty()
            };
        }

        let key = self.board.key();
        let hash_move = self.tt.best_move(key).unwrap_or(BitMove::NULL);
        score_moves(&mut moves, hash_move, &self.killers[depth as usize]);

        let mut best = -INFINITY;
        let mut ties: Vec<BitMove> = Vec::new();

        for i in 0..moves.size() {
            pick_next_move(&mut moves, i);
            let m = moves.get(i);

            let prior = self.board.make_move(m);
            let score = if ties.is_empty() {
                -self.negamax(color.opp(), depth - 1, -INFINITY, INFINITY)
            } else {
                // Can this move at least match the best one?
                let bound = -self.negamax(color.opp(), depth - 1, -best, -(best - 1));
                if bound > best - 1 && !self.out_of_time {
                    -self.negamax(color.opp(), depth - 1, -INFINITY, -(best - 1))
                } else {
                    bound
                }
            };
            self.board.unmake_move(m, prior);

            if self.out_of_time {
                return SearchResult::empty();
            }

            if score > best {
                best = score;
                ties.clear();
                ties.push(m);
            } else if score == best {
                ties.push(m);
            }
        }

        let best_move = ties[self.rng.usize(..ties.len())];
        self.tt.store(key, best_move, depth);

        SearchResult {
            best_move,
            score: best,
            depth,
            nodes: self.nodes,
            elapsed: self.started.elapsed(),
        }
    }

    /// Score of the position for `color`, the side to move
    pub fn negamax(&mut self, color: Color, depth: Depth, mut alpha: Score, beta: Score) -> Score {
        if self.out_of_time {
            return TIMEOUT;
        }

        if self.board.is_draw() {
            return self.draw_score(color);
        }

        if depth <= 0 {
            return self.quiescence(color, alpha, beta);
        }

        self.nodes += 1;

        let mut moves = legal_moves(self.board, self.tables);
        if moves.is_empty() {
            return if in_check(self.board, self.tables) {
                // Mates closer to the root keep more depth and score higher
                -(MATE + depth)
            } else {
                self.draw_score(color)
            };
        }

        let key = self.board.key();
        let hash_move = self.tt.best_move(key).unwrap_or(BitMove::NULL);
        score_moves(&mut moves, hash_move, &self.killers[depth as usize]);

        let mut best_move = BitMove::NULL;

        for i in 0..moves.size() {
            pick_next_move(&mut moves, i);
            let m = moves.get(i);

            let prior = self.board.make_move(m);
            let score = -self.negamax(color.opp(), depth - 1, -beta, -alpha);
            self.board.unmake_move(m, prior);

            if self.out_of_time {
                return TIMEOUT;
            }

            if score >= beta {
                if !m.is_cap() {
                    self.store_killer(m, depth);
                }
                return beta;
            }

            if score > alpha {
                alpha = score;
                best_move = m;
            }
        }

        if !best_move.is_null() {
            self.tt.store(key, best_move, depth);
        }

        alpha
    }

    /// Only captures are searched, the side to move may always stand pat
    pub fn quiescence(&mut self, color: Color, mut alpha: Score, beta: Score) -> Score {
        self.leaf_nodes += 1;
        if self.leaf_nodes % NODE_CHECK_INTERVAL == 0 {
            self.check_time();
        }
        if self.out_of_time {
            return TIMEOUT;
        }

        self.nodes += 1;

        let stand_pat = color.sign() * evaluate(self.board);
        if stand_pat >= beta {
            return beta;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        let mut moves = captures(self.board, self.tables);
        score_moves(&mut moves, BitMove::NULL, &[BitMove::NULL; 2]);

        for i in 0..moves.size() {
            pick_next_move(&mut moves, i);
            let m = moves.get(i);

            let prior = self.board.make_move(m);
            let score = -self.quiescence(color.opp(), -beta, -alpha);
            self.board.unmake_move(m, prior);

            if self.out_of_time {
                return TIMEOUT;
            }

            if score >= beta {
                return beta;
            }
            if score > alpha {
                alpha = score;
            }
        }

        alpha
    }

    fn check_time(&mut self) {
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                self.out_of_time = true;
            }
        }
    }

    fn store_killer(&mut self, m: BitMove, depth: Depth) {
        let killers = &mut self.killers[depth as usize];
        if killers[0] != m {
            killers[1] = killers[0];
            killers[0] = m;
        }
    }

    fn draw_score(&self, color: Color) -> Score {
        if color == self.root_color {
            self.contempt
        } else {
            -self.contempt
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::tables;

    fn search_fen(fen: &str, depth: Depth) -> SearchResult {
        let mut board = Board::from_fen(fen).unwrap();
        let mut tt = TranspositionTable::new(1 << 12);
        let mut searcher = Searcher::new(&mut board, tables(), &mut tt).with_seed(1);
        searcher.search(&SearchInfo::with_depth(depth), 1000)
    }

    #[test]
    fn finds_mate_in_one() {
        let result = search_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", 3);
        assert_eq!(result.best_move.to_string(), "a1a8");
        assert!(result.score >= MATE);
    }

    #[test]
    fn takes_a_hanging_queen() {
        let result = search_fen("4k3/8/8/3q4/8/8/3R4/4K3 w - - 0 1", 2);
        assert_eq!(result.best_move.to_string(), "d2d5");
    }

    #[test]
    fn mated_side_has_no_move() {
        let result = search_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1", 3);
        assert!(result.best_move.is_null());
        assert!(result.score <= -MATE);
    }

    #[test]
    fn search_leaves_the_board_untouched() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        let mut board = Board::from_fen(fen).unwrap();
        let before = board.clone();
        let mut tt = TranspositionTable::new(1 << 12);

        Searcher::new(&mut board, tables(), &mut tt).search(&SearchInfo::with_depth(3), 1000);
        assert_eq!(board, before);
    }

    #[test]
    fn quiescence_stands_pat_for_either_side() {
        let mut board = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let mut tt = TranspositionTable::new(16);
        let expected = evaluate(&board);

        let mut searcher = Searcher::new(&mut board, tables(), &mut tt);
        assert_eq!(searcher.quiescence(Color::White, -INFINITY, INFINITY), expected);
        assert_eq!(searcher.quiescence(Color::Black, -INFINITY, INFINITY), -expected);
    }

    #[test]
    fn drawn_nodes_score_contempt_for_the_root_side() {
        let mut board = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 100 80").unwrap();
        let mut tt = TranspositionTable::new(16);

        let mut searcher = Searcher::new(&mut board, tables(), &mut tt).with_contempt(25);
        assert_eq!(searcher.negamax(Color::White, 3, -INFINITY, INFINITY), 25);
        assert_eq!(searcher.negamax(Color::Black, 3, -INFINITY, INFINITY), -25);
    }

    #[test]
    fn fifty_move_draw_outweighs_material() {
        for contempt in [25, -25] {
            let mut board = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 99 80").unwrap();
            let mut tt = TranspositionTable::new(16);

            let result = Searcher::new(&mut board, tables(), &mut tt)
                .with_contempt(contempt)
                .with_seed(1)
                .search_by_depth(2);
            assert_eq!(result.score, contempt);
        }
    }

    #[test]
    fn repeated_position_is_scored_as_a_draw() {
        let mut board = Board::start_pos();
        for text in ["g1f3", "g8f6", "f3g1", "f6g8", "g1f3", "g8f6", "f3g1", "f6g8"] {
            let m = board.parse_move(tables(), text).unwrap();
            board.make_move(m);
        }
        assert!(board.is_repetition());

        let mut tt = TranspositionTable::new(16);
        let mut searcher = Searcher::new(&mut board, tables(), &mut tt).with_contempt(-10);
        assert_eq!(searcher.negamax(Color::White, 2, -INFINITY, INFINITY), -10);
        assert_eq!(searcher.negamax(Color::Black, 2, -INFINITY, INFINITY), 10);
    }
}
