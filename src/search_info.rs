use std::time::Duration;

use crate::defs::{Color, Depth};

/// Limits a search runs under, as given by a `go` command
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchInfo {
    pub depth: Option<Depth>,
    pub move_time: Option<u64>,
    pub w_time: Option<u64>,
    pub b_time: Option<u64>,
    pub w_inc: u64,
    pub b_inc: u64,
    pub moves_to_go: Option<u64>,
    pub infinite: bool,
}

/// Moves we expect to still play when no `movestogo` is given
const DEFAULT_MOVES_TO_GO: u64 = 30;

impl SearchInfo {
    pub fn with_depth(depth: Depth) -> Self {
        SearchInfo {
            depth: Some(depth),
            ..SearchInfo::default()
        }
    }

    pub fn with_move_time(ms: u64) -> Self {
        SearchInfo {
            move_time: Some(ms),
            ..SearchInfo::default()
        }
    }

    pub fn my_time(&self, side: Color) -> Option<u64> {
        match side {
            Color::White => self.w_time,
            Color::Black => self.b_time,
        }
    }

    pub fn my_inc(&self, side: Color) -> u64 {
        match side {
            Color::White => self.w_inc,
            Color::Black => self.b_inc,
        }
    }

    /// Wall clock time `side` may spend on this move, `None` for a search
    /// bounded only by depth
    ///
    /// There is no way to interrupt a running search, so `infinite` falls
    /// back to `default_move_time`
    pub fn budget(&self, side: Color, default_move_time: u64) -> Option<Duration> {
        if let Some(ms) = self.move_time {
            return Some(Duration::from_millis(ms.max(1)));
        }

        if let Some(time) = self.my_time(side) {
            let moves_to_go = self.moves_to_go.unwrap_or(DEFAULT_MOVES_TO_GO).max(1);
            let base = time / moves_to_go + self.my_inc(side) * 3 / 4;
            // Never plan to use more than 80% of what is left
            let ms = base.min(time * 8 / 10).max(1);
            return Some(Duration::from_millis(ms));
        }

        if self.depth.is_some() && !self.infinite {
            return None;
        }

        Some(Duration::from_millis(default_move_time))
    }
}
