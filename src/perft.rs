//! Leaf node counting, to check the move generator against known results

use std::{
    fs,
    io::{self, Write},
    path::Path,
    time::{Duration, Instant},
};

use log::{info, warn};

use crate::{
    bitmove::BitMove,
    board::Board,
    defs::Depth,
    error::{EngineError, EngineResult},
    gen::magic::AttackTables,
    movegen::legal_moves,
};

/// Number of leaf nodes `depth` plies below the current position
pub fn perft(board: &mut Board, tables: &AttackTables, depth: Depth) -> u64 {
    if depth <= 0 {
        return 1;
    }

    let moves = legal_moves(board, tables);
    if depth == 1 {
        return moves.size() as u64;
    }

    let mut nodes = 0;
    for m in moves.iter() {
        let prior = board.make_move(m);
        nodes += perft(board, tables, depth - 1);
        board.unmake_move(m, prior);
    }

    nodes
}

/// Leaf counts below each root move
pub fn perft_divide(board: &mut Board, tables: &AttackTables, depth: Depth) -> Vec<(BitMove, u64)> {
    legal_moves(board, tables)
        .iter()
        .map(|m| {
            let prior = board.make_move(m);
            let nodes = perft(board, tables, depth - 1);
            board.unmake_move(m, prior);
            (m, nodes)
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PerftEntry {
    pub fen: String,
    /// `(depth, expected leaf count)` pairs
    pub expected: Vec<(Depth, u64)>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PerftSuite {
    pub entries: Vec<PerftEntry>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SuiteReport {
    pub passed: usize,
    pub failed: usize,
    pub nodes: u64,
    pub elapsed: Duration,
}

impl SuiteReport {
    pub fn nodes_per_second(&self) -> u64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            (self.nodes as f64 / secs) as u64
        } else {
            0
        }
    }
}

impl PerftSuite {
    pub fn load(path: &Path) -> EngineResult<PerftSuite> {
        let text = fs::read_to_string(path).map_err(|source| EngineError::PerftSuiteIo {
            path: path.to_path_buf(),
            source,
        })?;
        let suite = PerftSuite::parse(&text)?;
        info!("loaded {} perft positions from {}", suite.entries.len(), path.display());
        Ok(suite)
    }

    /// One position per line: `<fen> ;D1 <n> ;D2 <n> ...`, blank lines and
    /// lines starting with `#` are skipped
    pub fn parse(text: &str) -> EngineResult<PerftSuite> {
        let mut entries = Vec::new();

        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parse_error = |message: String| EngineError::PerftSuiteParse {
                line: index + 1,
                message,
            };

            let mut fields = line.split(';');
            let fen = fields.next().unwrap_or_default().trim().to_string();
            Board::from_fen(&fen).map_err(|err| parse_error(err.to_string()))?;

            let mut expected = Vec::new();
            for field in fields {
                let mut parts = field.split_whitespace();
                let (Some(tag), Some(count), None) = (parts.next(), parts.next(), parts.next()) else {
                    return Err(parse_error(format!("malformed field '{}'", field.trim())));
                };

                let depth = tag
                    .strip_prefix('D')
                    .and_then(|d| d.parse::<Depth>().ok())
                    .ok_or_else(|| parse_error(format!("bad depth tag '{tag}'")))?;
                let count = count
                    .parse::<u64>()
                    .map_err(|_| parse_error(format!("bad node count '{count}'")))?;

                expected.push((depth, count));
            }

            entries.push(PerftEntry { fen, expected });
        }

        Ok(PerftSuite { entries })
    }

    /// Check every listed depth within `min..=max`, reporting each one to `out`
    pub fn run(
        &self,
        tables: &AttackTables,
        min: Depth,
        max: Depth,
        out: &mut impl Write,
    ) -> io::Result<SuiteReport> {
        let started = Instant::now();
        let mut report = SuiteReport::default();

        for (index, entry) in self.entries.iter().enumerate() {
            // Entries were validated while parsing
            let Ok(mut board) = Board::from_fen(&entry.fen) else {
                continue;
            };
            writeln!(out, "{:>3} {}", index + 1, entry.fen)?;

            for &(depth, expected) in entry.expected.iter().filter(|(d, _)| (min..=max).contains(d)) {
                let depth_started = Instant::now();
                let nodes = perft(&mut board, tables, depth);
                let ok = nodes == expected;

                report.nodes += nodes;
                if ok {
                    report.passed += 1;
                } else {
                    report.failed += 1;
                    warn!("perft mismatch at depth {depth} for {}: {nodes} != {expected}", entry.fen);
                }

                writeln!(
                    out,
                    "    D{depth} {:<4} {nodes:>12} / {expected:<12} {} ms",
                    if ok { "ok" } else { "FAIL" },
                    depth_started.elapsed().as_millis()
                )?;
            }
        }

        report.elapsed = started.elapsed();
        writeln!(
            out,
            "passed {} failed {} nodes {} time {} ms ({} nps)",
            report.passed,
            report.failed,
            report.nodes,
            report.elapsed.as_millis(),
            report.nodes_per_second()
        )?;

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::tables;

    #[test]
    fn start_position_shallow_counts() {
        let mut board = Board::start_pos();
        let expected = [1, 20, 400, 8902];

        for (depth, &nodes) in expected.iter().enumerate() {
            assert_eq!(perft(&mut board, tables(), depth as Depth), nodes);
        }
    }

    #[test]
    fn divide_sums_to_perft() {
        let mut board = Board::start_pos();
        let divided = perft_divide(&mut board, tables(), 3);

        assert_eq!(divided.len(), 20);
        assert_eq!(divided.iter().map(|(_, n)| n).sum::<u64>(), 8902);
    }

    #[test]
    fn suite_lines_parse() {
        let text = "# comment\n\n4k3/8/8/8/8/8/8/4K2R w K - 0 1 ;D1 15 ;D2 66\n";
        let suite = PerftSuite::parse(text).unwrap();

        assert_eq!(suite.entries.len(), 1);
        assert_eq!(suite.entries[0].expected, vec![(1, 15), (2, 66)]);
    }

    #[test]
    fn suite_errors_name_the_line() {
        let err = PerftSuite::parse("4k3/8/8/8/8/8/8/4K2R w K - 0 1 ;X1 15").unwrap_err();
        assert!(matches!(err, EngineError::PerftSuiteParse { line: 1, .. }));

        let err = PerftSuite::parse("\nnot a fen ;D1 1").unwrap_err();
        assert!(matches!(err, EngineError::PerftSuiteParse { line: 2, .. }));
    }

    #[test]
    fn run_reports_mismatches() {
        let suite = PerftSuite::parse("4k3/8/8/8/8/8/8/4K2R w K - 0 1 ;D1 15 ;D2 1").unwrap();
        let mut out = Vec::new();
        let report = suite.run(tables(), 1, 2, &mut out).unwrap();

        assert_eq!(report.passed, 1);
        assert_eq!(report.failed, 1);
        assert!(String::from_utf8(out).unwrap().contains("FAIL"));
    }
}
