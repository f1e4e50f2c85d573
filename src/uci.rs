//! Protocol mode, entered with `uci` from the interactive loop

use std::io::Write;

use log::info;

use crate::{
    board::Board,
    config::parse_value,
    defs::{Depth, Score, FEN_START_STRING},
    error::{EngineError, EngineResult},
    input::{Flow, Game},
    params::{is_mate_score, DEFAULT_MOVE_TIME_MS, DEFAULT_TT_ENTRIES, MATE},
    search::SearchResult,
    search_info::SearchInfo,
};

/// Gui to engine
impl<W: Write> Game<'_, W> {
    pub(crate) fn uci_command(&mut self, command: &str, args: &[&str]) -> EngineResult<Flow> {
        match command {
            "uci" => self.uci_identify()?,
            "isready" => writeln!(self.out, "readyok")?,
            "ucinewgame" => {
                self.tt.clear();
                self.board = Board::start_pos();
            }
            "setoption" => self.set_option(args)?,
            "position" => self.position(args)?,
            "go" => self.go(args)?,
            "quit" => return Ok(Flow::Quit),
            _ => return Err(EngineError::UnknownCommand(command.to_string())),
        }

        Ok(Flow::Continue)
    }

    pub(crate) fn uci_identify(&mut self) -> EngineResult<()> {
        writeln!(self.out, "id name magister {}", env!("CARGO_PKG_VERSION"))?;
        writeln!(self.out, "id author Dewaeq")?;
        writeln!(
            self.out,
            "option name Hash type spin default {DEFAULT_TT_ENTRIES} min 1 max {}",
            1usize << 28
        )?;
        writeln!(
            self.out,
            "option name MoveTime type spin default {DEFAULT_MOVE_TIME_MS} min 1 max 3600000"
        )?;
        writeln!(self.out, "option name Contempt type spin default 0 min -1000 max 1000")?;
        writeln!(self.out, "uciok")?;
        Ok(())
    }

    /// `setoption name <name> value <value>`
    fn set_option(&mut self, args: &[&str]) -> EngineResult<()> {
        let value_idx = args.iter().position(|&x| x == "value");
        let name = match (args.first(), value_idx) {
            (Some(&"name"), Some(idx)) => args[1..idx].join(" "),
            (Some(&"name"), None) => args[1..].join(" "),
            _ => return Err(EngineError::MissingArgument("name")),
        };
        let value = value_idx
            .map(|idx| args[idx + 1..].join(" "))
            .filter(|v| !v.is_empty())
            .ok_or(EngineError::MissingArgument("value"))?;

        self.config.set_option(&name, &value)?;
        if name.eq_ignore_ascii_case("hash") {
            self.tt.resize(self.config.tt_entries);
        }
        info!("option {name} set to {value}");
        Ok(())
    }

    /// `position [startpos | fen <fen>] [moves <m1> <m2> ...]`
    fn position(&mut self, args: &[&str]) -> EngineResult<()> {
        let moves_idx = args.iter().position(|&x| x == "moves");
        let setup = &args[..moves_idx.unwrap_or(args.len())];

        match setup.split_first() {
            Some((&"startpos", _)) => self.board.load_fen(FEN_START_STRING)?,
            Some((&"fen", fen)) => self.board.load_fen(&fen.join(" "))?,
            Some((other, _)) => return Err(EngineError::UnknownCommand(format!("position {other}"))),
            None => return Err(EngineError::MissingArgument("position")),
        }

        if let Some(idx) = moves_idx {
            for text in &args[idx + 1..] {
                let m = self.board.parse_move(self.tables, text)?;
                self.board.make_move(m);
            }
        }

        Ok(())
    }

    fn go(&mut self, args: &[&str]) -> EngineResult<()> {
        let mut info = SearchInfo::default();
        let mut tokens = args.iter();

        while let Some(&token) = tokens.next() {
            let mut value = || tokens.next().copied().ok_or(EngineError::MissingArgument("go"));
            match token {
                "infinite" => info.infinite = true,
                "depth" => info.depth = Some(parse_value("depth", value()?)?),
                "movetime" => info.move_time = Some(parse_value("movetime", value()?)?),
                "wtime" => info.w_time = Some(parse_value("wtime", value()?)?),
                "btime" => info.b_time = Some(parse_value("btime", value()?)?),
                "winc" => info.w_inc = parse_value("winc", value()?)?,
                "binc" => info.b_inc = parse_value("binc", value()?)?,
                "movestogo" => info.moves_to_go = Some(parse_value("movestogo", value()?)?),
                _ => return Err(EngineError::UnknownCommand(format!("go {token}"))),
            }
        }

        let result = self.search(&info);
        self.best_move(&result)
    }
}

/// Engine to Gui
impl<W: Write> Game<'_, W> {
    fn best_move(&mut self, result: &SearchResult) -> EngineResult<()> {
        writeln!(self.out, "bestmove {}", result.best_move)?;
        Ok(())
    }
}

/// `info` line for one completed depth
pub fn info_line(result: &SearchResult) -> String {
    let millis = result.elapsed.as_millis();
    let nps = if millis > 0 {
        result.nodes as u128 * 1000 / millis
    } else {
        0
    };

    format!(
        "info depth {} score {} nodes {} time {} nps {} pv {}",
        result.depth,
        score_text(result.score, result.depth),
        result.nodes,
        millis,
        nps,
        result.best_move
    )
}

/// `cp <n>`, or `mate <n>` in full moves, negative when we are the one mated
fn score_text(score: Score, depth: Depth) -> String {
    if !is_mate_score(score) {
        return format!("cp {score}");
    }

    // Mate scores carry the remaining depth on top of MATE
    let plies = (depth - (score.abs() - MATE)).max(1);
    let moves = (plies + 1) / 2;
    if score > 0 {
        format!("mate {moves}")
    } else {
        format!("mate -{moves}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::EngineConfig, test_support::tables};

    fn uci_game() -> Game<'static, Vec<u8>> {
        let config = EngineConfig {
            tt_entries: 1 << 10,
            log_file: None,
            ..EngineConfig::default()
        };
        let mut game = Game::new(config, tables(), Vec::new());
        game.execute("uci").unwrap();
        game.out.clear();
        game
    }

    fn output(game: &mut Game<'static, Vec<u8>>) -> String {
        String::from_utf8(std::mem::take(&mut game.out)).unwrap()
    }

    #[test]
    fn handshake() {
        let config = EngineConfig {
            log_file: None,
            ..EngineConfig::default()
        };
        let mut game = Game::new(config, tables(), Vec::new());
        game.execute("uci").unwrap();
        game.execute("isready").unwrap();

        let text = output(&mut game);
        assert!(text.starts_with("id name magister"));
        assert!(text.contains("option name Hash"));
        assert!(text.contains("uciok\nreadyok\n"));
    }

    #[test]
    fn position_with_moves() {
        let mut game = uci_game();
        game.execute("position startpos moves e2e4 e7e5 g1f3").unwrap();
        assert_eq!(
            game.board.to_fen(),
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2"
        );

        game.execute("position fen 4k3/8/8/8/8/8/8/4K2R w K - 0 1 moves e1g1").unwrap();
        assert_eq!(game.board.to_fen(), "4k3/8/8/8/8/8/8/5RK1 b - - 1 1");
    }

    #[test]
    fn go_answers_with_bestmove() {
        let mut game = uci_game();
        game.execute("position fen 6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        game.execute("go depth 3").unwrap();

        let text = output(&mut game);
        assert!(text.contains("info depth 1 "));
        assert!(text.ends_with("bestmove a1a8\n"));
        // The move is reported, not played
        assert_eq!(game.board.turn().name(), "White");
    }

    #[test]
    fn setoption_resizes_the_table() {
        let mut game = uci_game();
        game.execute("setoption name Hash value 4096").unwrap();
        assert_eq!(game.tt.size(), 4096);

        game.execute("setoption name Contempt value -20").unwrap();
        assert_eq!(game.config.contempt, -20);

        assert!(game.execute("setoption name Hash").is_err());
        assert!(game.execute("setoption name Threads value 2").is_err());
    }

    #[test]
    fn bad_go_arguments() {
        let mut game = uci_game();
        assert!(matches!(game.execute("go depth"), Err(EngineError::MissingArgument("go"))));
        assert!(matches!(game.execute("go depth x"), Err(EngineError::InvalidArgument { .. })));
    }

    #[test]
    fn mate_scores_in_moves() {
        assert_eq!(score_text(35, 4), "cp 35");
        // Mate found one ply below the root of a depth 3 search
        assert_eq!(score_text(MATE + 2, 3), "mate 1");
        assert_eq!(score_text(-(MATE + 1), 3), "mate -1");
        assert_eq!(score_text(MATE + 1, 4), "mate 2");
    }
}
