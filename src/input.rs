//! Line oriented command loop
//!
//! The engine starts in interactive mode, meant for a human at a terminal.
//! `uci` switches to protocol mode for good, see `uci.rs`.

use std::{
    io::{BufRead, Write},
    time::Instant,
};

use log::{debug, warn};

use crate::{
    board::Board,
    config::{parse_value, EngineConfig},
    defs::{Depth, GenType, FEN_START_STRING},
    error::{EngineError, EngineResult},
    gen::magic::AttackTables,
    movegen::{generate, in_check},
    params::MAX_DEPTH,
    perft::{perft, perft_divide, PerftSuite},
    search::{SearchResult, Searcher},
    search_info::SearchInfo,
    table::TranspositionTable,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Interactive,
    Uci,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

const HELP: &str = "\
commands:
  help                          this text
  load [fen]                    set up a position, the start position without a fen
  show                          print the board
  go [ms]                       search and play the best move
  who                           side to move
  flip                          turn the board diagram around
  pass                          let the other side move
  move <move>                   play a move, eg e2e4 or e7e8q
  moves                         list legal moves
  captures                      list legal captures
  perft <depth>                 count leaf nodes
  perft split <depth>           leaf nodes per root move
  perft suite [min] [max]       check the perft fixture
  uci                           switch to protocol mode
  quit | exit                   leave";

pub struct Game<'a, W: Write> {
    pub board: Board,
    pub tables: &'a AttackTables,
    pub tt: TranspositionTable,
    pub config: EngineConfig,
    pub mode: Mode,
    /// Print the board with rank 1 on top
    pub flipped: bool,
    pub out: W,
}

impl<'a, W: Write> Game<'a, W> {
    pub fn new(config: EngineConfig, tables: &'a AttackTables, out: W) -> Self {
        Game {
            board: Board::start_pos(),
            tables,
            tt: TranspositionTable::new(config.tt_entries),
            config,
            mode: Mode::Interactive,
            flipped: false,
            out,
        }
    }

    /// Start up banner
    pub fn greet(&mut self) -> EngineResult<()> {
        writeln!(self.out, "magister {}, type 'help' for commands", env!("CARGO_PKG_VERSION"))?;
        self.out.flush()?;
        Ok(())
    }

    /// Read commands until `quit` or the end of `input`
    pub fn run(&mut self, input: impl BufRead) -> EngineResult<()> {
        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            debug!("command: {line}");
            match self.execute(line) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(EngineError::Io(err)) => return Err(EngineError::Io(err)),
                Err(err) => {
                    warn!("{line}: {err}");
                    self.report_error(&err)?;
                }
            }
            self.out.flush()?;
        }

        Ok(())
    }

    fn report_error(&mut self, err: &EngineError) -> EngineResult<()> {
        match self.mode {
            Mode::Interactive => writeln!(self.out, "error: {err}")?,
            Mode::Uci => writeln!(self.out, "info string error: {err}")?,
        }
        Ok(())
    }

    pub fn execute(&mut self, line: &str) -> EngineResult<Flow> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, args)) = tokens.split_first() else {
            return Ok(Flow::Continue);
        };

        match self.mode {
            Mode::Interactive => self.interactive(command, args),
            Mode::Uci => self.uci_command(command, args),
        }
    }

    fn interactive(&mut self, command: &str, args: &[&str]) -> EngineResult<Flow> {
        match command {
            "help" => writeln!(self.out, "{HELP}")?,
            "load" => self.load(args)?,
            "show" => self.show()?,
            "go" => self.go_interactive(args)?,
            "who" => writeln!(self.out, "{} to move", self.board.turn().name())?,
            "flip" => {
                self.flipped = !self.flipped;
                self.show()?;
            }
            "pass" => self.pass()?,
            "move" => self.play(args)?,
            "moves" => self.list_moves(GenType::All)?,
            "captures" => self.list_moves(GenType::Captures)?,
            "perft" => self.perft_command(args)?,
            "uci" => {
                self.mode = Mode::Uci;
                self.uci_identify()?;
            }
            "quit" | "exit" => return Ok(Flow::Quit),
            _ => return Err(EngineError::UnknownCommand(command.to_string())),
        }

        Ok(Flow::Continue)
    }

    fn load(&mut self, args: &[&str]) -> EngineResult<()> {
        let fen = if args.is_empty() {
            FEN_START_STRING.to_string()
        } else {
            args.join(" ")
        };

        self.board.load_fen(&fen)?;
        self.show()
    }

    fn show(&mut self) -> EngineResult<()> {
        write!(self.out, "{}", self.board.pretty_string(self.flipped))?;
        writeln!(self.out, "FEN  : {}", self.board.to_fen())?;
        writeln!(self.out, "Turn : {}", self.board.turn().name())?;
        writeln!(self.out, "Key  : {:#018x}", self.board.key())?;
        Ok(())
    }

    fn pass(&mut self) -> EngineResult<()> {
        if in_check(&self.board, self.tables) {
            return Err(EngineError::IllegalMove("pass".to_string()));
        }

        self.board.make_null_move();
        writeln!(self.out, "{} to move", self.board.turn().name())?;
        Ok(())
    }

    fn play(&mut self, args: &[&str]) -> EngineResult<()> {
        let text = args.first().ok_or(EngineError::MissingArgument("move"))?;
        let m = self.board.parse_move(self.tables, text)?;

        self.board.make_move(m);
        self.show()
    }

    fn list_moves(&mut self, gen_type: GenType) -> EngineResult<()> {
        let moves = generate(&self.board, self.tables, gen_type);
        let texts: Vec<String> = moves.iter().map(|m| m.to_string()).collect();
        writeln!(self.out, "{}: {}", moves.size(), texts.join(" "))?;
        Ok(())
    }

    fn go_interactive(&mut self, args: &[&str]) -> EngineResult<()> {
        let move_time = match args.first() {
            Some(ms) => parse_value("go", ms)?,
            None => self.config.move_time_ms,
        };

        let result = self.search(&SearchInfo::with_move_time(move_time));

        if result.best_move.is_null() {
            let outcome = if in_check(&self.board, self.tables) {
                "checkmate"
            } else {
                "stalemate"
            };
            writeln!(self.out, "no legal moves, {outcome}")?;
            return Ok(());
        }

        writeln!(
            self.out,
            "{} plays {} (score {}, depth {})",
            self.board.turn().name(),
            result.best_move,
            result.score,
            result.depth
        )?;
        self.board.make_move(result.best_move);
        self.show()
    }

    /// Search the current position, per depth progress goes to `out`
    pub fn search(&mut self, info: &SearchInfo) -> SearchResult {
        let mode = self.mode;
        let out = &mut self.out;

        let mut searcher = Searcher::new(&mut self.board, self.tables, &mut self.tt)
            .with_contempt(self.config.contempt)
            .with_reporter(move |result: &SearchResult| {
                let line = match mode {
                    Mode::Uci => crate::uci::info_line(result),
                    Mode::Interactive => format!(
                        "depth {:>2} score {:>6} nodes {:>10} time {:>6} ms best {}",
                        result.depth,
                        result.score,
                        result.nodes,
                        result.elapsed.as_millis(),
                        result.best_move
                    ),
                };
                // Progress output is best effort
                let _ = writeln!(out, "{line}");
            });

        searcher.search(info, self.config.move_time_ms)
    }

    fn perft_command(&mut self, args: &[&str]) -> EngineResult<()> {
        match args.first().copied() {
            Some("split") => {
                let depth = parse_depth(args.get(1).copied())?;
                let started = Instant::now();
                let divided = perft_divide(&mut self.board, self.tables, depth);

                for (m, nodes) in &divided {
                    writeln!(self.out, "{m}: {nodes}")?;
                }
                let total: u64 = divided.iter().map(|(_, n)| n).sum();
                self.perft_summary(divided.len(), total, started)
            }
            Some("suite") => {
                let min = args.get(1).map_or(Ok(1), |v| parse_value("min", v))?;
                let max = args.get(2).map_or(Ok(MAX_DEPTH), |v| parse_value("max", v))?;
                let suite = PerftSuite::load(&self.config.perft_suite)?;
                suite.run(self.tables, min, max, &mut self.out)?;
                Ok(())
            }
            depth => {
                let depth = parse_depth(depth)?;
                let started = Instant::now();
                let nodes = perft(&mut self.board, self.tables, depth);
                let moves = generate(&self.board, self.tables, GenType::All).size();
                self.perft_summary(moves, nodes, started)
            }
        }
    }

    fn perft_summary(&mut self, moves: usize, nodes: u64, started: Instant) -> EngineResult<()> {
        let secs = started.elapsed().as_secs_f64();
        let nps = if secs > 0.0 { (nodes as f64 / secs) as u64 } else { 0 };

        writeln!(self.out)?;
        writeln!(self.out, "Total time (s) : {secs:.3}")?;
        writeln!(self.out, "Num moves      : {moves}")?;
        writeln!(self.out, "Num nodes      : {nodes}")?;
        writeln!(self.out, "Nodes/s        : {nps}")?;
        Ok(())
    }
}

fn parse_depth(arg: Option<&str>) -> EngineResult<Depth> {
    let value = arg.ok_or(EngineError::MissingArgument("perft"))?;
    parse_value("depth", value)
}
