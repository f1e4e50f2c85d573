//! Error types for the engine
//!
//! Malformed input and illegal move requests are recoverable, the command
//! loop reports them and carries on. Running out of magic candidates while
//! building attack tables is fatal.

use std::path::PathBuf;

use thiserror::Error;

use crate::{defs::Square, gen::magic::Family};

/// Reasons a FEN string is rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("expected 6 fields, found {0}")]
    FieldCount(usize),

    #[error("invalid piece placement character '{0}'")]
    PieceChar(char),

    #[error("rank {rank} describes {files} files")]
    RankLength { rank: usize, files: usize },

    #[error("piece placement has {0} ranks")]
    RankCount(usize),

    #[error("invalid side to move '{0}'")]
    SideToMove(String),

    #[error("invalid castling rights '{0}'")]
    Castling(String),

    #[error("invalid en passant square '{0}'")]
    EnPassant(String),

    #[error("invalid move counter '{0}'")]
    Counter(String),

    #[error("each side needs exactly one king")]
    Kings,
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid FEN: {0}")]
    Fen(#[from] FenError),

    #[error("malformed move '{0}'")]
    MoveText(String),

    #[error("illegal move '{0}'")]
    IllegalMove(String),

    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("missing argument for '{0}'")]
    MissingArgument(&'static str),

    #[error("invalid value '{value}' for '{name}'")]
    InvalidArgument { name: &'static str, value: String },

    #[error("no {family} magic found for square {square}")]
    MagicExhausted { square: Square, family: Family },

    #[error("cannot read perft suite {path}: {source}")]
    PerftSuiteIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("perft suite line {line}: {message}")]
    PerftSuiteParse { line: usize, message: String },

    #[error("output failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
