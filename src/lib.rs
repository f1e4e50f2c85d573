pub mod bitboard;
pub mod bitmove;
pub mod board;
pub mod config;
pub mod defs;
pub mod error;
pub mod eval;
pub mod fen;
pub mod gen;
pub mod history;
pub mod input;
pub mod logging;
pub mod movegen;
pub mod movelist;
pub mod order;
pub mod params;
pub mod perft;
pub mod search;
pub mod search_info;
pub mod state;
pub mod table;
pub mod uci;
pub mod utils;
pub mod zobrist;
