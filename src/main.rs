use std::{io, process::ExitCode};

use log::error;
use magister::{config::EngineConfig, gen::magic::AttackTables, input::Game, logging};

fn main() -> ExitCode {
    let config = match EngineConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("magister: {err}");
            return ExitCode::from(2);
        }
    };

    logging::init(&config);

    let tables = match AttackTables::build() {
        Ok(tables) => tables,
        Err(err) => {
            error!("{err}");
            eprintln!("magister: {err}");
            return ExitCode::FAILURE;
        }
    };

    let stdout = io::stdout();
    let mut game = Game::new(config, &tables, stdout.lock());
    if let Err(err) = game.greet() {
        error!("{err}");
        return ExitCode::FAILURE;
    }

    match game.run(io::stdin().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
