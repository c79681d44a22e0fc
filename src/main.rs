use std::path::PathBuf;

use anyhow::Result;

use chess_tournament::{
    handle_completions, handle_player, handle_round, handle_standings, handle_tournament,
    interpret, Command,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let (data_dir, command) = interpret();
    execute_command(data_dir, &command)
}

fn execute_command(data_dir: Option<PathBuf>, command: &Command) -> Result<()> {
    match command {
        Command::Player(sub) => handle_player(data_dir, sub),
        Command::Tournament(sub) => handle_tournament(data_dir, sub),
        Command::Round(sub) => handle_round(data_dir, sub),
        Command::Standings { tournament } => handle_standings(data_dir, tournament),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
