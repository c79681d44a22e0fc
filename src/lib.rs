pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod orchestrator;
pub mod pairing;
pub mod registry;
pub mod reports;
pub mod scoring;
pub mod services;
pub mod storage;

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use colored::Colorize;
use log::info;

use crate::cli::{Cli, PlayerCommand, RoundCommand, TournamentCommand};
use crate::config::AppConfig;
use crate::domain::{
    parse_date, GameResult, MatchId, NewTournament, Player, PlayerId, RoundStatus, TournamentId,
};
use crate::services::TournamentService;
use crate::storage::JsonRepository;

pub use crate::cli::Command;

pub fn interpret() -> (Option<PathBuf>, Command) {
    let cli = Cli::parse();
    (cli.data_dir, cli.command)
}

fn open_service(data_dir: Option<PathBuf>) -> Result<TournamentService<JsonRepository>> {
    let config = AppConfig::from_env().with_data_dir(data_dir);
    info!("Using data directory {}", config.storage.data_dir.display());
    let repo = JsonRepository::new(&config.storage)?;
    TournamentService::new(repo, config)
}

fn tournament_id(raw: &str) -> Result<TournamentId> {
    TournamentId::from_name(raw).with_context(|| format!("Invalid tournament id '{}'", raw))
}

fn player_id(raw: &str) -> Result<PlayerId> {
    raw.parse::<PlayerId>()
        .with_context(|| format!("Invalid national id '{}'", raw))
}

pub fn handle_player(data_dir: Option<PathBuf>, command: &PlayerCommand) -> Result<()> {
    let mut service = open_service(data_dir)?;
    match command {
        PlayerCommand::Add {
            first_name,
            last_name,
            birth_date,
            national_id,
        } => {
            let player = Player::new(
                first_name,
                last_name,
                parse_date("birth date", birth_date)?,
                player_id(national_id)?,
            )?;
            let player = service.register_player(player)?;
            println!(
                "{} {} ({})",
                "Registered".green(),
                player.full_name(),
                player.national_id
            );
        }
        PlayerCommand::List => print!("{}", reports::players_report(service.players())),
    }
    Ok(())
}

pub fn handle_tournament(data_dir: Option<PathBuf>, command: &TournamentCommand) -> Result<()> {
    let mut service = open_service(data_dir)?;
    match command {
        TournamentCommand::Create {
            name,
            location,
            start_date,
            end_date,
            rounds,
            description,
            players,
        } => {
            let details = NewTournament {
                name: name.clone(),
                location: location.clone(),
                description: description.clone(),
                start_date: parse_date("start date", start_date)?,
                end_date: end_date
                    .as_deref()
                    .map(|raw| parse_date("end date", raw))
                    .transpose()?,
                round_count: rounds.unwrap_or(service.config().pairing.default_round_count),
            };
            let entrants = players
                .iter()
                .map(|raw| player_id(raw))
                .collect::<Result<Vec<_>>>()?;
            let selection = (!entrants.is_empty()).then_some(entrants.as_slice());

            let tournament = service.create_tournament(details, selection)?;
            println!(
                "{} {} [{}] with {} players over {} rounds",
                "Created".green(),
                tournament.name,
                tournament.id,
                tournament.roster().len(),
                tournament.round_count
            );
        }
        TournamentCommand::List => {
            print!("{}", reports::tournaments_report(&service.list_tournaments()?))
        }
        TournamentCommand::Unfinished => {
            print!(
                "{}",
                reports::tournaments_report(&service.unfinished_tournaments()?)
            )
        }
        TournamentCommand::Show { tournament } => {
            let tournament = service.tournament(&tournament_id(tournament)?)?;
            print!(
                "{}",
                reports::tournament_details(service.players(), &tournament)
            );
        }
        TournamentCommand::Enroll {
            tournament,
            national_id,
        } => {
            let id = tournament_id(tournament)?;
            service.enroll(&id, &player_id(national_id)?)?;
            println!("{} {} in {}", "Enrolled".green(), national_id, id);
        }
        TournamentCommand::Withdraw {
            tournament,
            national_id,
        } => {
            let id = tournament_id(tournament)?;
            service.withdraw(&id, &player_id(national_id)?)?;
            println!("{} {} from {}", "Withdrew".yellow(), national_id, id);
        }
        TournamentCommand::Finish { tournament } => {
            let id = tournament_id(tournament)?;
            let credited = service.finish_tournament(&id)?;
            println!(
                "{} {}, lifetime scores credited to {} players",
                "Finished".green(),
                id,
                credited
            );
            let tournament = service.tournament(&id)?;
            print!(
                "{}",
                reports::standings_report(
                    service.players(),
                    &tournament,
                    &service.standings(&id)?
                )
            );
        }
    }
    Ok(())
}

pub fn handle_round(data_dir: Option<PathBuf>, command: &RoundCommand) -> Result<()> {
    let mut service = open_service(data_dir)?;
    match command {
        RoundCommand::Start { tournament } => {
            let id = tournament_id(tournament)?;
            let round = service.start_next_round(&id)?;
            print!("{}", reports::round_report(service.players(), &round));
        }
        RoundCommand::Result {
            tournament,
            game,
            outcome,
        } => {
            let id = tournament_id(tournament)?;
            let match_id: MatchId = game.parse()?;
            let result: GameResult = outcome.parse()?;
            match service.record_result(&id, match_id, result)? {
                RoundStatus::Complete => println!(
                    "{} {} recorded, round {} complete",
                    "Result".green(),
                    result.notation(),
                    match_id.round
                ),
                _ => println!("{} {} recorded", "Result".green(), result.notation()),
            }
        }
        RoundCommand::Pending { tournament } => {
            let id = tournament_id(tournament)?;
            print!(
                "{}",
                reports::matches_report(service.players(), &service.pending_matches(&id)?)
            );
        }
    }
    Ok(())
}

pub fn handle_standings(data_dir: Option<PathBuf>, tournament: &str) -> Result<()> {
    let service = open_service(data_dir)?;
    let id = tournament_id(tournament)?;
    let tournament = service.tournament(&id)?;
    print!(
        "{}",
        reports::standings_report(service.players(), &tournament, &service.standings(&id)?)
    );
    Ok(())
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut io::stdout());
    Ok(())
}
