//! Plain-text views for the command line

use colored::Colorize;
use std::fmt::Write as _;

use crate::domain::{format_date, Match, Pairing, PlayerId, RosterEntry, Round, Tournament};
use crate::pairing::rank_players;
use crate::registry::PlayerRegistry;

fn display_name(registry: &PlayerRegistry, id: &PlayerId) -> String {
    registry
        .get(id)
        .map(|p| format!("{}, {}", p.last_name, p.first_name))
        .unwrap_or_else(|| id.to_string())
}

/// Registered players, alphabetical, with lifetime scores
pub fn players_report(registry: &PlayerRegistry) -> String {
    let mut report = String::new();
    if registry.is_empty() {
        report.push_str("No players registered.\n");
        return report;
    }

    let _ = writeln!(report, "{}", "Players (alphabetical)".bold());
    for (idx, player) in registry.alphabetical().into_iter().enumerate() {
        let _ = writeln!(
            report,
            "{:>3}. {:<30} {}  born {}  lifetime {}",
            idx + 1,
            format!("{}, {}", player.last_name, player.first_name),
            player.national_id,
            format_date(player.birth_date),
            player.lifetime_score()
        );
    }
    report
}

pub fn tournaments_report(tournaments: &[Tournament]) -> String {
    let mut report = String::new();
    if tournaments.is_empty() {
        report.push_str("No tournaments available.\n");
        return report;
    }

    let _ = writeln!(report, "{}", "Tournaments".bold());
    for (idx, t) in tournaments.iter().enumerate() {
        let end = match (t.end_date(), t.is_finished()) {
            (Some(end), _) => format_date(end),
            (None, false) => "ongoing".to_string(),
            (None, true) => "?".to_string(),
        };
        let _ = writeln!(
            report,
            "{:>3}. {} [{}] ({}, {} - {}) round {}/{}{}",
            idx + 1,
            t.name,
            t.id,
            t.location,
            format_date(t.start_date),
            end,
            t.rounds().len(),
            t.round_count,
            if t.is_finished() { ", finished" } else { "" }
        );
    }
    report
}

fn match_line(registry: &PlayerRegistry, game: &Match) -> String {
    match &game.pairing {
        Pairing::Game {
            white,
            black,
            result,
        } => {
            let score = result.map(|r| r.notation()).unwrap_or("  -  ");
            format!(
                "{:>6}  {:<28} {:^5} {}",
                game.id,
                display_name(registry, white),
                score,
                display_name(registry, black)
            )
        }
        Pairing::Bye { player, points } => format!(
            "{:>6}  {:<28} bye (+{})",
            game.id,
            display_name(registry, player),
            points
        ),
    }
}

pub fn round_report(registry: &PlayerRegistry, round: &Round) -> String {
    let mut report = String::new();
    let _ = writeln!(
        report,
        "{} ({})",
        round.name().bold(),
        round.status.as_str()
    );
    for game in &round.matches {
        let _ = writeln!(report, "{}", match_line(registry, game));
    }
    report
}

pub fn matches_report(registry: &PlayerRegistry, matches: &[Match]) -> String {
    if matches.is_empty() {
        return "No games waiting for a result.\n".to_string();
    }
    let mut report = String::new();
    for game in matches {
        let _ = writeln!(report, "{}", match_line(registry, game));
    }
    report
}

pub fn standings_report(
    registry: &PlayerRegistry,
    tournament: &Tournament,
    standings: &[RosterEntry],
) -> String {
    let mut report = String::new();
    let _ = writeln!(
        report,
        "{}",
        format!("Standings: {} after {} round(s)", tournament.name, tournament.completed_rounds())
            .bold()
    );
    for (idx, entry) in standings.iter().enumerate() {
        let _ = writeln!(
            report,
            "{:>3}. {:<30} {}  {:>4}{}{}",
            idx + 1,
            display_name(registry, &entry.player_id),
            entry.player_id,
            entry.score.to_string(),
            if entry.byes > 0 {
                format!("  ({} bye)", entry.byes)
            } else {
                String::new()
            },
            if entry.active { "" } else { "  withdrawn" }
        );
    }
    report
}

pub fn tournament_details(registry: &PlayerRegistry, tournament: &Tournament) -> String {
    let mut report = String::new();
    let _ = writeln!(report, "{}", format!("=== {} ===", tournament.name).bold());
    let _ = writeln!(report, "Location: {}", tournament.location);
    let _ = writeln!(
        report,
        "Dates: {} - {}",
        format_date(tournament.start_date),
        tournament
            .end_date()
            .map(format_date)
            .unwrap_or_else(|| "ongoing".to_string())
    );
    if !tournament.description.is_empty() {
        let _ = writeln!(report, "Description: {}", tournament.description);
    }
    let _ = writeln!(
        report,
        "Rounds: {}/{}{}",
        tournament.rounds().len(),
        tournament.round_count,
        if tournament.is_finished() { " (finished)" } else { "" }
    );
    report.push('\n');

    for round in tournament.rounds() {
        report.push_str(&round_report(registry, round));
        report.push('\n');
    }

    let standings: Vec<RosterEntry> = rank_players(tournament.roster())
        .into_iter()
        .cloned()
        .collect();
    report.push_str(&standings_report(registry, tournament, &standings));
    report
}
