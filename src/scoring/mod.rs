use log::debug;
use std::collections::BTreeMap;

use crate::domain::{Match, Player, PlayerId, Points, RosterEntry, Round, Tournament};
use crate::errors::{CoreResult, TournamentError};

/// Adds the points of one resolved match to the tournament scores.
pub fn apply_result(roster: &mut [RosterEntry], game: &Match) -> CoreResult<()> {
    let awards = game.awards()?;
    for (player_id, _) in &awards {
        if !roster.iter().any(|e| &e.player_id == *player_id) {
            return Err(TournamentError::UnknownPlayer((*player_id).clone()));
        }
    }

    for (player_id, points) in awards {
        if let Some(entry) = roster.iter_mut().find(|e| &e.player_id == player_id) {
            entry.score += points;
            if game.is_bye() {
                entry.byes += 1;
            }
        }
    }
    Ok(())
}

/// Applies every match of a round, or nothing if any match is unresolved.
pub fn apply_round(roster: &mut [RosterEntry], round: &Round) -> CoreResult<()> {
    if let Some(open) = round.unresolved().next() {
        return Err(TournamentError::UnresolvedMatch(open.id));
    }
    for game in &round.matches {
        apply_result(roster, game)?;
    }
    debug!("Applied {} results of {}", round.matches.len(), round.name());
    Ok(())
}

/// Tournament score of every player as implied by the completed rounds.
pub fn scores_from_rounds(rounds: &[Round]) -> CoreResult<BTreeMap<PlayerId, Points>> {
    let mut scores = BTreeMap::new();
    for round in rounds.iter().filter(|r| r.is_complete()) {
        for game in &round.matches {
            for (player_id, points) in game.awards()? {
                *scores.entry(player_id.clone()).or_insert(Points::ZERO) += points;
            }
        }
    }
    Ok(scores)
}

/// Adds each player's final tournament score to their lifetime score.
///
/// Players already credited for this tournament are skipped, so calling this
/// again after a reload changes nothing. Returns how many players were credited.
pub fn credit_lifetime(players: &mut [Player], tournament: &Tournament) -> CoreResult<usize> {
    for entry in tournament.roster() {
        if !players.iter().any(|p| p.national_id == entry.player_id) {
            return Err(TournamentError::UnknownPlayer(entry.player_id.clone()));
        }
    }

    let mut credited = 0;
    for entry in tournament.roster() {
        if let Some(player) = players
            .iter_mut()
            .find(|p| p.national_id == entry.player_id)
        {
            if player.credit_tournament(&tournament.id, entry.score) {
                credited += 1;
            }
        }
    }
    Ok(credited)
}
