use chrono::Local;
use log::{debug, info};

use crate::config::PairingSettings;
use crate::domain::{
    GameResult, Match, MatchId, Player, PlayerId, RosterEntry, Round, RoundStatus, Tournament,
};
use crate::errors::{CoreResult, TournamentError};
use crate::pairing::{self, PairingHistory};
use crate::registry::PlayerRegistry;
use crate::scoring;

/// Owns one tournament for a session and is the only thing that changes it.
///
/// Rounds go `Pending → InProgress → Complete`; a round completes when its last
/// match is resolved, which folds the results into the scores and the pairing history.
#[derive(Debug)]
pub struct TournamentOrchestrator {
    tournament: Tournament,
    settings: PairingSettings,
    history: PairingHistory,
}

impl TournamentOrchestrator {
    /// Takes over a tournament, checking that its scores match its results.
    pub fn new(tournament: Tournament, settings: PairingSettings) -> CoreResult<Self> {
        verify_scores(&tournament)?;
        let history = PairingHistory::from_rounds(&tournament.rounds)?;
        Ok(Self {
            tournament,
            settings,
            history,
        })
    }

    pub fn tournament(&self) -> &Tournament {
        &self.tournament
    }

    pub fn into_tournament(self) -> Tournament {
        self.tournament
    }

    pub fn history(&self) -> &PairingHistory {
        &self.history
    }

    /// Adds a player to the roster. Only possible before the first round.
    pub fn enroll(&mut self, player: &Player) -> CoreResult<()> {
        self.ensure_open()?;
        if !self.tournament.rounds.is_empty() {
            return Err(TournamentError::RosterLocked);
        }
        if self.tournament.entry(&player.national_id).is_some() {
            return Err(TournamentError::DuplicatePlayer(player.national_id.clone()));
        }

        let seed = self.tournament.roster.len() as u32;
        self.tournament.roster.push(RosterEntry {
            player_id: player.national_id.clone(),
            score: Default::default(),
            lifetime_snapshot: player.lifetime_score(),
            seed,
            active: true,
            byes: 0,
        });
        debug!("Enrolled {} in {}", player.national_id, self.tournament.id);
        Ok(())
    }

    /// Drops a player from future pairings. Games already paired still need a result.
    pub fn withdraw(&mut self, player_id: &PlayerId) -> CoreResult<()> {
        self.ensure_open()?;
        let entry = self
            .tournament
            .entry_mut(player_id)
            .ok_or_else(|| TournamentError::UnknownPlayer(player_id.clone()))?;
        entry.active = false;
        info!("Withdrew {} from {}", player_id, self.tournament.id);
        Ok(())
    }

    /// Roster sorted for reporting, withdrawn players included
    pub fn current_standings(&self) -> Vec<&RosterEntry> {
        pairing::rank_players(&self.tournament.roster)
    }

    pub fn start_next_round(&mut self) -> CoreResult<&Round> {
        self.ensure_open()?;
        let played = self.tournament.rounds.len() as u32;
        if played >= self.tournament.round_count {
            return Err(TournamentError::TournamentFinished {
                rounds: self.tournament.round_count,
            });
        }
        if let Some(last) = self.tournament.rounds.last() {
            if !last.is_complete() {
                return Err(TournamentError::RoundNotComplete { round: last.index });
            }
        }

        let index = played + 1;
        let matches = pairing::generate_round(
            &self.tournament.roster,
            &self.history,
            index,
            &self.settings,
        )?;

        let mut round = Round::new(index);
        round.matches = matches;
        round.status = RoundStatus::InProgress;
        round.started_at = Some(Local::now().naive_local());
        info!(
            "{}: started {} with {} boards",
            self.tournament.id,
            round.name(),
            round.matches.len()
        );

        self.tournament.rounds.push(round);
        let position = self.tournament.rounds.len() - 1;
        Ok(&self.tournament.rounds[position])
    }

    /// Records a game result; completes the round when it was the last open board.
    pub fn record_result(&mut self, match_id: MatchId, result: GameResult) -> CoreResult<RoundStatus> {
        self.ensure_open()?;
        let position = self
            .tournament
            .rounds
            .iter()
            .position(|r| r.index == match_id.round)
            .ok_or(TournamentError::UnknownMatch(match_id))?;

        let round = &mut self.tournament.rounds[position];
        round
            .find_mut(match_id)
            .ok_or(TournamentError::UnknownMatch(match_id))?
            .record(result)?;
        debug!("{}: {} recorded as {}", self.tournament.id, match_id, result.notation());

        if round.all_resolved() && !round.is_complete() {
            self.complete_round(position)?;
        }
        Ok(self.tournament.rounds[position].status)
    }

    fn complete_round(&mut self, position: usize) -> CoreResult<()> {
        let round = &self.tournament.rounds[position];
        scoring::apply_round(&mut self.tournament.roster, round)?;
        for game in &round.matches {
            self.history.record(game)?;
        }

        let round = &mut self.tournament.rounds[position];
        round.status = RoundStatus::Complete;
        round.finished_at = Some(Local::now().naive_local());
        info!("{}: {} complete", self.tournament.id, round.name());
        Ok(())
    }

    /// Games of the current round still waiting for a result
    pub fn pending_matches(&self) -> Vec<&Match> {
        self.tournament
            .current_round()
            .map(|r| r.unresolved().collect())
            .unwrap_or_default()
    }

    pub fn is_complete(&self) -> bool {
        self.tournament.all_rounds_played()
    }

    /// Closes the tournament and credits lifetime scores.
    ///
    /// Safe to call again on a finished tournament: players already credited
    /// are left alone. Returns how many players were credited by this call.
    pub fn finish_tournament(&mut self, registry: &mut PlayerRegistry) -> CoreResult<usize> {
        if !self.tournament.finished {
            if let Some(current) = self.tournament.current_round() {
                if !current.is_complete() {
                    return Err(TournamentError::RoundNotComplete {
                        round: current.index,
                    });
                }
            }
            if !self.tournament.all_rounds_played() {
                return Err(TournamentError::RoundsRemaining {
                    played: self.tournament.completed_rounds(),
                    configured: self.tournament.round_count,
                });
            }

            self.tournament.finished = true;
            if self.tournament.end_date.is_none() {
                self.tournament.end_date = Some(Local::now().date_naive());
            }
            info!("{}: finished", self.tournament.id);
        }

        let credited = registry.credit_tournament(&self.tournament)?;
        info!(
            "{}: credited lifetime scores of {} player(s)",
            self.tournament.id, credited
        );
        Ok(credited)
    }

    fn ensure_open(&self) -> CoreResult<()> {
        if self.tournament.finished {
            return Err(TournamentError::TournamentFinished {
                rounds: self.tournament.round_count,
            });
        }
        Ok(())
    }
}

fn verify_scores(tournament: &Tournament) -> CoreResult<()> {
    let expected = scoring::scores_from_rounds(&tournament.rounds)?;
    for entry in &tournament.roster {
        let from_results = expected.get(&entry.player_id).copied().unwrap_or_default();
        if from_results != entry.score {
            return Err(TournamentError::invalid_record(
                "roster",
                format!(
                    "{} has {} points but their results add up to {}",
                    entry.player_id, entry.score, from_results
                ),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{test_details, test_player, Pairing, Points};

    const IDS: [&str; 5] = ["AA00001", "BB00002", "CC00003", "DD00004", "EE00005"];

    fn setup(players: usize, rounds: u32) -> (TournamentOrchestrator, PlayerRegistry) {
        let registry = PlayerRegistry::new(
            IDS[..players]
                .iter()
                .map(|id| test_player(id, "Player"))
                .collect(),
        )
        .unwrap();

        let tournament = Tournament::new(test_details("Club Championship", rounds)).unwrap();
        let mut orchestrator =
            TournamentOrchestrator::new(tournament, PairingSettings::default()).unwrap();
        for player in registry.all() {
            orchestrator.enroll(player).unwrap();
        }
        (orchestrator, registry)
    }

    /// White wins every open board of the current round
    fn play_out_round(orchestrator: &mut TournamentOrchestrator) {
        let open: Vec<MatchId> = orchestrator.pending_matches().iter().map(|m| m.id).collect();
        for match_id in open {
            orchestrator.record_result(match_id, GameResult::WhiteWins).unwrap();
        }
    }

    #[test]
    fn test_round_lifecycle() {
        let (mut orchestrator, _) = setup(4, 3);

        let round = orchestrator.start_next_round().unwrap();
        assert_eq!(round.status, RoundStatus::InProgress);
        assert_eq!(round.matches.len(), 2);

        assert_eq!(
            orchestrator.start_next_round().unwrap_err(),
            TournamentError::RoundNotComplete { round: 1 }
        );

        let status = orchestrator
            .record_result(MatchId::new(1, 1), GameResult::Draw)
            .unwrap();
        assert_eq!(status, RoundStatus::InProgress);
        assert_eq!(
            orchestrator.record_result(MatchId::new(1, 1), GameResult::WhiteWins),
            Err(TournamentError::MatchAlreadyResolved(MatchId::new(1, 1)))
        );

        let status = orchestrator
            .record_result(MatchId::new(1, 2), GameResult::BlackWins)
            .unwrap();
        assert_eq!(status, RoundStatus::Complete);
        assert_eq!(orchestrator.history().len(), 2);

        let total: Points = orchestrator.tournament().roster().iter().map(|e| e.score).sum();
        assert_eq!(total, Points::from_halves(4));
    }

    #[test]
    fn test_unknown_match() {
        let (mut orchestrator, _) = setup(4, 3);
        orchestrator.start_next_round().unwrap();

        assert_eq!(
            orchestrator.record_result(MatchId::new(1, 9), GameResult::Draw),
            Err(TournamentError::UnknownMatch(MatchId::new(1, 9)))
        );
        assert_eq!(
            orchestrator.record_result(MatchId::new(2, 1), GameResult::Draw),
            Err(TournamentError::UnknownMatch(MatchId::new(2, 1)))
        );
    }

    #[test]
    fn test_round_count_is_enforced() {
        let (mut orchestrator, _) = setup(4, 1);
        orchestrator.start_next_round().unwrap();
        play_out_round(&mut orchestrator);

        assert!(orchestrator.is_complete());
        assert_eq!(
            orchestrator.start_next_round().unwrap_err(),
            TournamentError::TournamentFinished { rounds: 1 }
        );
    }

    #[test]
    fn test_roster_locks_after_first_round() {
        let (mut orchestrator, _) = setup(4, 2);
        orchestrator.start_next_round().unwrap();

        let late = test_player("ZZ00009", "Late");
        assert_eq!(orchestrator.enroll(&late), Err(TournamentError::RosterLocked));
    }

    #[test]
    fn test_withdrawn_player_is_not_paired_again() {
        let (mut orchestrator, _) = setup(5, 2);
        orchestrator.start_next_round().unwrap();
        play_out_round(&mut orchestrator);

        let leaving: PlayerId = IDS[0].parse().unwrap();
        orchestrator.withdraw(&leaving).unwrap();
        let round = orchestrator.start_next_round().unwrap();

        assert_eq!(round.matches.len(), 2);
        assert!(round.matches.iter().all(|m| !m.involves(&leaving)));
        assert!(round.matches.iter().all(|m| !m.is_bye()));
    }

    #[test]
    fn test_finish_requires_all_rounds() {
        let (mut orchestrator, mut registry) = setup(4, 2);
        orchestrator.start_next_round().unwrap();

        assert_eq!(
            orchestrator.finish_tournament(&mut registry),
            Err(TournamentError::RoundNotComplete { round: 1 })
        );

        play_out_round(&mut orchestrator);
        assert_eq!(
            orchestrator.finish_tournament(&mut registry),
            Err(TournamentError::RoundsRemaining {
                played: 1,
                configured: 2
            })
        );
    }

    #[test]
    fn test_finish_credits_lifetime_once() {
        let (mut orchestrator, mut registry) = setup(4, 2);
        for _ in 0..2 {
            orchestrator.start_next_round().unwrap();
            play_out_round(&mut orchestrator);
        }

        assert_eq!(orchestrator.finish_tournament(&mut registry).unwrap(), 4);
        assert!(orchestrator.tournament().is_finished());
        assert!(orchestrator.tournament().end_date().is_some());

        let lifetime_total: Points = registry.all().iter().map(|p| p.lifetime_score()).sum();
        assert_eq!(lifetime_total, Points::from_halves(8));

        assert_eq!(orchestrator.finish_tournament(&mut registry).unwrap(), 0);
        let again: Points = registry.all().iter().map(|p| p.lifetime_score()).sum();
        assert_eq!(again, lifetime_total);

        assert!(matches!(
            orchestrator.record_result(MatchId::new(2, 1), GameResult::Draw),
            Err(TournamentError::TournamentFinished { .. })
        ));
    }

    #[test]
    fn test_reload_rebuilds_history_and_checks_scores() {
        let (mut orchestrator, _) = setup(4, 3);
        orchestrator.start_next_round().unwrap();
        play_out_round(&mut orchestrator);

        let saved = orchestrator.into_tournament();
        let reloaded =
            TournamentOrchestrator::new(saved.clone(), PairingSettings::default()).unwrap();
        assert_eq!(reloaded.history().len(), 2);

        let mut tampered = saved;
        tampered.roster[0].score = Points::from_halves(9);
        assert!(matches!(
            TournamentOrchestrator::new(tampered, PairingSettings::default()),
            Err(TournamentError::InvalidRecord { field: "roster", .. })
        ));
    }

    #[test]
    fn test_five_players_share_the_byes() {
        let (mut orchestrator, _) = setup(5, 5);
        let mut bye_players = Vec::new();

        for _ in 0..5 {
            let round = orchestrator.start_next_round().unwrap();
            let byes: Vec<PlayerId> = round
                .matches
                .iter()
                .filter_map(|m| match &m.pairing {
                    Pairing::Bye { player, .. } => Some(player.clone()),
                    Pairing::Game { .. } => None,
                })
                .collect();
            assert_eq!(byes.len(), 1);
            bye_players.extend(byes);
            play_out_round(&mut orchestrator);
        }

        bye_players.sort();
        bye_players.dedup();
        assert_eq!(bye_players.len(), 5);
        assert!(orchestrator.tournament().roster().iter().all(|e| e.byes == 1));
    }
}
