use anyhow::{Context, Result, bail};
use log::info;

use crate::config::AppConfig;
use crate::domain::{
    GameResult, Match, MatchId, NewTournament, Player, PlayerId, RosterEntry, Round, RoundStatus,
    Tournament, TournamentId,
};
use crate::errors::CoreResult;
use crate::orchestrator::TournamentOrchestrator;
use crate::registry::PlayerRegistry;
use crate::storage::Repository;

/// Session over a repository: load, apply one transition, save
pub struct TournamentService<R: Repository> {
    repo: R,
    config: AppConfig,
    registry: PlayerRegistry,
}

impl<R: Repository> TournamentService<R> {
    pub fn new(repo: R, config: AppConfig) -> Result<Self> {
        let players = repo.load_players().context("Failed to load players")?;
        let registry = PlayerRegistry::new(players).context("Player file is inconsistent")?;
        info!("Loaded {} registered players", registry.len());

        Ok(Self {
            repo,
            config,
            registry,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn players(&self) -> &PlayerRegistry {
        &self.registry
    }

    pub fn into_repository(self) -> R {
        self.repo
    }

    pub fn register_player(&mut self, player: Player) -> Result<&Player> {
        let id = player.national_id.clone();
        self.registry.register(player)?;
        self.repo.save_players(self.registry.all())?;
        info!("Registered player {}", id);
        Ok(self.registry.require(&id)?)
    }

    /// Creates a tournament with the given entrants, or every registered player
    pub fn create_tournament(
        &mut self,
        details: NewTournament,
        entrants: Option<&[PlayerId]>,
    ) -> Result<Tournament> {
        let tournament = Tournament::new(details)?;
        if self.repo.load_tournament(&tournament.id)?.is_some() {
            bail!("Tournament '{}' already exists", tournament.id);
        }

        let mut orchestrator =
            TournamentOrchestrator::new(tournament, self.config.pairing.clone())?;
        let players: Vec<&Player> = match entrants {
            Some(ids) => ids
                .iter()
                .map(|id| self.registry.require(id))
                .collect::<CoreResult<_>>()?,
            None => self.registry.all().iter().collect(),
        };
        for player in players {
            orchestrator.enroll(player)?;
        }

        let tournament = orchestrator.into_tournament();
        self.repo.save_tournament(&tournament)?;
        info!(
            "Created tournament {} with {} players",
            tournament.id,
            tournament.roster().len()
        );
        Ok(tournament)
    }

    pub fn tournament(&self, id: &TournamentId) -> Result<Tournament> {
        match self.repo.load_tournament(id)? {
            Some(tournament) => Ok(tournament),
            None => bail!("No tournament '{}'", id),
        }
    }

    pub fn list_tournaments(&self) -> Result<Vec<Tournament>> {
        self.repo.list_tournaments()
    }

    pub fn unfinished_tournaments(&self) -> Result<Vec<Tournament>> {
        let mut tournaments = self.repo.list_tournaments()?;
        tournaments.retain(|t| !t.is_finished());
        Ok(tournaments)
    }

    pub fn enroll(&mut self, id: &TournamentId, player_id: &PlayerId) -> Result<()> {
        let player = self.registry.require(player_id)?.clone();
        self.transition(id, |orchestrator, _| orchestrator.enroll(&player))
    }

    pub fn withdraw(&mut self, id: &TournamentId, player_id: &PlayerId) -> Result<()> {
        self.transition(id, |orchestrator, _| orchestrator.withdraw(player_id))
    }

    pub fn start_next_round(&mut self, id: &TournamentId) -> Result<Round> {
        self.transition(id, |orchestrator, _| {
            orchestrator.start_next_round().map(Round::clone)
        })
    }

    pub fn record_result(
        &mut self,
        id: &TournamentId,
        match_id: MatchId,
        result: GameResult,
    ) -> Result<RoundStatus> {
        self.transition(id, |orchestrator, _| {
            orchestrator.record_result(match_id, result)
        })
    }

    pub fn pending_matches(&self, id: &TournamentId) -> Result<Vec<Match>> {
        let orchestrator = self.open(id)?;
        Ok(orchestrator.pending_matches().into_iter().cloned().collect())
    }

    pub fn standings(&self, id: &TournamentId) -> Result<Vec<RosterEntry>> {
        let orchestrator = self.open(id)?;
        Ok(orchestrator
            .current_standings()
            .into_iter()
            .cloned()
            .collect())
    }

    /// Finishes the tournament and saves the credited lifetime scores.
    ///
    /// Running it again on a finished tournament credits nobody twice.
    pub fn finish_tournament(&mut self, id: &TournamentId) -> Result<usize> {
        let credited = self.transition(id, |orchestrator, registry| {
            orchestrator.finish_tournament(registry)
        })?;
        self.repo.save_players(self.registry.all())?;
        Ok(credited)
    }

    fn open(&self, id: &TournamentId) -> Result<TournamentOrchestrator> {
        let tournament = self.tournament(id)?;
        TournamentOrchestrator::new(tournament, self.config.pairing.clone())
            .with_context(|| format!("Tournament '{}' is inconsistent", id))
    }

    /// Runs one orchestrator operation and saves the tournament if it succeeded
    fn transition<T>(
        &mut self,
        id: &TournamentId,
        operation: impl FnOnce(&mut TournamentOrchestrator, &mut PlayerRegistry) -> CoreResult<T>,
    ) -> Result<T> {
        let mut orchestrator = self.open(id)?;
        let outcome = operation(&mut orchestrator, &mut self.registry)?;
        self.repo.save_tournament(orchestrator.tournament())?;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{test_details, test_player, Points};
    use crate::errors::TournamentError;
    use crate::storage::MemoryRepository;

    fn service_with_players(count: usize) -> TournamentService<MemoryRepository> {
        let mut service =
            TournamentService::new(MemoryRepository::new(), AppConfig::new()).unwrap();
        for (idx, id) in ["AA00001", "BB00002", "CC00003", "DD00004"]
            .iter()
            .take(count)
            .enumerate()
        {
            service
                .register_player(test_player(id, &format!("Player{}", idx)))
                .unwrap();
        }
        service
    }

    #[test]
    fn test_register_player_persists() {
        let service = service_with_players(2);
        let repo = service.into_repository();
        assert_eq!(repo.load_players().unwrap().len(), 2);
    }

    #[test]
    fn test_duplicate_player_surfaces_typed_error() {
        let mut service = service_with_players(1);
        let err = service
            .register_player(test_player("AA00001", "Again"))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TournamentError>(),
            Some(TournamentError::DuplicatePlayer(_))
        ));
    }

    #[test]
    fn test_create_tournament_with_selected_entrants() {
        let mut service = service_with_players(4);
        let entrants: Vec<PlayerId> = vec!["BB00002".parse().unwrap(), "DD00004".parse().unwrap()];

        let tournament = service
            .create_tournament(test_details("Rapid Night", 2), Some(entrants.as_slice()))
            .unwrap();
        assert_eq!(tournament.roster().len(), 2);

        let again = service.create_tournament(test_details("Rapid Night", 2), None);
        assert!(again.is_err());
    }

    #[test]
    fn test_failed_transition_is_not_saved() {
        let mut service = service_with_players(4);
        let tournament = service
            .create_tournament(test_details("Blitz", 2), None)
            .unwrap();
        service.start_next_round(&tournament.id).unwrap();

        let err = service.start_next_round(&tournament.id).unwrap_err();
        assert_eq!(
            err.downcast_ref::<TournamentError>(),
            Some(&TournamentError::RoundNotComplete { round: 1 })
        );
        assert_eq!(service.tournament(&tournament.id).unwrap().rounds().len(), 1);

        // four player saves, the creation and the first round
        assert_eq!(service.into_repository().saves(), 6);
    }

    #[test]
    fn test_full_tournament_updates_lifetime_scores() {
        let mut service = service_with_players(4);
        let id = service
            .create_tournament(test_details("Club Cup", 2), None)
            .unwrap()
            .id;

        for _ in 0..2 {
            service.start_next_round(&id).unwrap();
            for game in service.pending_matches(&id).unwrap() {
                service.record_result(&id, game.id, GameResult::Draw).unwrap();
            }
        }

        assert_eq!(service.finish_tournament(&id).unwrap(), 4);
        assert_eq!(service.finish_tournament(&id).unwrap(), 0);
        assert!(service.unfinished_tournaments().unwrap().is_empty());

        let repo = service.into_repository();
        for player in repo.load_players().unwrap() {
            assert_eq!(player.lifetime_score(), Points::ONE);
        }
    }
}
