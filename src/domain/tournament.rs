use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::player::PlayerId;
use super::points::Points;
use super::round::Round;
use crate::errors::{CoreResult, TournamentError};

/// File-friendly slug of the tournament name, e.g. `eu-chess-tour-2025`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TournamentId(String);

impl TournamentId {
    pub fn from_name(name: &str) -> CoreResult<Self> {
        let mut slug = String::with_capacity(name.len());
        for ch in name.trim().chars() {
            if ch.is_ascii_alphanumeric() {
                slug.push(ch.to_ascii_lowercase());
            } else if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        }
        while slug.ends_with('-') {
            slug.pop();
        }

        if slug.is_empty() {
            return Err(TournamentError::invalid_record(
                "tournament name",
                format!("'{}' has no letters or digits", name),
            ));
        }
        Ok(TournamentId(slug))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TournamentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A player's seat in one tournament
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub player_id: PlayerId,
    pub score: Points,
    /// Lifetime score at enrollment, used as the first tie-break
    pub lifetime_snapshot: Points,
    /// Enrollment order, the final tie-break
    pub seed: u32,
    pub active: bool,
    pub byes: u32,
}

/// Parameters for a new tournament
#[derive(Debug, Clone)]
pub struct NewTournament {
    pub name: String,
    pub location: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub round_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub description: String,
    pub start_date: NaiveDate,
    pub(crate) end_date: Option<NaiveDate>,
    pub round_count: u32,
    pub(crate) rounds: Vec<Round>,
    pub(crate) roster: Vec<RosterEntry>,
    #[serde(default)]
    pub(crate) finished: bool,
}

impl Tournament {
    pub fn new(details: NewTournament) -> CoreResult<Self> {
        let id = TournamentId::from_name(&details.name)?;
        let location = details.location.trim();
        if location.is_empty() {
            return Err(TournamentError::invalid_record("location", "must not be empty"));
        }
        if details.round_count == 0 {
            return Err(TournamentError::invalid_record(
                "round count",
                "a tournament needs at least one round",
            ));
        }
        if let Some(end) = details.end_date {
            if end < details.start_date {
                return Err(TournamentError::invalid_record(
                    "end date",
                    "cannot be before the start date",
                ));
            }
        }

        Ok(Self {
            id,
            name: details.name.trim().to_string(),
            location: location.to_string(),
            description: details.description.trim().to_string(),
            start_date: details.start_date,
            end_date: details.end_date,
            round_count: details.round_count,
            rounds: Vec::new(),
            roster: Vec::new(),
            finished: false,
        })
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn roster(&self) -> &[RosterEntry] {
        &self.roster
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn current_round(&self) -> Option<&Round> {
        self.rounds.last()
    }

    pub fn completed_rounds(&self) -> u32 {
        self.rounds.iter().filter(|r| r.is_complete()).count() as u32
    }

    /// All configured rounds have been played to completion
    pub fn all_rounds_played(&self) -> bool {
        self.rounds.len() as u32 == self.round_count
            && self.rounds.last().is_some_and(Round::is_complete)
    }

    pub fn entry(&self, player_id: &PlayerId) -> Option<&RosterEntry> {
        self.roster.iter().find(|e| &e.player_id == player_id)
    }

    pub(crate) fn entry_mut(&mut self, player_id: &PlayerId) -> Option<&mut RosterEntry> {
        self.roster.iter_mut().find(|e| &e.player_id == player_id)
    }
}

#[cfg(test)]
pub(crate) fn test_details(name: &str, round_count: u32) -> NewTournament {
    NewTournament {
        name: name.to_string(),
        location: "Paris".to_string(),
        description: String::new(),
        start_date: NaiveDate::from_ymd_opt(2025, 3, 6).unwrap(),
        end_date: None,
        round_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_is_slug_of_name() {
        let id = TournamentId::from_name("  EU Chess Tour -- 2025! ").unwrap();
        assert_eq!(id.as_str(), "eu-chess-tour-2025");
        assert!(TournamentId::from_name("???").is_err());
    }

    #[test]
    fn test_new_validates_details() {
        let mut details = test_details("Spring Open", 0);
        assert!(matches!(
            Tournament::new(details.clone()),
            Err(TournamentError::InvalidRecord { field: "round count", .. })
        ));

        details.round_count = 4;
        details.end_date = NaiveDate::from_ymd_opt(2025, 3, 1);
        assert!(matches!(
            Tournament::new(details.clone()),
            Err(TournamentError::InvalidRecord { field: "end date", .. })
        ));

        details.end_date = None;
        let tournament = Tournament::new(details).unwrap();
        assert_eq!(tournament.id.as_str(), "spring-open");
        assert!(!tournament.is_finished());
        assert!(!tournament.all_rounds_played());
    }
}
