use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use super::points::Points;
use super::tournament::TournamentId;
use crate::errors::{CoreResult, TournamentError};

static NATIONAL_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2}[0-9]{5}$").expect("valid national id pattern"));

/// National chess identifier, e.g. `AB12345`. Unique key of a player.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerId(String);

impl PlayerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PlayerId {
    type Err = TournamentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        if NATIONAL_ID_PATTERN.is_match(&normalized) {
            Ok(PlayerId(normalized))
        } else {
            Err(TournamentError::invalid_record(
                "national id",
                format!("'{}' should be two letters followed by five digits", s.trim()),
            ))
        }
    }
}

impl TryFrom<String> for PlayerId {
    type Error = TournamentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PlayerId> for String {
    fn from(id: PlayerId) -> Self {
        id.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A registered chess player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub national_id: PlayerId,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    lifetime_score: Points,
    /// Tournaments whose final score is already in `lifetime_score`
    #[serde(default)]
    credited_tournaments: BTreeSet<TournamentId>,
}

impl Player {
    pub fn new(
        first_name: &str,
        last_name: &str,
        birth_date: NaiveDate,
        national_id: PlayerId,
    ) -> CoreResult<Self> {
        Ok(Self {
            national_id,
            first_name: required_name("first name", first_name)?,
            last_name: required_name("last name", last_name)?,
            birth_date,
            lifetime_score: Points::ZERO,
            credited_tournaments: BTreeSet::new(),
        })
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn lifetime_score(&self) -> Points {
        self.lifetime_score
    }

    pub fn has_been_credited(&self, tournament: &TournamentId) -> bool {
        self.credited_tournaments.contains(tournament)
    }

    /// Adds a tournament's final score to the lifetime total.
    ///
    /// Returns `false` and leaves the score untouched when this tournament
    /// was already credited.
    pub(crate) fn credit_tournament(&mut self, tournament: &TournamentId, score: Points) -> bool {
        if !self.credited_tournaments.insert(tournament.clone()) {
            return false;
        }
        self.lifetime_score += score;
        true
    }
}

fn required_name(field: &'static str, value: &str) -> CoreResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TournamentError::invalid_record(field, "must not be empty"));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
pub(crate) fn test_player(id: &str, first_name: &str) -> Player {
    Player::new(
        first_name,
        "Tester",
        NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
        id.parse().unwrap(),
    )
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_national_id_is_normalized_and_validated() {
        let id: PlayerId = " ab12345 ".parse().unwrap();
        assert_eq!(id.as_str(), "AB12345");

        assert!("A123456".parse::<PlayerId>().is_err());
        assert!("AB1234".parse::<PlayerId>().is_err());
        assert!(serde_json::from_str::<PlayerId>("\"XYZ\"").is_err());
    }

    #[test]
    fn test_new_player_requires_names() {
        let birth = NaiveDate::from_ymd_opt(2000, 5, 17).unwrap();
        let id: PlayerId = "CD00001".parse().unwrap();

        let err = Player::new("  ", "Polgar", birth, id.clone()).unwrap_err();
        assert!(matches!(err, TournamentError::InvalidRecord { field: "first name", .. }));

        let player = Player::new(" Judit ", "Polgar", birth, id).unwrap();
        assert_eq!(player.full_name(), "Judit Polgar");
        assert_eq!(player.lifetime_score(), Points::ZERO);
    }

    #[test]
    fn test_credit_is_applied_once_per_tournament() {
        let mut player = test_player("AA00001", "Anna");
        let spring: TournamentId = TournamentId::from_name("Spring Open").unwrap();

        assert!(player.credit_tournament(&spring, Points::from_halves(5)));
        assert!(!player.credit_tournament(&spring, Points::from_halves(5)));

        assert_eq!(player.lifetime_score(), Points::from_halves(5));
        assert!(player.has_been_credited(&spring));
    }

    #[test]
    fn test_older_files_without_ledger_still_load() {
        let json = r#"{
            "national_id": "AB12345",
            "first_name": "Magnus",
            "last_name": "Carlsen",
            "birth_date": "1990-11-30",
            "lifetime_score": 3.5
        }"#;

        let player: Player = serde_json::from_str(json).unwrap();
        assert_eq!(player.lifetime_score(), Points::from_halves(7));
    }
}
