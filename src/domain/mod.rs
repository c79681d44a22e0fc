pub mod dates;
mod matches;
mod player;
mod points;
mod round;
mod tournament;

pub use dates::{format_date, parse_date};
pub use matches::{GameResult, Match, MatchId, Pairing};
pub use player::{Player, PlayerId};
pub use points::Points;
pub use round::{Round, RoundStatus};
pub use tournament::{NewTournament, RosterEntry, Tournament, TournamentId};

#[cfg(test)]
pub(crate) use player::test_player;
#[cfg(test)]
pub(crate) use tournament::test_details;
