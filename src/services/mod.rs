pub mod tournaments;

pub use tournaments::TournamentService;
