mod bye;
mod colors;
pub mod engine;
pub mod history;

pub use bye::select_bye;
pub use colors::assign_colors;
pub use engine::{compare_standing, generate_round, rank_players};
pub use history::PairingHistory;
