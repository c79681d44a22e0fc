use super::history::PairingHistory;
use crate::domain::PlayerId;

/// Returns `(white, black)` for a pair where `higher` outranks `lower`.
///
/// Whoever has had white less often takes it. On equal counts the higher-ranked
/// player has white in odd rounds and black in even rounds.
pub fn assign_colors<'a>(
    higher: &'a PlayerId,
    lower: &'a PlayerId,
    history: &PairingHistory,
    round: u32,
) -> (&'a PlayerId, &'a PlayerId) {
    let higher_whites = history.whites(higher);
    let lower_whites = history.whites(lower);

    let higher_takes_white = if higher_whites != lower_whites {
        higher_whites < lower_whites
    } else {
        round % 2 == 1
    };

    if higher_takes_white {
        (higher, lower)
    } else {
        (lower, higher)
    }
}
