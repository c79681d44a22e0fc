use crate::domain::RosterEntry;

/// Picks who sits out when the field is odd.
///
/// The bye goes to the lowest-ranked player among those with the fewest
/// byes, so nobody gets a second bye before everyone has had one.
/// `ranked` must already be in standings order.
pub fn select_bye(ranked: &[&RosterEntry]) -> Option<usize> {
    if ranked.len() % 2 == 0 {
        return None;
    }

    let fewest = ranked.iter().map(|e| e.byes).min()?;
    ranked.iter().rposition(|e| e.byes == fewest)
}
