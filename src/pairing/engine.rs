use log::{debug, info};
use std::cmp::Ordering;
use std::collections::HashSet;

use super::bye::select_bye;
use super::colors::assign_colors;
use super::history::PairingHistory;
use crate::config::PairingSettings;
use crate::domain::{Match, MatchId, PlayerId, RosterEntry};
use crate::errors::{CoreResult, TournamentError};

/// Standings order: score, then lifetime score at enrollment, then enrollment order
pub fn compare_standing(a: &RosterEntry, b: &RosterEntry) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| b.lifetime_snapshot.cmp(&a.lifetime_snapshot))
        .then_with(|| a.seed.cmp(&b.seed))
}

pub fn rank_players<'a>(entries: impl IntoIterator<Item = &'a RosterEntry>) -> Vec<&'a RosterEntry> {
    let mut ranked: Vec<&RosterEntry> = entries.into_iter().collect();
    ranked.sort_by(|a, b| compare_standing(a, b));
    ranked
}

/// Pairs the active players of `roster` for round `round`.
///
/// Players are ranked, the odd one out (if any) gets the bye, and the rest
/// are paired top-down with the nearest-ranked opponent they have not met.
/// Repeats are only produced when no repeat-free pairing of the field exists.
pub fn generate_round(
    roster: &[RosterEntry],
    history: &PairingHistory,
    round: u32,
    settings: &PairingSettings,
) -> CoreResult<Vec<Match>> {
    let mut field = rank_players(roster.iter().filter(|e| e.active));
    ensure_unique(&field)?;

    if field.len() < 2 {
        return Err(TournamentError::InsufficientPlayers {
            active: field.len(),
        });
    }

    let bye = select_bye(&field).map(|idx| field.remove(idx));
    let players: Vec<&PlayerId> = field.iter().map(|e| &e.player_id).collect();
    let pairs = find_pairs(&players, history, settings.search_budget)?;

    let mut matches = Vec::with_capacity(pairs.len() + 1);
    for (higher, lower) in pairs {
        let board = matches.len() as u32 + 1;
        let (white, black) = assign_colors(players[higher], players[lower], history, round);
        matches.push(Match::game(
            MatchId::new(round, board),
            white.clone(),
            black.clone(),
        )?);
    }

    if let Some(entry) = bye {
        let board = matches.len() as u32 + 1;
        debug!("Round {}: bye for {}", round, entry.player_id);
        matches.push(Match::bye(
            MatchId::new(round, board),
            entry.player_id.clone(),
            settings.bye_points,
        ));
    }

    Ok(matches)
}

fn ensure_unique(field: &[&RosterEntry]) -> CoreResult<()> {
    let mut seen = HashSet::new();
    for entry in field {
        if !seen.insert(&entry.player_id) {
            return Err(TournamentError::invalid_pairing(format!(
                "{} appears twice in the roster",
                entry.player_id
            )));
        }
    }
    Ok(())
}

/// Index pairs `(higher, lower)` into `players`, in board order
fn find_pairs(
    players: &[&PlayerId],
    history: &PairingHistory,
    budget: usize,
) -> CoreResult<Vec<(usize, usize)>> {
    let met = meeting_table(players, history);

    for allowed_repeats in 0..=players.len() / 2 {
        let mut search = PairSearch::new(&met, budget);
        if search.solve(allowed_repeats) {
            if allowed_repeats > 0 {
                info!(
                    "No repeat-free pairing exists, allowing {} rematch(es)",
                    allowed_repeats
                );
            }
            return Ok(search.pairs);
        }
    }

    Err(TournamentError::invalid_pairing(
        "no complete pairing could be built",
    ))
}

fn meeting_table(players: &[&PlayerId], history: &PairingHistory) -> Vec<Vec<Option<u32>>> {
    players
        .iter()
        .map(|a| players.iter().map(|b| history.last_met(a, b)).collect())
        .collect()
}

/// Depth-first search over the ranked field
struct PairSearch<'a> {
    met: &'a [Vec<Option<u32>>],
    paired: Vec<bool>,
    pairs: Vec<(usize, usize)>,
    budget: usize,
}

impl<'a> PairSearch<'a> {
    fn new(met: &'a [Vec<Option<u32>>], budget: usize) -> Self {
        Self {
            met,
            paired: vec![false; met.len()],
            pairs: Vec::with_capacity(met.len() / 2),
            budget,
        }
    }

    fn solve(&mut self, repeats_left: usize) -> bool {
        let Some(first) = self.paired.iter().position(|p| !p) else {
            return true;
        };
        if self.repeats_needed() > repeats_left {
            return false;
        }
        if self.budget == 0 {
            return false;
        }
        self.budget -= 1;

        self.paired[first] = true;
        for candidate in self.candidates(first, repeats_left > 0) {
            let repeat = self.met[first][candidate].is_some();
            self.paired[candidate] = true;
            self.pairs.push((first, candidate));

            if self.solve(repeats_left - usize::from(repeat)) {
                return true;
            }

            self.pairs.pop();
            self.paired[candidate] = false;
        }
        self.paired[first] = false;
        false
    }

    /// Lower bound on the rematches any completion of the current partial
    /// pairing needs.
    ///
    /// Among unpaired players, each component of the "not met yet" graph with
    /// an odd size must send at least one player into a rematch, and one
    /// rematch serves at most two such components.
    fn repeats_needed(&self) -> usize {
        let mut seen = self.paired.clone();
        let mut odd_components: usize = 0;
        for start in 0..seen.len() {
            if seen[start] {
                continue;
            }
            seen[start] = true;
            let mut stack = vec![start];
            let mut size = 0;
            while let Some(i) = stack.pop() {
                size += 1;
                for j in 0..seen.len() {
                    if !seen[j] && self.met[i][j].is_none() {
                        seen[j] = true;
                        stack.push(j);
                    }
                }
            }
            odd_components += size % 2;
        }
        odd_components.div_ceil(2)
    }

    /// Unpaired opponents for `first`: new opponents nearest rank first, then
    /// (when allowed) rematches whose last meeting is longest ago.
    fn candidates(&self, first: usize, allow_repeats: bool) -> Vec<usize> {
        let (fresh, mut repeats): (Vec<usize>, Vec<usize>) = (first + 1..self.paired.len())
            .filter(|&i| !self.paired[i])
            .partition(|&i| self.met[first][i].is_none());

        if !allow_repeats {
            return fresh;
        }

        repeats.sort_by_key(|&i| (self.met[first][i], i));
        fresh.into_iter().chain(repeats).collect()
    }
}
