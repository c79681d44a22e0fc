use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::matches::{Match, MatchId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundStatus {
    Pending,
    InProgress,
    Complete,
}

impl RoundStatus {
    pub fn as_str(&self) -> &str {
        match self {
            RoundStatus::Pending => "pending",
            RoundStatus::InProgress => "in progress",
            RoundStatus::Complete => "complete",
        }
    }
}

/// One round of a tournament and its boards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub index: u32,
    pub matches: Vec<Match>,
    pub status: RoundStatus,
    pub started_at: Option<NaiveDateTime>,
    pub finished_at: Option<NaiveDateTime>,
}

impl Round {
    pub fn new(index: u32) -> Self {
        Self {
            index,
            matches: Vec::new(),
            status: RoundStatus::Pending,
            started_at: None,
            finished_at: None,
        }
    }

    pub fn name(&self) -> String {
        format!("Round {}", self.index)
    }

    pub fn is_complete(&self) -> bool {
        self.status == RoundStatus::Complete
    }

    pub fn all_resolved(&self) -> bool {
        self.matches.iter().all(Match::is_resolved)
    }

    pub fn find_mut(&mut self, id: MatchId) -> Option<&mut Match> {
        self.matches.iter_mut().find(|m| m.id == id)
    }

    pub fn unresolved(&self) -> impl Iterator<Item = &Match> {
        self.matches.iter().filter(|m| !m.is_resolved())
    }
}
