//! Bet lifecycle status

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Lifecycle code of a bet. Two statuses are equal iff their codes are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BetStatus {
    /// Waiting for the match to produce a winner
    Active,
    /// Resolved, a winner is recorded
    Finished,
}

impl BetStatus {
    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished)
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Finished => "FINISHED",
        }
    }
}

impl fmt::Display for BetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for BetStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(Self::Active),
            "FINISHED" => Ok(Self::Finished),
            _ => Err(DomainError::validation(format!("Unknown bet status: {}", s))),
        }
    }
}
