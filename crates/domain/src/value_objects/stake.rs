//! Wager amount
//!
//! # Validation Rules
//!
//! - Value must be finite
//! - Value must be strictly positive

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Amount staked on a bet (validated newtype)
///
/// ```
/// use whackbet_domain::Stake;
///
/// assert_eq!(Stake::new(10.0).unwrap().value(), 10.0);
/// assert!(Stake::new(0.0).is_err());
/// assert!(Stake::new(f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Stake(f64);

impl Stake {
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the amount is not a finite, positive number.
    pub fn new(amount: f64) -> Result<Self, DomainError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(DomainError::validation(format!(
                "Bet amount must be a positive number, got {}",
                amount
            )));
        }
        Ok(Self(amount))
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Stake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<f64> for Stake {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Stake> for f64 {
    fn from(stake: Stake) -> f64 {
        stake.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_amounts() {
        assert!(Stake::new(-1.0).is_err());
        assert!(Stake::new(0.0).is_err());
        assert!(Stake::new(f64::INFINITY).is_err());
    }

    #[test]
    fn accepts_fractional_amounts() {
        assert_eq!(Stake::new(0.5).unwrap().value(), 0.5);
    }
}
