//! Session - the timed window in which a match is played
//!
//! A session is fixed once created. Every gameplay command receives the
//! current time explicitly and asks the session whether the window has
//! closed; nothing here reads the clock.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// How long a match session lasts, in minutes.
pub const MINUTES_TO_PLAY: u32 = 1;

/// An immutable time window `[started_at, started_at + duration)`.
///
/// # Example
///
/// ```
/// use chrono::{Duration, Utc};
/// use whackbet_domain::Session;
///
/// let start = Utc::now();
/// let session = Session::create(1, start);
///
/// assert!(!session.is_over(start));
/// assert!(session.is_over(start + Duration::minutes(1)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    started_at: DateTime<Utc>,
    duration_minutes: u32,
}

impl Session {
    pub fn create(duration_minutes: u32, started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            duration_minutes,
        }
    }

    #[inline]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[inline]
    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    /// First instant at which the session counts as over.
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.started_at + Duration::minutes(i64::from(self.duration_minutes))
    }

    /// Whether the window has closed at `now`. The end instant itself is over.
    pub fn is_over(&self, now: DateTime<Utc>) -> bool {
        now >= self.ends_at()
    }

    /// Time left until the window closes, zero once it is over.
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        if self.is_over(now) {
            Duration::zero()
        } else {
            self.ends_at() - now
        }
    }
}
