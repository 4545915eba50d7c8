//! Clock and random implementations.

use crate::infrastructure::ports::{ClockPort, RandomPort};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// System clock - uses real time.
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// System random - uses real randomness.
pub struct SystemRandom;

impl SystemRandom {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPort for SystemRandom {
    fn gen_range(&self, min: u32, max: u32) -> u32 {
        use rand::Rng;
        rand::thread_rng().gen_range(min..=max)
    }

    fn gen_uuid(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Manually driven clock for testing.
#[cfg(test)]
pub struct FixedClock(std::sync::Mutex<DateTime<Utc>>);

#[cfg(test)]
impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self(std::sync::Mutex::new(now))
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.0.lock().unwrap();
        *now += by;
    }
}

#[cfg(test)]
impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

/// Deterministic random for testing: walks through the range one step per draw.
#[cfg(test)]
pub struct CyclingRandom(std::sync::atomic::AtomicU32);

#[cfg(test)]
impl CyclingRandom {
    pub fn new() -> Self {
        Self(std::sync::atomic::AtomicU32::new(0))
    }
}

#[cfg(test)]
impl RandomPort for CyclingRandom {
    fn gen_range(&self, min: u32, max: u32) -> u32 {
        let step = self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        min + step % (max - min + 1)
    }

    fn gen_uuid(&self) -> Uuid {
        let step = self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Uuid::from_u128(u128::from(step) + 1)
    }
}
