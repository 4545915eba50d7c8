//! Whackbet Engine library.
//!
//! Runs matches, fields and bets on top of the domain crate.
//!
//! ## Structure
//!
//! - `use_cases/` - Command orchestration and event reactions
//! - `infrastructure/` - Ports plus in-process adapters (storage, bus, clock)
//! - `app` - Application composition

pub mod app;
pub mod infrastructure;
pub mod use_cases;

/// End-to-end flows over the in-memory adapters.
#[cfg(test)]
mod e2e_tests;

pub use app::App;
