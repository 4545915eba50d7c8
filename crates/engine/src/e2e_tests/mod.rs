//! End-to-end flows.
//!
//! These tests wire a complete `App` over the in-memory adapters, a manual
//! clock and a deterministic random source, and drive the event reactor by
//! hand so that every cascade is observable.

mod e2e_helpers;
mod match_flow_tests;

pub use e2e_helpers::*;
