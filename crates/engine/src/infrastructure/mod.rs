//! Infrastructure layer - ports and in-process adapters.

pub mod clock;
pub mod event_bus;
pub mod locks;
pub mod memory;
pub mod ports;
pub mod settings;
