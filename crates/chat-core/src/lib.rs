//! Chat session engine.
//!
//! Platform-free: everything that touches the network, storage or timers
//! goes through the traits in [`ports`].

pub mod ports;
pub mod event_bus;
pub mod auth;
pub mod history;
pub mod cancel;
pub mod decoder;
pub mod session;
