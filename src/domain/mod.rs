//! Domain models for tempmon
//!
//! This module contains all domain types with validation.
//! Types are validated on construction (fail-fast pattern).

pub mod connection;
pub mod messaging;
pub mod thermal;
pub mod tick;

pub use connection::ConnectionState;
pub use messaging::{PacketId, Qos};
pub use thermal::{Celsius, Reading};
pub use tick::Tick;
