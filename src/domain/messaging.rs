//! Messaging domain types
//!
//! Transport-agnostic publish parameters. The concrete MQTT transport maps
//! these onto its client library's equivalents.

use std::fmt;

/// Identifier assigned to an outgoing publish, used for log correlation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PacketId(u16);

impl PacketId {
    /// Create a packet id
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Get the raw id
    #[inline]
    pub const fn get(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for PacketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Quality of service for a publish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Qos {
    /// Fire and forget
    AtMostOnce,
    /// Delivered at least once
    #[default]
    AtLeastOnce,
    /// Delivered exactly once
    ExactlyOnce,
}

impl fmt::Display for Qos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AtMostOnce => write!(f, "0"),
            Self::AtLeastOnce => write!(f, "1"),
            Self::ExactlyOnce => write!(f, "2"),
        }
    }
}
