//! Connectivity layer
//!
//! Two independent reconnect state machines: the network link underneath and
//! the messaging session on top of it. Both retry on a fixed delay through
//! the scheduler and treat every connectivity failure as recoverable.

pub mod link;
pub mod rumqtt;
pub mod session;

pub use link::{LinkManager, NetworkLink, TcpLink};
pub use rumqtt::RumqttTransport;
pub use session::{MessagingSession, MqttTransport};
