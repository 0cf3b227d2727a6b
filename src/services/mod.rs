//! Service layer for the sampling daemon
//!
//! Services encapsulate the per-tick sampling pipeline, the one-shot timer
//! capability, and the event loop that ties them to the connectivity
//! managers.

pub mod daemon;
pub mod sampler;
pub mod scheduler;

pub use daemon::Daemon;
pub use sampler::Sampler;
pub use scheduler::{Event, Scheduler, ThreadScheduler};
