// src/tasks/mod.rs
pub mod live_poller;

pub use live_poller::{LivePoller, PollOutcome, PollerConfig, SessionState};
