//! src/tasks/live_poller.rs
//!
//! The control loop. Polls the station on a fixed interval and hands off to a
//! chat session the first time a poll sees the broadcast live. At most one
//! session is open at a time; when it ends the poller goes back to idle and
//! the next live poll opens a fresh one.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use tracing::{debug, error, info, trace, warn};

use balloonbot_common::traits::BroadcastApi;

use crate::Error;
use crate::platforms::afreeca::build_credential;
use crate::services::ChatSessionBridge;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub broadcaster_id: String,
    pub poll_interval: Duration,
}

impl PollerConfig {
    pub fn new(broadcaster_id: &str) -> Self {
        Self {
            broadcaster_id: broadcaster_id.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Idle when no session handle is held, Active otherwise.
#[derive(Debug, Default)]
pub struct SessionState {
    session: Option<JoinHandle<()>>,
}

impl SessionState {
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    fn activate(&mut self, handle: JoinHandle<()>) {
        self.session = Some(handle);
    }

    /// Drops the handle of a session that has finished. Returns `true` when
    /// this moved the state from Active to Idle.
    pub fn reap_finished(&mut self) -> bool {
        if self.session.as_ref().is_some_and(|h| h.is_finished()) {
            self.session = None;
            true
        } else {
            false
        }
    }

    pub fn abort(&mut self) {
        if let Some(handle) = self.session.take() {
            handle.abort();
        }
    }
}

/// What a single poll cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    StatusFailed,
    Offline,
    AlreadyActive,
    HandOff,
    HandOffFailed,
}

pub struct LivePoller {
    config: PollerConfig,
    api: Arc<dyn BroadcastApi>,
    bridge: ChatSessionBridge,
    state: SessionState,
}

impl LivePoller {
    pub fn new(config: PollerConfig, api: Arc<dyn BroadcastApi>, bridge: ChatSessionBridge) -> Self {
        Self {
            config,
            api,
            bridge,
            state: SessionState::default(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// One poll cycle. Never fails: every error is logged and the cycle ends.
    pub async fn poll_once(&mut self) -> PollOutcome {
        if self.state.reap_finished() {
            info!("[Poller] chat session ended; back to idle.");
        }

        let bj = &self.config.broadcaster_id;
        let status = match self.api.fetch_status(bj).await {
            Ok(s) => s,
            Err(e) => {
                warn!("[Poller] station check for '{}' failed: {}", bj, e);
                return PollOutcome::StatusFailed;
            }
        };

        if !status.is_live() {
            trace!("[Poller] '{}' is offline.", bj);
            return PollOutcome::Offline;
        }

        if self.state.is_active() {
            trace!("[Poller] '{}' live, session already running.", bj);
            return PollOutcome::AlreadyActive;
        }

        info!(
            "[Poller] '{}' is live (broad_no={}, title='{}'); opening chat.",
            bj, status.broadcast_id, status.title
        );
        match self.hand_off().await {
            Ok(handle) => {
                self.state.activate(handle);
                PollOutcome::HandOff
            }
            Err(e) => {
                error!("[Poller] hand-off failed, will retry next poll: {}", e);
                PollOutcome::HandOffFailed
            }
        }
    }

    async fn hand_off(&self) -> Result<JoinHandle<()>, Error> {
        let bj = &self.config.broadcaster_id;
        let channel = self.api.resolve_channel(bj).await?;
        let credential = build_credential(bj, &channel)?;
        debug!("[Poller] credential ready: {:?}", credential.websocket_url);
        self.bridge.open(credential).await
    }

    /// Polls until `shutdown_rx` turns true (or its sender is dropped), then
    /// aborts any open session.
    pub async fn run(mut self, mut shutdown_rx: watch::Receiver<bool>) {
        info!(
            "[Poller] watching '{}' every {:?}",
            self.config.broadcaster_id, self.config.poll_interval
        );

        while !*shutdown_rx.borrow() {
            // a hand-off can wait on the network, so shutdown must win over it
            tokio::select! {
                _ = self.poll_once() => {}
                changed = shutdown_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
            }

            tokio::select! {
                _ = sleep(self.config.poll_interval) => {}
                changed = shutdown_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        self.state.abort();
        info!("[Poller] stopped.");
    }
}
