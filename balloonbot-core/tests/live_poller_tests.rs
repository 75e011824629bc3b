// tests/live_poller_tests.rs

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mockall::mock;
use tokio::sync::{mpsc, watch};
use tokio::time::{sleep, Duration};

use balloonbot_common::models::{BroadcastStatus, ChannelInfo, ChatEvent, SessionCredential};
use balloonbot_common::traits::{BroadcastApi, ChatConnector, ChatSession};
use balloonbot_core::Error;
use balloonbot_core::platforms::afreeca::AfreecaApi;
use balloonbot_core::services::ChatSessionBridge;
use balloonbot_core::tasks::{LivePoller, PollOutcome, PollerConfig};
use balloonbot_core::test_utils::fakes::{RecordingSink, ScriptedChatSession, StaticHttpClient};

mock! {
    Api {}
    #[async_trait]
    impl BroadcastApi for Api {
        async fn fetch_status(&self, broadcaster_id: &str) -> Result<BroadcastStatus, Error>;
        async fn resolve_channel(&self, broadcaster_id: &str) -> Result<ChannelInfo, Error>;
    }
}

mock! {
    Connector {}
    #[async_trait]
    impl ChatConnector for Connector {
        async fn connect(&self, credential: &SessionCredential) -> Result<Box<dyn ChatSession>, Error>;
    }
}

type Senders = Arc<Mutex<Vec<mpsc::UnboundedSender<ChatEvent>>>>;

fn channel() -> ChannelInfo {
    ChannelInfo {
        chat_server_host: "h".into(),
        chat_server_port: "9000".into(),
        chat_room_id: "room".into(),
        fan_ticket: "ftk".into(),
    }
}

/// Connector whose sessions stay open until their sender is dropped from
/// `senders`.
fn scripted_connector(expected_connects: usize, senders: Senders) -> MockConnector {
    let mut connector = MockConnector::new();
    connector
        .expect_connect()
        .times(expected_connects)
        .returning(move |_| {
            let (session, tx) = ScriptedChatSession::new();
            senders.lock().unwrap().push(tx);
            Ok(Box::new(session) as Box<dyn ChatSession>)
        });
    connector
}

/// Answers `fetch_status` from `script`, one entry per call.
fn scripted_status(api: &mut MockApi, script: Vec<BroadcastStatus>) {
    let calls = AtomicUsize::new(0);
    api.expect_fetch_status()
        .times(script.len())
        .returning(move |_| Ok(script[calls.fetch_add(1, Ordering::SeqCst)].clone()));
}

/// A connector whose handshake never completes; counts the attempts.
struct StalledConnector {
    attempts: Arc<AtomicUsize>,
}

#[async_trait]
impl ChatConnector for StalledConnector {
    async fn connect(&self, _credential: &SessionCredential) -> Result<Box<dyn ChatSession>, Error> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }
}

fn always_live_api() -> MockApi {
    let mut api = MockApi::new();
    api.expect_fetch_status()
        .returning(|_| Ok(BroadcastStatus::live(1, "")));
    api.expect_resolve_channel().returning(|_| Ok(channel()));
    api
}

fn stalled_poller(connect_timeout: Duration) -> (LivePoller, Arc<AtomicUsize>) {
    let attempts = Arc::new(AtomicUsize::new(0));
    let connector = StalledConnector { attempts: attempts.clone() };
    let bridge = ChatSessionBridge::new(Arc::new(connector), Arc::new(RecordingSink::new()))
        .with_connect_timeout(connect_timeout);
    let poller = LivePoller::new(PollerConfig::new("bj"), Arc::new(always_live_api()), bridge);
    (poller, attempts)
}

fn poller(api: MockApi, connector: MockConnector) -> LivePoller {
    let bridge = ChatSessionBridge::new(Arc::new(connector), Arc::new(RecordingSink::new()));
    LivePoller::new(PollerConfig::new("bj"), Arc::new(api), bridge)
}

#[tokio::test]
async fn test_single_hand_off_across_live_polls() {
    let offline = BroadcastStatus::offline();
    let live = BroadcastStatus::live(42, "stream");

    let mut api = MockApi::new();
    scripted_status(
        &mut api,
        vec![offline.clone(), offline, live.clone(), live.clone(), live],
    );
    api.expect_resolve_channel().times(1).returning(|_| Ok(channel()));

    let senders = Senders::default();
    let mut poller = poller(api, scripted_connector(1, senders.clone()));

    let mut outcomes = Vec::new();
    for _ in 0..5 {
        outcomes.push(poller.poll_once().await);
    }

    assert_eq!(
        outcomes,
        vec![
            PollOutcome::Offline,
            PollOutcome::Offline,
            PollOutcome::HandOff,
            PollOutcome::AlreadyActive,
            PollOutcome::AlreadyActive,
        ]
    );
    assert!(poller.state().is_active());
}

#[tokio::test]
async fn test_failed_status_leaves_state_untouched() {
    let http = StaticHttpClient::new();
    http.push_get(500, "oops");

    let mut connector = MockConnector::new();
    connector.expect_connect().times(0);
    let bridge = ChatSessionBridge::new(Arc::new(connector), Arc::new(RecordingSink::new()));
    let api = AfreecaApi::new(Arc::new(http.clone()));
    let mut poller = LivePoller::new(PollerConfig::new("bj"), Arc::new(api), bridge);

    assert_eq!(poller.poll_once().await, PollOutcome::StatusFailed);
    assert!(!poller.state().is_active());
    // only the station GET went out
    assert_eq!(http.requests().len(), 1);
}

#[tokio::test]
async fn test_failed_hand_off_is_retried_next_live_poll() {
    let live = BroadcastStatus::live(7, "");
    let mut api = MockApi::new();
    scripted_status(&mut api, vec![live.clone(), live]);

    let resolves = AtomicUsize::new(0);
    api.expect_resolve_channel().times(2).returning(move |_| {
        if resolves.fetch_add(1, Ordering::SeqCst) == 0 {
            Err(Error::Resolution("no chat server".into()))
        } else {
            Ok(channel())
        }
    });

    let mut poller = poller(api, scripted_connector(1, Senders::default()));

    assert_eq!(poller.poll_once().await, PollOutcome::HandOffFailed);
    assert!(!poller.state().is_active());
    assert_eq!(poller.poll_once().await, PollOutcome::HandOff);
    assert!(poller.state().is_active());
}

#[tokio::test]
async fn test_unusable_port_fails_hand_off_without_connecting() {
    let mut api = MockApi::new();
    scripted_status(&mut api, vec![BroadcastStatus::live(7, "")]);
    api.expect_resolve_channel().times(1).returning(|_| {
        Ok(ChannelInfo {
            chat_server_port: "not-a-port".into(),
            ..channel()
        })
    });

    let mut poller = poller(api, scripted_connector(0, Senders::default()));
    assert_eq!(poller.poll_once().await, PollOutcome::HandOffFailed);
    assert!(!poller.state().is_active());
}

#[tokio::test]
async fn test_session_end_allows_new_hand_off() {
    let live = BroadcastStatus::live(42, "");
    let mut api = MockApi::new();
    scripted_status(&mut api, vec![live.clone(), live.clone(), live]);
    api.expect_resolve_channel().times(2).returning(|_| Ok(channel()));

    let senders = Senders::default();
    let mut poller = poller(api, scripted_connector(2, senders.clone()));

    assert_eq!(poller.poll_once().await, PollOutcome::HandOff);
    assert_eq!(poller.poll_once().await, PollOutcome::AlreadyActive);

    // remote end closes the chat
    senders.lock().unwrap().clear();
    sleep(Duration::from_millis(50)).await;

    assert_eq!(poller.poll_once().await, PollOutcome::HandOff);
    assert!(poller.state().is_active());
}

#[tokio::test(start_paused = true)]
async fn test_run_polls_every_interval_until_shutdown() {
    let polls = Arc::new(AtomicUsize::new(0));
    let counter = polls.clone();

    let mut api = MockApi::new();
    api.expect_fetch_status().returning(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(BroadcastStatus::offline())
    });
    api.expect_resolve_channel().times(0);

    let poller = poller(api, scripted_connector(0, Senders::default()));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(poller.run(shutdown_rx));

    // polls at t = 0, 10, 20, 30
    sleep(Duration::from_secs(35)).await;
    shutdown_tx.send(true).unwrap();
    handle.await.unwrap();

    assert_eq!(polls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_shutdown_aborts_active_session() {
    let mut api = MockApi::new();
    api.expect_fetch_status()
        .returning(|_| Ok(BroadcastStatus::live(1, "")));
    api.expect_resolve_channel().times(1).returning(|_| Ok(channel()));

    let senders = Senders::default();
    let poller = poller(api, scripted_connector(1, senders.clone()));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(poller.run(shutdown_rx));

    sleep(Duration::from_millis(50)).await;
    assert_eq!(senders.lock().unwrap().len(), 1);

    shutdown_tx.send(true).unwrap();
    handle.await.unwrap();

    // the bridge task was aborted, so its session receiver is gone
    sleep(Duration::from_millis(10)).await;
    let tx = senders.lock().unwrap().pop().unwrap();
    assert!(tx.is_closed());
}

#[tokio::test(start_paused = true)]
async fn test_stalled_connect_does_not_stop_polling() {
    let (poller, attempts) = stalled_poller(Duration::from_secs(5));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(poller.run(shutdown_rx));

    // each cycle: 5 s connect timeout + 10 s sleep; attempts at t = 0, 15, 30, 45
    sleep(Duration::from_secs(50)).await;
    assert_eq!(attempts.load(Ordering::SeqCst), 4);

    shutdown_tx.send(true).unwrap();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_interrupts_pending_hand_off() {
    let (poller, attempts) = stalled_poller(Duration::from_secs(3600));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(poller.run(shutdown_rx));

    sleep(Duration::from_secs(30)).await;
    assert_eq!(attempts.load(Ordering::SeqCst), 1);

    shutdown_tx.send(true).unwrap();
    let stopped = tokio::time::timeout(Duration::from_secs(1), handle).await;
    assert!(stopped.is_ok(), "poller kept waiting on the chat handshake");
}
