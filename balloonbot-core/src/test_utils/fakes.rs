// File: balloonbot-core/src/test_utils/fakes.rs
//
// In-memory stand-ins for the network edges, shared by unit and integration
// tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;

use balloonbot_common::models::ChatEvent;
use balloonbot_common::traits::{ChatSession, NotificationSink};

use crate::Error;
use crate::http::{HttpClient, HttpResponse};

/// A request seen by `StaticHttpClient`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedRequest {
    Get { url: String, headers: HashMap<String, String> },
    PostForm { url: String, form: Vec<(String, String)> },
}

/// Answers GETs and POSTs from two queues, in order. An empty queue answers
/// with a network error.
#[derive(Default, Clone)]
pub struct StaticHttpClient {
    gets: Arc<Mutex<VecDeque<Result<HttpResponse, String>>>>,
    posts: Arc<Mutex<VecDeque<Result<HttpResponse, String>>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StaticHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_get(&self, status: u16, body: &str) -> &Self {
        self.gets.lock().unwrap().push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    pub fn push_get_failure(&self, reason: &str) -> &Self {
        self.gets.lock().unwrap().push_back(Err(reason.to_string()));
        self
    }

    pub fn push_post(&self, status: u16, body: &str) -> &Self {
        self.posts.lock().unwrap().push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClient for StaticHttpClient {
    async fn get(&self, url: String, headers: HashMap<String, String>) -> Result<HttpResponse, Error> {
        self.requests
            .lock()
            .unwrap()
            .push(RecordedRequest::Get { url, headers });
        match self.gets.lock().unwrap().pop_front() {
            Some(Ok(resp)) => Ok(resp),
            Some(Err(reason)) => Err(Error::Network(reason)),
            None => Err(Error::Network("no canned GET response".into())),
        }
    }

    async fn post_form(&self, url: String, form: Vec<(String, String)>) -> Result<HttpResponse, Error> {
        self.requests
            .lock()
            .unwrap()
            .push(RecordedRequest::PostForm { url, form });
        match self.posts.lock().unwrap().pop_front() {
            Some(Ok(resp)) => Ok(resp),
            Some(Err(reason)) => Err(Error::Network(reason)),
            None => Err(Error::Network("no canned POST response".into())),
        }
    }
}

/// Chat session fed by hand through the returned sender. Dropping the sender
/// closes the session.
pub struct ScriptedChatSession {
    rx: mpsc::UnboundedReceiver<ChatEvent>,
}

impl ScriptedChatSession {
    pub fn new() -> (Self, mpsc::UnboundedSender<ChatEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { rx }, tx)
    }
}

#[async_trait]
impl ChatSession for ScriptedChatSession {
    async fn next_event(&mut self) -> Option<ChatEvent> {
        self.rx.recv().await
    }

    fn shutdown(&mut self) {
        self.rx.close();
    }
}

/// Records every balloon it is asked to send. The first `fail_first` sends
/// fail.
#[derive(Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<(String, i32)>>,
    attempts: Mutex<usize>,
    fail_first: usize,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_first(n: usize) -> Self {
        Self {
            fail_first: n,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<(String, i32)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn notify_balloon(&self, user_name: &str, count: i32) -> Result<(), Error> {
        let attempt = {
            let mut attempts = self.attempts.lock().unwrap();
            *attempts += 1;
            *attempts
        };
        if attempt <= self.fail_first {
            return Err(Error::NotificationSend(format!("send #{attempt} refused")));
        }
        self.sent.lock().unwrap().push((user_name.to_string(), count));
        Ok(())
    }
}
