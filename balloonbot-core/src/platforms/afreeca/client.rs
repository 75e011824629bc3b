//! src/platforms/afreeca/client.rs
//!
//! Minimal AfreecaTV chat client: logs in, joins the room, keeps the socket
//! alive and surfaces balloon gifts. Everything else on the wire is ignored.

use std::fmt::Display;

use async_trait::async_trait;
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::protocol::Message;
use tracing::{debug, error, info, trace, warn};

use balloonbot_common::models::{ChatEvent, SessionCredential};
use balloonbot_common::traits::{ChatConnector, ChatSession};

use crate::Error;

use super::packet::{
    decode_packet, join_packet, keepalive_packet, login_packet, parse_balloon, SVC_BALLOON,
    SVC_JOIN, SVC_LOGIN,
};

pub const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(60);

/// The chat server only accepts this websocket subprotocol.
pub const CHAT_SUBPROTOCOL: &str = "chat";

/// One open chat connection with its read/write/keepalive tasks.
pub struct AfreecaChatClient {
    incoming: mpsc::UnboundedReceiver<ChatEvent>,

    read_task: JoinHandle<()>,
    write_task: JoinHandle<()>,
    keepalive_task: JoinHandle<()>,
}

impl AfreecaChatClient {
    /// Opens the websocket named in the credential, queues the login packet
    /// and spawns the I/O tasks. The join is sent once login is acknowledged.
    pub async fn connect(credential: &SessionCredential) -> Result<Self, Error> {
        let url = credential
            .websocket_url
            .as_deref()
            .ok_or_else(|| Error::Session("credential has no websocket url".into()))?;

        let mut request = url
            .into_client_request()
            .map_err(|e| Error::Session(format!("bad websocket url '{url}': {e}")))?;
        request
            .headers_mut()
            .insert("Sec-WebSocket-Protocol", HeaderValue::from_static(CHAT_SUBPROTOCOL));

        let (ws, _) = connect_async(request)
            .await
            .map_err(|e| Error::Session(format!("connect {url} failed: {e}")))?;
        info!("[AfreecaChat] websocket open → {}", url);

        let (write_half, read_half) = ws.split();

        let (tx_outgoing, rx_outgoing) = mpsc::unbounded_channel::<Vec<u8>>();
        let (tx_incoming, rx_incoming) = mpsc::unbounded_channel::<ChatEvent>();

        let write_task = tokio::spawn(Self::writer_loop(write_half, rx_outgoing));

        tx_outgoing.send(login_packet(&credential.capability_flag)).ok();

        let read_task = tokio::spawn(Self::reader_loop(
            read_half,
            tx_incoming,
            tx_outgoing.clone(),
            credential.chat_room_id.clone(),
            credential.fan_ticket.clone(),
        ));
        let keepalive_task = tokio::spawn(Self::keepalive_loop(tx_outgoing));

        Ok(Self {
            incoming: rx_incoming,
            read_task,
            write_task,
            keepalive_task,
        })
    }

    async fn reader_loop<R>(
        mut read_half: R,
        tx_incoming: mpsc::UnboundedSender<ChatEvent>,
        tx_outgoing: mpsc::UnboundedSender<Vec<u8>>,
        chat_room_id: String,
        fan_ticket: String,
    )
    where
        R: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
    {
        let mut joined = false;

        while let Some(frame) = read_half.next().await {
            let data = match frame {
                Ok(Message::Binary(bytes)) => bytes.to_vec(),
                Ok(Message::Text(text)) => text.as_str().as_bytes().to_vec(),
                Ok(Message::Close(reason)) => {
                    info!("[AfreecaChat] server closed the socket: {:?}", reason);
                    break;
                }
                Ok(_) => continue,
                Err(e) => {
                    error!("[AfreecaChat] read error => {}", e);
                    break;
                }
            };

            let Some(packet) = decode_packet(&data) else {
                trace!("[AfreecaChat] skipping {} bytes of non-packet data", data.len());
                continue;
            };

            match packet.service {
                SVC_LOGIN => {
                    debug!("[AfreecaChat] login acknowledged, joining room {}", chat_room_id);
                    tx_outgoing.send(join_packet(&chat_room_id, &fan_ticket)).ok();
                }
                SVC_JOIN => {
                    if !joined {
                        joined = true;
                        let _ = tx_incoming.send(ChatEvent::Connected(true));
                    }
                }
                SVC_BALLOON => match parse_balloon(&packet) {
                    Some(balloon) => {
                        let _ = tx_incoming.send(ChatEvent::Balloon(balloon));
                    }
                    None => warn!("[AfreecaChat] malformed balloon packet: {:?}", packet.fields),
                },
                other => trace!("[AfreecaChat] ignoring service {}", other),
            }
        }

        let _ = tx_incoming.send(ChatEvent::Connected(false));
        info!("[AfreecaChat] reader_loop ended.");
    }

    async fn writer_loop<W>(mut write_half: W, mut rx_outgoing: mpsc::UnboundedReceiver<Vec<u8>>)
    where
        W: Sink<Message> + Unpin,
        W::Error: Display,
    {
        while let Some(bytes) = rx_outgoing.recv().await {
            trace!("[AfreecaChat] >> {} bytes", bytes.len());
            if let Err(e) = write_half.send(Message::binary(bytes)).await {
                error!("[AfreecaChat] writer error => {}", e);
                break;
            }
        }
        let _ = write_half.close().await;
        info!("[AfreecaChat] writer_loop ended.");
    }

    async fn keepalive_loop(tx_outgoing: mpsc::UnboundedSender<Vec<u8>>) {
        let mut ticker = interval(KEEPALIVE_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // the first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if tx_outgoing.send(keepalive_packet()).is_err() {
                break;
            }
        }
    }

    fn abort_tasks(&self) {
        self.read_task.abort();
        self.write_task.abort();
        self.keepalive_task.abort();
    }
}

impl Drop for AfreecaChatClient {
    fn drop(&mut self) {
        self.abort_tasks();
    }
}

#[async_trait]
impl ChatSession for AfreecaChatClient {
    async fn next_event(&mut self) -> Option<ChatEvent> {
        self.incoming.recv().await
    }

    fn shutdown(&mut self) {
        self.abort_tasks();
    }
}

/// Opens real chat connections.
#[derive(Debug, Default, Clone, Copy)]
pub struct AfreecaChatConnector;

#[async_trait]
impl ChatConnector for AfreecaChatConnector {
    async fn connect(&self, credential: &SessionCredential) -> Result<Box<dyn ChatSession>, Error> {
        let client = AfreecaChatClient::connect(credential).await?;
        Ok(Box::new(client))
    }
}
