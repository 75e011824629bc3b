//! balloonbot-osc/src/lib.rs
//!
//! OSC output for the balloon bridge. The local control surface listens on
//! UDP and expects one `/osc/ballon s i` message per gift.

pub mod balloon;

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};

use async_trait::async_trait;
use rosc::OscPacket;

use tokio::net::UdpSocket;

use balloonbot_common::Error;
use balloonbot_common::traits::NotificationSink;

pub use balloon::{BalloonMessage, BALLOON_ADDRESS};

#[derive(thiserror::Error, Debug)]
pub enum OscError {
    #[error("OSC I/O error: {0}")]
    IoError(String),

    #[error("OSC encode error: {0}")]
    EncodeError(String),

    #[error("Could not resolve OSC target '{0}'")]
    AddressError(String),
}

impl From<OscError> for Error {
    fn from(e: OscError) -> Self {
        Error::NotificationSend(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, OscError>;

/// Sends balloon notifications to a fixed UDP endpoint.
///
/// The target is resolved once at construction and the local socket is bound
/// to the matching address family, so `localhost` works whether it resolves
/// to 127.0.0.1 or ::1.
pub struct BalloonNotifier {
    socket: UdpSocket,
    target: SocketAddr,
}

impl BalloonNotifier {
    pub async fn connect(host: &str, port: u16) -> Result<Self> {
        let mut addrs = tokio::net::lookup_host((host, port))
            .await
            .map_err(|e| OscError::AddressError(format!("{host}:{port} ({e})")))?
            .collect::<Vec<_>>();
        // prefer IPv4, most OSC receivers only bind there
        addrs.sort_by_key(|a| !a.is_ipv4());
        let target = addrs
            .into_iter()
            .next()
            .ok_or_else(|| OscError::AddressError(format!("{host}:{port}")))?;

        let bind_addr = if target.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        };
        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| OscError::IoError(format!("Bind sock error: {e}")))?;

        tracing::info!("[Osc] notifier ready, target={target}");
        Ok(Self { socket, target })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }

    pub async fn send_packet(&self, packet: &OscPacket) -> Result<()> {
        let buf = rosc::encoder::encode(packet)
            .map_err(|e| OscError::EncodeError(format!("{e:?}")))?;
        self.socket
            .send_to(&buf, self.target)
            .await
            .map_err(|e| OscError::IoError(format!("Send error: {e}")))?;
        Ok(())
    }

    pub async fn send_balloon(&self, msg: &BalloonMessage) -> Result<()> {
        self.send_packet(&msg.to_packet()).await?;
        tracing::debug!(
            "[Osc] sent {} => user={}, count={}",
            BALLOON_ADDRESS, msg.user_name, msg.count
        );
        Ok(())
    }
}

#[async_trait]
impl NotificationSink for BalloonNotifier {
    async fn notify_balloon(&self, user_name: &str, count: i32) -> std::result::Result<(), Error> {
        self.send_balloon(&BalloonMessage::new(user_name, count))
            .await
            .map_err(Error::from)
    }
}
