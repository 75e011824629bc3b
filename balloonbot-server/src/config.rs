// File: balloonbot-server/src/config.rs

use std::time::Duration;

use clap::Parser;

use balloonbot_common::Error;

/// Environment variable holding the broadcaster to watch.
pub const BJ_ID_ENV: &str = "BJ_ID";

#[derive(Parser, Debug, Clone)]
#[command(name = "balloonbot")]
#[command(author, version, about = "Forwards AfreecaTV balloon gifts to a local OSC listener")]
pub struct Args {
    /// Broadcaster id to watch. Falls back to the BJ_ID environment variable.
    #[arg(long)]
    pub bj_id: Option<String>,

    /// Host of the OSC listener
    #[arg(long, default_value = "localhost")]
    pub osc_host: String,

    /// UDP port of the OSC listener
    #[arg(long, default_value_t = 19190)]
    pub osc_port: u16,

    /// Seconds between station polls
    #[arg(long, default_value_t = 10)]
    pub poll_interval_secs: u64,

    /// Deadline for each metadata HTTP call, in seconds
    #[arg(long, default_value_t = 5)]
    pub http_timeout_secs: u64,
}

/// Validated runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    pub broadcaster_id: String,
    pub osc_host: String,
    pub osc_port: u16,
    pub poll_interval: Duration,
    pub http_timeout: Duration,
}

impl BridgeConfig {
    /// `env_bj_id` is the value of `BJ_ID`, if set. The command line wins
    /// over the environment.
    pub fn resolve(args: &Args, env_bj_id: Option<String>) -> Result<Self, Error> {
        let broadcaster_id = args
            .bj_id
            .clone()
            .or(env_bj_id)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::Config(format!("{BJ_ID_ENV} is not set")))?;

        if args.poll_interval_secs == 0 {
            return Err(Error::Config("poll interval must be at least 1s".into()));
        }
        if args.http_timeout_secs == 0 {
            return Err(Error::Config("http timeout must be at least 1s".into()));
        }

        Ok(Self {
            broadcaster_id,
            osc_host: args.osc_host.clone(),
            osc_port: args.osc_port,
            poll_interval: Duration::from_secs(args.poll_interval_secs),
            http_timeout: Duration::from_secs(args.http_timeout_secs),
        })
    }

    pub fn from_env(args: &Args) -> Result<Self, Error> {
        Self::resolve(args, std::env::var(BJ_ID_ENV).ok())
    }
}
