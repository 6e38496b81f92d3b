//! Command-line configuration.

use std::time::Duration;

use clap::Parser;
use url::Url;

use crate::envelope::EnvelopeKind;

pub const DEFAULT_URL: &str = "ws://localhost:9224";

/// Interactive WebSocket test client
#[derive(Parser, Debug, Clone)]
#[command(name = "ws-console", version)]
#[command(
    about = "Connect to a WebSocket server, print what it sends and send what you type",
    long_about = None
)]
pub struct Config {
    /// WebSocket URL to connect to (ws:// or wss://)
    #[arg(default_value = DEFAULT_URL, value_parser = parse_ws_url)]
    pub url: Url,

    /// Give up if the handshake has not completed after this many seconds
    #[arg(long, value_name = "SECS")]
    pub connect_timeout: Option<u64>,

    /// How long to wait for the server to answer a close frame
    #[arg(long, value_name = "SECS", default_value_t = 2)]
    pub close_timeout: u64,

    /// Envelope used to wrap typed messages
    #[arg(long, value_enum, default_value_t = EnvelopeKind::Private)]
    pub envelope: EnvelopeKind,
}

impl Config {
    /// Configuration for `url` with every other option at its default.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            connect_timeout: None,
            close_timeout: 2,
            envelope: EnvelopeKind::default(),
        }
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout.map(Duration::from_secs)
    }

    pub fn close_timeout(&self) -> Duration {
        Duration::from_secs(self.close_timeout)
    }
}

/// Parse a URL and require a WebSocket scheme.
pub fn parse_ws_url(s: &str) -> Result<Url, String> {
    let url = Url::parse(s).map_err(|e| e.to_string())?;
    match url.scheme() {
        "ws" | "wss" => Ok(url),
        other => Err(format!("unsupported scheme '{}', expected ws or wss", other)),
    }
}
