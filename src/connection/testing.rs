//! Helpers for tests that need a live server or want to inspect events.

use futures_util::{SinkExt, StreamExt};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tokio_tungstenite::tungstenite::Message;
use url::Url;

use crate::connection::{ConnectionEvent, EventHandler};

pub const WAIT: Duration = Duration::from_secs(5);

/// Forwards events into a channel.
pub struct ChannelHandler {
    sender: mpsc::Sender<ConnectionEvent>,
}

impl ChannelHandler {
    pub fn new() -> (Self, mpsc::Receiver<ConnectionEvent>) {
        let (sender, receiver) = mpsc::channel();
        (Self { sender }, receiver)
    }
}

impl EventHandler for ChannelHandler {
    fn handle(&self, event: ConnectionEvent) {
        let _ = self.sender.send(event);
    }
}

/// Accept one client, send `greeting`, then report every text frame it receives.
pub fn start_server(greeting: Vec<Message>) -> (Url, mpsc::Receiver<String>) {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    listener.set_nonblocking(true).unwrap();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
            for message in greeting {
                ws.send(message).await.unwrap();
            }
            while let Some(Ok(message)) = ws.next().await {
                if let Message::Text(text) = message {
                    let _ = tx.send(text.to_string());
                }
            }
        });
    });

    (Url::parse(&format!("ws://{}", addr)).unwrap(), rx)
}

/// A URL whose listener completes TCP through the backlog but never answers
/// the WebSocket handshake. Keep the listener alive for as long as needed.
pub fn silent_server() -> (Url, std::net::TcpListener) {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = Url::parse(&format!("ws://{}", listener.local_addr().unwrap())).unwrap();
    (url, listener)
}

pub fn next_closed(events: &mpsc::Receiver<ConnectionEvent>) -> ConnectionEvent {
    loop {
        let event = events.recv_timeout(WAIT).unwrap();
        if matches!(event, ConnectionEvent::Closed { .. }) {
            return event;
        }
    }
}

/// Poll `condition` until it holds or `WAIT` runs out.
pub fn wait_until(condition: impl Fn() -> bool) -> bool {
    let deadline = std::time::Instant::now() + WAIT;
    while std::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    condition()
}
