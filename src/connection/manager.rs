//! WebSocket session owner
//!
//! The session runs on a dedicated thread with its own tokio runtime, so the
//! blocking console never stalls frame delivery and vice versa. Callers talk
//! to it through an unbounded channel of outbound frames; the worker reports
//! back through an [`EventHandler`].

use futures_util::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self as std_mpsc, RecvTimeoutError};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio::sync::{Notify, mpsc};
use tokio::time::Instant;
use tokio_tungstenite::tungstenite::{self, Message};
use url::Url;

use crate::config::Config;
use crate::connection::{ConnectionEvent, EventHandler, Payload, ReadyState, SharedState};
use crate::envelope;
use crate::error::{ClientError, Result};

enum Outbound {
    Frame(String),
    Close,
}

/// Handles to a running worker thread.
struct Session {
    outbound: mpsc::UnboundedSender<Outbound>,
    shutdown: Arc<Notify>,
    worker: JoinHandle<()>,
}

/// Owns one WebSocket session and the ready state that guards it.
pub struct ConnectionManager {
    config: Config,
    handler: Arc<dyn EventHandler>,
    state: SharedState,
    session: Mutex<Option<Session>>,
    /// Set by `shutdown`; no session may be opened afterwards.
    retired: AtomicBool,
}

impl ConnectionManager {
    pub fn new(config: Config, handler: impl EventHandler) -> Self {
        Self {
            config,
            handler: Arc::new(handler),
            state: SharedState::new(ReadyState::Closed),
            session: Mutex::new(None),
            retired: AtomicBool::new(false),
        }
    }

    pub fn url(&self) -> &Url {
        &self.config.url
    }

    pub fn state(&self) -> ReadyState {
        self.state.load()
    }

    pub fn is_ready(&self) -> bool {
        self.state.is_open()
    }

    fn lock_session(&self) -> MutexGuard<'_, Option<Session>> {
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Open the session and block until the handshake has completed.
    ///
    /// Waits forever unless a connect timeout is configured. On timeout the
    /// half-open session is torn down before returning.
    pub fn connect(&self) -> Result<()> {
        let (open_tx, open_rx) = std_mpsc::channel();
        {
            let mut session = self.lock_session();
            if self.retired.load(Ordering::SeqCst) {
                return Err(ClientError::ShutDown);
            }
            if session.is_some() {
                return Err(ClientError::AlreadyConnected);
            }

            let (tx, rx) = mpsc::unbounded_channel();
            let shutdown = Arc::new(Notify::new());
            self.state.store(ReadyState::Connecting);

            let worker = Worker {
                url: self.config.url.clone(),
                close_timeout: self.config.close_timeout(),
                state: self.state.clone(),
                handler: self.handler.clone(),
                shutdown: shutdown.clone(),
            };

            let spawned = thread::Builder::new()
                .name("ws-worker".to_string())
                .spawn(move || worker.run(rx, open_tx));
            let worker = match spawned {
                Ok(handle) => handle,
                Err(e) => {
                    self.state.store(ReadyState::Closed);
                    return Err(ClientError::Io(e));
                }
            };

            *session = Some(Session {
                outbound: tx,
                shutdown,
                worker,
            });
        }

        let outcome = match self.config.connect_timeout() {
            Some(timeout) => match open_rx.recv_timeout(timeout) {
                Ok(outcome) => outcome,
                Err(RecvTimeoutError::Timeout) => {
                    log::warn!("[WebSocket] Handshake timed out after {:?}", timeout);
                    self.close();
                    return Err(ClientError::ConnectTimeout(timeout));
                }
                Err(RecvTimeoutError::Disconnected) => Err(worker_gone()),
            },
            None => open_rx.recv().unwrap_or_else(|_| Err(worker_gone())),
        };

        match outcome {
            Ok(()) => Ok(()),
            Err(reason) => {
                self.reap();
                Err(ClientError::Connect(reason))
            }
        }
    }

    /// Wrap `text` in the configured envelope and queue it as a text frame.
    ///
    /// Returns the serialized payload. Fails with [`ClientError::NotConnected`]
    /// without touching the network unless the session is open.
    pub fn send(&self, text: &str) -> Result<String> {
        if !self.is_ready() {
            return Err(ClientError::NotConnected);
        }
        let payload = envelope::encode_text(self.config.envelope, text)?;
        self.enqueue(payload.clone())?;
        Ok(payload)
    }

    pub fn send_ping(&self) -> Result<String> {
        if !self.is_ready() {
            return Err(ClientError::NotConnected);
        }
        let payload = envelope::encode_ping()?;
        self.enqueue(payload.clone())?;
        Ok(payload)
    }

    fn enqueue(&self, payload: String) -> Result<()> {
        // Checked under the session lock so a concurrent close either sees
        // this frame queued ahead of its close frame or rejects it.
        let session = self.lock_session();
        match session.as_ref() {
            Some(session) if self.state.is_open() => {
                log::debug!("[WebSocket] Queueing frame: {}", preview(&payload));
                session
                    .outbound
                    .send(Outbound::Frame(payload))
                    .map_err(|_| ClientError::ChannelClosed)
            }
            _ => Err(ClientError::NotConnected),
        }
    }

    /// Close the session and wait for the worker to finish.
    ///
    /// Returns `true` if this call tore the session down, `false` if there
    /// was nothing to close.
    pub fn close(&self) -> bool {
        let session = {
            let mut session = self.lock_session();
            if !self.state.transition(ReadyState::Open, ReadyState::Closing) {
                self.state
                    .transition(ReadyState::Connecting, ReadyState::Closing);
            }
            session.take()
        };

        let Some(session) = session else {
            return false;
        };

        log::info!("[WebSocket] Closing {}", self.config.url);
        // The worker may already be gone if the server closed first.
        let _ = session.outbound.send(Outbound::Close);
        session.shutdown.notify_one();
        if session.worker.join().is_err() {
            log::error!("[WebSocket] Worker thread panicked");
        }
        self.state.store(ReadyState::Closed);
        true
    }

    /// Close the session for good: any `connect` that has not yet started
    /// fails with [`ClientError::ShutDown`].
    ///
    /// Returns `true` if this call tore a session down.
    pub fn shutdown(&self) -> bool {
        {
            let _session = self.lock_session();
            self.retired.store(true, Ordering::SeqCst);
        }
        self.close()
    }

    /// Drop a session whose worker ended before the handshake completed.
    fn reap(&self) {
        let session = self.lock_session().take();
        if let Some(session) = session {
            if session.worker.join().is_err() {
                log::error!("[WebSocket] Worker thread panicked");
            }
        }
        self.state.store(ReadyState::Closed);
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        self.close();
    }
}

/// At most the first 100 bytes of `s`, cut on a char boundary.
fn preview(s: &str) -> &str {
    let mut end = s.len().min(100);
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

fn worker_gone() -> String {
    "worker exited before the handshake completed".to_string()
}

/// State moved onto the worker thread.
struct Worker {
    url: Url,
    close_timeout: Duration,
    state: SharedState,
    handler: Arc<dyn EventHandler>,
    shutdown: Arc<Notify>,
}

impl Worker {
    fn run(
        self,
        rx: mpsc::UnboundedReceiver<Outbound>,
        open_tx: std_mpsc::Sender<std::result::Result<(), String>>,
    ) {
        let rt = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .worker_threads(2)
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                log::error!("[WebSocket] Failed to create runtime: {}", e);
                self.state.store(ReadyState::Closed);
                let _ = open_tx.send(Err(format!("failed to create runtime: {}", e)));
                return;
            }
        };

        rt.block_on(self.session(rx, open_tx));
    }

    async fn session(
        self,
        mut rx: mpsc::UnboundedReceiver<Outbound>,
        open_tx: std_mpsc::Sender<std::result::Result<(), String>>,
    ) {
        let Worker {
            url,
            close_timeout,
            state,
            handler,
            shutdown,
        } = self;

        log::info!("[WebSocket] Connecting to {}", url);

        let ws_stream = tokio::select! {
            result = tokio_tungstenite::connect_async(url.as_str()) => match result {
                Ok((stream, response)) => {
                    log::info!(
                        "[WebSocket] Connected successfully (status: {})",
                        response.status()
                    );
                    stream
                }
                Err(e) => {
                    // Reported to the caller of `connect`, not the handler.
                    log::error!("[WebSocket] Handshake failed: {}", e);
                    state.store(ReadyState::Closed);
                    let _ = open_tx.send(Err(e.to_string()));
                    return;
                }
            },
            _ = shutdown.notified() => {
                log::info!("[WebSocket] Close requested during handshake");
                state.store(ReadyState::Closed);
                let _ = open_tx.send(Err("closed before the handshake completed".to_string()));
                return;
            }
        };

        let (mut write, mut read) = ws_stream.split();

        if !state.transition(ReadyState::Connecting, ReadyState::Open) {
            log::info!("[WebSocket] Close requested during handshake");
            let _ = write.send(Message::Close(None)).await;
            state.store(ReadyState::Closed);
            let _ = open_tx.send(Err("closed before the handshake completed".to_string()));
            return;
        }
        handler.handle(ConnectionEvent::Opened);
        let _ = open_tx.send(Ok(()));

        // Spawn task to forward outgoing frames
        let close_sent = Arc::new(Notify::new());
        let writer_close_sent = close_sent.clone();
        let writer_handler = handler.clone();
        let send_task = tokio::spawn(async move {
            while let Some(outbound) = rx.recv().await {
                match outbound {
                    Outbound::Frame(text) => {
                        if let Err(e) = write.send(Message::Text(text.into())).await {
                            log::error!("[WebSocket] Send error: {}", e);
                            writer_handler.handle(ConnectionEvent::ErrorOccurred(e.to_string()));
                        }
                    }
                    Outbound::Close => {
                        if let Err(e) = write.send(Message::Close(None)).await {
                            log::debug!("[WebSocket] Close frame not sent: {}", e);
                        }
                        writer_close_sent.notify_one();
                        break;
                    }
                }
            }
        });

        let mut close_deadline: Option<Instant> = None;
        let (mut code, mut reason): (u16, String) = (1006, "Connection lost".to_string());

        loop {
            let next = match close_deadline {
                None => tokio::select! {
                    next = read.next() => next,
                    _ = close_sent.notified() => {
                        close_deadline = Some(Instant::now() + close_timeout);
                        continue;
                    }
                },
                Some(deadline) => match tokio::time::timeout_at(deadline, read.next()).await {
                    Ok(next) => next,
                    Err(_) => {
                        log::warn!("[WebSocket] Close handshake timed out");
                        break;
                    }
                },
            };

            match next {
                Some(Ok(Message::Text(text))) => {
                    log::debug!("[WebSocket] Received: {}", preview(&text));
                    handler.handle(ConnectionEvent::MessageReceived(Payload::Text(
                        text.to_string(),
                    )));
                }
                Some(Ok(Message::Binary(data))) => {
                    log::debug!("[WebSocket] Received binary ({} bytes)", data.len());
                    handler.handle(ConnectionEvent::MessageReceived(Payload::Binary(
                        data.to_vec(),
                    )));
                }
                Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => {
                    // Handled by tungstenite
                }
                Some(Ok(Message::Close(frame))) => {
                    (code, reason) = frame
                        .map(|f| (f.code.into(), f.reason.to_string()))
                        .unwrap_or((1000, String::new()));
                    log::info!("[WebSocket] Received close: {} {}", code, reason);
                    // Keep reading so tungstenite can flush its close reply.
                    close_deadline.get_or_insert_with(|| Instant::now() + close_timeout);
                }
                Some(Ok(Message::Frame(_))) => {}
                Some(Err(tungstenite::Error::ConnectionClosed))
                | Some(Err(tungstenite::Error::AlreadyClosed)) => break,
                Some(Err(e)) => {
                    log::error!("[WebSocket] Read error: {}", e);
                    handler.handle(ConnectionEvent::ErrorOccurred(e.to_string()));
                    break;
                }
                None => break,
            }
        }

        send_task.abort();
        state.store(ReadyState::Closed);
        handler.handle(ConnectionEvent::Closed { code, reason });
        log::info!("[WebSocket] Connection ended");
    }
}
