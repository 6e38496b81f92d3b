/// Raw data of one received frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    Text(String),
    Binary(Vec<u8>),
}

/// Everything the network side reports about a session.
#[derive(Clone, Debug, PartialEq)]
pub enum ConnectionEvent {
    Opened,
    MessageReceived(Payload),
    ErrorOccurred(String),
    Closed { code: u16, reason: String },
}

/// Receives connection events on the worker thread.
///
/// Implementations must not block for long: the reader loop waits for each
/// call before it polls the next frame.
pub trait EventHandler: Send + Sync + 'static {
    fn handle(&self, event: ConnectionEvent);
}
