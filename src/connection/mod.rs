//! WebSocket connection
//!
//! One session per [`ConnectionManager`], driven by tokio-tungstenite on a
//! worker thread. Network activity is reported as [`ConnectionEvent`]s to a
//! single [`EventHandler`], which keeps the console decoupled from transport
//! internals.

mod event;
mod manager;
mod state;
#[cfg(test)]
pub(crate) mod testing;

pub use event::{ConnectionEvent, EventHandler, Payload};
pub use manager::ConnectionManager;
pub use state::ReadyState;
pub(crate) use state::SharedState;
