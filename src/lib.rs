//! # ws-console
//!
//! An interactive WebSocket test client. It opens one connection, prints
//! every inbound message and sends each typed line wrapped in a fixed JSON
//! envelope.
//!
//! ## Example
//!
//! ```no_run
//! use std::io;
//! use ws_console::{Config, ConnectionManager, ConsolePrinter, Output, run_input_loop};
//!
//! let config = Config::new(url::Url::parse("ws://localhost:9224").unwrap());
//! let output = Output::stdout();
//! let manager = ConnectionManager::new(config, ConsolePrinter::new(output.clone()));
//!
//! manager.connect()?;
//! run_input_loop(io::stdin().lock(), &manager, &output);
//! # Ok::<(), ws_console::ClientError>(())
//! ```

pub mod config;
pub mod connection;
pub mod console;
pub mod decode;
pub mod envelope;
pub mod error;
pub mod session;
pub mod signal;

pub use config::Config;
pub use connection::{ConnectionEvent, ConnectionManager, EventHandler, Payload, ReadyState};
pub use console::{ConsolePrinter, LoopExit, Output, Transport, run_input_loop};
pub use envelope::EnvelopeKind;
pub use error::ClientError;
pub use session::{SessionEnd, run_session};
