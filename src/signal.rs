//! Shutdown signalling
//!
//! The main thread waits on one channel for whichever comes first: the
//! console session ending or the operator pressing Ctrl-C.

use std::io;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use crate::console::LoopExit;
use crate::error::Result;

/// Why the main thread should start cleaning up.
#[derive(Debug)]
pub enum Shutdown {
    /// The session thread finished, either after connecting and running the
    /// input loop or because the connection could not be established.
    SessionEnded(Result<LoopExit>),
    Interrupted,
}

/// Listen for Ctrl-C on a background thread and report it on `tx`.
pub fn spawn_interrupt_listener(tx: Sender<Shutdown>) -> io::Result<JoinHandle<()>> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    thread::Builder::new()
        .name("ctrl-c".to_string())
        .spawn(move || {
            match rt.block_on(tokio::signal::ctrl_c()) {
                Ok(()) => {
                    log::info!("Received interrupt");
                    let _ = tx.send(Shutdown::Interrupted);
                }
                Err(e) => log::error!("Unable to listen for interrupts: {}", e),
            }
        })
}
