//! Session lifecycle
//!
//! Connects and runs the input loop on a console thread while the calling
//! thread waits for that to finish or for an interrupt. The connection is
//! shut down once before returning, whichever came first.

use std::io::BufRead;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use crate::connection::ConnectionManager;
use crate::console::{LoopExit, Output, run_input_loop};
use crate::error::{ClientError, Result};
use crate::signal::Shutdown;

/// How a session that did not fail came to an end.
#[derive(Debug, PartialEq, Eq)]
pub enum SessionEnd {
    Console(LoopExit),
    Interrupted,
}

/// Run one session and wait for its end on `shutdown_rx`.
///
/// `shutdown_tx` is handed to the console thread; any other sender of the
/// same channel (such as the interrupt listener) can end the session early.
pub fn run_session<R>(
    manager: Arc<ConnectionManager>,
    input: R,
    output: &Output,
    shutdown_tx: Sender<Shutdown>,
    shutdown_rx: Receiver<Shutdown>,
) -> Result<SessionEnd>
where
    R: BufRead + Send + 'static,
{
    let console = {
        let manager = manager.clone();
        let output = output.clone();
        thread::Builder::new()
            .name("console".to_string())
            .spawn(move || {
                let result = manager
                    .connect()
                    .map(|()| run_input_loop(input, &*manager, &output));
                let _ = shutdown_tx.send(Shutdown::SessionEnded(result));
            })?
    };

    let result = match shutdown_rx.recv() {
        Ok(Shutdown::Interrupted) => {
            output.line("");
            output.line("Interrupted, shutting down...");
            Ok(SessionEnd::Interrupted)
        }
        Ok(Shutdown::SessionEnded(Ok(exit))) => {
            log::info!("Console finished: {:?}", exit);
            if console.join().is_err() {
                log::error!("Console thread panicked");
            }
            Ok(SessionEnd::Console(exit))
        }
        Ok(Shutdown::SessionEnded(Err(e))) => Err(e),
        Err(_) => Err(ClientError::ChannelClosed),
    };

    // The console thread may still be blocked on input after an interrupt;
    // shutting down also stops it from opening a session late.
    manager.shutdown();
    result
}
