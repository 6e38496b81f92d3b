use std::io::BufRead;

use crate::connection::ConnectionManager;
use crate::console::{Command, Output, strip_line_ending};
use crate::error::{ClientError, Result};

/// The operations the input loop needs from a connection.
pub trait Transport {
    /// Send operator text, returning the payload that went out.
    fn send(&self, text: &str) -> Result<String>;
    fn send_ping(&self) -> Result<String>;
    fn close(&self) -> bool;
}

impl Transport for ConnectionManager {
    fn send(&self, text: &str) -> Result<String> {
        ConnectionManager::send(self, text)
    }

    fn send_ping(&self) -> Result<String> {
        ConnectionManager::send_ping(self)
    }

    fn close(&self) -> bool {
        ConnectionManager::close(self)
    }
}

/// Why the input loop stopped.
#[derive(Debug, PartialEq, Eq)]
pub enum LoopExit {
    Quit,
    EndOfInput,
    InputError,
}

/// Read commands from `input` until quit, end of input or a read error.
///
/// The transport is closed exactly once before returning, whichever way the
/// loop ends.
pub fn run_input_loop<R, T>(mut input: R, transport: &T, output: &Output) -> LoopExit
where
    R: BufRead,
    T: Transport + ?Sized,
{
    output.line("");
    output.line("Type a message and press enter ('quit' or 'exit' to leave, 'ping' to ping):");

    let mut buf = String::new();
    let exit = loop {
        output.prompt();
        buf.clear();
        match input.read_line(&mut buf) {
            Ok(0) => {
                log::info!("End of input");
                output.line("");
                break LoopExit::EndOfInput;
            }
            Ok(_) => {}
            Err(e) => {
                log::error!("Failed to read input: {}", e);
                output.line(format!("Error: {}", ClientError::Io(e)));
                break LoopExit::InputError;
            }
        }

        match Command::parse(strip_line_ending(&buf)) {
            Command::Quit => {
                output.line("Exiting...");
                break LoopExit::Quit;
            }
            Command::Ping => report(output, transport.send_ping()),
            Command::Empty => {}
            Command::Message(text) => report(output, transport.send(text)),
        }
    };

    transport.close();
    exit
}

fn report(output: &Output, sent: Result<String>) {
    match sent {
        Ok(payload) => output.line(format!("Sent message: {}", payload)),
        Err(ClientError::NotConnected) => output.line("WebSocket is not connected"),
        Err(e) => {
            log::error!("Send failed: {}", e);
            output.line(format!("Error: {}", e));
        }
    }
}
