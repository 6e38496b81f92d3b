use crate::connection::{ConnectionEvent, EventHandler};
use crate::console::Output;
use crate::decode::parse_payload;

/// Prints connection events to the console.
pub struct ConsolePrinter {
    output: Output,
}

impl ConsolePrinter {
    pub fn new(output: Output) -> Self {
        Self { output }
    }
}

impl EventHandler for ConsolePrinter {
    fn handle(&self, event: ConnectionEvent) {
        self.output.line(render_event(&event));
    }
}

/// The console line for one event.
///
/// Payloads that are not JSON produce an error line instead of a message
/// dump; the session carries on either way.
pub fn render_event(event: &ConnectionEvent) -> String {
    match event {
        ConnectionEvent::Opened => "WebSocket connection established".to_string(),
        ConnectionEvent::MessageReceived(payload) => match parse_payload(payload) {
            Ok(value) => format!("Received message: {}", value),
            Err((raw, e)) => {
                log::debug!("Inbound frame is not JSON: {}", e);
                format!("Failed to parse message ({}): {}", e, raw)
            }
        },
        ConnectionEvent::ErrorOccurred(detail) => format!("WebSocket error: {}", detail),
        ConnectionEvent::Closed { code, reason } if reason.is_empty() => {
            format!("WebSocket connection closed ({})", code)
        }
        ConnectionEvent::Closed { code, reason } => {
            format!("WebSocket connection closed ({}: {})", code, reason)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::Payload;
    use crate::console::testing::SharedBuffer;

    #[test]
    fn test_render_message() {
        let event = ConnectionEvent::MessageReceived(Payload::Text(r#"{"b": [1, 2]}"#.to_string()));
        assert_eq!(render_event(&event), r#"Received message: {"b":[1,2]}"#);
    }

    #[test]
    fn test_render_binary_message() {
        let event = ConnectionEvent::MessageReceived(Payload::Binary(b"\"\xFFx\"".to_vec()));
        assert_eq!(render_event(&event), "Received message: \"\u{FFFD}x\"");
    }

    #[test]
    fn test_invalid_json_then_valid_json() {
        let (output, buffer) = SharedBuffer::output();
        let printer = ConsolePrinter::new(output);

        printer.handle(ConnectionEvent::Opened);
        printer.handle(ConnectionEvent::MessageReceived(Payload::Text("{oops".to_string())));
        let valid = Payload::Text(r#"{"ok":true}"#.to_string());
        printer.handle(ConnectionEvent::MessageReceived(valid));

        let lines = buffer.lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "WebSocket connection established");
        assert!(lines[1].starts_with("Failed to parse message ("));
        assert!(lines[1].ends_with("): {oops"));
        assert_eq!(lines[2], r#"Received message: {"ok":true}"#);
    }

    #[test]
    fn test_render_error_and_close() {
        assert_eq!(
            render_event(&ConnectionEvent::ErrorOccurred("boom".to_string())),
            "WebSocket error: boom"
        );
        assert_eq!(
            render_event(&ConnectionEvent::Closed {
                code: 1000,
                reason: String::new()
            }),
            "WebSocket connection closed (1000)"
        );
        assert_eq!(
            render_event(&ConnectionEvent::Closed {
                code: 1001,
                reason: "going away".to_string()
            }),
            "WebSocket connection closed (1001: going away)"
        );
    }
}
