/// One line of operator input, classified.
#[derive(Debug, PartialEq, Eq)]
pub enum Command<'a> {
    Quit,
    Ping,
    Empty,
    /// Anything else, sent verbatim.
    Message(&'a str),
}

impl<'a> Command<'a> {
    /// Classify a line that has already had its line terminator removed.
    ///
    /// Keywords match case-insensitively but only when they are the whole
    /// line; surrounding whitespace makes the line a message.
    pub fn parse(line: &'a str) -> Self {
        match line.to_lowercase().as_str() {
            "quit" | "exit" => Command::Quit,
            "ping" => Command::Ping,
            "" => Command::Empty,
            _ => Command::Message(line),
        }
    }
}

/// Remove one trailing `\n` or `\r\n`.
pub fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
