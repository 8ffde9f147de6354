//! Parsing of input lines typed by the user.

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// `/join <room>`
    Join(String),
    /// `/leave [room]`; `None` means the current room
    Leave(Option<String>),
    /// `/quit`
    Quit,
    /// Any text not starting with `/`
    Chat(String),
    /// Malformed or unknown slash command, with a usage hint
    Usage(&'static str),
}

const JOIN_USAGE: &str = "usage: /join <room>";
const HELP: &str = "commands: /join <room>, /leave [room], /quit";

/// Parse one trimmed input line.
///
/// A leading `//` escapes the slash so that text starting with `/` can still be
/// sent as chat.
pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if let Some(escaped) = line.strip_prefix("//") {
        return Input::Chat(format!("/{}", escaped));
    }
    let Some(command) = line.strip_prefix('/') else {
        return Input::Chat(line.to_string());
    };

    let (name, argument) = match command.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (command, ""),
    };

    match name {
        "join" if argument.is_empty() => Input::Usage(JOIN_USAGE),
        "join" => Input::Join(argument.to_string()),
        "leave" if argument.is_empty() => Input::Leave(None),
        "leave" => Input::Leave(Some(argument.to_string())),
        "quit" | "exit" => Input::Quit,
        _ => Input::Usage(HELP),
    }
}
