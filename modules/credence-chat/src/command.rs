/// In-chat controls. Anything that is not a command is a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(bool),
    Force(bool),
    History,
    Clear,
    Help,
    Quit,
    Unknown(String),
}

pub const HELP: &str = "\
Commands:
  /search on|off   enable or disable web search
  /force on|off    search on every message, or only when the question needs it
  /history         show the conversation so far
  /clear           forget the conversation
  /help            show this help
  /quit            leave (also: quit, exit)";

impl Command {
    pub fn parse(line: &str) -> Option<Command> {
        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            return Some(Command::Quit);
        }
        let rest = line.strip_prefix('/')?;

        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or("").to_ascii_lowercase();
        let arg = parts.next().map(|a| a.to_ascii_lowercase());

        let cmd = match (name.as_str(), arg.as_deref()) {
            ("search", Some(v)) => match parse_switch(v) {
                Some(on) => Command::Search(on),
                None => Command::Unknown(line.to_string()),
            },
            ("force", Some(v)) => match parse_switch(v) {
                Some(on) => Command::Force(on),
                None => Command::Unknown(line.to_string()),
            },
            ("history", None) => Command::History,
            ("clear", None) => Command::Clear,
            ("help", None) => Command::Help,
            ("quit" | "exit", None) => Command::Quit,
            _ => Command::Unknown(line.to_string()),
        };
        Some(cmd)
    }
}

fn parse_switch(v: &str) -> Option<bool> {
    match v {
        "on" | "true" | "yes" => Some(true),
        "off" | "false" | "no" => Some(false),
        _ => None,
    }
}
