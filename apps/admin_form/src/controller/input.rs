//! Line commands typed at the terminal.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    SetSource(String),
    SelectDependent(String),
    Submit,
    Show,
    Help,
    Quit,
    Unknown(String),
}

pub const HELP: &str = "commands: division [<id>] | admin [<id>] | submit | show | help | quit";

pub fn parse_action(line: &str) -> FormAction {
    let line = line.trim();
    let (command, arg) = match line.split_once(char::is_whitespace) {
        Some((command, arg)) => (command, arg.trim()),
        None => (line, ""),
    };

    match command.to_ascii_lowercase().as_str() {
        "division" | "d" => FormAction::SetSource(arg.to_string()),
        "admin" | "a" => FormAction::SelectDependent(arg.to_string()),
        "submit" | "s" => FormAction::Submit,
        "show" | "" => FormAction::Show,
        "help" | "?" => FormAction::Help,
        "quit" | "exit" | "q" => FormAction::Quit,
        _ => FormAction::Unknown(line.to_string()),
    }
}
