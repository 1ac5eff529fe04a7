//! Console command parsing.

use arena_core::Intent;
use arena_protocol::TournamentId;
use thiserror::Error;

/// A parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A tournament command sent to the server.
    Intent(Intent),
    /// Open the detail view of a tournament.
    Open(TournamentId),
    /// Close the detail view.
    Close,
    Connect,
    Disconnect,
    Help,
    Quit,
}

/// Parse errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid tournament id: {0}")]
    InvalidId(String),
}

/// Help text printed by `help`.
pub const HELP: &str = "\
commands:
  list                 refresh the tournament list
  create <name>        create a tournament
  open <id>            show a tournament
  close                hide the tournament
  join <id>            subscribe to a tournament
  leave <id>           unsubscribe from a tournament
  start <id>           start a tournament you created
  delete <id>          delete a tournament you created
  connect | disconnect
  quit";

/// Parse one line of input. Blank lines parse to `None`.
///
/// # Errors
///
/// Returns an error for unknown commands and missing or invalid arguments.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "list" | "ls" => Command::Intent(Intent::ListTournaments),
        "create" => {
            if rest.is_empty() {
                return Err(CommandError::Usage("create <name>"));
            }
            Command::Intent(Intent::CreateTournament(rest.to_string()))
        }
        "open" => Command::Open(id(rest, "open <id>")?),
        "close" => Command::Close,
        "join" => Command::Intent(Intent::Subscribe(id(rest, "join <id>")?)),
        "leave" => Command::Intent(Intent::Unsubscribe(id(rest, "leave <id>")?)),
        "start" => Command::Intent(Intent::Start(id(rest, "start <id>")?)),
        "delete" => Command::Intent(Intent::Delete(id(rest, "delete <id>")?)),
        "connect" => Command::Connect,
        "disconnect" => Command::Disconnect,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };

    Ok(Some(command))
}

fn id(arg: &str, usage: &'static str) -> Result<TournamentId, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::Usage(usage));
    }
    arg.trim_start_matches('#')
        .parse()
        .map_err(|_| CommandError::InvalidId(arg.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_intents() {
        assert_eq!(
            parse("list").unwrap(),
            Some(Command::Intent(Intent::ListTournaments))
        );
        assert_eq!(
            parse("join 3").unwrap(),
            Some(Command::Intent(Intent::Subscribe(3)))
        );
        assert_eq!(
            parse("  LEAVE #3 ").unwrap(),
            Some(Command::Intent(Intent::Unsubscribe(3)))
        );
        assert_eq!(
            parse("start 7").unwrap(),
            Some(Command::Intent(Intent::Start(7)))
        );
        assert_eq!(
            parse("delete 7").unwrap(),
            Some(Command::Intent(Intent::Delete(7)))
        );
    }

    #[test]
    fn test_create_keeps_whole_name() {
        assert_eq!(
            parse("create Friday  Night Cup").unwrap(),
            Some(Command::Intent(Intent::CreateTournament(
                "Friday  Night Cup".into()
            )))
        );
        assert_eq!(parse("create"), Err(CommandError::Usage("create <name>")));
    }

    #[test]
    fn test_session_commands() {
        assert_eq!(parse("open 2").unwrap(), Some(Command::Open(2)));
        assert_eq!(parse("close").unwrap(), Some(Command::Close));
        assert_eq!(parse("connect").unwrap(), Some(Command::Connect));
        assert_eq!(parse("disconnect").unwrap(), Some(Command::Disconnect));
        assert_eq!(parse("quit").unwrap(), Some(Command::Quit));
        assert_eq!(parse("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse("dance"), Err(CommandError::Unknown("dance".into())));
        assert_eq!(parse("open"), Err(CommandError::Usage("open <id>")));
        assert_eq!(parse("join x"), Err(CommandError::InvalidId("x".into())));
    }
}
