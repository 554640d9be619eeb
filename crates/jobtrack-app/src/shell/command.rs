//! Parser for shell input lines.

use thiserror::Error;

use jobtrack::client::{DraftField, StatusFilter};
use jobtrack::models::UnknownStatus;
use jobtrack::JobStatus;

/// One user command. Each maps to a single tracker action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Edit(DraftField, String),
    Add,
    Filter(StatusFilter),
    SetStatus { row: usize, status: JobStatus },
    Delete { row: usize },
    Refresh,
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command '{0}' (type 'help')")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("'{0}' is not a row number")]
    InvalidRow(String),

    #[error("No row {0} in the list")]
    NoSuchRow(usize),

    #[error(transparent)]
    InvalidStatus(#[from] UnknownStatus),
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(CommandError::Empty);
        }

        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        match name.to_ascii_lowercase().as_str() {
            "company" => Ok(Command::Edit(DraftField::Company, rest.to_string())),
            "role" => Ok(Command::Edit(DraftField::Role, rest.to_string())),
            "notes" => Ok(Command::Edit(DraftField::Notes, rest.to_string())),
            "status" => {
                if rest.is_empty() {
                    return Err(CommandError::Usage("status <Applied|Interview|Offer|Rejected>"));
                }
                Ok(Command::Edit(DraftField::Status, rest.to_string()))
            }
            "add" => Ok(Command::Add),
            "filter" => {
                if rest.is_empty() {
                    return Err(CommandError::Usage("filter <All|Applied|Interview|Offer|Rejected>"));
                }
                Ok(Command::Filter(rest.parse()?))
            }
            "set" => {
                let mut args = rest.split_whitespace();
                match (args.next(), args.next(), args.next()) {
                    (Some(row), Some(status), None) => Ok(Command::SetStatus {
                        row: parse_row(row)?,
                        status: status.parse()?,
                    }),
                    _ => Err(CommandError::Usage("set <row> <Status>")),
                }
            }
            "delete" | "rm" => {
                if rest.is_empty() || rest.contains(char::is_whitespace) {
                    return Err(CommandError::Usage("delete <row>"));
                }
                Ok(Command::Delete {
                    row: parse_row(rest)?,
                })
            }
            "refresh" => Ok(Command::Refresh),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            _ => Err(CommandError::Unknown(name.to_string())),
        }
    }
}

fn parse_row(s: &str) -> Result<usize, CommandError> {
    match s.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CommandError::InvalidRow(s.to_string())),
    }
}
