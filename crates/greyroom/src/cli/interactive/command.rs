//! Prompt line parsing.
//!
//! A line is split on whitespace, with double quotes grouping a token and
//! being removed (`@"my photos"` becomes `@my photos`). Only the command word
//! is case-insensitive; paths and targets are passed through as typed.

use std::path::PathBuf;
use thiserror::Error;

/// One parsed prompt command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Exit,
    Help,
    /// `-i @"path"`; `None` means the configured input directory
    Ingest { path: Option<PathBuf> },
    /// `@i`, `list`
    List { json: bool },
    /// `@i grayscale [N[%]] [target]`
    Grayscale {
        intensity: Intensity,
        target: Option<String>,
    },
    /// `-p [target]`
    Preview { target: Option<String> },
    /// `-o @"path" [--keep] [target]`; `None` means the configured output directory
    Export {
        dest: Option<PathBuf>,
        keep: bool,
        target: Option<String>,
    },
    Ram,
}

/// The intensity slot of a grayscale command.
#[derive(Debug, Clone, PartialEq)]
pub enum Intensity {
    /// Not given
    Default,
    Value(f64),
    /// Given but not a number; the default applies
    Invalid(String),
}

impl Intensity {
    fn parse(token: &str) -> Self {
        let number = token.strip_suffix('%').unwrap_or(token);
        match number.parse::<f64>() {
            Ok(value) if value.is_finite() => Intensity::Value(value),
            _ => Intensity::Invalid(token.to_string()),
        }
    }

    /// The value to apply, falling back to `default`.
    pub fn resolve(&self, default: f64) -> f64 {
        match self {
            Intensity::Value(value) => *value,
            Intensity::Default | Intensity::Invalid(_) => default,
        }
    }
}

/// Why a line could not be turned into a [`Command`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unterminated quote")]
    UnterminatedQuote,

    #[error("Unknown command: {0}. Type `help` for the command list.")]
    UnknownCommand(String),

    #[error("Unknown filter: {0}. Available: grayscale")]
    UnknownFilter(String),

    /// A path argument without its `@` marker
    #[error("Use {flag} @\"path\"")]
    MissingAt { flag: &'static str },

    #[error("Unexpected argument: {0}")]
    UnexpectedArgument(String),
}

/// Split a line into tokens, honoring double quotes.
pub fn tokenize(line: &str) -> Result<Vec<String>, ParseError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    // A quoted empty string ("") still yields a token.
    let mut pending = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                pending = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if pending || !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                pending = false;
            }
            c => current.push(c),
        }
    }

    if in_quotes {
        return Err(ParseError::UnterminatedQuote);
    }
    if pending || !current.is_empty() {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Parse one prompt line. Blank lines yield `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let tokens = tokenize(line)?;
    let Some((head, rest)) = tokens.split_first() else {
        return Ok(None);
    };

    let command = match head.to_lowercase().as_str() {
        "exit" | "quit" => no_arguments(rest, Command::Exit)?,
        "help" | "?" => no_arguments(rest, Command::Help)?,
        "ram" => no_arguments(rest, Command::Ram)?,
        "-i" => parse_ingest(rest)?,
        "@i" if rest.is_empty() => Command::List { json: false },
        "@i" => parse_filter(rest)?,
        "list" | "ls" => parse_list(rest)?,
        "-p" | "preview" => Command::Preview {
            target: at_most_one(rest)?,
        },
        "-o" | "export" => parse_export(rest)?,
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };
    Ok(Some(command))
}

fn no_arguments(rest: &[String], command: Command) -> Result<Command, ParseError> {
    match rest.first() {
        Some(extra) => Err(ParseError::UnexpectedArgument(extra.clone())),
        None => Ok(command),
    }
}

fn at_most_one(rest: &[String]) -> Result<Option<String>, ParseError> {
    match rest {
        [] => Ok(None),
        [one] => Ok(Some(one.clone())),
        [_, extra, ..] => Err(ParseError::UnexpectedArgument(extra.clone())),
    }
}

/// `@path` → `Some(path)`, bare `@` → `None`.
fn path_argument(token: &str, flag: &'static str) -> Result<Option<PathBuf>, ParseError> {
    let path = token
        .strip_prefix('@')
        .ok_or(ParseError::MissingAt { flag })?;
    Ok((!path.is_empty()).then(|| PathBuf::from(path)))
}

fn parse_ingest(rest: &[String]) -> Result<Command, ParseError> {
    let path = match at_most_one(rest)? {
        Some(token) => path_argument(&token, "-i")?,
        None => None,
    };
    Ok(Command::Ingest { path })
}

fn parse_list(rest: &[String]) -> Result<Command, ParseError> {
    match at_most_one(rest)?.as_deref() {
        None => Ok(Command::List { json: false }),
        Some("--json") => Ok(Command::List { json: true }),
        Some(other) => Err(ParseError::UnexpectedArgument(other.to_string())),
    }
}

/// Arguments are positional: the slot after the filter name is always the
/// intensity, the one after it the target.
fn parse_filter(rest: &[String]) -> Result<Command, ParseError> {
    let (filter, args) = rest
        .split_first()
        .ok_or_else(|| ParseError::UnknownFilter(String::new()))?;

    if !matches!(filter.to_lowercase().as_str(), "grayscale" | "greyscale") {
        return Err(ParseError::UnknownFilter(filter.clone()));
    }

    let intensity = match args.first() {
        Some(token) => Intensity::parse(token),
        None => Intensity::Default,
    };
    let target = match args.get(1..) {
        Some(rest) => at_most_one(rest)?,
        None => None,
    };
    Ok(Command::Grayscale { intensity, target })
}

fn parse_export(rest: &[String]) -> Result<Command, ParseError> {
    let mut dest = None;
    let mut dest_seen = false;
    let mut keep = false;
    let mut target = None;

    for token in rest {
        if token == "--keep" {
            keep = true;
        } else if !dest_seen {
            dest = path_argument(token, "-o")?;
            dest_seen = true;
        } else if target.is_none() {
            target = Some(token.clone());
        } else {
            return Err(ParseError::UnexpectedArgument(token.clone()));
        }
    }

    Ok(Command::Export { dest, keep, target })
}
