//! Command parsing and execution.
//!
//! This module provides:
//! - `CommandKind` and the static `COMMAND_TABLE` mapping names to kinds
//! - `Command` enum for parsed terminal commands with their operands
//! - `execute` dispatching one handler per command against a [`Gateway`]
//! - `CommandResult` carrying output lines and at most one [`Effect`]
//!
//! # Architecture
//!
//! A line is split into a name and a remainder. The name is looked up
//! case-sensitively in `COMMAND_TABLE`; the matching kind parses the
//! remainder with its own grammar. Missing or malformed operands become
//! `Command::Usage`, unknown names `Command::Unknown`, so parsing never fails.

mod execute;
mod result;

pub use execute::execute;
pub(crate) use execute::FETCH_FAILED;
pub use result::{CommandResult, DirChange, Effect, Navigation};

use crate::format::ListOptions;
use crate::gateway::Gateway;
use crate::index::DirectoryIndex;
use crate::models::ProcessId;
use crate::parser::{
    self, AwkArgs, GrepArgs, SedArgs, parse_awk, parse_grep, parse_sed, split_args,
};
use crate::path::PathState;

// =============================================================================
// Command Table
// =============================================================================

/// Every command the interpreter knows, independent of its operands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandKind {
    Ls,
    Mkdir,
    Touch,
    Cat,
    More,
    Head,
    Tail,
    Rm,
    Mv,
    Cp,
    Pwd,
    Cd,
    Exec,
    Ps,
    Kill,
    Pkill,
    Chmod,
    Whoami,
    Echo,
    Date,
    TimeZone,
    SetDate,
    Cal,
    Quota,
    MemView,
    Edit,
    Clear,
    Help,
    Grep,
    Sed,
    Awk,
}

/// Command names and the kind each one selects. Names are case-sensitive.
pub static COMMAND_TABLE: &[(&str, CommandKind)] = &[
    ("ls", CommandKind::Ls),
    ("mkdir", CommandKind::Mkdir),
    ("touch", CommandKind::Touch),
    ("cat", CommandKind::Cat),
    ("more", CommandKind::More),
    ("head", CommandKind::Head),
    ("tail", CommandKind::Tail),
    ("rm", CommandKind::Rm),
    ("mv", CommandKind::Mv),
    ("cp", CommandKind::Cp),
    ("pwd", CommandKind::Pwd),
    ("cd", CommandKind::Cd),
    ("exec", CommandKind::Exec),
    ("ps", CommandKind::Ps),
    ("kill", CommandKind::Kill),
    ("pkill", CommandKind::Pkill),
    ("chmod", CommandKind::Chmod),
    ("whoami", CommandKind::Whoami),
    ("echo", CommandKind::Echo),
    ("date", CommandKind::Date),
    ("time", CommandKind::Date),
    ("Get-Date", CommandKind::Date),
    ("Get-TimeZone", CommandKind::TimeZone),
    ("Set-Date", CommandKind::SetDate),
    ("cal", CommandKind::Cal),
    ("df", CommandKind::Quota),
    ("quota", CommandKind::Quota),
    ("mem_view", CommandKind::MemView),
    ("edit", CommandKind::Edit),
    ("clear", CommandKind::Clear),
    ("help", CommandKind::Help),
    ("grep", CommandKind::Grep),
    ("sed", CommandKind::Sed),
    ("awk", CommandKind::Awk),
];

impl CommandKind {
    /// Find the kind registered under `name`.
    pub fn lookup(name: &str) -> Option<Self> {
        COMMAND_TABLE
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, kind)| *kind)
    }

    /// All registered command names, in table order.
    pub fn names() -> impl Iterator<Item = &'static str> {
        COMMAND_TABLE.iter().map(|(name, _)| *name)
    }

    /// Parse the operands of this command.
    ///
    /// `name` is the name as typed, used in usage lines shared by several
    /// commands (`mkdir`/`touch`, `more`/`head`/`tail`, `mv`/`cp`).
    pub fn parse(self, name: &str, remainder: &str) -> Command {
        let args = split_args(remainder);
        let first = args.first().cloned();

        match self {
            Self::Ls => Command::Ls(ListOptions {
                long: args.iter().any(|a| a == "-al"),
                by_time: args.iter().any(|a| a == "-lt"),
            }),
            Self::Mkdir | Self::Touch => match first {
                Some(name) => Command::Create {
                    name,
                    directory: self == Self::Mkdir,
                },
                None => Command::Usage(format!("Usage: {} <name>", name)),
            },
            Self::Cat => match first.as_deref() {
                Some(op @ (">" | ">>")) => match args.get(1) {
                    Some(file) => Command::Capture {
                        file: file.clone(),
                        append: op == ">>",
                    },
                    None => Command::Usage(format!("Usage: cat {} <filename>", op)),
                },
                Some(file) => Command::Cat(file.to_string()),
                None => Command::Usage("Usage: cat <filename>".to_string()),
            },
            Self::More | Self::Head | Self::Tail => {
                let pager = match self {
                    Self::Head => Pager::Head,
                    Self::Tail => Pager::Tail,
                    _ => Pager::More,
                };
                match first {
                    Some(file) => Command::Page { pager, file },
                    None => Command::Usage(format!("Usage: {} <file_name>", name)),
                }
            }
            Self::Rm => first.map(Command::Rm).unwrap_or_else(|| usage("Usage: rm <name>")),
            Self::Mv | Self::Cp => match args.as_slice() {
                [from, to, ..] => {
                    let (from, to) = (from.clone(), to.clone());
                    if self == Self::Mv {
                        Command::Mv { from, to }
                    } else {
                        Command::Cp { from, to }
                    }
                }
                _ => Command::Usage(format!("Usage: {} <source> <destination>", name)),
            },
            Self::Pwd => Command::Pwd,
            Self::Cd => Command::Cd(match first.as_deref() {
                None | Some("~") => CdTarget::Root,
                Some("..") => CdTarget::Up,
                Some(dir) => CdTarget::Named(dir.to_string()),
            }),
            Self::Exec => first
                .map(Command::Exec)
                .unwrap_or_else(|| usage("Usage: exec <filename>")),
            Self::Ps => Command::Ps,
            Self::Kill => first
                .and_then(|pid| pid.parse::<ProcessId>().ok())
                .map(Command::Kill)
                .unwrap_or_else(|| usage("Usage: kill <PID>")),
            Self::Pkill => first
                .map(Command::Pkill)
                .unwrap_or_else(|| usage("Usage: pkill <name>")),
            Self::Chmod => match args.as_slice() {
                [mode, file, ..] => Command::Chmod {
                    permissions: parser::permission_string(mode),
                    file: file.clone(),
                },
                _ => usage("Usage: chmod <permissions> <filename>"),
            },
            Self::Whoami => Command::Whoami,
            Self::Echo => {
                if remainder.contains('>') {
                    usage("echo redirection not supported; use cat > or cat >>")
                } else {
                    Command::Echo(parser::strip_quotes(remainder).to_string())
                }
            }
            Self::Date => Command::Date,
            Self::TimeZone => Command::TimeZone,
            Self::SetDate => Command::SetDate,
            Self::Cal => Command::Cal,
            Self::Quota => Command::Quota,
            Self::MemView => Command::MemView,
            Self::Edit => first
                .map(Command::Edit)
                .unwrap_or_else(|| usage("Usage: edit <filename>")),
            Self::Clear => Command::Clear,
            Self::Help => Command::Help,
            Self::Grep => parse_grep(remainder)
                .map(Command::Grep)
                .unwrap_or_else(|| usage(r#"Usage: grep [-ivnc] "pattern" <filename>"#)),
            Self::Sed => parse_sed(remainder).map(Command::Sed).unwrap_or_else(|| {
                usage(r#"Usage: sed "s/old/new/[g|i|gi]" <filename> or sed "/pattern/d" <filename>"#)
            }),
            Self::Awk => parse_awk(remainder).map(Command::Awk).unwrap_or_else(|| {
                usage(
                    "Usage: awk '{print $N}' <filename> or awk '{print $0}' <filename> \
                     or awk '/pattern/ {print $N}' <filename>",
                )
            }),
        }
    }
}

fn usage(text: &str) -> Command {
    Command::Usage(text.to_string())
}

// =============================================================================
// Command Enum
// =============================================================================

/// Which part of a file `more`, `head` or `tail` prints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pager {
    More,
    Head,
    Tail,
}

impl Pager {
    pub fn name(self) -> &'static str {
        match self {
            Self::More => "more",
            Self::Head => "head",
            Self::Tail => "tail",
        }
    }
}

/// Destination of `cd`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CdTarget {
    /// No operand or `~`
    Root,
    /// `..`
    Up,
    /// A directory in the current listing
    Named(String),
}

/// Parsed terminal command
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Ls(ListOptions),
    /// `mkdir` (directory = true) or `touch`
    Create {
        name: String,
        directory: bool,
    },
    Cat(String),
    /// `cat > file` or `cat >> file`
    Capture {
        file: String,
        append: bool,
    },
    Page {
        pager: Pager,
        file: String,
    },
    Rm(String),
    Mv {
        from: String,
        to: String,
    },
    Cp {
        from: String,
        to: String,
    },
    Pwd,
    Cd(CdTarget),
    Exec(String),
    Ps,
    Kill(ProcessId),
    Pkill(String),
    /// `permissions` is already in symbolic form when given as octal
    Chmod {
        permissions: String,
        file: String,
    },
    Whoami,
    Echo(String),
    Date,
    TimeZone,
    SetDate,
    Cal,
    Quota,
    MemView,
    Edit(String),
    Clear,
    Help,
    Grep(GrepArgs),
    Sed(SedArgs),
    Awk(AwkArgs),
    /// Malformed operands; holds the line to print
    Usage(String),
    Unknown(String),
}

impl Command {
    /// Parse a raw input line. Returns `None` for a blank line.
    pub fn parse(line: &str) -> Option<Self> {
        let (name, remainder) = parser::split_command(line)?;
        Some(match CommandKind::lookup(name) {
            Some(kind) => kind.parse(name, remainder),
            None => Self::Unknown(name.to_string()),
        })
    }
}

// =============================================================================
// Execution Context
// =============================================================================

/// Asks the user to approve a destructive operation.
pub trait Confirm {
    fn confirm(&self, message: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

/// Session state a handler may read, plus the directory index it refreshes
/// after mutations.
pub struct Context<'a, G: Gateway + ?Sized> {
    pub gateway: &'a G,
    pub path: &'a PathState,
    pub index: &'a mut DirectoryIndex,
    pub confirm: &'a dyn Confirm,
    /// Signed-in user name, if any
    pub user: Option<&'a str>,
}

// =============================================================================
// Tests
// =============================================================================
