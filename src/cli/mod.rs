//! Command-line interface for the `muza` binary.
//!
//! Argument handling is deliberately small: one positional command plus
//! `--seed <u64>` and `--export <path>`. The scenarios themselves live in
//! [`scenarios`] and write to any `io::Write`, so the binary only wires up
//! stdout/stdin.

pub mod scenarios;

use std::path::PathBuf;

use crate::utilities::errors::MuzaError;

/// Available CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CliCommand {
    /// Two bits: analyze, mutate, resonate, merge, stats.
    #[default]
    Demo,
    /// Муза talks, meditates and meets a second agent.
    Agent,
    /// Boxed renderings of bits, resonance and an agent profile.
    Visualize,
    /// Guided walkthrough of bit, agent, resonance and merge.
    Simple,
    /// Interactive conversation on stdin.
    Chat,
    /// Pulse animation of a single bit.
    Pulse,
    /// Show version information.
    Version,
}

impl CliCommand {
    pub const ALL: [CliCommand; 7] = [
        Self::Demo,
        Self::Agent,
        Self::Visualize,
        Self::Simple,
        Self::Chat,
        Self::Pulse,
        Self::Version,
    ];
}

impl std::fmt::Display for CliCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Demo => write!(f, "demo"),
            Self::Agent => write!(f, "agent"),
            Self::Visualize => write!(f, "visualize"),
            Self::Simple => write!(f, "simple"),
            Self::Chat => write!(f, "chat"),
            Self::Pulse => write!(f, "pulse"),
            Self::Version => write!(f, "version"),
        }
    }
}

/// Parse a CLI command from a string.
pub fn parse_command(cmd: &str) -> Option<CliCommand> {
    match cmd {
        "demo" => Some(CliCommand::Demo),
        "agent" => Some(CliCommand::Agent),
        "visualize" | "viz" => Some(CliCommand::Visualize),
        "simple" => Some(CliCommand::Simple),
        "chat" => Some(CliCommand::Chat),
        "pulse" => Some(CliCommand::Pulse),
        "version" | "--version" | "-v" => Some(CliCommand::Version),
        _ => None,
    }
}

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CliOptions {
    pub command: CliCommand,
    /// Seed for a reproducible run; entropy when absent.
    pub seed: Option<u64>,
    /// Where `demo` writes the first bit's history as JSON.
    pub export: Option<PathBuf>,
}

fn cli_error(key: &str, message: impl Into<String>) -> MuzaError {
    MuzaError::Config {
        key: key.to_string(),
        message: message.into(),
    }
}

/// Parse arguments (without the program name).
pub fn parse_args<I, S>(args: I) -> Result<CliOptions, MuzaError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions::default();
    let mut command = None;
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        let arg = arg.as_ref();
        match arg {
            "--seed" => {
                let value = args
                    .next()
                    .ok_or_else(|| cli_error("--seed", "missing value"))?;
                let value = value.as_ref();
                options.seed = Some(
                    value
                        .parse()
                        .map_err(|e| cli_error("--seed", format!("{:?}: {}", value, e)))?,
                );
            }
            "--export" => {
                let value = args
                    .next()
                    .ok_or_else(|| cli_error("--export", "missing value"))?;
                options.export = Some(PathBuf::from(value.as_ref()));
            }
            other if command.is_none() => {
                command = Some(
                    parse_command(other)
                        .ok_or_else(|| cli_error("command", format!("unknown command {:?}", other)))?,
                );
            }
            other => return Err(cli_error("command", format!("unexpected argument {:?}", other))),
        }
    }

    options.command = command.unwrap_or_default();
    Ok(options)
}

/// One-line usage summary.
pub fn usage() -> String {
    let commands: Vec<String> = CliCommand::ALL.iter().map(|c| c.to_string()).collect();
    format!(
        "usage: muza [{}] [--seed <u64>] [--export <path>]",
        commands.join("|")
    )
}
