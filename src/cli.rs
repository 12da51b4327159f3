//! Command-line interface for strictly_vault.

use clap::{Parser, Subcommand};

/// Strictly Vault - talk an LLM guardian out of its password
#[derive(Parser, Debug)]
#[command(name = "strictly_vault")]
#[command(about = "Password-guessing game against an LLM guardian", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play the password vault. Lines are sent to the guardian;
    /// `/guess <password>` submits a guess, `/restart` and `/quit` do what they say.
    Vault {
        /// Path to guardian configuration file (defaults are used if missing)
        #[arg(short, long, default_value = "guardian.toml")]
        config: std::path::PathBuf,

        /// Seed for reproducible secrets
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Chat with the assistant. `/clear` forgets the conversation, `/quit` exits.
    Chat {
        /// Path to guardian configuration file (defaults are used if missing)
        #[arg(short, long, default_value = "guardian.toml")]
        config: std::path::PathBuf,
    },
}

/// A line typed in vault mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultInput<'a> {
    /// `/quit`
    Quit,
    /// `/restart`
    Restart,
    /// `/guess <password>`; the password may be empty.
    Guess(&'a str),
    /// Anything else is said to the guardian.
    Message(&'a str),
}

impl<'a> VaultInput<'a> {
    /// Parses one input line. Commands must match exactly; `/guessfoo` is a message.
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim();
        let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        match command {
            "/quit" => Self::Quit,
            "/restart" => Self::Restart,
            "/guess" => Self::Guess(rest.trim()),
            _ => Self::Message(line),
        }
    }
}
