//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Demo application built on clibase: wrapped output, logging, prompts and error signals
#[derive(Parser, Debug)]
#[command(name = "clibase")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Show more messages (-v: verbose)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Show no messages
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Diagnostic output on stderr (-d, -dd, -ddd)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Log file (overrides config)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print a message, wrapped at 78 columns
    Say {
        /// Only print when running verbose
        #[arg(long)]
        verbose_only: bool,
        /// Message words
        #[arg(required = true)]
        words: Vec<String>,
    },

    /// Append a message to the log file
    Log {
        /// Message words
        #[arg(required = true)]
        words: Vec<String>,
    },

    /// Read a line of input and echo it
    Ask {
        /// Prompt shown before reading
        prompt: Option<String>,
    },

    /// Report a signal with the given severity
    Raise {
        /// fatal, user-error, warning, notice, or any other label
        severity: String,
        /// Message words
        #[arg(required = true)]
        words: Vec<String>,
    },

    /// Show runtime information
    Info,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Panic on purpose to show the crash report
    #[command(hide = true)]
    Crash,

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Print config template
    Template,

    /// Show config path
    Path,
}
