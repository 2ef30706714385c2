//! Command dispatch for the demo application

use std::io;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::app::CliApp;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::domain::{Severity, Signal, Verbosity};

/// Apply the global flags that adjust the app after construction.
pub fn apply_global_flags(app: &mut CliApp<Cli>) -> CliResult<()> {
    let (verbose, quiet, log_file) = {
        let cli = app.args();
        (cli.verbose, cli.quiet, cli.log_file.clone())
    };

    let verbosity = if quiet {
        Verbosity::Silent
    } else {
        app.verbosity().raised(verbose)
    };
    app.set_verbosity(verbosity);

    if let Some(path) = log_file {
        app.set_log_file(path)?;
    }
    Ok(())
}

pub fn execute_command(app: &mut CliApp<Cli>) -> CliResult<()> {
    let Some(command) = app.args().command.clone() else {
        let mut cmd = Cli::command();
        app.print(&cmd.render_help().to_string());
        return Ok(());
    };

    match command {
        Commands::Say {
            verbose_only,
            words,
        } => say(app, &words.join(" "), verbose_only),
        Commands::Log { words } => log(app, &words.join(" ")),
        Commands::Ask { prompt } => ask(app, prompt.as_deref()),
        Commands::Raise { severity, words } => raise(app, &severity, &words.join(" ")),
        Commands::Info => info(app),
        Commands::Config { command } => config(app, command),
        Commands::Crash => crash(),
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}

#[instrument(level = "debug", skip(app))]
fn say(app: &CliApp<Cli>, message: &str, verbose_only: bool) -> CliResult<()> {
    let level = if verbose_only {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    };
    app.print_message(message, level);
    Ok(())
}

#[instrument(level = "debug", skip(app))]
fn log(app: &CliApp<Cli>, message: &str) -> CliResult<()> {
    match app.try_log_message(message) {
        Ok(()) => {
            if let Some(path) = app.log_path() {
                app.notice(format!("logged to {}", path.display()));
            }
        }
        Err(e) => {
            app.warn(format!("could not write log: {}", e));
        }
    }
    Ok(())
}

#[instrument(level = "debug", skip(app))]
fn ask(app: &mut CliApp<Cli>, prompt: Option<&str>) -> CliResult<()> {
    match app.read_line(prompt)? {
        Some(answer) => app.print(&answer),
        None => {
            app.notice("no input");
        }
    }
    Ok(())
}

#[instrument(level = "debug", skip(app))]
fn raise(app: &CliApp<Cli>, severity: &str, message: &str) -> CliResult<()> {
    if message.trim().is_empty() {
        return Err(CliError::InvalidArgs("message must not be empty".to_string()));
    }
    let signal = Signal::new(Severity::parse(severity), message);
    let disposition = app.report(signal);
    debug!("signal disposition: {:?}", disposition);
    Ok(())
}

fn crash() -> CliResult<()> {
    debug!("crash requested");
    panic!("crash requested");
}

fn info(app: &CliApp<Cli>) -> CliResult<()> {
    let runtime = app.runtime();
    let log_path = app
        .log_path()
        .map(|p| p.display().to_string())
        .or_else(|| app.settings().log_file.as_ref().map(|p| p.display().to_string()))
        .unwrap_or_else(|| "(next to binary)".to_string());

    app.print(&format!("binary:    {}", runtime.binary_path.display()));
    app.print(&format!("cwd:       {}", runtime.working_directory.display()));
    app.print(&format!("timezone:  {}", runtime.timezone));
    app.print(&format!("verbosity: {}", app.verbosity()));
    app.print(&format!("log file:  {}", log_path));
    app.print(&format!("started:   {}", runtime.started_at.to_rfc3339()));
    app.print(&format!("editor:    {}", if app.has_line_editor() { "enhanced" } else { "raw" }));
    for change in &runtime.limits {
        app.print_message(
            &format!("limit:     {} {:?}", change.resource, change.outcome),
            Verbosity::Verbose,
        );
    }
    Ok(())
}

fn config(app: &CliApp<Cli>, command: ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => app.print(app.settings().to_toml()?.trim_end()),
        ConfigCommands::Template => app.print(Settings::template().trim_end()),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => app.print(&path.display().to_string()),
            None => {
                app.warn("no config directory available on this system");
            }
        },
    }
    Ok(())
}
