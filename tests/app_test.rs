//! Tests for CliApp: construction, verbosity-gated output, signals and logging
//!
//! Every app runs on a `BufferTerminal` and a `RecordingTerminator`, so
//! output is captured and fatal paths return their exit status instead of
//! ending the test process.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use rstest::{fixture, rstest};
use tempfile::TempDir;

use clibase::application::FATAL_BANNER;
use clibase::config::Settings;
use clibase::infrastructure::traits::RealFileSystem;
use clibase::infrastructure::ServiceContainer;
use clibase::util::testing::{self, catch_termination, BufferTerminal, RecordingTerminator};
use clibase::{ApplicationError, CliApp, Disposition, FatalKind, Severity, Signal, Verbosity};

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

/// Minimal argument type standing in for a concrete application
#[derive(Parser, Debug)]
#[command(name = "testapp", version)]
struct TestArgs {
    /// Name to greet
    #[arg(long)]
    name: Option<String>,
}

struct Harness {
    terminal: Arc<BufferTerminal>,
    terminator: Arc<RecordingTerminator>,
    dir: TempDir,
}

impl Harness {
    fn log_path(&self) -> PathBuf {
        self.dir.path().join("app.log")
    }

    fn settings(&self) -> Settings {
        Settings {
            log_file: Some(self.log_path()),
            raise_limits: false,
            ..Settings::default()
        }
    }

    fn services(&self, settings: Settings) -> ServiceContainer {
        ServiceContainer::with_deps(
            settings,
            self.terminal.clone(),
            self.terminator.clone(),
            Arc::new(RealFileSystem),
        )
    }

    fn app(&self) -> CliApp<TestArgs> {
        CliApp::with_services(["testapp"], self.services(self.settings()))
    }
}

fn harness_on(terminal: BufferTerminal) -> Harness {
    Harness {
        terminal: Arc::new(terminal),
        terminator: Arc::new(RecordingTerminator::new()),
        dir: TempDir::new().unwrap(),
    }
}

#[fixture]
fn harness() -> Harness {
    harness_on(BufferTerminal::new())
}

fn input_harness(input: &str) -> Harness {
    harness_on(BufferTerminal::with_input(input))
}

// ============================================================
// construction
// ============================================================

#[rstest]
fn given_arguments_when_constructing_then_parses_and_records_environment(harness: Harness) {
    let app: CliApp<TestArgs> =
        CliApp::with_services(["testapp", "--name", "ada"], harness.services(harness.settings()));

    assert_eq!(app.args().name.as_deref(), Some("ada"));
    assert_eq!(app.working_directory(), std::env::current_dir().unwrap());
    assert!(app.binary_path().is_absolute());
    assert_eq!(app.verbosity(), Verbosity::Normal);
    assert!(app.log_path().is_none());
    assert!(!app.has_line_editor());
}

#[rstest]
fn given_unknown_flag_when_constructing_then_reports_user_fatal(harness: Harness) {
    let result = catch_termination(|| {
        CliApp::<TestArgs>::with_services(["testapp", "--bogus"], harness.services(harness.settings()))
    });

    assert_eq!(result.err(), Some(FatalKind::User.exit_code()));
    let out = harness.terminal.stdout();
    assert!(out.starts_with(&format!("{}\n", FATAL_BANNER)), "stdout: {}", out);
    assert!(out.contains("--bogus"));
    assert_eq!(harness.terminator.codes(), vec![1]);
}

#[rstest]
fn given_help_flag_when_constructing_then_prints_help_and_exits_cleanly(harness: Harness) {
    let result = catch_termination(|| {
        CliApp::<TestArgs>::with_services(["testapp", "--help"], harness.services(harness.settings()))
    });

    assert_eq!(result.err(), Some(0));
    assert!(harness.terminal.stdout().contains("Usage"));
    assert!(!harness.terminal.stdout().contains(FATAL_BANNER));
}

#[rstest]
fn given_configured_verbosity_when_constructing_then_console_starts_there(harness: Harness) {
    let settings = Settings {
        verbosity: Verbosity::Verbose,
        ..harness.settings()
    };
    let app: CliApp<TestArgs> = CliApp::with_services(["testapp"], harness.services(settings));

    assert_eq!(app.verbosity(), Verbosity::Verbose);
}

// ============================================================
// print_message
// ============================================================

#[rstest]
fn given_normal_verbosity_when_printing_short_message_then_prints_line(harness: Harness) {
    let app = harness.app();

    app.print_message("short", Verbosity::Normal);

    assert_eq!(harness.terminal.stdout(), "short\n");
}

#[rstest]
fn given_normal_verbosity_when_printing_verbose_message_then_prints_nothing(harness: Harness) {
    let app = harness.app();

    app.print_message("short", Verbosity::Verbose);

    assert_eq!(harness.terminal.stdout(), "");
}

#[rstest]
fn given_silent_verbosity_when_printing_then_prints_nothing(harness: Harness) {
    let mut app = harness.app();
    app.set_verbosity(Verbosity::Silent);

    app.print("anything");

    assert_eq!(harness.terminal.stdout(), "");
}

#[rstest]
fn given_verbose_verbosity_when_printing_verbose_message_then_prints(harness: Harness) {
    let mut app = harness.app();
    app.set_verbosity(Verbosity::Verbose);

    app.print_message("details", Verbosity::Verbose);

    assert_eq!(harness.terminal.stdout(), "details\n");
}

#[rstest]
fn given_unbroken_100_chars_when_printing_then_cuts_at_78(harness: Harness) {
    let app = harness.app();
    let message = "a".repeat(100);

    app.print(&message);

    let out = harness.terminal.stdout();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].len(), 78);
    assert_eq!(lines[1].len(), 22);
    assert_eq!(out.replace('\n', ""), message);
}

#[rstest]
#[case::prose(
    "The quick brown fox jumps over the lazy dog while the cat watches from the \
     windowsill and wonders why anyone would jump over a dog at all on a sunny day"
        .to_string()
)]
#[case::exactly_two_lines(format!("{} {}", "b".repeat(78), "c".repeat(78)))]
#[case::many_short_words("ab ".repeat(60).trim_end().to_string())]
fn given_long_prose_when_printing_then_lines_fit_and_words_survive(
    harness: Harness,
    #[case] message: String,
) {
    let app = harness.app();

    app.print(&message);

    let out = harness.terminal.stdout();
    assert!(out.ends_with('\n'));
    let lines: Vec<&str> = out.lines().collect();
    assert!(lines.len() > 1);
    assert!(lines.iter().all(|l| l.chars().count() <= 78), "{:?}", lines);
    assert_eq!(lines.join(" "), message);
}

#[rstest]
fn given_overlong_word_between_words_when_printing_then_only_that_word_is_cut(harness: Harness) {
    let app = harness.app();
    let long_word = "x".repeat(90);
    let message = format!("start {} end", long_word);

    app.print(&message);

    let out = harness.terminal.stdout();
    let lines: Vec<&str> = out.lines().collect();
    let tail = format!("{} end", &long_word[78..]);
    assert_eq!(lines, vec!["start", &long_word[..78], tail.as_str()]);
    let strip = |s: &str| s.chars().filter(|c| !c.is_whitespace()).collect::<String>();
    assert_eq!(strip(&out), strip(&message));
}

// ============================================================
// error interceptor
// ============================================================

#[rstest]
fn given_fatal_signal_when_reporting_then_prints_banner_and_terminates(harness: Harness) {
    let app = harness.app();

    let result = catch_termination(|| app.report(Signal::fatal(FatalKind::Internal, "disk full")));

    assert_eq!(result, Err(70));
    assert_eq!(
        harness.terminal.stdout(),
        "ERROR: cannot continue!\ndisk full\n"
    );
}

#[rstest]
fn given_silent_verbosity_when_fatal_then_still_prints(harness: Harness) {
    let mut app = harness.app();
    app.set_verbosity(Verbosity::Silent);

    let result = catch_termination(|| app.fatal(FatalKind::User, "disk full"));

    assert_eq!(result.err(), Some(1));
    assert!(harness.terminal.stdout().starts_with("ERROR: cannot continue!\n"));
}

#[rstest]
fn given_long_fatal_message_when_reporting_then_message_is_wrapped(harness: Harness) {
    let app = harness.app();
    let message = "z".repeat(80);

    let _ = catch_termination(|| app.fatal(FatalKind::Internal, &message));

    assert_eq!(
        harness.terminal.stdout(),
        format!("ERROR: cannot continue!\n{}\n{}\n", "z".repeat(78), "zz")
    );
}

#[rstest]
fn given_fatal_signal_when_reporting_then_nothing_after_runs(harness: Harness) {
    let app = harness.app();
    let mut reached = false;

    let _ = catch_termination(|| {
        app.report(Signal::fatal(FatalKind::User, "stop"));
        reached = true;
    });

    assert!(!reached);
}

#[rstest]
fn given_warning_when_reporting_then_prints_at_normal_and_continues(harness: Harness) {
    let app = harness.app();

    let disposition = app.warn("low disk space");

    assert_eq!(disposition, Disposition::Handled);
    assert_eq!(harness.terminal.stdout(), "low disk space\n");
    assert!(harness.terminator.codes().is_empty());
}

#[rstest]
fn given_notice_at_normal_verbosity_when_reporting_then_handled_silently(harness: Harness) {
    let app = harness.app();

    let disposition = app.notice("cache warmed");

    assert_eq!(disposition, Disposition::Handled);
    assert_eq!(harness.terminal.stdout(), "");
}

#[rstest]
fn given_notice_at_verbose_verbosity_when_reporting_then_prints(harness: Harness) {
    let mut app = harness.app();
    app.set_verbosity(Verbosity::Verbose);

    app.notice("cache warmed");

    assert_eq!(harness.terminal.stdout(), "cache warmed\n");
}

#[rstest]
fn given_long_warning_when_reporting_then_wrapped_like_print(harness: Harness) {
    let app = harness.app();
    let message = "w".repeat(100);

    app.warn(message.clone());

    let out = harness.terminal.stdout();
    assert_eq!(out, format!("{}\n{}\n", &message[..78], &message[78..]));
}

#[rstest]
fn given_unrecognized_severity_when_reporting_then_unhandled_and_default_report(harness: Harness) {
    let app = harness.app();

    let disposition = app.report(Signal::new(Severity::parse("deprecated"), "old flag"));

    assert_eq!(disposition, Disposition::Unhandled);
    assert_eq!(harness.terminal.stdout(), "");
    assert!(harness.terminal.stderr().contains("old flag"));
    assert!(harness.terminator.codes().is_empty());
}

// ============================================================
// log_message
// ============================================================

#[rstest]
fn given_fresh_path_when_logging_twice_then_file_has_both_lines(harness: Harness) {
    let app = harness.app();

    app.log_message("a");
    app.log_message("b");

    assert_eq!(fs::read_to_string(harness.log_path()).unwrap(), "a\nb\n");
    assert_eq!(app.log_path(), Some(harness.log_path().as_path()));
}

#[rstest]
fn given_existing_log_when_logging_then_appends_without_truncating(harness: Harness) {
    fs::write(harness.log_path(), "earlier\n").unwrap();
    let app = harness.app();

    app.log_message("later");

    assert_eq!(
        fs::read_to_string(harness.log_path()).unwrap(),
        "earlier\nlater\n"
    );
}

#[rstest]
fn given_n_messages_when_logging_then_n_lines_in_order(harness: Harness) {
    let app = harness.app();
    let messages: Vec<String> = (0..25).map(|i| format!("message {}", i)).collect();

    for message in &messages {
        app.log_message(message);
    }

    let content = fs::read_to_string(harness.log_path()).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines, messages);
}

#[rstest]
fn given_missing_parent_directory_when_logging_then_creates_it(harness: Harness) {
    let nested = harness.dir.path().join("logs/deep/app.log");
    let settings = Settings {
        log_file: Some(nested.clone()),
        ..harness.settings()
    };
    let app: CliApp<TestArgs> = CliApp::with_services(["testapp"], harness.services(settings));

    app.log_message("hello");

    assert_eq!(fs::read_to_string(nested).unwrap(), "hello\n");
}

#[rstest]
fn given_unwritable_log_path_when_logging_then_error_is_swallowed(harness: Harness) {
    // a directory cannot be opened for appending
    let settings = Settings {
        log_file: Some(harness.dir.path().to_path_buf()),
        ..harness.settings()
    };
    let app: CliApp<TestArgs> = CliApp::with_services(["testapp"], harness.services(settings));

    app.log_message("lost");

    assert_eq!(harness.terminal.stdout(), "");
    assert!(harness.terminator.codes().is_empty());
}

#[rstest]
fn given_unwritable_log_path_when_try_logging_then_error_is_surfaced(harness: Harness) {
    let settings = Settings {
        log_file: Some(harness.dir.path().to_path_buf()),
        ..harness.settings()
    };
    let app: CliApp<TestArgs> = CliApp::with_services(["testapp"], harness.services(settings));

    let result = app.try_log_message("lost");

    assert!(matches!(result, Err(ApplicationError::OperationFailed { .. })));
}

#[rstest]
fn given_log_in_use_when_changing_path_then_rejected(harness: Harness) {
    let mut app = harness.app();
    app.log_message("first");

    let result = app.set_log_file(harness.dir.path().join("other.log"));

    assert!(matches!(result, Err(ApplicationError::LogPathFixed(_))));
    app.log_message("second");
    assert_eq!(
        fs::read_to_string(harness.log_path()).unwrap(),
        "first\nsecond\n"
    );
}

// ============================================================
// read_line
// ============================================================

#[test]
fn given_prompt_when_reading_line_then_prompt_has_no_newline() {
    let harness = input_harness("blue\n");
    let mut app = harness.app();

    let answer = app.read_line(Some("colour? ")).unwrap();

    assert_eq!(answer.as_deref(), Some("blue"));
    assert_eq!(harness.terminal.stdout(), "colour? ");
}

#[test]
fn given_no_prompt_when_reading_line_then_writes_nothing() {
    let harness = input_harness("first\nsecond\n");
    let mut app = harness.app();

    assert_eq!(app.read_line(None).unwrap().as_deref(), Some("first"));
    assert_eq!(app.read_line(None).unwrap().as_deref(), Some("second"));
    assert_eq!(app.read_line(None).unwrap(), None);
    assert_eq!(harness.terminal.stdout(), "");
}

#[test]
fn given_line_over_1024_bytes_when_reading_then_returns_first_1024() {
    let long = "q".repeat(1500);
    let harness = input_harness(&format!("{}\n", long));
    let mut app = harness.app();

    let first = app.read_line(None).unwrap().unwrap();
    let rest = app.read_line(None).unwrap().unwrap();

    assert_eq!(first.len(), 1024);
    assert_eq!(rest.len(), 476);
}
