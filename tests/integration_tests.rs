//! Integration tests for the logger lifecycle
//!
//! These tests verify:
//! - Line layout per level, with and without PID and debug mode
//! - Reopen between messages and after the file was removed
//! - Statistics hooks
//! - Flag handling through set_flags
//! - Open/close/reopen failure reporting

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::sync::Arc;
use svclog::prelude::*;
use svclog::FATAL_EXIT_CODE;
use tempfile::TempDir;

const STUB_PID: u32 = 19851996;
const STUB_APP: &str = "test-log-app";
const ERR_IS_OK: &str = "(It's OK - this is testing error messages)";

fn test_logger() -> Logger {
    Logger::builder()
        .terminator(Arc::new(NoExit))
        .process_id(STUB_PID)
        .build()
}

/// Read the produced file, checking that it ends with a newline
fn read_lines(path: &Path) -> Vec<String> {
    let content = fs::read_to_string(path).expect("Failed to read log file");
    if content.is_empty() {
        return Vec::new();
    }
    assert!(content.ends_with('\n'), "log file was not ended by \"\\n\"");
    content.lines().map(String::from).collect()
}

fn with_pid(line: &str) -> String {
    format!("{}[{}]: {}", STUB_APP, STUB_PID, line)
}

type LogFn = fn(&Logger, fmt::Arguments<'_>);

fn all_types() -> Vec<LogFn> {
    vec![Logger::debug, Logger::info, Logger::warn, Logger::err]
}

fn all_types_short() -> Vec<LogFn> {
    vec![Logger::d, Logger::i, Logger::w, Logger::e]
}

fn write_sample(logger: &Logger, calls: &[LogFn]) {
    let error_kind = format!("ERROR {}", ERR_IS_OK);
    let kinds: [&str; 4] = ["DEBUG", "INFO", "WARNING", &error_kind];
    for (i, (call, kind)) in calls.iter().zip(kinds.iter()).enumerate() {
        call(logger, format_args!("Test #{} - {} log message", i, kind));
    }
}

#[test]
fn test_all_types() {
    for (name, calls) in [("all-types", all_types()), ("all-types-short", all_types_short())] {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join(format!("log-test_{}.log", name));

        let logger = test_logger();
        logger.open(&path, STUB_APP, Flags::NONE).unwrap();
        logger.set_debug(true);
        write_sample(&logger, &calls);
        logger.close().unwrap();

        assert_eq!(
            read_lines(&path),
            vec![
                with_pid("<D> Test #0 - DEBUG log message"),
                with_pid("Test #1 - INFO log message"),
                with_pid("<WRN> Test #2 - WARNING log message"),
                with_pid(&format!("<ERR> Test #3 - ERROR {} log message", ERR_IS_OK)),
            ],
            "[{}]",
            name
        );
    }
}

#[test]
fn test_without_debug() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("log-test_without-debug.log");

    let logger = test_logger();
    logger.open(&path, STUB_APP, Flags::NONE).unwrap();
    write_sample(&logger, &all_types());
    logger.close().unwrap();

    assert_eq!(
        read_lines(&path),
        vec![
            with_pid("Test #1 - INFO log message"),
            with_pid("<WRN> Test #2 - WARNING log message"),
            with_pid(&format!("<ERR> Test #3 - ERROR {} log message", ERR_IS_OK)),
        ]
    );
}

#[test]
fn test_with_no_pid() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("log-test_with-NoPID.log");

    let logger = test_logger();
    logger.open(&path, STUB_APP, Flags::NO_PID).unwrap();
    logger.set_debug(true);
    write_sample(&logger, &all_types());
    logger.close().unwrap();

    let lines = read_lines(&path);
    assert_eq!(
        lines,
        vec![
            format!("{}: <D> Test #0 - DEBUG log message", STUB_APP),
            format!("{}: Test #1 - INFO log message", STUB_APP),
            format!("{}: <WRN> Test #2 - WARNING log message", STUB_APP),
            format!("{}: <ERR> Test #3 - ERROR {} log message", STUB_APP, ERR_IS_OK),
        ]
    );
    assert!(lines.iter().all(|line| !line.contains('[')));
}

#[test]
fn test_with_reopen() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("log-test_with-reopen.log");

    let logger = test_logger();
    logger.open(&path, STUB_APP, Flags::NONE).unwrap();
    logger.set_debug(true);

    let calls = all_types();
    let error_kind = format!("ERROR {}", ERR_IS_OK);
    let kinds: [&str; 4] = ["DEBUG", "INFO", "WARNING", &error_kind];
    for (i, (call, kind)) in calls.iter().zip(kinds.iter()).enumerate() {
        if i != 0 {
            logger.warn(format_args!("Test Reopen() #{}", i));
            logger.reopen().unwrap();
        }
        call(&logger, format_args!("Test #{} - {} log message", i, kind));
    }
    logger.close().unwrap();

    assert_eq!(
        read_lines(&path),
        vec![
            with_pid("<D> Test #0 - DEBUG log message"),
            with_pid("<WRN> Test Reopen() #1"),
            with_pid("Test #1 - INFO log message"),
            with_pid("<WRN> Test Reopen() #2"),
            with_pid("<WRN> Test #2 - WARNING log message"),
            with_pid("<WRN> Test Reopen() #3"),
            with_pid(&format!("<ERR> Test #3 - ERROR {} log message", ERR_IS_OK)),
        ]
    );
}

#[test]
fn test_basic_scenario() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("x.log");

    let logger = test_logger();
    logger.open(&path, "app", Flags::NONE).unwrap();
    logger.info(format_args!("v={}", 1));
    logger.warn(format_args!("w={}", 2));
    logger.err(format_args!("e={}", 3));
    logger.close().unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(
        content,
        format!(
            "app[{pid}]: v=1\napp[{pid}]: <WRN> w=2\napp[{pid}]: <ERR> e=3\n",
            pid = STUB_PID
        )
    );
}

#[test]
fn test_stat_functions() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("stats.log");

    let logger = test_logger();
    logger.open(&path, STUB_APP, Flags::NONE).unwrap();
    logger.set_debug(true);

    let errs = Arc::new(parking_lot::Mutex::new(Vec::<String>::new()));
    let wrns = Arc::new(parking_lot::Mutex::new(Vec::<String>::new()));
    let errs_hook = Arc::clone(&errs);
    let wrns_hook = Arc::clone(&wrns);
    logger.set_stat_funcs(
        Some(stat_fn(move |args| errs_hook.lock().push(args.to_string()))),
        Some(stat_fn(move |args| wrns_hook.lock().push(args.to_string()))),
    );

    let mut exp_errs = Vec::new();
    let mut exp_wrns = Vec::new();
    for i in 0..3 {
        logger.debug(format_args!("Statistic test - DEBUG #{}", i));
        logger.info(format_args!("Statistic test - INFO #{}", i));
        logger.warn(format_args!("Statistic test - WARNING #{}", i));
        exp_wrns.push(format!("Statistic test - WARNING #{}", i));
        logger.err(format_args!("Statistic test - ERROR #{} {}", i, ERR_IS_OK));
        exp_errs.push(format!("Statistic test - ERROR #{} {}", i, ERR_IS_OK));
    }
    logger.close().unwrap();

    assert_eq!(*errs.lock(), exp_errs);
    assert_eq!(*wrns.lock(), exp_wrns);
}

#[test]
fn test_stat_hooks_ignore_debug_mode() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("stats_nodebug.log");

    let warnings = Arc::new(AtomicUsize::new(0));
    let errors = Arc::new(AtomicUsize::new(0));
    let warnings_hook = Arc::clone(&warnings);
    let errors_hook = Arc::clone(&errors);

    let logger = Logger::builder()
        .terminator(Arc::new(NoExit))
        .warning_hook(stat_fn(move |_| {
            warnings_hook.fetch_add(1, Ordering::SeqCst);
        }))
        .error_hook(stat_fn(move |_| {
            errors_hook.fetch_add(1, Ordering::SeqCst);
        }))
        .build();
    logger.open(&path, STUB_APP, Flags::NO_PID).unwrap();

    logger.debug(format_args!("invisible"));
    logger.warn(format_args!("w"));
    logger.err(format_args!("e"));
    logger.fatal(format_args!("f {}", ERR_IS_OK));
    logger.close().unwrap();

    assert_eq!(warnings.load(Ordering::SeqCst), 1);
    // Fatal counts as an error
    assert_eq!(errors.load(Ordering::SeqCst), 2);
}

#[test]
fn test_hook_may_call_back_into_logger() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("hook_reentry.log");

    let logger = Arc::new(test_logger());
    logger.open(&path, STUB_APP, Flags::NO_PID).unwrap();

    let weak = Arc::downgrade(&logger);
    logger.set_stat_funcs(
        None,
        Some(stat_fn(move |args| {
            if let Some(logger) = weak.upgrade() {
                logger.info(format_args!("counted warning: {}", args));
            }
        })),
    );

    logger.warn(format_args!("low disk"));
    logger.close().unwrap();

    assert_eq!(
        read_lines(&path),
        vec![
            format!("{}: <WRN> low disk", STUB_APP),
            format!("{}: counted warning: low disk", STUB_APP),
        ]
    );
}

#[test]
fn test_flags() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("flags.log");

    let logger = test_logger();
    logger.open(&path, STUB_APP, Flags::NONE).unwrap();

    let flags = [
        Flags::NO_PID,
        Flags::DATE,
        Flags::TIME,
        Flags::MICROSECONDS,
        Flags::LONG_FILE,
        Flags::SHORT_FILE,
        Flags::UTC,
        Flags::MSG_PREFIX,
    ];

    for flag in flags {
        if flag.intersects(Flags::ALWAYS) {
            continue;
        }

        let old_flags = logger.flags();
        logger.set_flags(old_flags | flag).unwrap();
        let new_flags = logger.flags();

        assert_eq!(
            old_flags ^ new_flags,
            flag,
            "incorrect flags after set: old {} new {}",
            old_flags,
            new_flags
        );
    }

    assert_eq!(logger.prefix(), format!("{}: ", STUB_APP));
    logger.close().unwrap();
}

#[test]
fn test_set_flags_changes_following_lines() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("set_flags.log");

    let logger = test_logger();
    logger.open(&path, STUB_APP, Flags::NONE).unwrap();
    logger.info(format_args!("with pid"));
    logger.set_flags(Flags::NO_PID | Flags::SHORT_FILE).unwrap();
    let line = line!() + 1;
    logger.info(format_args!("without pid"));
    logger.close().unwrap();

    assert_eq!(
        read_lines(&path),
        vec![
            with_pid("with pid"),
            format!("integration_tests.rs:{}: {}: without pid", line, STUB_APP),
        ]
    );
}

#[test]
fn test_timestamp_header() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("timestamps.log");

    let logger = test_logger();
    logger
        .open(&path, STUB_APP, Flags::NO_PID | Flags::STD | Flags::MICROSECONDS | Flags::UTC)
        .unwrap();
    logger.info(format_args!("tick"));
    logger.close().unwrap();

    let lines = read_lines(&path);
    assert_eq!(lines.len(), 1);
    // 2025/01/08 10:30:45.123456 test-log-app: tick
    let line = &lines[0];
    let (date, rest) = line.split_once(' ').unwrap();
    let (time, rest) = rest.split_once(' ').unwrap();
    assert_eq!(date.len(), 10);
    assert_eq!(&date[4..5], "/");
    assert_eq!(time.len(), 15);
    assert_eq!(&time[8..9], ".");
    assert_eq!(rest, format!("{}: tick", STUB_APP));
}

#[test]
fn test_fatal() {
    struct RecordingExit(AtomicI32);

    impl Terminate for RecordingExit {
        fn terminate(&self, code: i32) {
            self.0.store(code, Ordering::SeqCst);
        }
    }

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("fatal.log");

    let exit = Arc::new(RecordingExit(AtomicI32::new(0)));
    let logger = Logger::builder()
        .terminator(exit.clone())
        .process_id(STUB_PID)
        .build();
    logger.open(&path, STUB_APP, Flags::NONE).unwrap();
    logger.fatal(format_args!("Test fatal error {}", ERR_IS_OK));
    logger.close().unwrap();

    assert_eq!(exit.0.load(Ordering::SeqCst), FATAL_EXIT_CODE);
    assert_eq!(
        read_lines(&path),
        vec![with_pid(&format!("<FATAL> Test fatal error {}", ERR_IS_OK))]
    );
}

#[test]
fn test_fail_open() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir
        .path()
        .join("this-dir-does-not-exist")
        .join("fail-open.log");

    let logger = test_logger();
    let err = logger.open(&path, STUB_APP, Flags::NONE).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::FileFailure);
    assert!(err.is_not_found(), "unexpected error: {}", err);
    assert!(logger.is_closed());
    assert!(matches!(logger.close(), Err(LogError::Closed)));
}

#[test]
fn test_default_log() {
    let logger = test_logger();
    logger.open("", STUB_APP, Flags::NONE).unwrap();
    logger.debug(format_args!("Invisible message"));
    logger.info(format_args!("default stream line {}", ERR_IS_OK));
    logger.reopen().unwrap();
    logger.err(format_args!("default stream error {}", ERR_IS_OK));
    logger.close().unwrap();
    assert!(matches!(logger.close(), Err(LogError::Closed)));
}

#[test]
fn test_reopen_recreates_removed_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("rotated.log");

    let logger = test_logger();
    logger.open(&path, STUB_APP, Flags::NO_PID).unwrap();
    logger.info(format_args!("before removal"));

    fs::remove_file(&path).unwrap();
    logger.info(format_args!("to the removed file"));
    assert!(!path.exists());

    logger.reopen().unwrap();
    logger.info(format_args!("after reopen"));
    logger.close().unwrap();

    assert_eq!(read_lines(&path), vec![format!("{}: after reopen", STUB_APP)]);
}

#[test]
fn test_reopen_after_rename_keeps_old_lines() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("app.log");
    let rotated = temp_dir.path().join("app.log.1");

    let logger = test_logger();
    logger.open(&path, STUB_APP, Flags::NO_PID).unwrap();
    logger.info(format_args!("one"));
    fs::rename(&path, &rotated).unwrap();
    // Still goes to the renamed file until reopen
    logger.info(format_args!("two"));
    logger.reopen().unwrap();
    logger.info(format_args!("three"));
    logger.close().unwrap();

    assert_eq!(
        read_lines(&rotated),
        vec![format!("{}: one", STUB_APP), format!("{}: two", STUB_APP)]
    );
    assert_eq!(read_lines(&path), vec![format!("{}: three", STUB_APP)]);
}

#[test]
fn test_fail_reopen_nx_dir() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_dir = temp_dir.path().join("logs");
    fs::create_dir(&log_dir).unwrap();
    let path = log_dir.join("fail-reopen.log");

    let logger = test_logger();
    logger.open(&path, STUB_APP, Flags::NONE).unwrap();
    logger.debug(format_args!("Invisible message"));

    fs::remove_dir_all(&log_dir).unwrap();

    let err = logger.reopen().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FileFailure);
    assert!(err.is_not_found(), "unexpected error: {}", err);

    // The failed reopen leaves the log closed, a fresh open recovers it
    assert!(logger.is_closed());
    assert!(matches!(logger.close(), Err(LogError::Closed)));
    fs::create_dir(&log_dir).unwrap();
    logger.open(&path, STUB_APP, Flags::NO_PID).unwrap();
    logger.info(format_args!("recovered"));
    logger.close().unwrap();
    assert_eq!(read_lines(&path), vec![format!("{}: recovered", STUB_APP)]);
}

#[test]
fn test_fail_double_close() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("fail-double-close.log");

    let logger = test_logger();
    logger.open(&path, STUB_APP, Flags::NONE).unwrap();
    logger.close().unwrap();

    let err = logger.close().unwrap_err();
    assert!(matches!(err, LogError::Closed));
    assert_eq!(err.kind(), ErrorKind::AlreadyClosed);
}

#[test]
fn test_close_never_opened() {
    let logger = Logger::new();
    assert!(matches!(logger.close(), Err(LogError::Closed)));
}

#[test]
fn test_open_with_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("configured.log");

    let json = format!(
        r#"{{ "path": {}, "app_name": "cfg-app", "flags": "nopid", "debug": true }}"#,
        serde_json::to_string(&path).unwrap()
    );
    let config = LogConfig::from_json(&json).unwrap();

    let logger = test_logger();
    logger.open_with(&config).unwrap();
    assert!(logger.is_debug());
    logger.debug(format_args!("visible"));
    logger.close().unwrap();

    assert_eq!(read_lines(&path), vec!["cfg-app: <D> visible".to_string()]);
}

/// Collects mirrored lines in memory instead of writing them to stderr
#[derive(Clone, Default)]
struct MemoryMirror {
    lines: Arc<parking_lot::Mutex<Vec<String>>>,
}

impl MemoryMirror {
    fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}

impl Appender for MemoryMirror {
    fn append(&mut self, line: &str) -> Result<()> {
        self.lines.lock().push(line.to_string());
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<()> {
        Ok(())
    }

    fn is_default_stream(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "memory"
    }
}

fn mirrored_logger(mirror: &MemoryMirror) -> Logger {
    Logger::builder()
        .terminator(Arc::new(NoExit))
        .process_id(STUB_PID)
        .mirror(Box::new(mirror.clone()))
        .build()
}

#[test]
fn test_err_and_fatal_copied_for_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("mirrored.log");

    let mirror = MemoryMirror::default();
    let logger = mirrored_logger(&mirror);
    logger.open(&path, STUB_APP, Flags::NONE).unwrap();
    logger.set_debug(true);

    logger.debug(format_args!("d"));
    logger.info(format_args!("i"));
    logger.warn(format_args!("w"));
    logger.err(format_args!("e={}", 3));
    logger.fatal(format_args!("f={}", 4));
    logger.close().unwrap();

    assert_eq!(
        mirror.lines(),
        vec![
            format!("{}\n", with_pid("<ERR> e=3")),
            format!("{}\n", with_pid("<FATAL> f=4")),
        ]
    );
    assert_eq!(read_lines(&path).len(), 5);
}

#[test]
fn test_copy_follows_flags() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("mirrored_flags.log");

    let mirror = MemoryMirror::default();
    let logger = mirrored_logger(&mirror);
    logger.open(&path, STUB_APP, Flags::NONE).unwrap();
    logger.set_flags(Flags::NO_PID | Flags::SHORT_FILE).unwrap();

    let line = line!() + 1;
    logger.err(format_args!("moved"));
    logger.close().unwrap();

    let expected = format!("integration_tests.rs:{}: {}: <ERR> moved", line, STUB_APP);
    assert_eq!(mirror.lines(), vec![format!("{}\n", expected)]);
    assert_eq!(read_lines(&path), vec![expected]);
}

#[test]
fn test_no_copy_for_default_stream() {
    let mirror = MemoryMirror::default();
    let logger = mirrored_logger(&mirror);
    logger.open("", STUB_APP, Flags::NONE).unwrap();

    logger.err(format_args!("to stderr once {}", ERR_IS_OK));
    logger.fatal(format_args!("to stderr once {}", ERR_IS_OK));
    logger.close().unwrap();

    assert!(mirror.lines().is_empty());
}

#[test]
fn test_emit_before_open_uses_mirror() {
    let mirror = MemoryMirror::default();
    let exit = Arc::new(AtomicI32::new(0));
    let recorder = Arc::clone(&exit);
    struct RecordingExit(Arc<AtomicI32>);
    impl Terminate for RecordingExit {
        fn terminate(&self, code: i32) {
            self.0.store(code, Ordering::SeqCst);
        }
    }

    let logger = Logger::builder()
        .terminator(Arc::new(RecordingExit(recorder)))
        .mirror(Box::new(mirror.clone()))
        .build();

    logger.info(format_args!("early"));
    logger.err(format_args!("early error"));
    logger.fatal(format_args!("early fatal"));

    assert_eq!(
        mirror.lines(),
        vec![
            "early\n".to_string(),
            "<ERR> early error\n".to_string(),
            "<FATAL> early fatal\n".to_string(),
        ]
    );
    assert_eq!(exit.load(Ordering::SeqCst), FATAL_EXIT_CODE);
}

/// A mirror sink whose writes always fail
struct BrokenMirror;

impl Appender for BrokenMirror {
    fn append(&mut self, _line: &str) -> Result<()> {
        Err(LogError::op_msg("mirror unavailable"))
    }

    fn close(self: Box<Self>) -> Result<()> {
        Ok(())
    }

    fn is_default_stream(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "broken"
    }
}

#[test]
fn test_failed_copy_keeps_primary_line() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("broken_mirror.log");

    let errors = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&errors);
    let logger = Logger::builder()
        .terminator(Arc::new(NoExit))
        .process_id(STUB_PID)
        .mirror(Box::new(BrokenMirror))
        .error_hook(stat_fn(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }))
        .build();
    logger.open(&path, STUB_APP, Flags::NONE).unwrap();

    logger.err(format_args!("primary {}", ERR_IS_OK));
    logger.close().unwrap();

    assert_eq!(
        read_lines(&path),
        vec![with_pid(&format!("<ERR> primary {}", ERR_IS_OK))]
    );
    assert_eq!(errors.load(Ordering::SeqCst), 1);
}
