//! Per-emission log records and call-site capture
//!
//! A [`Record`] lives for exactly one log call. Its caller-derived fields are
//! filled from a [`CallSite`] that the public entry point captured and passed
//! down explicitly, so wrapper layers between the user's code and
//! [`Record::build`] cannot shift the attribution.

use super::log_level::LogLevel;
use super::logger::Logger;
use super::metrics::LoggerMetrics;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::cell::{OnceCell, RefCell};
use std::collections::HashMap;
use std::panic::Location;
use std::sync::OnceLock;

/// Value of string location fields when the call site could not be captured
pub const ERR_STRING: &str = "???";

/// Value of `lineno` when the call site could not be captured
///
/// `0` means the location was never requested.
pub const ERR_LINENO: i64 = -1;

thread_local! {
    static THREAD_IDENTITY_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Name of the current thread, or its id when unnamed, cached per thread
fn current_thread_identity() -> String {
    THREAD_IDENTITY_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| {
                let thread = std::thread::current();
                match thread.name() {
                    Some(name) => name.to_string(),
                    None => format!("{:?}", thread.id()),
                }
            })
            .clone()
    })
}

/// Strip the module and type path from a qualified function name
///
/// Accepts both `::` and `.` separators and skips trailing closure segments,
/// so `app::server::Handler::run::{{closure}}` yields `run` and
/// `pkg.Type.Method` yields `Method`.
pub fn short_func_name(name: &str) -> &str {
    let mut name = name;
    while let Some(stripped) = name.strip_suffix("::{{closure}}") {
        name = stripped;
    }
    let last = name.rsplit("::").next().unwrap_or(name);
    last.rsplit('.').next().unwrap_or(last)
}

/// Last component of a source path, for either separator style
fn base_name(path: &str) -> &str {
    path.rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(path)
}

type FunctionNames = HashMap<(&'static str, u32), Option<&'static str>>;

/// Qualified name of the function whose frame is executing `file:line`
///
/// Walks the current stack and matches each frame's debug info against the
/// location, so it only finds callers that are on the stack right now. Names
/// are cached per location; `None` when no frame matches, e.g. in binaries
/// built without debug info.
fn function_at(file: &'static str, line: u32) -> Option<&'static str> {
    static FUNCTION_NAMES: OnceLock<RwLock<FunctionNames>> = OnceLock::new();
    let names = FUNCTION_NAMES.get_or_init(|| RwLock::new(HashMap::new()));

    if let Some(cached) = names.read().get(&(file, line)) {
        return *cached;
    }

    let mut found: Option<String> = None;
    backtrace::trace(|frame| {
        backtrace::resolve_frame(frame, |symbol| {
            if found.is_some() || symbol.lineno() != Some(line) {
                return;
            }
            if symbol.filename().is_some_and(|path| path.ends_with(file)) {
                found = symbol.name().map(|name| format!("{:#}", name));
            }
        });
        found.is_none()
    });

    *names
        .write()
        .entry((file, line))
        .or_insert_with(|| found.map(|name| &*Box::leak(name.into_boxed_str())))
}

/// Source location of a log call, captured at the public entry point
///
/// Built by the logging macros from `file!()`, `line!()` and
/// [`function_path!`](crate::function_path), or by `#[track_caller]` methods
/// from [`Location::caller`]. A site without a file is a failed capture.
///
/// Sites from [`Location::caller`] carry no function name; it is looked up
/// from the stack when the record is built, so build the record from the
/// same frame that captured the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    file: Option<&'static str>,
    line: u32,
    function: Option<&'static str>,
}

impl CallSite {
    pub const fn new(file: &'static str, line: u32, function: &'static str) -> Self {
        Self {
            file: Some(file),
            line,
            function: Some(function),
        }
    }

    /// Location of whoever called the enclosing `#[track_caller]` function
    #[track_caller]
    pub fn caller() -> Self {
        Self::from_location(Location::caller())
    }

    pub fn from_location(location: &'static Location<'static>) -> Self {
        Self {
            file: Some(location.file()),
            line: location.line(),
            function: None,
        }
    }

    /// A site that could not be determined
    pub const fn unknown() -> Self {
        Self {
            file: None,
            line: 0,
            function: None,
        }
    }

    #[must_use]
    pub fn with_function(mut self, function: &'static str) -> Self {
        self.function = Some(function);
        self
    }

    pub fn file(&self) -> Option<&'static str> {
        self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn function(&self) -> Option<&'static str> {
        self.function
    }
}

/// Contextual data of one log emission
#[derive(Debug, Clone)]
pub struct Record {
    pub level: LogLevel,
    pub seqid: u64,
    pub pathname: &'static str,
    pub filename: &'static str,
    pub funcname: &'static str,
    pub lineno: i64,
    pub thread: String,
    pub time: DateTime<Utc>,
    pub message: String,
    process: OnceCell<u32>,
}

impl Record {
    /// Build the record for one emission on `logger`
    ///
    /// The call-site fields are only populated when `capture_runtime` is set;
    /// otherwise they keep their empty defaults. The sequence id and time are
    /// always assigned.
    pub fn build(
        logger: &Logger,
        level: LogLevel,
        message: impl Into<String>,
        capture_runtime: bool,
        site: CallSite,
    ) -> Self {
        let mut record = Self {
            level,
            seqid: 0,
            pathname: "",
            filename: "",
            funcname: "",
            lineno: 0,
            thread: String::new(),
            time: DateTime::<Utc>::default(),
            message: message.into(),
            process: OnceCell::new(),
        };

        logger.metrics().record_built();
        if capture_runtime {
            record.capture_runtime(&site, logger.metrics());
        }
        record.capture_non_runtime(logger);
        record
    }

    fn capture_runtime(&mut self, site: &CallSite, metrics: &LoggerMetrics) {
        metrics.record_capture();
        self.thread = current_thread_identity();

        match site.file {
            Some(path) => {
                self.pathname = path;
                self.filename = base_name(path);
                self.lineno = i64::from(site.line);
                self.funcname = site
                    .function
                    .or_else(|| function_at(path, site.line))
                    .map(short_func_name)
                    .filter(|name| !name.is_empty())
                    .unwrap_or(ERR_STRING);
            }
            None => {
                self.pathname = ERR_STRING;
                self.filename = ERR_STRING;
                self.funcname = ERR_STRING;
                self.lineno = ERR_LINENO;

                let failures = metrics.record_capture_failure();
                if failures == 0 || (failures + 1) % 1000 == 0 {
                    eprintln!(
                        "[LOGGER WARNING] Call site unavailable for {} record(s); \
                         location fields set to '{}'.",
                        failures + 1,
                        ERR_STRING
                    );
                }
            }
        }
    }

    fn capture_non_runtime(&mut self, logger: &Logger) {
        self.seqid = logger.next_seqid();
        self.time = Utc::now();
    }

    /// Process id, looked up on first use and kept for the record's lifetime
    pub fn process_id(&self) -> u32 {
        *self.process.get_or_init(std::process::id)
    }

    /// Whether the location fields hold the capture-failure sentinels
    pub fn capture_failed(&self) -> bool {
        self.lineno == ERR_LINENO
    }
}
