//! Logging macros that capture the full call site.
//!
//! The macros record the enclosing function at compile time, so `funcname`
//! needs no stack lookup and works without debug info. Each macro returns the
//! [`ResolvedFields`](crate::ResolvedFields) of the emission.
//!
//! # Examples
//!
//! ```
//! use rust_logger_fields::prelude::*;
//! use rust_logger_fields::info;
//!
//! let logger = Logger::new("app");
//! let fields = logger.field_set(["levelname", "filename", "lineno", "message"]).unwrap();
//!
//! // Basic logging
//! info!(logger, &fields, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! let resolved = info!(logger, &fields, "Server listening on port {}", port);
//! assert_eq!(resolved.get("message"), Some(&FieldValue::from("Server listening on port 8080")));
//! ```

/// Fully qualified path of the enclosing function, as a `&'static str`.
///
/// Closure segments are kept; [`short_func_name`](crate::short_func_name)
/// strips them along with the module path.
///
/// ```
/// use rust_logger_fields::function_path;
///
/// fn handler() -> &'static str {
///     function_path!()
/// }
///
/// assert!(handler().ends_with("::handler"));
/// ```
#[macro_export]
macro_rules! function_path {
    () => {{
        fn __function_path_probe() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = __type_name_of(__function_path_probe);
        name.strip_suffix("::__function_path_probe").unwrap_or(name)
    }};
}

/// [`CallSite`](crate::CallSite) of the macro invocation.
#[macro_export]
macro_rules! call_site {
    () => {
        $crate::CallSite::new(file!(), line!(), $crate::function_path!())
    };
}

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use rust_logger_fields::prelude::*;
/// # let logger = Logger::new("app");
/// # let fields = logger.field_set(["message"]).unwrap();
/// use rust_logger_fields::log;
/// log!(logger, &fields, LogLevel::Info, "Simple message");
/// log!(logger, &fields, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $fields:expr, $level:expr, $($arg:tt)+) => {
        $logger.emit($fields, $level, format!($($arg)+), $crate::call_site!())
    };
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $fields:expr, $($arg:tt)+) => {
        $crate::log!($logger, $fields, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $fields:expr, $($arg:tt)+) => {
        $crate::log!($logger, $fields, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use rust_logger_fields::prelude::*;
/// # let logger = Logger::new("app");
/// # let fields = logger.field_set(["message"]).unwrap();
/// use rust_logger_fields::info;
/// info!(logger, &fields, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $fields:expr, $($arg:tt)+) => {
        $crate::log!($logger, $fields, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $fields:expr, $($arg:tt)+) => {
        $crate::log!($logger, $fields, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $fields:expr, $($arg:tt)+) => {
        $crate::log!($logger, $fields, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $fields:expr, $($arg:tt)+) => {
        $crate::log!($logger, $fields, $crate::LogLevel::Fatal, $($arg)+)
    };
}
