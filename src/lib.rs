//! # Rust Logger Fields
//!
//! Field resolution engine for log records: given the tokens a format names
//! (`time`, `lineno`, `message`, ...), produce each token's value at the
//! moment a line is emitted.
//!
//! ## Features
//!
//! - **Cheap by default**: the call site is only captured when a requested
//!   field needs it
//! - **Ordered**: every logger hands out strictly increasing sequence ids,
//!   also under concurrent writers
//! - **Accurate callers**: locations are captured at the public entry point
//!   and passed down explicitly
//! - **Extensible**: custom fields register alongside the built-in ones
//!
//! ## Example
//!
//! ```
//! use rust_logger_fields::prelude::*;
//! use rust_logger_fields::info;
//!
//! let logger = Logger::new("app");
//! let fields = logger.field_set(["seqid", "levelname", "funcname", "message"]).unwrap();
//!
//! let resolved = info!(logger, &fields, "listening on {}", 8080);
//! assert_eq!(resolved.get("seqid"), Some(&FieldValue::Uint(1)));
//! assert_eq!(resolved.get("message"), Some(&FieldValue::from("listening on 8080")));
//! ```

pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::core::{
        CallSite, Field, FieldKey, FieldRegistry, FieldSet, FieldValue, LogLevel, Logger,
        LoggerBuilder, LoggerError, LoggerMetrics, Record, ResolvedFields, Result,
        TimestampFormat,
    };
}

pub use crate::core::{
    short_func_name, CallSite, Field, FieldKey, FieldRegistry, FieldRegistryBuilder,
    FieldResolver, FieldSet, FieldValue, LogLevel, Logger, LoggerBuilder, LoggerError,
    LoggerMetrics, Record, ResolvedFields, Result, TimestampFormat, DEFAULT_LOGGER_NAME,
    ERR_LINENO, ERR_STRING,
};
