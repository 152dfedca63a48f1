//! Core field resolution types

pub mod error;
pub mod field;
pub mod field_set;
pub mod field_value;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod record;
pub mod registry;
mod resolvers;
pub mod timestamp;

pub use error::{LoggerError, Result};
pub use field::Field;
pub use field_set::{FieldSet, ResolvedFields};
pub use field_value::FieldValue;
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder, DEFAULT_LOGGER_NAME};
pub use metrics::LoggerMetrics;
pub use record::{short_func_name, CallSite, Record, ERR_LINENO, ERR_STRING};
pub use registry::{FieldKey, FieldRegistry, FieldRegistryBuilder, FieldResolver};
pub use timestamp::TimestampFormat;
