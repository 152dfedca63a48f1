//! Logger state consulted by field resolution

use super::{
    error::{LoggerError, Result},
    field_set::{FieldSet, ResolvedFields},
    field_value::FieldValue,
    log_level::LogLevel,
    metrics::LoggerMetrics,
    record::{CallSite, Record},
    registry::FieldRegistry,
    timestamp::TimestampFormat,
};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Name given to loggers built without one
pub const DEFAULT_LOGGER_NAME: &str = "root";

/// A named logger and the state its fields are resolved from
///
/// Name, start time, timestamp format and registry never change after
/// construction. The sequence counter is the only state mutated by emissions,
/// and each logger owns its own, so independent loggers never share numbers.
///
/// `Logger` is `Send + Sync`; share it across threads with `Arc` or scoped
/// borrows.
#[derive(Debug)]
pub struct Logger {
    name: String,
    start_time: DateTime<Utc>,
    timestamp_format: TimestampFormat,
    seqid: AtomicU64,
    registry: Arc<FieldRegistry>,
    /// Metrics for observability (records built, captures, capture failures)
    metrics: LoggerMetrics,
}

impl Logger {
    /// Logger with the built-in fields and default timestamp format, started now
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start_time: Utc::now(),
            timestamp_format: TimestampFormat::default(),
            seqid: AtomicU64::new(0),
            registry: Arc::new(FieldRegistry::new()),
            metrics: LoggerMetrics::new(),
        }
    }

    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start_time(&self) -> &DateTime<Utc> {
        &self.start_time
    }

    pub fn timestamp_format(&self) -> &TimestampFormat {
        &self.timestamp_format
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    /// Get the logger metrics
    ///
    /// # Example
    ///
    /// ```
    /// use rust_logger_fields::prelude::*;
    ///
    /// let logger = Logger::new("app");
    /// let fields = logger.field_set(["seqid", "message"]).unwrap();
    /// logger.info(&fields, "hello");
    ///
    /// let metrics = logger.metrics();
    /// assert_eq!(metrics.records_built(), 1);
    /// assert_eq!(metrics.runtime_captures(), 0);
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Last sequence id handed out, 0 before the first record
    pub fn seqid(&self) -> u64 {
        self.seqid.load(Ordering::Relaxed)
    }

    /// Claim the next sequence id; the first record gets 1
    pub(crate) fn next_seqid(&self) -> u64 {
        self.seqid.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Validate token names against this logger's registry
    pub fn field_set<'a, I>(&self, names: I) -> Result<FieldSet>
    where
        I: IntoIterator<Item = &'a str>,
    {
        FieldSet::parse(&self.registry, names)
    }

    /// Build the record for one emission
    pub fn build_record(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        capture_runtime: bool,
        site: CallSite,
    ) -> Record {
        Record::build(self, level, message, capture_runtime, site)
    }

    /// Resolve one field of `record` by token name
    pub fn resolve(&self, name: &str, record: &Record) -> Result<FieldValue> {
        self.registry.resolve(name, self, record)
    }

    /// Resolve every field of `fields` for `record`
    ///
    /// A token listed more than once is resolved once and its value reused.
    pub fn resolve_fields(&self, fields: &FieldSet, record: &Record) -> ResolvedFields {
        let mut resolved = ResolvedFields::with_capacity(fields.len());
        for key in fields.keys() {
            let value = match resolved.find(key) {
                Some(value) => value.clone(),
                None => self.registry.resolve_key(key, self, record),
            };
            resolved.push(key.clone(), value);
        }
        resolved
    }

    /// Build a record and resolve `fields` for it
    ///
    /// The call site is only captured when `fields` needs it.
    pub fn emit(
        &self,
        fields: &FieldSet,
        level: LogLevel,
        message: impl Into<String>,
        site: CallSite,
    ) -> ResolvedFields {
        let record = self.build_record(level, message, fields.needs_runtime(), site);
        self.resolve_fields(fields, &record)
    }

    /// Emit at `level`, attributing the record to the caller of this method
    ///
    /// Wrappers around this method must be `#[track_caller]` themselves, or
    /// they become the reported call site. `funcname` is found by matching
    /// the caller's location against the stack, which needs debug info; when
    /// no frame matches it resolves to `"???"`. The logging macros supply the
    /// function name directly.
    #[track_caller]
    pub fn log(&self, fields: &FieldSet, level: LogLevel, message: impl Into<String>) -> ResolvedFields {
        self.emit(fields, level, message, CallSite::caller())
    }

    #[inline]
    #[track_caller]
    pub fn trace(&self, fields: &FieldSet, message: impl Into<String>) -> ResolvedFields {
        self.log(fields, LogLevel::Trace, message)
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, fields: &FieldSet, message: impl Into<String>) -> ResolvedFields {
        self.log(fields, LogLevel::Debug, message)
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, fields: &FieldSet, message: impl Into<String>) -> ResolvedFields {
        self.log(fields, LogLevel::Info, message)
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, fields: &FieldSet, message: impl Into<String>) -> ResolvedFields {
        self.log(fields, LogLevel::Warn, message)
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, fields: &FieldSet, message: impl Into<String>) -> ResolvedFields {
        self.log(fields, LogLevel::Error, message)
    }

    #[inline]
    #[track_caller]
    pub fn fatal(&self, fields: &FieldSet, message: impl Into<String>) -> ResolvedFields {
        self.log(fields, LogLevel::Fatal, message)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(DEFAULT_LOGGER_NAME)
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_logger_fields::prelude::*;
/// use std::sync::Arc;
///
/// let registry = FieldRegistry::builder()
///     .custom_field("service", false, |_, _| FieldValue::from("billing"))
///     .build()
///     .unwrap();
///
/// let logger = Logger::builder()
///     .name("billing")
///     .timestamp_format(TimestampFormat::Iso8601Micros)
///     .registry(Arc::new(registry))
///     .build()
///     .unwrap();
///
/// assert!(logger.field_set(["time", "service", "message"]).is_ok());
/// ```
pub struct LoggerBuilder {
    name: String,
    timestamp_format: TimestampFormat,
    start_time: Option<DateTime<Utc>>,
    registry: Option<Arc<FieldRegistry>>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            name: DEFAULT_LOGGER_NAME.to_string(),
            timestamp_format: TimestampFormat::default(),
            start_time: None,
            registry: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the format used by the `time` field
    #[must_use = "builder methods return a new value"]
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Use a strftime-compatible format for the `time` field
    #[must_use = "builder methods return a new value"]
    pub fn custom_timestamp(mut self, format_str: &str) -> Self {
        self.timestamp_format = TimestampFormat::Custom(format_str.to_string());
        self
    }

    /// Override the start time, which defaults to the moment of `build`
    ///
    /// `created`, `nsecs` and `rtime` are measured from it.
    #[must_use = "builder methods return a new value"]
    pub fn start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = Some(start_time);
        self
    }

    /// Share a field registry, e.g. one with custom fields
    #[must_use = "builder methods return a new value"]
    pub fn registry(mut self, registry: Arc<FieldRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Build the Logger
    ///
    /// Fails if the name is empty or the timestamp format is not a valid
    /// strftime string.
    pub fn build(self) -> Result<Logger> {
        if self.name.is_empty() {
            return Err(LoggerError::config("Logger", "name must not be empty"));
        }
        self.timestamp_format.validate()?;

        Ok(Logger {
            name: self.name,
            start_time: self.start_time.unwrap_or_else(Utc::now),
            timestamp_format: self.timestamp_format,
            seqid: AtomicU64::new(0),
            registry: self.registry.unwrap_or_default(),
            metrics: LoggerMetrics::new(),
        })
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Field;
    use chrono::TimeZone;

    #[test]
    fn test_builder_defaults() {
        let logger = Logger::builder().build().unwrap();
        assert_eq!(logger.name(), DEFAULT_LOGGER_NAME);
        assert_eq!(logger.timestamp_format(), &TimestampFormat::Rfc3339Nanos);
        assert_eq!(logger.seqid(), 0);
        assert_eq!(logger.metrics().records_built(), 0);
    }

    #[test]
    fn test_builder_full_configuration() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().unwrap();
        let logger = Logger::builder()
            .name("api")
            .custom_timestamp("%H:%M")
            .start_time(start)
            .build()
            .unwrap();

        assert_eq!(logger.name(), "api");
        assert_eq!(logger.start_time(), &start);
        assert_eq!(
            logger.timestamp_format(),
            &TimestampFormat::Custom("%H:%M".to_string())
        );
    }

    #[test]
    fn test_builder_rejects_invalid_timestamp_format() {
        let result = Logger::builder().custom_timestamp("%Y-%Q").build();
        assert!(matches!(result, Err(LoggerError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_builder_rejects_empty_name() {
        let err = Logger::builder().name("").build().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid configuration for Logger: name must not be empty"
        );
    }

    #[test]
    fn test_default_logger() {
        assert_eq!(Logger::default().name(), DEFAULT_LOGGER_NAME);
    }

    #[test]
    fn test_seqid_increments_per_record() {
        let logger = Logger::new("seq");
        let fields = FieldSet::builtin(&[Field::Seqid]);
        for expected in 1..=5u64 {
            let resolved = logger.info(&fields, "tick");
            assert_eq!(resolved.get("seqid"), Some(&FieldValue::Uint(expected)));
        }
        assert_eq!(logger.seqid(), 5);
    }

    #[test]
    fn test_independent_loggers_have_independent_counters() {
        let first = Logger::new("first");
        let second = Logger::new("second");
        let fields = FieldSet::builtin(&[Field::Seqid]);

        first.info(&fields, "a");
        first.info(&fields, "b");
        let resolved = second.info(&fields, "c");

        assert_eq!(resolved.get("seqid"), Some(&FieldValue::Uint(1)));
        assert_eq!(first.seqid(), 2);
    }

    #[test]
    fn test_repeated_field_resolves_once() {
        let logger = Logger::new("dup");
        let fields = logger.field_set(["seqid", "message", "seqid"]).unwrap();
        let resolved = logger.warn(&fields, "twice");

        let seqids: Vec<&FieldValue> = resolved
            .iter()
            .filter(|(name, _)| *name == "seqid")
            .map(|(_, value)| value)
            .collect();
        assert_eq!(seqids, vec![&FieldValue::Uint(1), &FieldValue::Uint(1)]);
        assert_eq!(logger.seqid(), 1);
    }

    #[test]
    fn test_level_methods() {
        let logger = Logger::new("levels");
        let fields = FieldSet::builtin(&[Field::Levelname, Field::Levelno]);

        let cases = [
            (logger.trace(&fields, "m"), "TRACE", 0),
            (logger.debug(&fields, "m"), "DEBUG", 1),
            (logger.info(&fields, "m"), "INFO", 2),
            (logger.warn(&fields, "m"), "WARN", 3),
            (logger.error(&fields, "m"), "ERROR", 4),
            (logger.fatal(&fields, "m"), "FATAL", 5),
        ];
        for (resolved, name, number) in cases {
            assert_eq!(resolved.get("levelname"), Some(&FieldValue::from(name)));
            assert_eq!(resolved.get("levelno"), Some(&FieldValue::Int(number)));
        }
    }

    #[test]
    fn test_track_caller_attribution() {
        let logger = Logger::new("caller");
        let fields = FieldSet::builtin(&[Field::Pathname, Field::Lineno, Field::Funcname]);

        let line = i64::from(line!()) + 1;
        let resolved = logger.info(&fields, "here");

        assert_eq!(resolved.get("pathname"), Some(&FieldValue::from(file!())));
        assert_eq!(resolved.get("lineno"), Some(&FieldValue::Int(line)));
        assert_eq!(
            resolved.get("funcname"),
            Some(&FieldValue::from("test_track_caller_attribution"))
        );
    }

    #[test]
    fn test_resolve_by_name() {
        let logger = Logger::new("named");
        let record = logger.build_record(LogLevel::Info, "m", false, CallSite::unknown());
        assert_eq!(logger.resolve("name", &record).unwrap(), FieldValue::from("named"));
        assert!(logger.resolve("colour", &record).is_err());
    }

    #[test]
    fn test_logger_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Logger>();
    }
}
