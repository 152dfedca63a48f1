//! Resolvers for the built-in fields
//!
//! Every resolver is a read of logger or record state. None of them can fail:
//! anything that cannot be determined degrades to a default value.

use super::field::Field;
use super::field_value::FieldValue;
use super::logger::Logger;
use super::record::Record;
use super::timestamp::unix_nanos;
use std::sync::OnceLock;

/// Resolve a built-in field
pub(crate) fn resolve_builtin(field: Field, logger: &Logger, record: &Record) -> FieldValue {
    match field {
        Field::Name => logger.name().into(),
        Field::Seqid => record.seqid.into(),
        Field::Levelno => record.level.number().into(),
        Field::Levelname => record.level.to_str().into(),
        Field::Created => created(logger).into(),
        Field::Nsecs => FieldValue::Int(i64::from(logger.start_time().timestamp_subsec_nanos())),
        Field::Time => logger.timestamp_format().format(&record.time).into(),
        Field::Timestamp => unix_nanos(&record.time).into(),
        Field::Rtime => rtime(logger, record).into(),
        Field::Filename => record.filename.into(),
        Field::Pathname => record.pathname.into(),
        Field::Module => module_name().into(),
        Field::Lineno => record.lineno.into(),
        Field::Funcname => record.funcname.into(),
        Field::Thread => record.thread.as_str().into(),
        Field::Process => record.process_id().into(),
        Field::Message => record.message.as_str().into(),
    }
}

fn created(logger: &Logger) -> i64 {
    unix_nanos(logger.start_time())
}

/// Nanoseconds since the logger started
fn rtime(logger: &Logger, record: &Record) -> i64 {
    let elapsed = record.time.signed_duration_since(*logger.start_time());
    elapsed.num_nanoseconds().unwrap_or(if elapsed < chrono::Duration::zero() {
        i64::MIN
    } else {
        i64::MAX
    })
}

/// Base name of the running executable, or an empty string if unknown
fn module_name() -> &'static str {
    static MODULE: OnceLock<String> = OnceLock::new();
    MODULE.get_or_init(|| {
        std::env::current_exe()
            .ok()
            .and_then(|path| {
                path.file_name()
                    .map(|name| name.to_string_lossy().into_owned())
            })
            .unwrap_or_default()
    })
}
