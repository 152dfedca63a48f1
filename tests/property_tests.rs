//! Property-based tests for rust_logger_fields using proptest

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rust_logger_fields::core::field::Field;
use rust_logger_fields::prelude::*;
use rust_logger_fields::short_func_name;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Trace),
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warn),
        Just(LogLevel::Error),
        Just(LogLevel::Fatal),
    ]
}

fn any_field() -> impl Strategy<Value = Field> {
    proptest::sample::select(Field::ALL.to_vec())
}

// ============================================================================
// Registry Tests
// ============================================================================

proptest! {
    /// Test that every built-in token resolves for any level and message
    #[test]
    fn test_builtin_fields_always_resolve(
        field in any_field(),
        level in any_level(),
        message in ".*",
        capture in any::<bool>(),
    ) {
        let logger = Logger::new("prop");
        let record = logger.build_record(level, message, capture, CallSite::caller());
        prop_assert!(logger.resolve(field.to_str(), &record).is_ok());
    }

    /// Test that names outside the registry fail with UnknownField
    #[test]
    fn test_unknown_names_rejected(name in "[a-z_]{1,12}") {
        prop_assume!(name.parse::<Field>().is_err());

        let logger = Logger::new("prop");
        let record = logger.build_record(LogLevel::Info, "m", false, CallSite::unknown());
        let is_unknown_field = matches!(
            logger.resolve(&name, &record),
            Err(LoggerError::UnknownField { .. })
        );
        prop_assert!(is_unknown_field);
        prop_assert!(logger.field_set([name.as_str()]).is_err());
        prop_assert!(!logger.registry().supports_field(&name));
    }

    /// Test that a field set needs capture exactly when one of its fields does
    #[test]
    fn test_runtime_flag_matches_fields(fields in proptest::collection::vec(any_field(), 0..8)) {
        let set = FieldSet::builtin(&fields);
        let expected = fields.iter().any(Field::requires_runtime);
        prop_assert_eq!(set.needs_runtime(), expected);

        let names: Vec<&str> = fields.iter().map(Field::to_str).collect();
        prop_assert_eq!(
            Logger::new("prop").registry().needs_runtime_capture(names.iter().copied()),
            expected
        );
    }
}

// ============================================================================
// Function Name Tests
// ============================================================================

proptest! {
    /// Test that only the last path component survives
    #[test]
    fn test_short_func_name_keeps_last_component(
        path in proptest::collection::vec("[a-zA-Z_][a-zA-Z0-9_]{0,8}", 1..6),
        dotted in any::<bool>(),
    ) {
        let separator = if dotted { "." } else { "::" };
        let qualified = path.join(separator);
        prop_assert_eq!(short_func_name(&qualified), path.last().unwrap().as_str());
    }

    /// Test that closure segments are skipped
    #[test]
    fn test_short_func_name_skips_closures(name in "[a-z_]{1,10}", depth in 1usize..4) {
        let qualified = format!("app::module::{}{}", name, "::{{closure}}".repeat(depth));
        prop_assert_eq!(short_func_name(&qualified), name.as_str());
    }
}

// ============================================================================
// Time Tests
// ============================================================================

proptest! {
    /// Test that rtime == timestamp - created for arbitrary start times
    #[test]
    fn test_relative_time_consistency(
        secs in 0i64..1_700_000_000,
        nanos in 0u32..1_000_000_000,
    ) {
        let start = Utc.timestamp_opt(secs, nanos).single().unwrap();
        let logger = Logger::builder().start_time(start).build().unwrap();
        let fields = FieldSet::builtin(&[Field::Created, Field::Nsecs, Field::Timestamp, Field::Rtime]);
        let resolved = logger.info(&fields, "t");

        let created = resolved.get("created").and_then(FieldValue::as_i64).unwrap();
        let timestamp = resolved.get("timestamp").and_then(FieldValue::as_i64).unwrap();
        let rtime = resolved.get("rtime").and_then(FieldValue::as_i64).unwrap();

        prop_assert_eq!(created, secs * 1_000_000_000 + i64::from(nanos));
        prop_assert_eq!(resolved.get("nsecs").cloned(), Some(FieldValue::Int(i64::from(nanos))));
        prop_assert_eq!(rtime, timestamp - created);
    }
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Test that LogLevel string conversions roundtrip correctly
    #[test]
    fn test_log_level_str_roundtrip(level in any_level()) {
        let parsed: LogLevel = level.to_str().parse().unwrap();
        prop_assert_eq!(level, parsed);
    }

    /// Test that levelno and levelname agree with the record's level
    #[test]
    fn test_level_fields(level in any_level()) {
        let logger = Logger::new("prop");
        let fields = FieldSet::builtin(&[Field::Levelno, Field::Levelname]);
        let resolved = logger.log(&fields, level, "m");

        prop_assert_eq!(resolved.get("levelno").cloned(), Some(FieldValue::Int(level as i64)));
        prop_assert_eq!(resolved.get("levelname").cloned(), Some(FieldValue::from(level.to_str())));
    }
}
