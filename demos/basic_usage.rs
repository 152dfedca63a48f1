//! Basic field resolution example
//!
//! Demonstrates field sets, caller capture and custom fields.
//!
//! Run with: cargo run --example basic_usage

use rust_logger_fields::prelude::*;
use rust_logger_fields::{info, warn};
use std::sync::Arc;

fn main() -> Result<()> {
    println!("=== Rust Logger Fields - Basic Usage Example ===\n");

    let registry = FieldRegistry::builder()
        .custom_field("service", false, |_, _| FieldValue::from("demo"))
        .build()?;

    let logger = Logger::builder()
        .name("demo")
        .timestamp_format(TimestampFormat::Iso8601Micros)
        .registry(Arc::new(registry))
        .build()?;

    // Cheap fields never capture the call site
    println!("1. Fields without call-site capture:");
    let cheap = logger.field_set(["seqid", "time", "levelname", "service", "message"])?;
    println!("   {}", logger.info(&cheap, "Service started"));
    println!("   {}", logger.debug(&cheap, "Configuration loaded"));

    // Location fields capture the caller
    println!("\n2. Fields with call-site capture:");
    let located = logger.field_set(["seqid", "levelname", "filename", "lineno", "funcname", "message"])?;
    println!("   {}", info!(logger, &located, "Listening on port {}", 8080));
    println!("   {}", warn!(logger, &located, "Disk usage at {}%", 91));

    // Unknown tokens are rejected before anything is emitted
    println!("\n3. Validating a field list:");
    match logger.field_set(["time", "hostname"]) {
        Ok(_) => println!("   unexpected success"),
        Err(e) => println!("   rejected: {}", e),
    }

    println!("\n4. JSON for a formatter:");
    let resolved = logger.error(&cheap, "Upstream timeout");
    println!("   {}", resolved.to_json_string()?);

    let metrics = logger.metrics();
    println!(
        "\nRecords built: {}, call-site captures: {}",
        metrics.records_built(),
        metrics.runtime_captures()
    );

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
