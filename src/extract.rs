//! The core pipeline: log filtering, address extraction and event detail
//! extraction. All functions here are pure; ordering always follows the
//! original log sequence.

use std::collections::HashSet;

use serde_json::Value;

use crate::types::{EventRecord, LogEntry};

/// Select the ordered subsequence of logs whose decoded event name equals
/// the configured one. No match yields an empty sequence, not an error.
pub fn filter_logs<'a>(logs: &'a [LogEntry], event_name: &str) -> Vec<&'a LogEntry> {
    logs.iter()
        .filter(|log| log.name.as_deref() == Some(event_name))
        .collect()
}

/// Distinct emitting addresses of the filtered logs, first-occurrence order.
/// Address equality is exact string match, case-sensitive as received from
/// the provider.
pub fn extract_addresses(filtered: &[&LogEntry]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut addresses = Vec::new();

    for log in filtered {
        if seen.insert(log.raw.address.as_str()) {
            addresses.push(log.raw.address.clone());
        }
    }

    addresses
}

/// Flatten each filtered log into one record: `{name: <event>}` first, then
/// every input field in order, stringified. A duplicate field name keeps the
/// first position but takes the later value, so an input literally named
/// `name` overwrites the reserved key. That matches the observable payload
/// shape of the deployed relay and is deliberately not guarded against.
pub fn extract_event_details(filtered: &[&LogEntry]) -> Vec<EventRecord> {
    filtered
        .iter()
        .map(|log| {
            let mut record = EventRecord::new();
            record.insert(
                "name".to_string(),
                Value::String(log.name.clone().unwrap_or_default()),
            );

            for input in &log.inputs {
                record.insert(
                    input.soltype.name.clone(),
                    Value::String(stringify(&input.value)),
                );
            }

            record
        })
        .collect()
}

/// Canonical string form of a decoded input value: strings pass through
/// unquoted, numbers render in decimal, booleans and null as their literal
/// words, arrays join their stringified elements with commas, compound
/// objects serialize as compact JSON.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(stringify)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}
