//! Structured logging: subscriber setup and JSON access-log lines.
//!
//! Access log format:
//! ```json
//! {"ts":"2024-12-28T15:04:05.123Z","level":"info","type":"access","msg":"GET /hello 200","ctx":{},"data":{}}
//! ```

use std::io::{self, Write};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Respects `RUST_LOG`; defaults to info-level output for this crate.
pub fn init() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "otel_hello=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// One access-log line with unified structure.
#[derive(Serialize)]
pub struct AccessEntry<'a> {
    /// ISO 8601 timestamp with milliseconds, UTC
    pub ts: String,
    /// Log level: always "info" for access lines
    pub level: &'a str,
    /// Log type
    #[serde(rename = "type")]
    pub log_type: &'a str,
    /// "METHOD /path STATUS"
    pub msg: String,
    /// Correlation context
    pub ctx: AccessContext<'a>,
    /// Request/response facts
    pub data: AccessData<'a>,
}

/// Correlation context for an access line.
#[derive(Serialize)]
pub struct AccessContext<'a> {
    /// Service name
    pub service: &'a str,
    /// Request ID for correlation
    pub request_id: &'a str,
    /// Trace id, or the not-sampled placeholder
    pub trace_id: &'a str,
    /// Root span id, or the not-sampled placeholder
    pub span_id: &'a str,
}

/// Request/response facts for an access line.
#[derive(Serialize)]
pub struct AccessData<'a> {
    pub method: &'a str,
    pub path: &'a str,
    pub handler: &'a str,
    pub status: u16,
    pub bytes: u64,
    pub duration_ms: f64,
    pub ip: &'a str,
}

/// Log one access line with trace correlation.
#[allow(clippy::too_many_arguments)]
pub fn log_access(
    request_id: &str,
    ip: &str,
    method: &str,
    path: &str,
    handler: &str,
    status: u16,
    bytes: u64,
    duration_ms: f64,
    trace_id: &str,
    span_id: &str,
) {
    let entry = AccessEntry {
        ts: iso8601_now(),
        level: "info",
        log_type: "access",
        msg: format!("{} {} {}", method, path, status),
        ctx: AccessContext {
            service: "otel_hello",
            request_id,
            trace_id,
            span_id,
        },
        data: AccessData {
            method,
            path,
            handler,
            status,
            bytes,
            duration_ms,
            ip,
        },
    };
    if let Ok(line) = serde_json::to_string(&entry) {
        let _ = writeln!(io::stdout(), "{}", line);
    }
}

/// ISO 8601 timestamp with milliseconds, UTC.
fn iso8601_now() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    iso8601_from(now)
}

// Valid for 1970-2099; good enough for log lines.
fn iso8601_from(since_epoch: Duration) -> String {
    let secs = since_epoch.as_secs();
    let millis = since_epoch.subsec_millis();

    let day_secs = secs % 86400;
    let hours = day_secs / 3600;
    let minutes = (day_secs % 3600) / 60;
    let seconds = day_secs % 60;

    let mut days = secs / 86400;
    let mut year = 1970u64;
    loop {
        let year_days = if is_leap_year(year) { 366 } else { 365 };
        if days < year_days {
            break;
        }
        days -= year_days;
        year += 1;
    }

    let month_days: [u64; 12] = if is_leap_year(year) {
        [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    } else {
        [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    };

    let mut month = 1;
    for &in_month in &month_days {
        if days < in_month {
            break;
        }
        days -= in_month;
        month += 1;
    }
    let day = days + 1;

    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        year, month, day, hours, minutes, seconds, millis
    )
}

fn is_leap_year(year: u64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}
