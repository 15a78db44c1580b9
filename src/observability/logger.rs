//! Structured logger
//!
//! One call = one `tracing` event under the `tabledef` target. Extra fields
//! are rendered as a single JSON object with keys in sorted order so the
//! same call always produces the same `detail` text.

use std::collections::BTreeMap;
use std::fmt;

/// `tracing` target for every event emitted here
pub const TARGET: &str = "tabledef";

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Debug-level detail
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Recoverable issues
    Warn = 2,
    /// Operation failures
    Error = 3,
    /// Unrecoverable, caller is expected to stop
    Fatal = 4,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structured logger facade over `tracing`
pub struct Logger;

impl Logger {
    /// Log an event with the given severity and fields
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        let detail = render_fields(fields);
        let severity_name = severity.as_str();

        match severity {
            Severity::Trace => {
                tracing::trace!(target: TARGET, event = event, severity = severity_name, detail = %detail)
            }
            Severity::Info => {
                tracing::info!(target: TARGET, event = event, severity = severity_name, detail = %detail)
            }
            Severity::Warn => {
                tracing::warn!(target: TARGET, event = event, severity = severity_name, detail = %detail)
            }
            Severity::Error | Severity::Fatal => {
                tracing::error!(target: TARGET, event = event, severity = severity_name, detail = %detail)
            }
        }
    }

    /// Log at TRACE level
    pub fn trace(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Trace, event, fields);
    }

    /// Log at INFO level
    pub fn info(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Info, event, fields);
    }

    /// Log at WARN level
    pub fn warn(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Warn, event, fields);
    }

    /// Log at ERROR level
    pub fn error(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Error, event, fields);
    }

    /// Log at FATAL level
    pub fn fatal(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Fatal, event, fields);
    }
}

/// Renders fields as a JSON object with sorted keys.
///
/// Later duplicates of a key overwrite earlier ones.
pub fn render_fields(fields: &[(&str, &str)]) -> String {
    let sorted: BTreeMap<&str, &str> = fields.iter().copied().collect();
    serde_json::to_string(&sorted).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Capture {
        type Writer = Capture;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture(f: impl FnOnce()) -> Vec<serde_json::Value> {
        let sink = Capture::default();
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::TRACE)
            .with_writer(sink.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);

        let bytes = sink.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Trace < Severity::Info);
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Error);
        assert!(Severity::Error < Severity::Fatal);
    }

    #[test]
    fn test_render_fields_sorted() {
        let a = render_fields(&[("zebra", "1"), ("apple", "2"), ("mango", "3")]);
        let b = render_fields(&[("mango", "3"), ("zebra", "1"), ("apple", "2")]);
        assert_eq!(a, b);
        assert_eq!(a, r#"{"apple":"2","mango":"3","zebra":"1"}"#);
    }

    #[test]
    fn test_render_fields_escapes() {
        let rendered = render_fields(&[("message", "hello \"world\"\nline2")]);
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed["message"], "hello \"world\"\nline2");
    }

    #[test]
    fn test_one_line_per_event() {
        let lines = capture(|| {
            Logger::info("TABLE_CREATE_COMPLETE", &[("table", "movies")]);
            Logger::fatal("TABLE_INFO_FAULT", &[]);
        });

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["level"], "INFO");
        assert_eq!(lines[0]["target"], TARGET);
        assert_eq!(lines[0]["fields"]["event"], "TABLE_CREATE_COMPLETE");
        assert_eq!(lines[0]["fields"]["detail"], r#"{"table":"movies"}"#);
        assert_eq!(lines[1]["level"], "ERROR");
        assert_eq!(lines[1]["fields"]["severity"], "FATAL");
    }
}
