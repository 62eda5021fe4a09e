//! Log record format module
//!
//! Two renderings of the same record:
//! - `text` (`key=value` pairs, used in debug mode)
//! - `json` (one object per line)

use chrono::{DateTime, Local};
use serde_json::Value;

use super::{Level, LogValue};

/// Output format of log records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// One log line before rendering
pub struct LogRecord<'a> {
    pub time: DateTime<Local>,
    pub level: Level,
    pub message: &'a str,
    pub fields: &'a [(&'a str, &'a dyn LogValue)],
}

impl LogRecord<'_> {
    pub fn format(&self, format: LogFormat) -> String {
        match format {
            LogFormat::Text => self.format_text(),
            LogFormat::Json => self.format_json(),
        }
    }

    fn timestamp(&self) -> String {
        self.time.format("%Y-%m-%dT%H:%M:%S%.3f%:z").to_string()
    }

    /// `time=... level=INFO msg="..." key=value`
    fn format_text(&self) -> String {
        let mut line = format!(
            "time={} level={} msg={}",
            self.timestamp(),
            self.level,
            quote_text(self.message)
        );
        for (key, value) in self.fields {
            line.push(' ');
            line.push_str(key);
            line.push('=');
            match value.to_json() {
                Value::String(s) => line.push_str(&quote_text(&s)),
                other => line.push_str(&other.to_string()),
            }
        }
        line
    }

    /// Keys keep their insertion order; numbers and booleans stay unquoted
    fn format_json(&self) -> String {
        let mut line = format!(
            r#"{{"time":{},"level":{},"msg":{}"#,
            json_string(&self.timestamp()),
            json_string(&self.level.to_string()),
            json_string(self.message)
        );
        for (key, value) in self.fields {
            line.push(',');
            line.push_str(&json_string(key));
            line.push(':');
            line.push_str(&value.to_json().to_string());
        }
        line.push('}');
        line
    }
}

fn json_string(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}

/// Quote a text value only when it would not survive as a bare token
fn quote_text(s: &str) -> String {
    let needs_quotes =
        s.is_empty() || s.chars().any(|c| c.is_whitespace() || c == '"' || c == '=' || c.is_control());
    if needs_quotes {
        format!("{s:?}")
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(format: LogFormat) -> String {
        let status = 204;
        let record = LogRecord {
            time: Local::now(),
            level: Level::Debug,
            message: "Response served",
            fields: &[("name", &"globd"), ("path", &"/a b.txt"), ("status", &status)],
        };
        record.format(format)
    }

    #[test]
    fn test_format_text() {
        let log = render(LogFormat::Text);
        assert!(log.starts_with("time="));
        assert!(log.contains("level=DEBUG"));
        assert!(log.contains(r#"msg="Response served""#));
        assert!(log.contains("name=globd"));
        assert!(log.contains(r#"path="/a b.txt""#));
        assert!(log.ends_with("status=204"));
    }

    #[test]
    fn test_format_json() {
        let log = render(LogFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&log).unwrap();
        assert_eq!(value["level"], "DEBUG");
        assert_eq!(value["msg"], "Response served");
        assert_eq!(value["path"], "/a b.txt");
        assert_eq!(value["status"], 204);
        assert!(log.contains(r#""status":204"#));
        // Insertion order is preserved
        assert!(log.find("\"time\"").unwrap() < log.find("\"status\"").unwrap());
    }

    #[test]
    fn test_quote_text() {
        assert_eq!(quote_text("plain"), "plain");
        assert_eq!(quote_text(""), "\"\"");
        assert_eq!(quote_text("a=b"), "\"a=b\"");
        assert_eq!(quote_text("line\nbreak"), "\"line\\nbreak\"");
    }
}
