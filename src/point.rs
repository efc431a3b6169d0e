// Outbound time-series record and its InfluxDB line-protocol rendering.
use chrono::DateTime;
use std::collections::BTreeMap;
use std::fmt::Write;

pub const MEASUREMENT: &str = "environment";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataPoint {
    pub measurement: String,
    pub timestamp_ns: i64,
    pub fields: Vec<(String, FieldValue)>,
    pub tags: BTreeMap<String, String>,
}

impl DataPoint {
    /// Render as a single line, e.g.
    /// `environment,device=1A2B status=1i,dhtTemp=12.74 1000000000000000000`.
    pub fn to_line_protocol(&self) -> String {
        let mut line = escape(&self.measurement, &[',', ' ']);

        // The store refuses tags with an empty key or value.
        for (key, value) in self.tags.iter().filter(|(k, v)| !k.is_empty() && !v.is_empty()) {
            let _ = write!(line, ",{}={}", escape_key(key), escape_key(value));
        }

        for (i, (key, value)) in self.fields.iter().enumerate() {
            line.push(if i == 0 { ' ' } else { ',' });
            line.push_str(&escape_key(key));
            line.push('=');
            match value {
                FieldValue::Integer(v) => {
                    let _ = write!(line, "{v}i");
                }
                FieldValue::Float(v) => {
                    let _ = write!(line, "{v}");
                }
            }
        }

        let _ = write!(line, " {}", self.timestamp_ns);
        line
    }
}

/// Convert a device timestamp in whole seconds to nanoseconds since the epoch.
/// Returns `None` when the result does not fit an `i64`.
pub fn seconds_to_nanos(secs: i64) -> Option<i64> {
    DateTime::from_timestamp(secs, 0)?.timestamp_nanos_opt()
}

fn escape_key(s: &str) -> String {
    escape(s, &[',', '=', ' '])
}

/// Backslash-escape `special` characters. Backslashes are always escaped and
/// newlines become `\n`, so a value can never end the line or swallow the
/// separator that follows it.
fn escape(s: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c if special.contains(&c) => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point() -> DataPoint {
        DataPoint {
            measurement: MEASUREMENT.to_string(),
            timestamp_ns: 1_000_000_000_000_000_000,
            fields: vec![
                ("status".to_string(), FieldValue::Integer(1)),
                ("dhtTemp".to_string(), FieldValue::Float(12.5)),
            ],
            tags: BTreeMap::from([
                ("device".to_string(), "1A2B".to_string()),
                ("station".to_string(), "0C3D".to_string()),
            ]),
        }
    }

    #[test]
    fn test_seconds_to_nanos() {
        assert_eq!(seconds_to_nanos(1_000_000_000), Some(1_000_000_000_000_000_000));
        assert_eq!(seconds_to_nanos(0), Some(0));
        assert_eq!(seconds_to_nanos(-1), Some(-1_000_000_000));
    }

    #[test]
    fn test_seconds_to_nanos_overflow() {
        assert_eq!(seconds_to_nanos(10_000_000_000), None);
        assert_eq!(seconds_to_nanos(i64::MAX), None);
    }

    #[test]
    fn test_line_protocol() {
        assert_eq!(
            point().to_line_protocol(),
            "environment,device=1A2B,station=0C3D status=1i,dhtTemp=12.5 1000000000000000000"
        );
    }

    #[test]
    fn test_line_protocol_without_tags() {
        let mut p = point();
        p.tags.clear();
        assert_eq!(p.to_line_protocol(), "environment status=1i,dhtTemp=12.5 1000000000000000000");
    }

    #[test]
    fn test_line_protocol_escaping() {
        let mut p = point();
        p.measurement = "env room".to_string();
        p.tags = BTreeMap::from([("site name".to_string(), "a=b,c".to_string())]);
        assert_eq!(
            p.to_line_protocol(),
            "env\\ room,site\\ name=a\\=b\\,c status=1i,dhtTemp=12.5 1000000000000000000"
        );
    }

    #[test]
    fn test_line_protocol_newline_stays_on_one_line() {
        let mut p = point();
        p.tags = BTreeMap::from([("x".to_string(), "a\nevil status=99i 0".to_string())]);
        let line = p.to_line_protocol();
        assert!(!line.contains('\n'));
        assert_eq!(
            line,
            "environment,x=a\\nevil\\ status\\=99i\\ 0 status=1i,dhtTemp=12.5 1000000000000000000"
        );
    }

    #[test]
    fn test_line_protocol_trailing_backslash() {
        let mut p = point();
        p.tags = BTreeMap::from([("path".to_string(), "C:\\".to_string())]);
        assert_eq!(
            p.to_line_protocol(),
            "environment,path=C:\\\\ status=1i,dhtTemp=12.5 1000000000000000000"
        );
    }

    #[test]
    fn test_line_protocol_skips_empty_tags() {
        let mut p = point();
        p.tags = BTreeMap::from([
            ("".to_string(), "v".to_string()),
            ("k".to_string(), "".to_string()),
        ]);
        assert_eq!(p.to_line_protocol(), "environment status=1i,dhtTemp=12.5 1000000000000000000");
    }
}
