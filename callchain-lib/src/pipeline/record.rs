use std::fmt::{self, Write as _};
use serde::Serialize;
use serde_json::{json, Value};

/// Result of `transform_data`. Serializes as `{"id", "processed", "timestamp"}`
/// and displays as a Python dict literal, `{'id': 123, 'processed': True, ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRecord {
    pub id: Value,
    pub processed: bool,
    pub timestamp: f64,
}

impl fmt::Display for OutputRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{'id': {}, 'processed': {}, 'timestamp': ",
            PyLiteral(&self.id),
            PyLiteral(&Value::Bool(self.processed))
        )?;
        write_float(f, self.timestamp)?;
        f.write_char('}')
    }
}

/// Displays a JSON value the way Python's `repr` shows the equivalent object
struct PyLiteral<'a>(pub &'a Value);

impl fmt::Display for PyLiteral<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::Null => f.write_str("None"),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Number(n) => match n.as_f64() {
                Some(x) if n.is_f64() => write_float(f, x),
                _ => write!(f, "{n}"),
            },
            Value::String(s) => write_str(f, s),
            Value::Array(items) => {
                f.write_char('[')?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", PyLiteral(item))?;
                }
                f.write_char(']')
            }
            Value::Object(map) => {
                f.write_char('{')?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_str(f, key)?;
                    write!(f, ": {}", PyLiteral(value))?;
                }
                f.write_char('}')
            }
        }
    }
}

/// Whole floats keep a trailing `.0`
fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    if x.is_finite() && x.fract() == 0.0 {
        write!(f, "{x:.1}")
    } else {
        write!(f, "{x}")
    }
}

/// Single quotes unless the text holds a single quote and no double quote
fn write_str(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    f.write_char(quote)?;
    for c in s.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c == quote => {
                f.write_char('\\')?;
                f.write_char(c)?;
            }
            c => f.write_char(c)?,
        }
    }
    f.write_char(quote)
}

/// Whether a value counts as present for `validate_input`.
///
/// `null`, `false`, zero, `""`, `[]` and `{}` are falsy.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// The record the program runs on when given no arguments
#[must_use]
pub fn sample_record() -> Value {
    json!({
        "id": 123,
        "name": "Test"
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_truthy() {
        for falsy in [json!(null), json!(false), json!(0), json!(0.0), json!(""), json!([]), json!({})] {
            assert!(!is_truthy(&falsy), "{falsy}");
        }
        for truthy in [json!(true), json!(-1), json!(0.5), json!("x"), json!([0]), json!({"id": 1})] {
            assert!(is_truthy(&truthy), "{truthy}");
        }
    }

    #[test]
    fn test_output_record_displays_as_python_dict() {
        let record = OutputRecord {
            id: json!(123),
            processed: true,
            timestamp: 1.5,
        };
        assert_eq!(record.to_string(), "{'id': 123, 'processed': True, 'timestamp': 1.5}");

        let whole = OutputRecord {
            id: json!("a-1"),
            processed: false,
            timestamp: 5.0,
        };
        assert_eq!(whole.to_string(), "{'id': 'a-1', 'processed': False, 'timestamp': 5.0}");
    }

    #[test]
    fn test_output_record_serializes_as_json() {
        let record = OutputRecord {
            id: json!(123),
            processed: true,
            timestamp: 1.5,
        };
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"id":123,"processed":true,"timestamp":1.5}"#
        );
    }

    #[test]
    fn test_py_literal_nested_values() {
        let value = json!({"b": [1, 2.0, null], "a": "it's", "c": {"ok": true}});
        assert_eq!(
            PyLiteral(&value).to_string(),
            r#"{'a': "it's", 'b': [1, 2.0, None], 'c': {'ok': True}}"#
        );
        assert_eq!(PyLiteral(&json!("tab\there")).to_string(), r"'tab\there'");
    }

    #[test]
    fn test_sample_record() {
        let sample = sample_record();
        assert_eq!(sample["id"], json!(123));
        assert_eq!(sample["name"], json!("Test"));
    }
}
