//! Flattening of nested ("objective") translation data.
//!
//! Keys are joined with `.` for both object keys and array indices, so
//!
//! ```yaml
//! gui:
//!   title: Hello
//!   buttons: [Ok, Cancel]
//! stone:
//!   "": Stone
//!   desc: A rock
//! ```
//!
//! becomes `gui.title`, `gui.buttons.0`, `gui.buttons.1`, `stone` and
//! `stone.desc`. An empty key names its parent path. Numbers and booleans
//! are stringified, nulls are dropped.

use serde_json::{Map, Value};

/// Flat translation table, key to translated text.
pub type Texts = Map<String, Value>;

/// Flatten a nested value into a flat translation table.
pub fn flatten(value: &Value) -> Texts {
    let mut texts = Texts::new();
    flatten_into(value, "", &mut texts);
    texts
}

fn flatten_into(value: &Value, prefix: &str, out: &mut Texts) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten_into(child, &join(prefix, key), out);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten_into(child, &join(prefix, &index.to_string()), out);
            }
        }
        Value::String(s) => {
            out.insert(prefix.to_string(), Value::String(s.clone()));
        }
        Value::Number(n) => {
            out.insert(prefix.to_string(), Value::String(n.to_string()));
        }
        Value::Bool(b) => {
            out.insert(prefix.to_string(), Value::String(b.to_string()));
        }
        Value::Null => {}
    }
}

fn join(prefix: &str, key: &str) -> String {
    match (prefix.is_empty(), key.is_empty()) {
        (true, _) => key.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) => format!("{}.{}", prefix, key),
    }
}
