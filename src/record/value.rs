use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A caller-supplied record: a map from field name to value tree.
pub type Document = BTreeMap<String, Value>;

/// The recursive value tree of a document.
///
/// Indexable leaves are strings and numbers. `Null` and `Bool` are carried
/// so arbitrary JSON round-trips through a hit's `source`, but they
/// contribute no tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Canonical text form of a numeric leaf: integers in base-10, floats
    /// in their shortest round-trip form.
    pub fn canonical_number(&self) -> Option<String> {
        match self {
            Value::Integer(n) => Some(n.to_string()),
            Value::Float(f) => Some(format!("{}", f)),
            _ => None,
        }
    }
}

/// Collect the string values reached by walking `document` along a dotted
/// field path. Lists are traversed without consuming a path segment, the
/// same way the flattener assigns them no path component of their own.
/// Numbers and booleans canonicalize to their text form so the values
/// survive a trip through the CSV tables; null leaves contribute nothing.
pub fn field_values(document: &Document, field_path: &str) -> Vec<String> {
    let segments: Vec<&str> = field_path.split('.').collect();
    let mut values = Vec::new();
    if let Some(value) = document.get(segments[0]) {
        collect_values(value, &segments[1..], &mut values);
    }
    values
}

fn collect_values(value: &Value, segments: &[&str], values: &mut Vec<String>) {
    match value {
        Value::Map(map) => {
            if let Some((first, rest)) = segments.split_first() {
                if let Some(child) = map.get(*first) {
                    collect_values(child, rest, values);
                }
            }
        }
        Value::List(items) => {
            for item in items {
                collect_values(item, segments, values);
            }
        }
        Value::String(s) if segments.is_empty() => values.push(s.clone()),
        Value::Integer(_) | Value::Float(_) if segments.is_empty() => {
            if let Some(s) = value.canonical_number() {
                values.push(s);
            }
        }
        Value::Bool(b) if segments.is_empty() => values.push(b.to_string()),
        _ => {}
    }
}

/// Set a string value in a document at a dotted field path, creating
/// intermediate maps as needed. An existing non-map value along the path
/// wins; the write is dropped.
pub fn set_field(document: &mut Document, field_path: &str, value: String) {
    let mut segments: Vec<&str> = field_path.split('.').collect();
    let last = match segments.pop() {
        Some(last) => last,
        None => return,
    };

    let mut current = document;
    for segment in segments {
        let entry = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Map(BTreeMap::new()));
        match entry {
            Value::Map(map) => current = map,
            _ => return,
        }
    }
    current.insert(last.to_string(), Value::String(value));
}
