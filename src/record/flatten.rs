use std::collections::BTreeMap;

use crate::analysis::analyzer::Analyzer;
use crate::record::value::{Document, Value};

/// Flatten a document into a map from dotted field path to the tokens its
/// leaf values produced.
///
/// Maps extend the path with `.`; lists recurse into their elements under
/// the same path; string and numeric leaves are analyzed. Null and boolean
/// leaves contribute nothing.
pub fn flatten(analyzer: &Analyzer, document: &Document) -> BTreeMap<String, Vec<String>> {
    let mut fields = BTreeMap::new();
    for (field, value) in document {
        flatten_value(analyzer, field, value, &mut fields);
    }
    fields
}

fn flatten_value(
    analyzer: &Analyzer,
    path: &str,
    value: &Value,
    fields: &mut BTreeMap<String, Vec<String>>,
) {
    match value {
        Value::Map(map) => {
            for (field, child) in map {
                let child_path = format!("{}.{}", path, field);
                flatten_value(analyzer, &child_path, child, fields);
            }
        }
        Value::List(items) => {
            // List membership does not appear in the field path.
            for item in items {
                flatten_value(analyzer, path, item, fields);
            }
        }
        Value::String(s) => {
            fields
                .entry(path.to_string())
                .or_default()
                .extend(analyzer.analyze(s));
        }
        Value::Integer(_) | Value::Float(_) => {
            if let Some(s) = value.canonical_number() {
                fields
                    .entry(path.to_string())
                    .or_default()
                    .extend(analyzer.analyze(&s));
            }
        }
        Value::Null | Value::Bool(_) => {}
    }
}
