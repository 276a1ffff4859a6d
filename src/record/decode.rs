use std::str::FromStr;

use crate::core::error::{Error, ErrorKind, Result};
use crate::record::value::{Document, Value};

/// Data types a byte payload can be decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Text,
    Json,
    Jsonl,
}

impl FromStr for DataType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(DataType::Text),
            "json" => Ok(DataType::Json),
            "jsonl" => Ok(DataType::Jsonl),
            other => Err(Error::new(
                ErrorKind::UnsupportedDataType,
                format!("unsupported document data type: {}", other),
            )),
        }
    }
}

/// Decode a byte payload into documents.
///
/// `text` wraps the bytes as `{"text": <string>}`, `json` parses one
/// object, `jsonl` parses one object per line (blank lines are skipped).
pub fn decode(data: &[u8], data_type: DataType) -> Result<Vec<Document>> {
    match data_type {
        DataType::Text => {
            let mut document = Document::new();
            document.insert(
                "text".to_string(),
                Value::String(String::from_utf8_lossy(data).into_owned()),
            );
            Ok(vec![document])
        }
        DataType::Json => {
            let document: Document = serde_json::from_slice(data)?;
            Ok(vec![document])
        }
        DataType::Jsonl => {
            let text = String::from_utf8_lossy(data);
            let mut documents = Vec::new();
            for line in text.lines() {
                if line.trim().is_empty() {
                    continue;
                }
                documents.push(serde_json::from_str(line)?);
            }
            Ok(documents)
        }
    }
}
