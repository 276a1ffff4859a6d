use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read};

use crate::core::error::{Error, ErrorKind, Result};
use crate::index::index::TermStat;
use crate::record::value::{set_field, Document};

/// Parse the `shard_count` marker: ASCII decimal, trailing whitespace
/// tolerated.
pub fn read_shard_count(mut reader: impl Read) -> Result<u32> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    Ok(text.trim().parse()?)
}

/// Parse the field-name list: one name per LF-separated line.
pub fn read_field_names(reader: impl Read) -> Result<Vec<String>> {
    let mut field_names = Vec::new();
    for line in BufReader::new(reader).lines() {
        let line = line?;
        if !line.is_empty() {
            field_names.push(line);
        }
    }
    Ok(field_names)
}

/// Parse a documents table: CSV with an `id`-first header row. Rows are
/// fully parsed before the caller inserts any of them, so a malformed
/// table never leaves a half-loaded shard behind.
pub fn read_documents(reader: impl Read) -> Result<Vec<(String, Document)>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = csv_reader.records();
    let headers = match rows.next() {
        Some(record) => record?,
        None => return Ok(Vec::new()),
    };

    let mut documents = Vec::new();
    for record in rows {
        let record = record?;
        let id = record
            .get(0)
            .ok_or_else(|| Error::new(ErrorKind::Parse, "document row without id".to_string()))?
            .to_string();
        documents.push((id, document_from_record(&headers, &record)));
    }
    Ok(documents)
}

/// Rebuild a document from a CSV row. Empty cells mean the document never
/// had that field path; they are not materialized as empty leaves.
fn document_from_record(headers: &csv::StringRecord, record: &csv::StringRecord) -> Document {
    let mut document = Document::new();
    for (header, value) in headers.iter().zip(record.iter()).skip(1) {
        if !value.is_empty() {
            set_field(&mut document, header, value.to_string());
        }
    }
    document
}

/// Parse a term-statistics table: headerless CSV rows of
/// `term,"id:freq id:freq …"`.
pub fn read_term_stats(reader: impl Read) -> Result<Vec<(String, TermStat)>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut term_stats = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let term = record
            .get(0)
            .ok_or_else(|| Error::new(ErrorKind::Parse, "term row without term".to_string()))?
            .to_string();

        let mut term_frequencies = HashMap::new();
        for pair in record.get(1).unwrap_or("").split(' ') {
            if pair.is_empty() {
                continue;
            }
            let (id, frequency) = pair.split_once(':').ok_or_else(|| {
                Error::new(
                    ErrorKind::Parse,
                    format!("malformed posting pair {:?} for term {:?}", pair, term),
                )
            })?;
            term_frequencies.insert(id.to_string(), frequency.parse()?);
        }
        term_stats.push((term, TermStat { term_frequencies }));
    }
    Ok(term_stats)
}
