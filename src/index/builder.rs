use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::core::error::{Error, ErrorKind, Result};
use crate::core::utils;
use crate::index::index::Index;
use crate::record::decode::{self, DataType};
use crate::record::flatten::flatten;
use crate::record::value::{field_values, Document};

const DOCUMENT_ID_LENGTH: usize = 8;

impl Index {
    /// Index a document under a freshly generated ID and return the ID.
    pub fn index(&mut self, document: Document) -> Result<String> {
        let document_id = self.next_document_id();
        self.update(&document_id, document)?;
        Ok(document_id)
    }

    /// Index a document under a caller-chosen ID.
    pub fn index_with_id(&mut self, document: Document, document_id: &str) -> Result<()> {
        self.update(document_id, document)
    }

    /// Index a document using the first value at `id_field` as its ID.
    /// Fails only when the path resolves to no value at all; whatever
    /// value is found, including an empty string, is a usable ID.
    pub fn index_with_id_field(&mut self, document: Document, id_field: &str) -> Result<String> {
        let values = field_values(&document, id_field);
        let document_id = match values.first() {
            Some(value) => value.clone(),
            None => {
                return Err(Error::new(
                    ErrorKind::MissingIdField,
                    format!("document missing id field {}", id_field),
                ))
            }
        };
        self.index_with_id(document, &document_id)?;
        Ok(document_id)
    }

    /// Replace whatever is stored under `document_id` with `document`.
    pub fn update(&mut self, document_id: &str, document: Document) -> Result<()> {
        self.delete(document_id)?;

        debug!("index {}", document_id);
        let fields = flatten(&self.analyzer, &document);
        self.documents.insert(document_id.to_string(), document);

        for (field, tokens) in fields {
            self.update_term_stats(document_id, &tokens);
            if !self.field_names.contains(&field) {
                debug!("add new field name {}", field);
                self.field_names.push(field);
            }
        }
        Ok(())
    }

    /// Remove a document from the index. Unknown IDs are a no-op.
    ///
    /// The stored copy is re-flattened to recover its token set, and the
    /// ID is stripped from every touched term statistic. Terms whose
    /// posting list becomes empty are dropped entirely.
    pub fn delete(&mut self, document_id: &str) -> Result<()> {
        let document = match self.documents.get(document_id) {
            Some(document) => document,
            None => return Ok(()),
        };

        let fields = flatten(&self.analyzer, document);
        let mut tokens: HashSet<String> = HashSet::new();
        for field_tokens in fields.values() {
            tokens.extend(field_tokens.iter().cloned());
        }

        debug!("delete {}", document_id);
        self.documents.remove(document_id);
        self.remove_document_from_term_stats(document_id, &tokens);
        Ok(())
    }

    /// Decode a byte payload as `data_type` and index every document in it.
    pub fn index_data(&mut self, data: &[u8], data_type: DataType) -> Result<()> {
        for document in decode::decode(data, data_type)? {
            self.index(document)?;
        }
        Ok(())
    }

    /// Like [`Index::index_data`], but documents take their ID from
    /// `id_field`.
    pub fn index_data_with_id_field(
        &mut self,
        data: &[u8],
        data_type: DataType,
        id_field: &str,
    ) -> Result<()> {
        for document in decode::decode(data, data_type)? {
            self.index_with_id_field(document, id_field)?;
        }
        Ok(())
    }

    /// Read everything from `reader` and index it as `data_type`.
    pub fn index_reader(&mut self, mut reader: impl Read, data_type: DataType) -> Result<()> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        self.index_data(&data, data_type)
    }

    /// Index the contents of a file as `data_type`.
    pub fn index_file(&mut self, path: impl AsRef<Path>, data_type: DataType) -> Result<()> {
        let data = std::fs::read(path)?;
        self.index_data(&data, data_type)
    }

    /// Like [`Index::index_file`], but documents take their ID from
    /// `id_field`.
    pub fn index_file_with_id_field(
        &mut self,
        path: impl AsRef<Path>,
        data_type: DataType,
        id_field: &str,
    ) -> Result<()> {
        let data = std::fs::read(path)?;
        self.index_data_with_id_field(&data, data_type, id_field)
    }

    fn update_term_stats(&mut self, document_id: &str, tokens: &[String]) {
        for token in tokens {
            let stat = self.term_stats.entry(token.clone()).or_default();
            *stat
                .term_frequencies
                .entry(document_id.to_string())
                .or_insert(0) += 1;
        }
    }

    fn remove_document_from_term_stats(&mut self, document_id: &str, tokens: &HashSet<String>) {
        for token in tokens {
            let emptied = match self.term_stats.get_mut(token) {
                Some(stat) => {
                    stat.term_frequencies.remove(document_id);
                    stat.term_frequencies.is_empty()
                }
                None => false,
            };
            if emptied {
                self.term_stats.remove(token);
            }
        }
    }

    fn next_document_id(&self) -> String {
        loop {
            let id = utils::random_id(DOCUMENT_ID_LENGTH);
            if !self.documents.contains_key(&id) {
                return id;
            }
        }
    }
}
