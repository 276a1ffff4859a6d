use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;

use tracing::debug;

use crate::core::error::{Error, ErrorKind, Result};
use crate::core::utils;
use crate::index::index::Index;
use crate::index::shard::shard_of;
use crate::record::value::{field_values, Document};
use crate::storage::layout::{
    flat_path, meta_path, shard_dir, shard_path, DOCUMENTS_EXTENSION, FIELD_NAMES_EXTENSION,
    SHARD_COUNT_FILE_NAME, TERM_STATS_EXTENSION,
};

impl Index {
    /// Persist the index as three flat tables at the index root:
    /// `<name>.fns`, `<name>.dcs` and `<name>.tst`. No `shard_count`
    /// marker is written, which is how loaders recognize this layout.
    pub fn save(&mut self, index_name: &str) -> Result<()> {
        self.name = index_name.to_string();

        self.write_field_names(&flat_path(index_name, FIELD_NAMES_EXTENSION))?;

        let document_ids = utils::sorted(self.documents.keys());
        self.write_documents(&flat_path(index_name, DOCUMENTS_EXTENSION), &document_ids)?;

        let terms = utils::sorted(self.term_stats.keys());
        self.write_term_stats(&flat_path(index_name, TERM_STATS_EXTENSION), &terms)?;

        Ok(())
    }

    /// Persist the index as a directory of shards: `<name>/shard_count`,
    /// `<name>/fns`, and per shard that received at least one row,
    /// `<name>/<k>/dcs` and `<name>/<k>/tst`. Documents partition by ID
    /// and terms by text, so a document and its terms may land in
    /// different shards.
    ///
    /// A shard count of zero means "not sharded" and disables routing, so
    /// it cannot partition anything; use [`Index::save`] for the flat
    /// layout instead.
    pub fn save_to_shards(&mut self, index_name: &str, shard_count: u32) -> Result<()> {
        if shard_count == 0 {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                "shard count must be at least 1".to_string(),
            ));
        }

        self.name = index_name.to_string();
        self.shard_count = shard_count;

        fs::create_dir_all(index_name)?;

        let mut file = File::create(meta_path(index_name, SHARD_COUNT_FILE_NAME))?;
        write!(file, "{}", shard_count)?;

        self.write_field_names(&meta_path(index_name, FIELD_NAMES_EXTENSION))?;

        let mut document_shards: BTreeMap<u32, Vec<String>> = BTreeMap::new();
        for document_id in self.documents.keys() {
            let shard_id = shard_of(document_id, shard_count);
            document_shards.entry(shard_id).or_default().push(document_id.clone());
        }

        for (shard_id, mut document_ids) in document_shards {
            debug!("saving documents shard {}", shard_id);
            document_ids.sort();
            fs::create_dir_all(shard_dir(index_name, shard_id))?;
            self.write_documents(
                &shard_path(index_name, shard_id, DOCUMENTS_EXTENSION),
                &document_ids,
            )?;
        }

        let mut term_shards: BTreeMap<u32, Vec<String>> = BTreeMap::new();
        for term in self.term_stats.keys() {
            let shard_id = shard_of(term, shard_count);
            term_shards.entry(shard_id).or_default().push(term.clone());
        }

        for (shard_id, mut terms) in term_shards {
            debug!("saving term stats shard {}", shard_id);
            terms.sort();
            fs::create_dir_all(shard_dir(index_name, shard_id))?;
            self.write_term_stats(&shard_path(index_name, shard_id, TERM_STATS_EXTENSION), &terms)?;
        }

        Ok(())
    }

    fn write_field_names(&self, path: &str) -> Result<()> {
        let mut file = File::create(path)?;
        for field_name in &self.field_names {
            writeln!(file, "{}", field_name)?;
        }
        Ok(())
    }

    fn write_documents(&self, path: &str, document_ids: &[String]) -> Result<()> {
        let mut writer = csv::Writer::from_writer(File::create(path)?);

        let mut headers = vec!["id".to_string()];
        headers.extend(self.field_names.iter().cloned());
        writer.write_record(&headers)?;

        for document_id in document_ids {
            let document = &self.documents[document_id];
            writer.write_record(record_from_document(document_id, &headers, document))?;
        }

        writer.flush()?;
        Ok(())
    }

    fn write_term_stats(&self, path: &str, terms: &[String]) -> Result<()> {
        let mut writer = csv::Writer::from_writer(File::create(path)?);

        for term in terms {
            let stat = &self.term_stats[term];
            let pairs: Vec<String> = utils::sorted(stat.term_frequencies.keys())
                .into_iter()
                .map(|id| format!("{}:{}", id, stat.term_frequencies[&id]))
                .collect();
            writer.write_record([term.as_str(), pairs.join(" ").as_str()])?;
        }

        writer.flush()?;
        Ok(())
    }
}

/// Turn a document into a CSV row: the ID followed by, for each field
/// path, the comma-joined values reached by walking that path.
fn record_from_document(document_id: &str, headers: &[String], document: &Document) -> Vec<String> {
    headers
        .iter()
        .map(|header| {
            if header == "id" {
                document_id.to_string()
            } else {
                field_values(document, header).join(",")
            }
        })
        .collect()
}
