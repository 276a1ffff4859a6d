use std::collections::HashMap;
use std::sync::Arc;

use roaring::RoaringBitmap;

use crate::analysis::analyzer::Analyzer;
use crate::record::value::Document;
use crate::source::Source;

/// Per-term statistics: the posting list with per-document counts.
///
/// The keys of `term_frequencies` double as the term's posting list; the
/// map's cardinality is the term's document frequency.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermStat {
    pub term_frequencies: HashMap<String, u64>,
}

impl TermStat {
    pub fn document_frequency(&self) -> usize {
        self.term_frequencies.len()
    }
}

/// Per-document term-frequency vector, derived from the inverted term
/// statistics. The inverted orientation is the source of truth; this is a
/// convenience view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentStat {
    pub term_frequencies: HashMap<String, u64>,
}

/// An index over semi-structured records, searchable in memory and
/// persistable as a directory of flat shard files.
///
/// The index is single-writer, single-reader: concurrent mutation from
/// multiple threads is not supported.
pub struct Index {
    pub name: String,
    pub field_names: Vec<String>,
    pub documents: HashMap<String, Document>,
    pub term_stats: HashMap<String, TermStat>,
    pub shard_count: u32,
    pub loaded_document_shards: RoaringBitmap,
    pub loaded_term_stat_shards: RoaringBitmap,
    pub source: Option<Arc<dyn Source>>,
    pub(crate) analyzer: Analyzer,
}

impl Index {
    /// Create an empty index.
    pub fn new() -> Self {
        Index {
            name: String::new(),
            field_names: Vec::new(),
            documents: HashMap::new(),
            term_stats: HashMap::new(),
            shard_count: 0,
            loaded_document_shards: RoaringBitmap::new(),
            loaded_term_stat_shards: RoaringBitmap::new(),
            source: None,
            analyzer: Analyzer::standard(),
        }
    }

    /// Break a string down into the tokens used for both indexing and
    /// querying.
    pub fn analyze(&self, s: &str) -> Vec<String> {
        self.analyzer.analyze(s)
    }

    /// Derive the forward term-frequency vector of one document.
    pub fn document_stat(&self, document_id: &str) -> DocumentStat {
        let mut stat = DocumentStat::default();
        for (term, term_stat) in &self.term_stats {
            if let Some(frequency) = term_stat.term_frequencies.get(document_id) {
                stat.term_frequencies.insert(term.clone(), *frequency);
            }
        }
        stat
    }

    /// A fresh index sharing only the immutable configuration: name, shard
    /// count and source. Used by uncached searches so state cannot leak
    /// between calls.
    pub(crate) fn detached(&self) -> Index {
        let mut index = Index::new();
        index.name = self.name.clone();
        index.shard_count = self.shard_count;
        index.source = self.source.clone();
        index
    }
}

impl Default for Index {
    fn default() -> Self {
        Index::new()
    }
}
