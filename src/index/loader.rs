use std::io::Read;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::core::error::{Error, ErrorKind, Result};
use crate::index::index::{Index, TermStat};
use crate::index::shard::shard_of;
use crate::record::value::Document;
use crate::source::fs::FsSource;
use crate::source::Source;
use crate::storage::layout::{
    flat_path, meta_path, shard_path, DOCUMENTS_EXTENSION, FIELD_NAMES_EXTENSION,
    SHARD_COUNT_FILE_NAME, TERM_STATS_EXTENSION,
};
use crate::storage::reader;

impl Index {
    /// Open an index eagerly: everything resident before the call returns.
    /// The layout is detected by the presence of the `shard_count` marker.
    pub fn load(index_name: &str) -> Result<Index> {
        Index::load_with_source(Arc::new(FsSource::default()), index_name)
    }

    /// Eager open through an explicit source.
    pub fn load_with_source(source: Arc<dyn Source>, index_name: &str) -> Result<Index> {
        match read_shard_count_marker(source.as_ref(), index_name)? {
            Some(shard_count) => {
                let mut index = Index::deferred(source, index_name, shard_count)?;
                index.load_all_shards(|_, _| {}, Duration::ZERO)?;
                Ok(index)
            }
            None => Index::load_flat(source, index_name),
        }
    }

    /// Open an index deferred: only the shard count and the field-name
    /// list are read. Shards are pulled in by the first lookup that needs
    /// them. A deferred index is logically read-only; mutating it without
    /// a subsequent full save leaves the on-disk state inconsistent.
    pub fn load_deferred(index_name: &str) -> Result<Index> {
        Index::load_deferred_with_source(Arc::new(FsSource::default()), index_name)
    }

    /// Deferred open through an explicit source.
    pub fn load_deferred_with_source(source: Arc<dyn Source>, index_name: &str) -> Result<Index> {
        let shard_count = read_shard_count_marker(source.as_ref(), index_name)?.ok_or_else(|| {
            Error::new(
                ErrorKind::NotFound,
                format!("index {} has no shard_count marker", index_name),
            )
        })?;
        Index::deferred(source, index_name, shard_count)
    }

    /// Deferred open followed by a full shard sweep, reporting progress
    /// after every shard and sleeping in between so a cooperative host can
    /// repaint.
    pub fn load_with_progress(
        source: Arc<dyn Source>,
        index_name: &str,
        progress: impl FnMut(u32, u32),
        sleep: Duration,
    ) -> Result<Index> {
        let mut index = Index::load_deferred_with_source(source, index_name)?;
        index.load_all_shards(progress, sleep)?;
        Ok(index)
    }

    /// Load every shard of a deferred index. Loads are idempotent, so a
    /// caller that stopped re-entering partway through can safely run the
    /// sweep again later.
    pub fn load_all_shards(
        &mut self,
        mut progress: impl FnMut(u32, u32),
        sleep: Duration,
    ) -> Result<()> {
        for shard_id in 0..self.shard_count {
            self.load_documents_shard(shard_id)?;
            self.load_term_stats_shard(shard_id)?;
            progress(shard_id + 1, self.shard_count);
            std::thread::sleep(sleep);
        }
        Ok(())
    }

    /// Fetch a document by ID, loading its shard on demand.
    pub fn fetch(&mut self, document_id: &str) -> Result<Document> {
        match self.fetch_document(document_id)? {
            Some(document) => Ok(document.clone()),
            None => Err(Error::new(
                ErrorKind::NotFound,
                format!("document {} not found", document_id),
            )),
        }
    }

    pub(crate) fn fetch_document(&mut self, document_id: &str) -> Result<Option<&Document>> {
        if !self.documents.contains_key(document_id) && self.shard_count > 0 {
            let shard_id = shard_of(document_id, self.shard_count);
            self.load_documents_shard(shard_id)?;
        }
        Ok(self.documents.get(document_id))
    }

    pub(crate) fn fetch_term_stat(&mut self, token: &str) -> Result<Option<&TermStat>> {
        if !self.term_stats.contains_key(token) && self.shard_count > 0 {
            let shard_id = shard_of(token, self.shard_count);
            self.load_term_stats_shard(shard_id)?;
        }
        Ok(self.term_stats.get(token))
    }

    fn load_documents_shard(&mut self, shard_id: u32) -> Result<()> {
        if self.loaded_document_shards.contains(shard_id) {
            return Ok(());
        }

        debug!("loading documents shard {}", shard_id);
        let path = shard_path(&self.name, shard_id, DOCUMENTS_EXTENSION);
        if let Some(stream) = self.open_shard_file(&path)? {
            // Rows are parsed in full before insertion; a parse failure
            // leaves the shard unmarked.
            for (id, document) in reader::read_documents(stream)? {
                self.documents.insert(id, document);
            }
        }
        self.loaded_document_shards.insert(shard_id);
        Ok(())
    }

    fn load_term_stats_shard(&mut self, shard_id: u32) -> Result<()> {
        if self.loaded_term_stat_shards.contains(shard_id) {
            return Ok(());
        }

        debug!("loading term stats shard {}", shard_id);
        let path = shard_path(&self.name, shard_id, TERM_STATS_EXTENSION);
        if let Some(stream) = self.open_shard_file(&path)? {
            for (term, stat) in reader::read_term_stats(stream)? {
                self.term_stats.insert(term, stat);
            }
        }
        self.loaded_term_stat_shards.insert(shard_id);
        Ok(())
    }

    /// Open one shard file. A shard that received no rows at save time has
    /// no file on disk; that is an empty shard, not an error.
    fn open_shard_file(&self, path: &str) -> Result<Option<Box<dyn Read>>> {
        let result = match &self.source {
            Some(source) => source.open(path),
            None => FsSource::default().open(path),
        };
        match result {
            Ok(stream) => Ok(Some(stream)),
            Err(err) if err.kind == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn deferred(source: Arc<dyn Source>, index_name: &str, shard_count: u32) -> Result<Index> {
        let mut index = Index::new();
        index.name = index_name.to_string();
        index.shard_count = shard_count;

        let stream = source.open(&meta_path(index_name, FIELD_NAMES_EXTENSION))?;
        index.field_names = reader::read_field_names(stream)?;
        index.source = Some(source);
        Ok(index)
    }

    fn load_flat(source: Arc<dyn Source>, index_name: &str) -> Result<Index> {
        let mut index = Index::new();
        index.name = index_name.to_string();

        let stream = source.open(&flat_path(index_name, FIELD_NAMES_EXTENSION))?;
        index.field_names = reader::read_field_names(stream)?;

        let stream = source.open(&flat_path(index_name, DOCUMENTS_EXTENSION))?;
        for (id, document) in reader::read_documents(stream)? {
            index.documents.insert(id, document);
        }

        let stream = source.open(&flat_path(index_name, TERM_STATS_EXTENSION))?;
        for (term, stat) in reader::read_term_stats(stream)? {
            index.term_stats.insert(term, stat);
        }

        index.source = Some(source);
        Ok(index)
    }
}

/// Read the `shard_count` marker of a sharded index, falling back to
/// counting numbered shard directories when the marker file is absent.
/// `None` means the flat layout: neither a marker nor an index directory
/// exists.
fn read_shard_count_marker(source: &dyn Source, index_name: &str) -> Result<Option<u32>> {
    match source.open(&meta_path(index_name, SHARD_COUNT_FILE_NAME)) {
        Ok(stream) => Ok(Some(reader::read_shard_count(stream)?)),
        Err(err) if err.kind == ErrorKind::NotFound => match source.walk(index_name) {
            Ok(entries) => {
                let count = entries
                    .iter()
                    .filter(|entry| {
                        entry.is_dir
                            && entry
                                .path
                                .rsplit('/')
                                .next()
                                .is_some_and(|name| name.parse::<u32>().is_ok())
                    })
                    .count() as u32;
                Ok(Some(count))
            }
            Err(err) if err.kind == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        },
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::search::results::SearchOptions;

    /// Wraps a filesystem source and records every opened path, so tests
    /// can observe exactly which shard files a search pulled in.
    struct RecordingSource {
        inner: FsSource,
        opened: Mutex<Vec<String>>,
    }

    impl RecordingSource {
        fn new(root: impl Into<std::path::PathBuf>) -> Self {
            RecordingSource {
                inner: FsSource::new(root),
                opened: Mutex::new(Vec::new()),
            }
        }

        fn opened(&self) -> Vec<String> {
            self.opened.lock().unwrap().clone()
        }
    }

    impl Source for RecordingSource {
        fn open(&self, path: &str) -> Result<Box<dyn Read>> {
            self.opened.lock().unwrap().push(path.to_string());
            self.inner.open(path)
        }

        fn walk(&self, root: &str) -> Result<Vec<crate::source::WalkEntry>> {
            self.inner.walk(root)
        }
    }

    fn document(json: &str) -> Document {
        serde_json::from_str(json).unwrap()
    }

    /// Build and save a small sharded index under the temp dir. With five
    /// shards, "docA" lands in documents shard 1 and "cooking" in term
    /// shard 2.
    fn saved_index(dir: &tempfile::TempDir) -> Index {
        let mut index = Index::new();
        index
            .index_with_id(
                document(r#"{"hobby": "cooking", "name": "Lilis Iskandar"}"#),
                "docA",
            )
            .unwrap();
        index
            .index_with_id(
                document(r#"{"hobby": "gardening", "name": "Chae-Young Song"}"#),
                "docB",
            )
            .unwrap();
        index
            .save_to_shards(&dir.path().join("idx").to_string_lossy(), 5)
            .unwrap();
        index
    }

    #[test]
    fn deferred_open_reads_only_metadata() {
        let dir = tempfile::tempdir().unwrap();
        saved_index(&dir);

        let source = Arc::new(RecordingSource::new(dir.path()));
        let index = Index::load_deferred_with_source(source.clone(), "idx").unwrap();

        assert_eq!(index.shard_count, 5);
        assert_eq!(index.field_names, vec!["hobby", "name"]);
        assert!(index.documents.is_empty());
        assert_eq!(source.opened(), vec!["idx/shard_count", "idx/fns"]);
    }

    #[test]
    fn search_loads_only_the_shards_it_needs() {
        let dir = tempfile::tempdir().unwrap();
        saved_index(&dir);

        let source = Arc::new(RecordingSource::new(dir.path()));
        let mut index = Index::load_deferred_with_source(source.clone(), "idx").unwrap();

        let result = index.search("cooking").unwrap();

        assert_eq!(result.count, 1);
        assert_eq!(result.hits[0].id, "docA");

        let shard_opens: Vec<String> = source
            .opened()
            .into_iter()
            .filter(|path| path.ends_with("tst") || path.ends_with("dcs"))
            .collect();
        assert_eq!(shard_opens, vec!["idx/2/tst", "idx/1/dcs"]);
        assert!(index.loaded_term_stat_shards.contains(2));
        assert!(index.loaded_document_shards.contains(1));
        assert_eq!(index.loaded_term_stat_shards.len(), 1);
        assert_eq!(index.loaded_document_shards.len(), 1);
    }

    #[test]
    fn a_shard_without_a_file_is_an_empty_shard() {
        let dir = tempfile::tempdir().unwrap();
        saved_index(&dir);

        let source = Arc::new(FsSource::new(dir.path()));
        let mut index = Index::load_deferred_with_source(source, "idx").unwrap();

        // "folder" routes to term shard 3 of 5, which received no rows.
        let result = index.search("folder").unwrap();
        assert_eq!(result.count, 0);
        assert!(index.loaded_term_stat_shards.contains(3));

        // A second miss is answered from the bitmap alone.
        let result = index.search("folder").unwrap();
        assert_eq!(result.count, 0);
    }

    #[test]
    fn deferred_searches_match_the_in_memory_index() {
        let dir = tempfile::tempdir().unwrap();
        let mut original = saved_index(&dir);

        let source = Arc::new(FsSource::new(dir.path()));
        let mut reopened =
            Index::load_deferred_with_source(source, &dir.path().join("idx").to_string_lossy())
                .unwrap();

        for query in ["cooking", "lilis iskandar", "gardening", "song", "nothing"] {
            let expected = original.search(query).unwrap();
            let actual = reopened.search(query).unwrap();

            assert_eq!(actual.count, expected.count, "query {:?}", query);
            let expected_ids: Vec<&str> = expected.hits.iter().map(|h| h.id.as_str()).collect();
            let actual_ids: Vec<&str> = actual.hits.iter().map(|h| h.id.as_str()).collect();
            assert_eq!(actual_ids, expected_ids, "query {:?}", query);
        }
    }

    #[test]
    fn uncached_search_leaves_the_index_untouched() {
        let dir = tempfile::tempdir().unwrap();
        saved_index(&dir);

        let source = Arc::new(FsSource::new(dir.path()));
        let mut cached = Index::load_deferred_with_source(source.clone(), "idx").unwrap();
        let mut uncached = Index::load_deferred_with_source(source, "idx").unwrap();

        let options = SearchOptions {
            use_cache: false,
            ..SearchOptions::default()
        };
        let without_cache = uncached.search_with_options("cooking", options).unwrap();
        let with_cache = cached.search("cooking").unwrap();

        assert_eq!(without_cache.count, with_cache.count);
        let uncached_ids: Vec<&str> = without_cache.hits.iter().map(|h| h.id.as_str()).collect();
        let cached_ids: Vec<&str> = with_cache.hits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(uncached_ids, cached_ids);
        assert_eq!(without_cache.hits[0].score, with_cache.hits[0].score);

        // The throwaway absorbed every load; the receiver stayed clean.
        assert!(uncached.documents.is_empty());
        assert!(uncached.term_stats.is_empty());
        assert!(uncached.loaded_document_shards.is_empty());
        assert!(uncached.loaded_term_stat_shards.is_empty());

        // The cached index accumulated them.
        assert!(!cached.term_stats.is_empty());
    }

    #[test]
    fn eager_load_of_a_sharded_index_is_fully_resident() {
        let dir = tempfile::tempdir().unwrap();
        saved_index(&dir);

        let source = Arc::new(FsSource::new(dir.path()));
        let mut index = Index::load_with_source(source, "idx").unwrap();

        assert_eq!(index.documents.len(), 2);
        assert_eq!(index.loaded_document_shards.len() as u32, index.shard_count);

        let result = index.search("gardening").unwrap();
        assert_eq!(result.hits[0].id, "docB");
    }

    #[test]
    fn flat_layout_round_trips_through_load() {
        let dir = tempfile::tempdir().unwrap();
        let name = dir.path().join("flat").to_string_lossy().into_owned();

        let mut index = Index::new();
        index
            .index_with_id(document(r#"{"hobby": "cooking"}"#), "docA")
            .unwrap();
        index.save(&name).unwrap();

        let mut reopened = Index::load(&name).unwrap();
        assert_eq!(reopened.shard_count, 0);

        let result = reopened.search("cooking").unwrap();
        assert_eq!(result.count, 1);
        assert_eq!(result.hits[0].id, "docA");
    }

    #[test]
    fn missing_marker_falls_back_to_counting_shard_directories() {
        let dir = tempfile::tempdir().unwrap();
        saved_index(&dir);
        std::fs::remove_file(dir.path().join("idx/shard_count")).unwrap();

        let source = Arc::new(FsSource::new(dir.path()));
        let index = Index::load_deferred_with_source(source, "idx").unwrap();

        // Only shards 0, 1, 2 and 4 received rows, so only those
        // directories exist to be counted.
        assert_eq!(index.shard_count, 4);
    }

    #[test]
    fn load_all_shards_reports_progress() {
        let dir = tempfile::tempdir().unwrap();
        saved_index(&dir);

        let source = Arc::new(FsSource::new(dir.path()));
        let mut reports = Vec::new();
        let index = Index::load_with_progress(
            source,
            "idx",
            |loaded, total| reports.push((loaded, total)),
            Duration::ZERO,
        )
        .unwrap();

        assert_eq!(reports, vec![(1, 5), (2, 5), (3, 5), (4, 5), (5, 5)]);
        assert_eq!(index.documents.len(), 2);
    }

    #[test]
    fn fetch_of_unknown_document_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        saved_index(&dir);

        let source = Arc::new(FsSource::new(dir.path()));
        let mut index = Index::load_deferred_with_source(source, "idx").unwrap();

        let fetched = index.fetch("docA").unwrap();
        assert_eq!(
            crate::record::value::field_values(&fetched, "hobby"),
            vec!["cooking"]
        );

        let err = index.fetch("missing").unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
