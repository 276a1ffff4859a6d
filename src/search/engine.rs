use std::cmp::Ordering;
use std::collections::HashSet;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::core::error::Result;
use crate::core::utils;
use crate::index::index::Index;
use crate::search::results::{Hit, SearchOptions, SearchResult, SearchTime};

impl Index {
    /// Search with default options: cached, first ten hits.
    pub fn search(&mut self, query: &str) -> Result<SearchResult> {
        self.search_with_options(query, SearchOptions::default())
    }

    /// Tokenize the query, intersect the posting lists, score and order
    /// the candidates, and fetch the requested page of documents.
    ///
    /// Shard loads triggered along the way mutate the receiver when
    /// `use_cache` is set; otherwise the whole search runs against a
    /// throwaway index and this instance is untouched.
    pub fn search_with_options(&mut self, query: &str, options: SearchOptions) -> Result<SearchResult> {
        if !options.use_cache {
            let mut detached = self.detached();
            return detached.search_with_options(
                query,
                SearchOptions {
                    use_cache: true,
                    ..options
                },
            );
        }

        let start = Instant::now();
        let mut time = SearchTime::default();

        let tokens = self.analyze(query);
        let (matched_ids, match_elapsed) = self.find_documents(&tokens)?;
        time.matching = match_elapsed;

        let (sorted_ids, scores, sort_elapsed) = self.sort_documents(matched_ids, &tokens)?;
        time.sorting = sort_elapsed;

        let hits = self.fetch_hits(&sorted_ids, &scores, options.size, options.from)?;
        time.total = start.elapsed();

        Ok(SearchResult {
            count: sorted_ids.len(),
            hits,
            time,
        })
    }

    /// Intersect the posting lists of the tokens, in order. Unknown tokens
    /// are skipped; once the accumulator is down to a single document no
    /// further token can enlarge it, so the loop stops early.
    fn find_documents(&mut self, tokens: &[String]) -> Result<(Vec<String>, Duration)> {
        let start = Instant::now();
        debug!("find documents with tokens {:?}", tokens);

        let mut matched: Option<HashSet<String>> = None;
        for token in tokens {
            let ids: HashSet<String> = match self.fetch_term_stat(token)? {
                Some(stat) => stat.term_frequencies.keys().cloned().collect(),
                None => continue,
            };

            match matched.as_mut() {
                None => matched = Some(ids),
                Some(accumulator) => utils::intersect(accumulator, &ids),
            }

            if matched.as_ref().map(HashSet::len) == Some(1) {
                break;
            }
        }

        let document_ids: Vec<String> = matched
            .map(|ids| ids.into_iter().collect())
            .unwrap_or_default();
        Ok((document_ids, start.elapsed()))
    }

    /// Score every candidate and order them by score descending, ties
    /// broken by document ID descending. The ordering is total, so results
    /// are deterministic.
    fn sort_documents(
        &mut self,
        document_ids: Vec<String>,
        tokens: &[String],
    ) -> Result<(Vec<String>, Vec<f64>, Duration)> {
        let start = Instant::now();
        debug!("sort {} documents", document_ids.len());

        let mut scored: Vec<(String, f64)> = Vec::with_capacity(document_ids.len());
        for document_id in document_ids {
            let score = self.score(&document_id, tokens)?;
            scored.push((document_id, score));
        }

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.0.cmp(&a.0))
        });

        let (sorted_ids, scores) = scored.into_iter().unzip();
        Ok((sorted_ids, scores, start.elapsed()))
    }

    /// Materialize one page of hits, fetching each document (and so
    /// possibly its shard) on the way.
    fn fetch_hits(
        &mut self,
        document_ids: &[String],
        scores: &[f64],
        size: usize,
        from: usize,
    ) -> Result<Vec<Hit>> {
        let from = from.min(document_ids.len());
        let mut hits = Vec::new();

        for (document_id, score) in document_ids.iter().zip(scores).skip(from).take(size) {
            let source = self.fetch(document_id)?;
            hits.push(Hit {
                id: document_id.clone(),
                score: *score,
                source,
            });
        }

        Ok(hits)
    }
}
