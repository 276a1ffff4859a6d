use std::time::Duration;

use serde::Serialize;

use crate::record::value::Document;

/// Knobs for one search call.
#[derive(Debug, Clone, Copy)]
pub struct SearchOptions {
    /// Keep shard loads in the receiving index so they accumulate over
    /// calls. With `false` the search runs against a throwaway index that
    /// shares only the immutable configuration, bounding memory at the
    /// cost of reloading per query.
    pub use_cache: bool,
    /// Maximum number of hits to return.
    pub size: usize,
    /// Offset of the first hit, clamped to the match count.
    pub from: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            use_cache: true,
            size: 10,
            from: 0,
        }
    }
}

/// Wall-clock durations of the search stages.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SearchTime {
    pub matching: Duration,
    pub sorting: Duration,
    pub total: Duration,
}

/// One matching document with its score and full source.
#[derive(Debug, Clone, Serialize)]
pub struct Hit {
    pub id: String,
    pub score: f64,
    pub source: Document,
}

/// The outcome of a search: the total match count, the requested page of
/// hits, and stage timings.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub count: usize,
    pub hits: Vec<Hit>,
    pub time: SearchTime,
}
