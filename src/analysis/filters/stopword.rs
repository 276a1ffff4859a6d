use std::collections::HashSet;

use crate::analysis::filter::TokenFilter;

pub struct StopWordFilter {
    pub stop_words: HashSet<String>,
}

impl StopWordFilter {
    pub fn new(stop_words: Vec<String>) -> Self {
        StopWordFilter {
            stop_words: stop_words.into_iter().collect(),
        }
    }

    pub fn english() -> Self {
        let words = vec![
            "a", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is",
            "it", "no", "not", "of", "on", "or", "s", "such", "t", "that", "the", "their",
            "then", "there", "these", "they", "this", "to", "was", "will", "with", "www",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        StopWordFilter::new(words)
    }
}

impl TokenFilter for StopWordFilter {
    fn apply(&self, tokens: Vec<String>) -> Vec<String> {
        tokens
            .into_iter()
            .filter(|token| !self.stop_words.contains(token))
            .collect()
    }

    fn name(&self) -> &str {
        "stop_words"
    }
}
