use crate::core::error::Result;
use crate::index::index::Index;

impl Index {
    /// TF·IDF score of one document against the query tokens:
    /// `Σ tf(d, t) · log10(|documents| / df(t))`.
    ///
    /// Tokens with no postings anywhere are skipped, matching candidate
    /// selection and keeping the document frequency away from zero. No
    /// length normalization is applied.
    pub fn score(&mut self, document_id: &str, tokens: &[String]) -> Result<f64> {
        let mut score = 0.0;

        for token in tokens {
            let (term_frequency, document_frequency) = match self.fetch_term_stat(token)? {
                Some(stat) => (
                    stat.term_frequencies.get(document_id).copied().unwrap_or(0),
                    stat.document_frequency(),
                ),
                None => continue,
            };

            let inverse_document_frequency =
                (self.documents.len() as f64 / document_frequency as f64).log10();
            score += term_frequency as f64 * inverse_document_frequency;
        }

        Ok(score)
    }

    /// Number of times `token` appears in `document_id`.
    pub fn term_frequency(&mut self, document_id: &str, token: &str) -> Result<u64> {
        Ok(self
            .fetch_term_stat(token)?
            .and_then(|stat| stat.term_frequencies.get(document_id).copied())
            .unwrap_or(0))
    }

    /// Number of documents `token` appears in.
    pub fn document_frequency(&mut self, token: &str) -> Result<usize> {
        Ok(self
            .fetch_term_stat(token)?
            .map(|stat| stat.document_frequency())
            .unwrap_or(0))
    }
}
