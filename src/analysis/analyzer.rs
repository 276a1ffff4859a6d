use crate::analysis::filter::TokenFilter;
use crate::analysis::filters::lowercase::LowercaseFilter;
use crate::analysis::filters::punctuation::PunctuationFilter;
use crate::analysis::filters::stopword::StopWordFilter;
use crate::analysis::tokenizer::{SeparatorTokenizer, Tokenizer};

/// Text analysis pipeline
pub struct Analyzer {
    pub tokenizer: Box<dyn Tokenizer>,
    pub filters: Vec<Box<dyn TokenFilter>>,
    pub name: String,
}

impl Analyzer {
    pub fn new(name: String, tokenizer: Box<dyn Tokenizer>) -> Self {
        Analyzer {
            tokenizer,
            filters: Vec::new(),
            name,
        }
    }

    pub fn add_filter(mut self, filter: Box<dyn TokenFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn analyze(&self, text: &str) -> Vec<String> {
        let mut tokens = self.tokenizer.tokenize(text);

        for filter in &self.filters {
            tokens = filter.apply(tokens);
        }

        tokens
    }

    /// The analyzer used for both field values and queries: split on
    /// separators, lowercase, strike punctuation, drop English stop words.
    pub fn standard() -> Self {
        Analyzer::new(
            "standard".to_string(),
            Box::new(SeparatorTokenizer::default()),
        )
        .add_filter(Box::new(LowercaseFilter))
        .add_filter(Box::new(PunctuationFilter))
        .add_filter(Box::new(StopWordFilter::english()))
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Analyzer::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyzes_english_sentence() {
        let analyzer = Analyzer::standard();
        assert_eq!(
            analyzer.analyze("My name is Lilis Iskandar"),
            vec!["my", "name", "lilis", "iskandar"]
        );
    }

    #[test]
    fn analyzes_ideographic_text() {
        let analyzer = Analyzer::standard();
        assert_eq!(analyzer.analyze("シェフ、庭師"), vec!["シェフ", "庭師"]);
    }

    #[test]
    fn hyphenated_names_collapse_into_one_token() {
        let analyzer = Analyzer::standard();
        assert_eq!(analyzer.analyze("Chae-Young Song"), vec!["chaeyoung", "song"]);
    }

    #[test]
    fn empty_tokens_survive_the_pipeline() {
        let analyzer = Analyzer::standard();
        // Two adjacent separators: the empty token is not a stop word and
        // punctuation stripping leaves it alone.
        assert_eq!(analyzer.analyze("folder,,engine"), vec!["folder", "", "engine"]);
    }

    #[test]
    fn stop_words_are_dropped_entirely() {
        let analyzer = Analyzer::standard();
        assert!(analyzer.analyze("the of is").is_empty());
    }
}
