pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;

    fn name(&self) -> &str;
}

/// Splits on a fixed set of separator runes.
///
/// Adjacent separators produce empty tokens; they are kept as-is and flow
/// through the filter chain, so downstream code never has to guard against
/// an empty slice.
#[derive(Clone)]
pub struct SeparatorTokenizer {
    pub separators: Vec<char>,
}

impl Default for SeparatorTokenizer {
    fn default() -> Self {
        SeparatorTokenizer {
            // ASCII comma, ideographic comma, ideographic space, ASCII space
            separators: vec![',', '、', '\u{3000}', ' '],
        }
    }
}

impl Tokenizer for SeparatorTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split(|c: char| self.separators.contains(&c))
            .map(str::to_string)
            .collect()
    }

    fn name(&self) -> &str {
        "separator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_ascii_space() {
        let tokenizer = SeparatorTokenizer::default();
        assert_eq!(
            tokenizer.tokenize("My name is Lilis"),
            vec!["My", "name", "is", "Lilis"]
        );
    }

    #[test]
    fn splits_on_ideographic_separators() {
        let tokenizer = SeparatorTokenizer::default();
        assert_eq!(tokenizer.tokenize("シェフ、庭師"), vec!["シェフ", "庭師"]);
        assert_eq!(tokenizer.tokenize("シェフ\u{3000}庭師"), vec!["シェフ", "庭師"]);
    }

    #[test]
    fn adjacent_separators_keep_empty_tokens() {
        let tokenizer = SeparatorTokenizer::default();
        assert_eq!(tokenizer.tokenize("a,,b"), vec!["a", "", "b"]);
        assert_eq!(tokenizer.tokenize(""), vec![""]);
    }
}
