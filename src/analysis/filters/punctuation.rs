use crate::analysis::filter::TokenFilter;

const PUNCTUATIONS: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Strikes every ASCII punctuation rune from each token.
pub struct PunctuationFilter;

impl TokenFilter for PunctuationFilter {
    fn apply(&self, tokens: Vec<String>) -> Vec<String> {
        tokens
            .into_iter()
            .map(|token| token.chars().filter(|c| !PUNCTUATIONS.contains(*c)).collect())
            .collect()
    }

    fn name(&self) -> &str {
        "punctuation"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_inside_tokens() {
        let filter = PunctuationFilter;
        let tokens = vec!["chae-young".to_string(), "v0.1.0!".to_string()];
        assert_eq!(filter.apply(tokens), vec!["chaeyoung", "v010"]);
    }

    #[test]
    fn keeps_non_ascii_runes() {
        let filter = PunctuationFilter;
        assert_eq!(filter.apply(vec!["庭師".to_string()]), vec!["庭師"]);
    }
}
