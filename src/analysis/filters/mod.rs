pub mod lowercase;
pub mod punctuation;
pub mod stopword;
