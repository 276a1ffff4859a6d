pub trait TokenFilter: Send + Sync {
    fn apply(&self, tokens: Vec<String>) -> Vec<String>;

    fn name(&self) -> &str;
}
