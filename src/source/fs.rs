use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use crate::core::error::Result;
use crate::source::{Source, WalkEntry};

/// Reads index files from a local directory.
pub struct FsSource {
    pub root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsSource { root: root.into() }
    }
}

impl Default for FsSource {
    fn default() -> Self {
        FsSource::new(".")
    }
}

impl Source for FsSource {
    fn open(&self, path: &str) -> Result<Box<dyn Read>> {
        let file = File::open(self.root.join(path))?;
        Ok(Box::new(file))
    }

    fn walk(&self, root: &str) -> Result<Vec<WalkEntry>> {
        let mut entries = Vec::new();
        let mut pending = vec![root.to_string()];

        while let Some(dir) = pending.pop() {
            for entry in std::fs::read_dir(self.root.join(&dir))? {
                let entry = entry?;
                let name = entry.file_name().to_string_lossy().into_owned();
                let path = format!("{}/{}", dir, name);
                let is_dir = entry.file_type()?.is_dir();
                if is_dir {
                    pending.push(path.clone());
                }
                entries.push(WalkEntry { path, is_dir });
            }
        }

        Ok(entries)
    }
}
