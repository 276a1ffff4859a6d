use std::io::Read;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;

use crate::core::error::{Error, ErrorKind, Result};
use crate::source::{Source, WalkEntry};

/// Reads index files with GET requests against a base URL.
pub struct HttpSource {
    pub base_url: String,
    client: Client,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(HttpSource {
            base_url: base_url.into(),
            client,
        })
    }

    /// Build a source whose requests fail after `timeout`. On timeout the
    /// caller sees `SourceUnavailable` and no shard is marked loaded.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(HttpSource {
            base_url: base_url.into(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

impl Source for HttpSource {
    fn open(&self, path: &str) -> Result<Box<dyn Read>> {
        let url = self.url(path);
        let response = self.client.get(&url).send()?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::new(ErrorKind::NotFound, url));
        }
        let response = response.error_for_status()?;

        Ok(Box::new(response))
    }

    fn walk(&self, root: &str) -> Result<Vec<WalkEntry>> {
        Err(Error::new(
            ErrorKind::SourceUnavailable,
            format!("cannot enumerate {} over http; a shard_count file is required", root),
        ))
    }
}
