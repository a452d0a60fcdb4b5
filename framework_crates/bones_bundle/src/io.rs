use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Mutex,
};

use crate::prelude::*;

/// [`BundleIo`] is implemented for the host primitives that read bundle bytes, either from the
/// filesystem or from a URL.
pub trait BundleIo: Sync + Send {
    /// Read the file at `path`, blocking the current thread until it is read.
    fn read_file(&self, path: &Path) -> anyhow::Result<Vec<u8>>;

    /// Fetch the contents of `url`.
    fn fetch(&self, url: &str) -> BoxedFuture<anyhow::Result<Vec<u8>>>;
}

/// [`BundleIo`] implementation that uses the filesystem and [`ehttp`].
#[derive(Default, Clone, Copy, Debug)]
pub struct HostBundleIo;

impl BundleIo for HostBundleIo {
    fn read_file(&self, path: &Path) -> anyhow::Result<Vec<u8>> {
        Ok(std::fs::read(path)?)
    }

    fn fetch(&self, url: &str) -> BoxedFuture<anyhow::Result<Vec<u8>>> {
        let (sender, receiver) = async_channel::bounded(1);
        ehttp::fetch(ehttp::Request::get(url), move |response| {
            sender.try_send(response).ok();
        });

        let url = url.to_owned();
        Box::pin(async move {
            let response = receiver
                .recv()
                .await
                .map_err(|_| anyhow::format_err!("Request for `{url}` was dropped"))?
                .map_err(|e| anyhow::format_err!("{e}"))?;
            if !response.ok {
                anyhow::bail!("HTTP {} {}", response.status, response.status_text);
            }
            Ok::<_, anyhow::Error>(response.bytes)
        })
    }
}

/// A request made to a [`DummyBundleIo`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IoRequest {
    /// [`BundleIo::read_file`] was called with this path.
    Read(PathBuf),
    /// [`BundleIo::fetch`] was called with this URL.
    Fetch(String),
}

/// Dummy [`BundleIo`] implementation used for testing or as a placeholder.
///
/// Serves files and URLs from memory and records every request made to it.
#[derive(Default)]
pub struct DummyBundleIo {
    files: HashMap<PathBuf, Vec<u8>>,
    urls: HashMap<String, Vec<u8>>,
    requests: Mutex<Vec<IoRequest>>,
}

impl DummyBundleIo {
    /// Initialize a new [`DummyBundleIo`] from an iterator of `(string_path, byte_data)` items.
    pub fn new<'a, I: IntoIterator<Item = (&'a str, Vec<u8>)>>(files: I) -> Self {
        Self {
            files: files
                .into_iter()
                .map(|(p, d)| (PathBuf::from(p), d))
                .collect(),
            ..Default::default()
        }
    }

    /// Serve `data` for fetches of `url`.
    pub fn with_url(mut self, url: impl Into<String>, data: Vec<u8>) -> Self {
        self.urls.insert(url.into(), data);
        self
    }

    /// The requests made so far, in order.
    pub fn requests(&self) -> Vec<IoRequest> {
        self.lock_requests().clone()
    }

    /// The number of times `url` has been fetched.
    pub fn fetch_count(&self, url: &str) -> usize {
        self.lock_requests()
            .iter()
            .filter(|r| matches!(r, IoRequest::Fetch(u) if u == url))
            .count()
    }

    fn lock_requests(&self) -> std::sync::MutexGuard<'_, Vec<IoRequest>> {
        // A poisoned log is still a valid log.
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl BundleIo for DummyBundleIo {
    fn read_file(&self, path: &Path) -> anyhow::Result<Vec<u8>> {
        self.lock_requests().push(IoRequest::Read(path.to_owned()));
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow::format_err!("File not found: `{}`", path.display()))
    }

    fn fetch(&self, url: &str) -> BoxedFuture<anyhow::Result<Vec<u8>>> {
        self.lock_requests().push(IoRequest::Fetch(url.to_owned()));
        let result = self
            .urls
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow::format_err!("HTTP 404 Not Found: `{url}`"));
        Box::pin(async move { result })
    }
}
