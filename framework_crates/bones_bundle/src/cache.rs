use std::{
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use crate::prelude::*;

const BUNDLE_EXTENSION: &str = "bundle";

/// A versioned on-disk cache of downloaded bundles.
///
/// Each URL gets its own directory, named by the [`BundleCid`] of the URL, holding at most one
/// `<version>.bundle` file. Storing a new version evicts the others.
#[derive(Clone, Debug)]
pub struct BundleCache {
    root: PathBuf,
}

impl BundleCache {
    /// Create a cache rooted at `root`. The directory is created on the first store.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The cache root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the cached bytes of `url` at `version`, if present.
    pub fn get(&self, url: &str, version: u32) -> std::io::Result<Option<Vec<u8>>> {
        if !self.url_dir(url).is_dir() {
            return Ok(None);
        }
        match std::fs::read(self.entry_path(url, version)) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Store `data` as `version` of `url`, removing any other cached version of it.
    pub fn store(&self, url: &str, version: u32, data: &[u8]) -> std::io::Result<()> {
        let dir = self.url_dir(url);
        std::fs::create_dir_all(&dir)?;

        // Each store fills its own temp file beside the entry. Readers only see complete files.
        let mut partial = tempfile::NamedTempFile::new_in(&dir)?;
        partial.write_all(data)?;
        partial.persist(self.entry_path(url, version))?;

        for old in self.cached_versions(url)? {
            if old != version {
                tracing::debug!(%url, version = old, "Evicting cached bundle version");
                match std::fs::remove_file(self.entry_path(url, old)) {
                    Err(e) if e.kind() != ErrorKind::NotFound => return Err(e),
                    _ => (),
                }
            }
        }
        Ok(())
    }

    /// List the cached versions of `url`, in ascending order.
    pub fn cached_versions(&self, url: &str) -> std::io::Result<Vec<u32>> {
        let dir = self.url_dir(url);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut versions = std::fs::read_dir(dir)?
            .map(|entry| Ok::<_, std::io::Error>(entry?.path()))
            .filter_map(|path| match path {
                Ok(path) => {
                    if path.extension()? != BUNDLE_EXTENSION {
                        return None;
                    }
                    path.file_stem()?.to_str()?.parse::<u32>().ok().map(Ok)
                }
                Err(e) => Some(Err(e)),
            })
            .collect::<Result<Vec<_>, _>>()?;
        versions.sort_unstable();
        Ok(versions)
    }

    /// Remove every cached bundle.
    pub fn clear(&self) -> std::io::Result<()> {
        match std::fs::remove_dir_all(&self.root) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }

    fn url_dir(&self, url: &str) -> PathBuf {
        self.root.join(BundleCid::of(url.as_bytes()).to_string())
    }

    fn entry_path(&self, url: &str, version: u32) -> PathBuf {
        self.url_dir(url).join(format!("{version}.{BUNDLE_EXTENSION}"))
    }
}
