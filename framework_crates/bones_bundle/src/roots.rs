use std::path::{Path, PathBuf};

use crate::prelude::*;

/// The base locations that bundle names are resolved against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BundleRoots {
    /// The read-only directory shipped with the game.
    pub streaming_assets: PathBuf,
    /// The writable per-device directory, used for downloaded and cached bundles.
    pub persistent_data: PathBuf,
    /// The prefix used to expose [`streaming_assets`][Self::streaming_assets] as a URL.
    pub url_prefix: UrlPrefix,
}

impl BundleRoots {
    /// Create the roots, picking the URL prefix for the given `platform`.
    pub fn new(
        streaming_assets: impl Into<PathBuf>,
        persistent_data: impl Into<PathBuf>,
        platform: TargetPlatform,
    ) -> Self {
        Self {
            streaming_assets: streaming_assets.into(),
            persistent_data: persistent_data.into(),
            url_prefix: platform.url_prefix(),
        }
    }

    /// Path of the bundle `name` in the streaming assets directory.
    pub fn streaming_path(&self, name: impl AsRef<Path>) -> PathBuf {
        self.streaming_assets.join(name)
    }

    /// Path of the bundle `name` in the persistent data directory.
    pub fn persistent_path(&self, name: impl AsRef<Path>) -> PathBuf {
        self.persistent_data.join(name)
    }

    /// The streaming assets location of `name` in the form the web protocol expects.
    pub fn streaming_url(&self, name: impl AsRef<Path>) -> Result<String, BundleError> {
        let path = self.streaming_path(name);
        Ok(self.url_prefix.apply(path_location(&path)?))
    }
}

/// The loader location string for `path`.
///
/// Fails for paths that are not valid UTF-8, which have no lossless string form.
pub fn path_location(path: &Path) -> Result<&str, BundleError> {
    path.to_str().ok_or_else(|| {
        BundleError::read(
            path.display().to_string(),
            anyhow::format_err!("Bundle path is not valid UTF-8"),
        )
    })
}
