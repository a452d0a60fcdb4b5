use std::{path::Path, sync::Arc};

use crate::prelude::*;

/// Resolves bundle names against the [`BundleRoots`] and dispatches the loads.
///
/// Synchronous loads read through the [`BundleIo`] and block the calling thread. Asynchronous
/// loads are handed to the [`BundleLoader`] and return a [`BundleRequest`] right away.
/// With a [`DefaultBundleLoader`] they run on the [`bevy_tasks::IoTaskPool`], which is
/// initialized with the default settings if the application has not done so.
///
/// Cloning the manager is cheap, and clones share the same io and loader.
#[derive(Clone)]
pub struct BundleManager {
    /// The locations bundle names are resolved against.
    pub roots: Arc<BundleRoots>,
    /// The [`BundleIo`] used for synchronous loads.
    pub io: Arc<dyn BundleIo>,
    /// The [`BundleLoader`] used for asynchronous loads.
    pub loader: Arc<dyn BundleLoader>,
}

impl BundleManager {
    /// Create a new [`BundleManager`].
    pub fn new(roots: BundleRoots, io: Arc<dyn BundleIo>, loader: Arc<dyn BundleLoader>) -> Self {
        Self {
            roots: Arc::new(roots),
            io,
            loader,
        }
    }

    /// Create a manager using the [`HostBundleIo`] and a [`DefaultBundleLoader`] that caches in
    /// the configured cache directory.
    pub fn from_config(config: &BundleConfig) -> Result<Self, BundleError> {
        let roots = config.roots()?;
        let io: Arc<dyn BundleIo> = Arc::new(HostBundleIo);
        let cache = BundleCache::new(roots.persistent_path(&config.cache_dir));
        let loader = Arc::new(DefaultBundleLoader::new(io.clone(), cache));
        Ok(Self::new(roots, io, loader))
    }

    /// Load a bundle from the streaming assets directory, blocking until it is read.
    pub fn load_from_streaming_assets(&self, name: &str) -> BundleResult {
        self.load_file(&self.roots.streaming_path(name))
    }

    /// Load a bundle from the persistent data directory, blocking until it is read.
    pub fn load_from_persistent_data(&self, name: &str) -> BundleResult {
        self.load_file(&self.roots.persistent_path(name))
    }

    /// Load a bundle from the streaming assets directory in the background.
    ///
    /// The request fails right away if the resolved path is not valid UTF-8.
    pub fn load_from_streaming_assets_async(&self, name: &str) -> BundleRequest {
        self.dispatch_file(&self.roots.streaming_path(name))
    }

    /// Load a bundle from the persistent data directory in the background.
    ///
    /// The request fails right away if the resolved path is not valid UTF-8.
    pub fn load_from_persistent_data_async(&self, name: &str) -> BundleRequest {
        self.dispatch_file(&self.roots.persistent_path(name))
    }

    /// Load a bundle from the streaming assets directory through the web protocol, using its
    /// platform URL form.
    pub fn load_from_www_local_async(&self, name: &str, version: u32) -> BundleRequest {
        match self.roots.streaming_url(name) {
            Ok(url) => self.dispatch(url, BundleLoadType::Www, version),
            Err(e) => unresolved(&self.roots.streaming_path(name), e),
        }
    }

    /// Load a bundle from `url` through the web protocol.
    pub fn load_from_www_url_async(&self, url: &str, version: u32) -> BundleRequest {
        self.dispatch(url.to_owned(), BundleLoadType::Www, version)
    }

    /// Load `version` of the bundle at `url` from the disk cache, downloading it if it is not
    /// cached yet.
    pub fn load_from_cache_or_download_async(&self, url: &str, version: u32) -> BundleRequest {
        self.dispatch(
            url.to_owned(),
            BundleLoadType::LoadFromCacheOrDownload,
            version,
        )
    }

    /// Load a bundle from `url` with a web request.
    pub fn load_from_web_request_async(&self, url: &str, version: u32) -> BundleRequest {
        self.dispatch(url.to_owned(), BundleLoadType::WebRequest, version)
    }

    fn load_file(&self, path: &Path) -> BundleResult {
        tracing::debug!(path = %path.display(), "Loading bundle synchronously");
        let location = path.display().to_string();
        let data = self
            .io
            .read_file(path)
            .map_err(|e| BundleError::read(location.clone(), e))?;
        Ok(AssetBundle::new(
            location,
            BundleLoadType::File,
            0,
            BundleOrigin::File,
            data,
        ))
    }

    fn dispatch_file(&self, path: &Path) -> BundleRequest {
        match path_location(path) {
            Ok(location) => self.dispatch(location.to_owned(), BundleLoadType::File, 0),
            Err(e) => unresolved(path, e),
        }
    }

    fn dispatch(&self, location: String, load_type: BundleLoadType, version: u32) -> BundleRequest {
        tracing::debug!(%location, %load_type, version, "Dispatching bundle load");
        self.loader.load_bundle(location, load_type, version)
    }
}

/// A request that has already failed because `path` has no location string.
fn unresolved(path: &Path, error: BundleError) -> BundleRequest {
    tracing::error!("Error loading bundle: {error}");
    BundleRequest::ready(path.display().to_string(), Err(error))
}
