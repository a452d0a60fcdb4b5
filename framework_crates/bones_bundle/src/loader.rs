use std::{path::Path, sync::Arc};

use bevy_tasks::{IoTaskPool, TaskPool};

use crate::prelude::*;

/// A [`BundleLoader`] performs the I/O behind the asynchronous [`BundleManager`] operations.
///
/// The manager resolves every path and URL before calling the loader. Implementations decide how
/// the bundle is fetched for each [`BundleLoadType`] and how the version is used.
pub trait BundleLoader: Sync + Send {
    /// Start loading the bundle at `location` and return a request that resolves when it is done.
    fn load_bundle(
        &self,
        location: String,
        load_type: BundleLoadType,
        version: u32,
    ) -> BundleRequest;

    /// Load the bundle at `location` as a [`BundleLoadType::File`] at version `0`.
    fn load(&self, location: String) -> BundleRequest {
        self.load_bundle(location, BundleLoadType::default(), 0)
    }
}

/// The standard [`BundleLoader`], which runs loads on the [`IoTaskPool`] using a [`BundleIo`]
/// and keeps versioned downloads in a [`BundleCache`].
///
/// If the application has not initialized the [`IoTaskPool`], the first load initializes it
/// with the default [`TaskPool`] settings.
#[derive(Clone)]
pub struct DefaultBundleLoader {
    /// The [`BundleIo`] used to read files and fetch URLs.
    pub io: Arc<dyn BundleIo>,
    /// The cache for versioned downloads.
    pub cache: BundleCache,
}

impl DefaultBundleLoader {
    /// Create a new [`DefaultBundleLoader`].
    pub fn new(io: Arc<dyn BundleIo>, cache: BundleCache) -> Self {
        Self { io, cache }
    }

    async fn run(&self, location: &str, load_type: BundleLoadType, version: u32) -> BundleResult {
        let cached = load_type.uses_cache(version);
        if cached {
            let hit = self
                .cache
                .get(location, version)
                .map_err(|source| BundleError::Cache {
                    location: location.to_owned(),
                    version,
                    source,
                })?;
            if let Some(data) = hit {
                tracing::debug!(%location, version, "Bundle cache hit");
                return Ok(AssetBundle::new(
                    location,
                    load_type,
                    version,
                    BundleOrigin::Cache,
                    data,
                ));
            }
        }

        let (origin, data) = match load_type {
            BundleLoadType::File => (BundleOrigin::File, self.io.read_file(Path::new(location))),
            BundleLoadType::Www | BundleLoadType::LoadFromCacheOrDownload => {
                self.read_url(location, true).await
            }
            BundleLoadType::WebRequest => self.read_url(location, false).await,
        };
        let data = data.map_err(|e| BundleError::read(location, e))?;

        if cached {
            if let Err(e) = self.cache.store(location, version, &data) {
                tracing::warn!(%location, version, "Could not cache bundle: {e}");
            }
        }

        Ok(AssetBundle::new(location, load_type, version, origin, data))
    }

    /// Read a URL, going to the filesystem for `file://` URLs and, if `bare_paths` is set, for
    /// locations without any scheme.
    async fn read_url(
        &self,
        location: &str,
        bare_paths: bool,
    ) -> (BundleOrigin, anyhow::Result<Vec<u8>>) {
        let path = match location.strip_prefix("file://") {
            Some(path) => Some(path),
            None if bare_paths && !has_scheme(location) => Some(location),
            None => None,
        };
        match path {
            Some(path) => (BundleOrigin::File, self.io.read_file(Path::new(path))),
            None => (BundleOrigin::Network, self.io.fetch(location).await),
        }
    }
}

impl BundleLoader for DefaultBundleLoader {
    fn load_bundle(
        &self,
        location: String,
        load_type: BundleLoadType,
        version: u32,
    ) -> BundleRequest {
        let (completer, request) = BundleRequest::channel(location.clone());
        let loader = self.clone();
        IoTaskPool::init(TaskPool::default)
            .spawn(async move {
                tracing::debug!(%location, %load_type, version, "Loading bundle");
                let result = loader.run(&location, load_type, version).await;
                match &result {
                    Ok(bundle) => tracing::debug!(
                        %location,
                        origin = ?bundle.origin,
                        cid = %bundle.cid,
                        "Loaded bundle ({} bytes)",
                        bundle.len()
                    ),
                    Err(e) => tracing::error!("Error loading bundle: {e}"),
                }
                completer.complete(result);
            })
            .detach();
        request
    }
}

/// Whether `location` starts with a URL scheme such as `https://`.
fn has_scheme(location: &str) -> bool {
    location.split_once("://").is_some_and(|(scheme, _)| {
        !scheme.is_empty()
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}
