use std::path::PathBuf;

/// The result of loading a bundle.
pub type BundleResult = Result<crate::AssetBundle, BundleError>;

/// Errors produced while loading bundles or setting up the bundle manager.
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    /// The bundle could not be read from disk or fetched from the network.
    #[error("Could not load bundle from `{location}`: {source}")]
    Read {
        /// The path or URL that was requested.
        location: String,
        /// The underlying I/O error.
        #[source]
        source: anyhow::Error,
    },
    /// A cached copy of the bundle exists but could not be read.
    #[error("Could not read cached bundle `{location}` version {version}: {source}")]
    Cache {
        /// The URL the bundle is cached under.
        location: String,
        /// The requested version.
        version: u32,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The load task stopped without reporting a result.
    #[error("Bundle load for `{location}` ended without a result")]
    Dropped {
        /// The path or URL that was requested.
        location: String,
    },
    /// No persistent data directory could be determined.
    #[error("Could not determine persistent data dir: {0}")]
    DataDir(String),
    /// The bundle configuration could not be loaded.
    #[error("Could not load bundle config `{path}`: {source}")]
    Config {
        /// The config file.
        path: PathBuf,
        /// The read or parse error.
        #[source]
        source: anyhow::Error,
    },
}

impl BundleError {
    /// Create a [`BundleError::Read`].
    pub fn read(location: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::Read {
            location: location.into(),
            source: source.into(),
        }
    }
}
