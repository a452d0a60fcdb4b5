use std::path::{Path, PathBuf};

use anyhow::Context;
use path_absolutize::Absolutize;
use serde::Deserialize;

use crate::prelude::*;

/// Configuration for a [`BundleManager`], usually loaded from a YAML file.
///
/// ```yaml
/// streaming_assets: assets/streaming
/// app_namespace: [org, fishfolk, jumpy]
/// platform: android
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BundleConfig {
    /// The read-only streaming assets directory. Relative paths are resolved against the
    /// current directory.
    pub streaming_assets: PathBuf,
    /// The writable persistent data directory. If unset it is picked from
    /// [`app_namespace`][Self::app_namespace].
    pub persistent_data: Option<PathBuf>,
    /// The (qualifier, organization, application) used to find the OS data dir for the game,
    /// for example `("org", "fishfolk", "jumpy")`.
    pub app_namespace: (String, String, String),
    /// The platform to resolve URLs for. Defaults to [`TargetPlatform::current()`].
    pub platform: Option<TargetPlatform>,
    /// The bundle cache directory, relative to the persistent data directory.
    pub cache_dir: PathBuf,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            streaming_assets: PathBuf::from("assets"),
            persistent_data: None,
            app_namespace: ("org".into(), "fishfolk".into(), "bones".into()),
            platform: None,
            cache_dir: PathBuf::from("bundle_cache"),
        }
    }
}

impl BundleConfig {
    /// Parse a config from YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Load a config from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, BundleError> {
        let path = path.as_ref();
        let result = std::fs::read_to_string(path)
            .context("Failed to read config file")
            .and_then(|yaml| {
                Self::from_yaml_str(&yaml).context("Failed to deserialize config file")
            });
        result.map_err(|source| BundleError::Config {
            path: path.to_owned(),
            source,
        })
    }

    /// The platform this config resolves URLs for.
    pub fn platform(&self) -> TargetPlatform {
        self.platform.unwrap_or_default()
    }

    /// Resolve the absolute [`BundleRoots`] described by this config.
    pub fn roots(&self) -> Result<BundleRoots, BundleError> {
        let streaming_assets = absolutize(&self.streaming_assets)?;
        let persistent_data = match &self.persistent_data {
            Some(dir) => absolutize(dir)?,
            None => find_persistent_data_dir(&self.app_namespace)?,
        };
        Ok(BundleRoots::new(streaming_assets, persistent_data, self.platform()))
    }
}

fn absolutize(path: &Path) -> Result<PathBuf, BundleError> {
    path.absolutize()
        .map(|p| p.into_owned())
        .map_err(|e| BundleError::Config {
            path: path.to_owned(),
            source: e.into(),
        })
}

#[allow(unused_variables)]
fn find_persistent_data_dir(
    app_namespace: &(String, String, String),
) -> Result<PathBuf, BundleError> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        let (qualifier, organization, application) = app_namespace;
        directories::ProjectDirs::from(qualifier, organization, application)
            // error message from `ProjectDirs::from` docs
            .ok_or(BundleError::DataDir(
                "no valid home directory path could be retrieved from the operating system"
                    .to_string(),
            ))
            .map(|dirs| dirs.data_dir().to_owned())
    }

    #[cfg(target_arch = "wasm32")]
    {
        Err(BundleError::DataDir(
            "persistent data dir must be configured on wasm32".to_string(),
        ))
    }
}
