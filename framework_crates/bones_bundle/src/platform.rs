use serde::Deserialize;

/// The platform family the game is running on.
///
/// The platform decides how the streaming assets directory is exposed as a URL, see
/// [`TargetPlatform::url_prefix`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetPlatform {
    /// Android, where the streaming assets location is already a URL.
    Android,
    /// iOS.
    Ios,
    /// macOS.
    MacOs,
    /// Windows.
    Windows,
    /// Linux.
    Linux,
    /// The browser.
    Web,
    /// Any other platform.
    Other,
}

impl TargetPlatform {
    /// Detect the platform the current process runs on.
    pub fn current() -> Self {
        if cfg!(target_arch = "wasm32") {
            return Self::Web;
        }
        match std::env::consts::OS {
            "android" => Self::Android,
            "ios" => Self::Ios,
            "macos" => Self::MacOs,
            "windows" => Self::Windows,
            "linux" => Self::Linux,
            _ => Self::Other,
        }
    }

    /// Get the prefix used to turn a streaming assets path into a URL on this platform.
    pub fn url_prefix(self) -> UrlPrefix {
        match self {
            Self::Android => UrlPrefix::None,
            _ => UrlPrefix::FileScheme,
        }
    }
}

impl Default for TargetPlatform {
    fn default() -> Self {
        Self::current()
    }
}

/// The scheme prefix prepended to local paths that are loaded through the web protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum UrlPrefix {
    /// The path is passed on as is.
    None,
    /// The path is prefixed with `file://`.
    #[default]
    FileScheme,
}

impl UrlPrefix {
    /// The literal prefix text.
    pub fn as_str(self) -> &'static str {
        match self {
            UrlPrefix::None => "",
            UrlPrefix::FileScheme => "file://",
        }
    }

    /// Prefix `location`, producing the location string for the loader.
    pub fn apply(self, location: &str) -> String {
        format!("{}{location}", self.as_str())
    }
}
