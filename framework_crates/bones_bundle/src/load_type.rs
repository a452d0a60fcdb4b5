/// Selects the mechanism a [`BundleLoader`][crate::BundleLoader] uses to fetch a bundle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum BundleLoadType {
    /// Read the bundle directly from a filesystem path.
    #[default]
    File,
    /// Load through the legacy web protocol, which accepts `file://` and network URLs.
    Www,
    /// Like [`Www`][Self::Www], but keep a versioned copy on disk and reuse it when the
    /// requested version is already cached.
    LoadFromCacheOrDownload,
    /// Load through a modern web request. A non-zero version enables the disk cache.
    WebRequest,
}

impl BundleLoadType {
    /// Whether a load of this type at `version` goes through the versioned disk cache.
    pub fn uses_cache(self, version: u32) -> bool {
        match self {
            BundleLoadType::LoadFromCacheOrDownload => true,
            BundleLoadType::WebRequest => version != 0,
            BundleLoadType::File | BundleLoadType::Www => false,
        }
    }
}

impl std::fmt::Display for BundleLoadType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BundleLoadType::File => "file",
            BundleLoadType::Www => "www",
            BundleLoadType::LoadFromCacheOrDownload => "cache-or-download",
            BundleLoadType::WebRequest => "web-request",
        };
        f.write_str(name)
    }
}
