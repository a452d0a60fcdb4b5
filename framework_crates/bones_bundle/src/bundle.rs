use std::sync::Arc;

use sha2::Digest;

use crate::prelude::*;

/// A content ID for a bundle: the Sha-256 hash of its bytes.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Default, PartialOrd, Ord)]
#[repr(transparent)]
pub struct BundleCid(pub [u8; 32]);

impl BundleCid {
    /// Hash `bytes` into a new content ID.
    pub fn of(bytes: &[u8]) -> Self {
        let mut cid = Self::default();
        cid.0.copy_from_slice(&sha2::Sha256::digest(bytes));
        cid
    }
}

impl std::fmt::Display for BundleCid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", bs58::encode(self.0).into_string())
    }
}

impl std::fmt::Debug for BundleCid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BundleCid({})", self)
    }
}

/// Where the bytes of a loaded bundle came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BundleOrigin {
    /// Read from a local file.
    File,
    /// Downloaded over the network.
    Network,
    /// Read from the versioned bundle cache.
    Cache,
}

/// A loaded bundle archive.
///
/// Cloning is cheap, the archive bytes are shared.
#[derive(Clone)]
pub struct AssetBundle {
    /// The bundle name: the last segment of the location it was loaded from.
    pub name: String,
    /// The resolved path or URL the bundle was requested from.
    pub location: String,
    /// The load type the bundle was requested with.
    pub load_type: BundleLoadType,
    /// The version the bundle was requested with.
    pub version: u32,
    /// Where the bytes were actually read from.
    pub origin: BundleOrigin,
    /// The content ID of [`data`][Self::data].
    pub cid: BundleCid,
    /// The raw archive bytes.
    pub data: Arc<[u8]>,
}

impl AssetBundle {
    /// Create a bundle from the bytes loaded from `location`.
    pub fn new(
        location: impl Into<String>,
        load_type: BundleLoadType,
        version: u32,
        origin: BundleOrigin,
        data: Vec<u8>,
    ) -> Self {
        let location = location.into();
        Self {
            name: bundle_name(&location).to_owned(),
            cid: BundleCid::of(&data),
            data: data.into(),
            location,
            load_type,
            version,
            origin,
        }
    }

    /// The archive bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// The archive size in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the archive is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl std::fmt::Debug for AssetBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetBundle")
            .field("name", &self.name)
            .field("location", &self.location)
            .field("load_type", &self.load_type)
            .field("version", &self.version)
            .field("origin", &self.origin)
            .field("cid", &self.cid)
            .field("len", &self.data.len())
            .finish()
    }
}

/// The last `/` or `\` separated segment of a path or URL, ignoring any query or fragment.
fn bundle_name(location: &str) -> &str {
    let location = location
        .split(|c: char| c == '?' || c == '#')
        .next()
        .unwrap_or(location);
    location
        .rsplit(|c: char| c == '/' || c == '\\')
        .find(|segment| !segment.is_empty())
        .unwrap_or(location)
}
