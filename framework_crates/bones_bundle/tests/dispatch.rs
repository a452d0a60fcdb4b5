//! Checks the paths, URLs and load types the [`BundleManager`] hands to its io and loader.

use std::{
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use bones_bundle::prelude::*;

/// Loader that records every call and resolves immediately with an empty bundle.
struct RecordingLoader {
    calls: Mutex<Vec<(String, BundleLoadType, u32)>>,
}

impl RecordingLoader {
    fn new(created: &AtomicUsize) -> Self {
        created.fetch_add(1, Ordering::SeqCst);
        Self {
            calls: Default::default(),
        }
    }

    fn calls(&self) -> Vec<(String, BundleLoadType, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

impl BundleLoader for RecordingLoader {
    fn load_bundle(
        &self,
        location: String,
        load_type: BundleLoadType,
        version: u32,
    ) -> BundleRequest {
        self.calls
            .lock()
            .unwrap()
            .push((location.clone(), load_type, version));
        let bundle = AssetBundle::new(
            location.clone(),
            load_type,
            version,
            BundleOrigin::File,
            Vec::new(),
        );
        BundleRequest::ready(location, Ok(bundle))
    }
}

struct Fixture {
    manager: BundleManager,
    io: Arc<DummyBundleIo>,
    loader: Arc<RecordingLoader>,
    created: Arc<AtomicUsize>,
}

fn fixture(platform: TargetPlatform) -> Fixture {
    let io = Arc::new(DummyBundleIo::new([
        ("/app/streaming/level1.bundle", b"streaming".to_vec()),
        ("/data/user/level1.bundle", b"persistent".to_vec()),
    ]));
    let created = Arc::new(AtomicUsize::new(0));
    let loader = Arc::new(RecordingLoader::new(&created));
    let roots = BundleRoots::new("/app/streaming", "/data/user", platform);
    let manager = BundleManager::new(roots, io.clone(), loader.clone());
    Fixture {
        manager,
        io,
        loader,
        created,
    }
}

#[test]
fn sync_loads_read_the_joined_path() {
    let Fixture { manager, io, .. } = fixture(TargetPlatform::Linux);

    let bundle = manager.load_from_streaming_assets("level1.bundle").unwrap();
    assert_eq!(bundle.bytes(), b"streaming");
    assert_eq!(bundle.name, "level1.bundle");
    assert_eq!(bundle.location, "/app/streaming/level1.bundle");

    let bundle = manager.load_from_persistent_data("level1.bundle").unwrap();
    assert_eq!(bundle.bytes(), b"persistent");

    assert_eq!(
        io.requests(),
        vec![
            IoRequest::Read(PathBuf::from("/app/streaming/level1.bundle")),
            IoRequest::Read(PathBuf::from("/data/user/level1.bundle")),
        ]
    );
}

#[test]
fn sync_load_of_a_missing_bundle_fails() {
    let Fixture { manager, .. } = fixture(TargetPlatform::Linux);

    let err = manager.load_from_streaming_assets("missing.bundle").unwrap_err();
    assert!(matches!(
        err,
        BundleError::Read { ref location, .. } if location == "/app/streaming/missing.bundle"
    ));
}

#[test]
fn local_async_loads_use_the_file_load_type() {
    let Fixture {
        manager, loader, io, ..
    } = fixture(TargetPlatform::Linux);

    manager
        .load_from_streaming_assets_async("level1.bundle")
        .block_on()
        .unwrap();
    manager
        .load_from_persistent_data_async("dlc/level2.bundle")
        .block_on()
        .unwrap();

    assert_eq!(
        loader.calls(),
        vec![
            (
                "/app/streaming/level1.bundle".to_string(),
                BundleLoadType::File,
                0
            ),
            (
                "/data/user/dlc/level2.bundle".to_string(),
                BundleLoadType::File,
                0
            ),
        ]
    );
    // Async loads never touch the sync io.
    assert!(io.requests().is_empty());
}

#[test]
fn www_local_prefixes_the_streaming_path() {
    let Fixture {
        manager, loader, ..
    } = fixture(TargetPlatform::Windows);
    let joined = Path::new("/app/streaming").join("level1.bundle");

    let request = manager.load_from_www_local_async("level1.bundle", 4);
    assert_eq!(request.location(), format!("file://{}", joined.display()));
    request.block_on().unwrap();

    assert_eq!(
        loader.calls(),
        vec![(
            format!("file://{}", joined.display()),
            BundleLoadType::Www,
            4
        )]
    );
}

#[test]
fn www_local_on_android_has_no_prefix() {
    let Fixture {
        manager, loader, ..
    } = fixture(TargetPlatform::Android);

    manager
        .load_from_www_local_async("level1.bundle", 0)
        .block_on()
        .unwrap();

    let joined = Path::new("/app/streaming").join("level1.bundle");
    assert_eq!(
        loader.calls(),
        vec![(joined.display().to_string(), BundleLoadType::Www, 0)]
    );
}

#[test]
fn remote_loads_pass_the_url_verbatim() {
    let Fixture {
        manager, loader, ..
    } = fixture(TargetPlatform::Linux);
    let url = "https://cdn.example.com/bundles/Level 1.bundle?token=a/b";

    drop(manager.load_from_www_url_async(url, 7));
    drop(manager.load_from_cache_or_download_async(url, 7));
    drop(manager.load_from_web_request_async(url, 7));

    let calls = loader.calls();
    assert_eq!(calls.len(), 3);
    for (location, _, version) in &calls {
        assert_eq!(location, url);
        assert_eq!(*version, 7);
    }

    let load_types = calls.iter().map(|(_, ty, _)| *ty).collect::<Vec<_>>();
    assert_eq!(
        load_types,
        vec![
            BundleLoadType::Www,
            BundleLoadType::LoadFromCacheOrDownload,
            BundleLoadType::WebRequest,
        ]
    );
    assert_ne!(load_types[0], load_types[1]);
    assert_ne!(load_types[1], load_types[2]);
    assert_ne!(load_types[0], load_types[2]);
}

#[test]
fn every_entry_point_shares_one_loader() {
    let Fixture {
        manager,
        loader,
        created,
        ..
    } = fixture(TargetPlatform::Linux);
    let clone = manager.clone();

    drop(clone.load_from_web_request_async("https://cdn/a.bundle", 1));
    drop(manager.load_from_streaming_assets_async("a.bundle"));
    drop(clone.load_from_persistent_data_async("a.bundle"));
    drop(manager.load_from_www_local_async("a.bundle", 1));
    drop(clone.load_from_www_url_async("https://cdn/a.bundle", 1));
    drop(manager.load_from_cache_or_download_async("https://cdn/a.bundle", 1));
    manager.load_from_streaming_assets("level1.bundle").unwrap();
    clone.load_from_persistent_data("level1.bundle").unwrap();

    assert_eq!(created.load(Ordering::SeqCst), 1);
    assert_eq!(loader.calls().len(), 6);
    assert!(Arc::ptr_eq(&manager.loader, &clone.loader));
}

#[test]
fn loader_defaults_to_file_at_version_zero() {
    let created = AtomicUsize::new(0);
    let loader = RecordingLoader::new(&created);

    drop(loader.load("/app/streaming/level1.bundle".to_string()));

    assert_eq!(
        loader.calls(),
        vec![(
            "/app/streaming/level1.bundle".to_string(),
            BundleLoadType::File,
            0
        )]
    );
}

#[cfg(unix)]
#[test]
fn non_utf8_roots_fail_without_reaching_the_loader() {
    use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

    let created = AtomicUsize::new(0);
    let loader = Arc::new(RecordingLoader::new(&created));
    let roots = BundleRoots::new(
        OsStr::from_bytes(b"/app/str\xffeam"),
        OsStr::from_bytes(b"/data/us\xffer"),
        TargetPlatform::Linux,
    );
    let manager = BundleManager::new(roots, Arc::new(DummyBundleIo::default()), loader.clone());

    for request in [
        manager.load_from_streaming_assets_async("level1.bundle"),
        manager.load_from_persistent_data_async("level1.bundle"),
        manager.load_from_www_local_async("level1.bundle", 1),
    ] {
        assert!(matches!(request.block_on(), Err(BundleError::Read { .. })));
    }
    assert!(loader.calls().is_empty());
}
