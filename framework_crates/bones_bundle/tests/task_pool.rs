//! Loads in a process where the application never set up the [`bevy_tasks::IoTaskPool`].

use std::sync::Arc;

use bones_bundle::prelude::*;

#[test]
fn loads_start_the_io_task_pool() {
    let dir = tempfile::tempdir().unwrap();
    let io = Arc::new(DummyBundleIo::new([(
        "/app/streaming/level1.bundle",
        b"local".to_vec(),
    )]));
    let loader = Arc::new(DefaultBundleLoader::new(
        io.clone(),
        BundleCache::new(dir.path()),
    ));
    let manager = BundleManager::new(
        BundleRoots::new("/app/streaming", dir.path(), TargetPlatform::Linux),
        io,
        loader,
    );

    let bundle = manager
        .load_from_streaming_assets_async("level1.bundle")
        .block_on()
        .unwrap();
    assert_eq!(bundle.bytes(), b"local");

    let (sender, receiver) = async_channel::bounded(1);
    manager
        .load_from_www_local_async("level1.bundle", 0)
        .on_complete(move |result| {
            sender.try_send(result.map(|bundle| bundle.origin)).unwrap();
        });
    let origin = futures_lite::future::block_on(receiver.recv()).unwrap();
    assert_eq!(origin.unwrap(), BundleOrigin::File);
}
