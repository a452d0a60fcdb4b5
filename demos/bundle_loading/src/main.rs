use bevy_tasks::{IoTaskPool, TaskPool};
use bones_bundle::prelude::*;

//
// NOTE: You must run this demo from within the `demos/bundle_loading` folder so that the
// `bundles.yaml` config and the `assets` folder are found.
//
// Each argument is either a bundle name in the streaming assets folder, or a URL that will be
// downloaded into the bundle cache. A URL may end with `@<version>` to pick the cache version:
//
//     cargo run -- level1.bundle https://example.com/level2.bundle@3
//

fn main() {
    setup_logs!();

    // Bundle loads run on the IO task pool.
    IoTaskPool::init(TaskPool::default);

    let config = BundleConfig::from_file("bundles.yaml").unwrap_or_else(|e| {
        tracing::warn!("{e}, using the default config");
        BundleConfig::default()
    });
    let manager = match BundleManager::from_config(&config) {
        Ok(manager) => manager,
        Err(e) => {
            tracing::error!("Could not create bundle manager: {e}");
            return;
        }
    };
    tracing::info!(roots = ?manager.roots, "Bundle manager ready");

    let mut args = std::env::args().skip(1).peekable();
    let names = if args.peek().is_none() {
        vec!["level1.bundle".to_string()]
    } else {
        args.collect()
    };

    for name in names {
        if name.contains("://") {
            let (url, version) = split_version(&name);
            let request = manager.load_from_cache_or_download_async(url, version);
            report(request.block_on());
        } else {
            report(manager.load_from_streaming_assets(&name));
            report(manager.load_from_www_local_async(&name, 0).block_on());
        }
    }
}

/// Split a trailing `@<version>` off of `url`, defaulting to version `1`.
fn split_version(url: &str) -> (&str, u32) {
    url.rsplit_once('@')
        .and_then(|(url, version)| Some((url, version.parse().ok()?)))
        .unwrap_or((url, 1))
}

fn report(result: BundleResult) {
    match result {
        Ok(bundle) => tracing::info!(
            name = %bundle.name,
            load_type = %bundle.load_type,
            origin = ?bundle.origin,
            cid = %bundle.cid,
            "Loaded {} bytes",
            bundle.len()
        ),
        Err(e) => tracing::error!("{e}"),
    }
}
