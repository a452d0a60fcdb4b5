use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use async_channel::Sender;
use bevy_tasks::{IoTaskPool, TaskPool};

use crate::prelude::*;

/// A pending bundle load.
///
/// Resolves exactly once to the result of the load. Dropping the request does not cancel the
/// load, the result is just discarded.
#[must_use = "the bundle is only available by awaiting the request or using `on_complete`"]
pub struct BundleRequest {
    location: String,
    future: BoxedFuture<BundleResult>,
}

/// The sending half of a [`BundleRequest`], used by loaders to deliver the result.
pub struct BundleCompleter {
    location: String,
    sender: Sender<BundleResult>,
}

impl BundleRequest {
    /// Create a request for `location` along with the completer that resolves it.
    pub fn channel(location: impl Into<String>) -> (BundleCompleter, Self) {
        let location = location.into();
        let (sender, receiver) = async_channel::bounded(1);
        let completer = BundleCompleter {
            location: location.clone(),
            sender,
        };

        let location_ = location.clone();
        let future = Box::pin(async move {
            receiver.recv().await.unwrap_or_else(|_| {
                Err(BundleError::Dropped {
                    location: location_,
                })
            })
        });

        (completer, Self { location, future })
    }

    /// Create a request that is already resolved.
    pub fn ready(location: impl Into<String>, result: BundleResult) -> Self {
        Self {
            location: location.into(),
            future: Box::pin(async move { result }),
        }
    }

    /// The location this request loads from.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Block the current thread until the load finishes.
    pub fn block_on(self) -> BundleResult {
        futures_lite::future::block_on(self)
    }

    /// Call `callback` with the result once the load finishes.
    ///
    /// The callback runs on the [`IoTaskPool`], which is initialized with the default settings
    /// if the application has not done so.
    pub fn on_complete<F>(self, callback: F)
    where
        F: FnOnce(BundleResult) + Send + 'static,
    {
        IoTaskPool::init(TaskPool::default)
            .spawn(async move { callback(self.await) })
            .detach();
    }
}

impl Future for BundleRequest {
    type Output = BundleResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.future.as_mut().poll(cx)
    }
}

impl std::fmt::Debug for BundleRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BundleRequest")
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

impl BundleCompleter {
    /// Deliver the result of the load.
    pub fn complete(self, result: BundleResult) {
        if self.sender.try_send(result).is_err() {
            tracing::trace!(location = %self.location, "Bundle request dropped before completion");
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn bundle() -> AssetBundle {
        AssetBundle::new(
            "/app/level1.bundle",
            BundleLoadType::File,
            0,
            BundleOrigin::File,
            vec![1, 2, 3],
        )
    }

    #[test]
    fn completes_once() {
        let (completer, request) = BundleRequest::channel("/app/level1.bundle");
        assert_eq!(request.location(), "/app/level1.bundle");
        completer.complete(Ok(bundle()));

        let loaded = request.block_on().unwrap();
        assert_eq!(loaded.bytes(), &[1, 2, 3]);
    }

    #[test]
    fn dropped_completer_reports_an_error() {
        let (completer, request) = BundleRequest::channel("/app/level1.bundle");
        drop(completer);

        assert!(matches!(
            request.block_on(),
            Err(BundleError::Dropped { location }) if location == "/app/level1.bundle"
        ));
    }

    #[test]
    fn completing_a_dropped_request_is_harmless() {
        let (completer, request) = BundleRequest::channel("/app/level1.bundle");
        drop(request);
        completer.complete(Ok(bundle()));
    }

    #[test]
    fn on_complete_calls_back_once() {
        IoTaskPool::init(TaskPool::default);
        let (sender, receiver) = async_channel::unbounded();

        BundleRequest::ready("/app/level1.bundle", Ok(bundle())).on_complete(move |result| {
            sender.try_send(result.map(|b| b.name)).unwrap();
        });

        let name = futures_lite::future::block_on(receiver.recv()).unwrap();
        assert_eq!(name.unwrap(), "level1.bundle");
        assert!(futures_lite::future::block_on(receiver.recv()).is_err());
    }
}
