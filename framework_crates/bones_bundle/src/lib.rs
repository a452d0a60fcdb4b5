//! Bundle loading for Bones.
//!
//! A [`BundleManager`] resolves bundle names against the streaming assets and persistent data
//! directories and hands the resulting paths and URLs to a [`BundleLoader`], which does the
//! actual file, network and cache work.

#![warn(missing_docs)]
// This cfg_attr is needed because `rustdoc::all` includes lints not supported on stable
#![cfg_attr(doc, allow(unknown_lints))]
#![deny(rustdoc::all)]

/// Helper to export the same types in the crate root and in the prelude.
macro_rules! pub_use {
    () => {
        pub use crate::{
            bundle::*, cache::*, config::*, error::*, io::*, load_type::*, loader::*, manager::*,
            platform::*, request::*, roots::*,
        };
        pub use anyhow;
        pub use futures_lite::future::Boxed as BoxedFuture;
    };
}
pub_use!();

/// The prelude.
pub mod prelude {
    pub_use!();
    #[cfg(feature = "logging")]
    pub use crate::logging::prelude::*;
}

mod bundle;
mod cache;
mod config;
mod error;
mod io;
mod load_type;
mod loader;
mod manager;
mod platform;
mod request;
mod roots;

#[cfg(feature = "logging")]
pub mod logging;
