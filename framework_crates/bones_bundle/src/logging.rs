//! Logging setup for games using bones bundles. Provides a global tracing subscriber and panic
//! hook.
//!
//! Enabled with feature "logging". See docs of [`setup_logging`] for details + usage.
#![allow(clippy::needless_doctest_main)]

use std::{
    backtrace::{Backtrace, BacktraceStatus},
    error::Error,
    panic::PanicHookInfo,
};

use tracing::Level;
use tracing_subscriber::{
    filter::ParseError,
    layer::SubscriberExt,
    EnvFilter, Layer, Registry,
};

/// Logging prelude
pub mod prelude {
    pub use super::{setup_logging, LogSettings};
    pub use crate::setup_logs;
}

/// A boxed [`Layer`] that can be used with [`setup_logging`].
pub type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Settings for the global tracing subscriber.
pub struct LogSettings {
    /// Filters logs using the [`EnvFilter`] format
    pub filter: String,

    /// Filters out logs that are "less than" the given level.
    /// This can be further filtered using the `filter` setting.
    pub level: Level,

    /// Optionally add an extra [`Layer`] to the tracing subscriber
    ///
    /// This function is only called once, when logging is initialized.
    pub custom_layer: fn() -> Option<BoxedLayer>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: "ureq=warn,bones_bundle=info".to_string(),
            level: Level::INFO,
            custom_layer: || None,
        }
    }
}

/// Setup the global tracing subscriber and add a hook for tracing panics.
///
/// The `RUST_LOG` environment variable takes precedence over the [`LogSettings`] filter. If it
/// is missing or invalid, `level,filter` is used instead.
///
/// Logs go to stdout, or to the browser console on wasm.
///
/// # Examples
///
/// ```
/// use bones_bundle::logging::prelude::*;
/// fn main() {
///     setup_logging(LogSettings::default());
/// }
/// ```
/// or
/// ```
/// use bones_bundle::logging::prelude::*;
/// fn main() {
///     setup_logs!();
/// }
/// ```
pub fn setup_logging(settings: LogSettings) {
    // Preserve current panic hook, and call `tracing_panic_hook` to send panic and possibly
    // backtrace to tracing subscribers, and not just stderr.
    let prev_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        tracing_panic_hook(panic_info);
        prev_hook(panic_info);
    }));

    let subscriber = Registry::default().with((settings.custom_layer)());

    let default_filter = format!("{},{}", settings.level, settings.filter);
    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|from_env_error| {
        if let Some(parse_err) = from_env_error
            .source()
            .and_then(|source| source.downcast_ref::<ParseError>())
        {
            // we cannot use the `error!` macro here because the logger is not ready yet.
            eprintln!("setup_logging() failed to parse filter from env: {parse_err}");
        }
        EnvFilter::builder().parse_lossy(&default_filter)
    });

    let subscriber = subscriber.with(filter_layer);

    // note: the implementation of `Default` reads from the env var NO_COLOR
    // to decide whether to use ANSI color codes, which is common convention
    // https://no-color.org/
    #[cfg(not(target_arch = "wasm32"))]
    let subscriber = subscriber.with(tracing_subscriber::fmt::Layer::default());

    // Browser console.
    #[cfg(target_arch = "wasm32")]
    let subscriber = subscriber.with(tracing_wasm::WASMLayer::new(
        tracing_wasm::WASMLayerConfig::default(),
    ));

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        tracing::error!(
            "{err} - `setup_logging` was called but a global subscriber is already set."
        );
    }
}

/// Logging macros
#[macro_use]
pub mod macros {
    /// [`setup_logs`] is a macro for initializing logging.
    ///
    /// It wraps a call to [`super::setup_logging`] (see docs for details on configuration options).
    ///
    /// ```
    /// use bones_bundle::logging::prelude::*;
    /// setup_logs!();
    /// ```
    #[macro_export]
    macro_rules! setup_logs {
        // LogSettings::default() -
        //   setup_logs!();
        () => {
            $crate::logging::setup_logging($crate::logging::LogSettings::default())
        };
        // With LogSettings expression -
        //   setup_logs!(LogSettings { .. });
        ($settings:expr) => {
            $crate::logging::setup_logging($settings)
        };
    }
}

/// Panic hook that sends panic payload to [`tracing::error`], and backtrace if available.
///
/// This hook is enabled in [`setup_logging`] to make sure panics are traced.
pub fn tracing_panic_hook(panic_info: &PanicHookInfo) {
    let payload = panic_info.payload();

    let payload = if let Some(s) = payload.downcast_ref::<&str>() {
        Some(*s)
    } else {
        payload.downcast_ref::<String>().map(|s| s.as_str())
    };

    let location = panic_info.location().map(|l| l.to_string());
    let backtrace = Backtrace::capture();
    let note = (backtrace.status() == BacktraceStatus::Disabled)
        .then_some("run with RUST_BACKTRACE=1 environment variable to display a backtrace");

    tracing::error!(
        panic.payload = payload,
        panic.location = location,
        panic.backtrace = %backtrace,
        panic.note = note,
        "A panic occurred",
    );
}
