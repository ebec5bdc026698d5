pub mod adapters;
pub mod cache;
pub mod config;
pub mod container;
pub mod error;
pub mod gateway;
pub mod services;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

// Re-export the composition root and config so host apps only need one
// import to stand the whole layer up.
pub use config::Config;
pub use container::ServiceContainer;
pub use error::ClientError;

/// Installs a `tracing` subscriber filtered to `level`.
///
/// Host apps call this once at startup; calling it again is a no-op so
/// tests can invoke it freely.
pub fn init_tracing(level: tracing::Level) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
