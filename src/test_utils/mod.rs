//! Test utilities for gateway-assess
//!
//! Helpers for building bundle archives and export documents on disk, and a
//! scripted [`MockPlatform`] standing in for the target management API.
//!
//! # Example
//!
//! ```rust,no_run
//! use gateway_assess::test_utils::{BundleBuilder, MockPlatform};
//!
//! let dir = tempfile::tempdir().unwrap();
//! BundleBuilder::proxy("/orders").write(&dir.path().join("orders.zip")).unwrap();
//! let platform = MockPlatform::new();
//! ```

pub mod fixtures;
pub mod mock_platform;

pub use fixtures::{BundleBuilder, ExportFixture};
pub use mock_platform::{MockPlatform, PlatformCall, transient};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG`; does nothing when neither is set.
///
/// ```bash
/// RUST_LOG=gateway_assess=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
