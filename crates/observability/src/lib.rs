//! Tracing/logging setup shared by binaries and integration tests.

/// Subscriber configuration (filters, formatters).
pub mod tracing;

/// Initialize process-wide structured logging.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Human-readable logs routed through the test harness' captured output.
pub fn init_for_tests() {
    tracing::init_for_tests();
}
