//! Process-wide logging setup shared by the campusdesk binaries.

/// Subscriber configuration (filters, formatting).
pub mod subscriber;

/// Initialize structured logging for the process.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    subscriber::init(subscriber::DEFAULT_DIRECTIVE);
}
