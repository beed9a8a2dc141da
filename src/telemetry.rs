//! Logging initialization.
//!
//! Controlled by `RUST_LOG`:
//! - unset → no subscriber (zero overhead, command output stays byte-exact),
//! - set → human-readable events to stderr at the filtered level.
//!
//! Diagnostics never share stdout with command output; tests and scripts
//! parse stdout.

use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber when `RUST_LOG` asks for one.
///
/// Call once at startup, before dispatching a command.
pub fn init() {
    if std::env::var_os("RUST_LOG").is_none() {
        return;
    }
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
