//! Subscriber setup for applications embedding ffwrap.
//!
//! The library crates only emit `tracing` events; nothing is printed until
//! the host installs a subscriber, either its own or this one.

/// Filter used when `RUST_LOG` is unset.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        // Verbose: every command line and scan summary.
        "ffwrap=debug,fw_av=debug,fw_probe=debug,fw_core=debug"
    } else {
        "ffwrap=info,fw_av=info,fw_probe=warn,fw_core=info"
    }
}

/// Install a `tracing_subscriber::fmt` subscriber.
///
/// `RUST_LOG` wins when set. Returns `false` if a global subscriber was
/// already installed, so calling this more than once is harmless.
pub fn init(verbose: bool) -> bool {
    let env_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter(verbose).to_string());

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .try_init()
        .is_ok()
}
