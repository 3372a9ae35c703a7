//! `tracing` subscriber setup

use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Install a stderr subscriber filtered by `RUST_LOG`, or by `filter` when it is unset.
///
/// Returns `false` if a global subscriber was already in place.
pub fn init(filter: &str) -> bool {
    if tracing::dispatcher::has_been_set() {
        debug!("tracing subscriber already set");
        return false;
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_filter(env_filter),
        )
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_only_once() {
        init("debug");
        assert!(!init("info"));
    }
}
