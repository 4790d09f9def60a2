use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt::{self, format::FmtSpan}};

/// Installs the global subscriber, filtering from `RUST_LOG` (default `info`).
pub fn init() {
    init_with_default("info");
}

/// Like [`init`] with a caller-chosen filter when `RUST_LOG` is unset.
///
/// With a `debug` or `trace` filter, span-close events are emitted too, which
/// reports the per-stage frame timings.
pub fn init_with_default(default_filter: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let filter_str = env_filter.to_string();
    let timed_spans = filter_str.contains("debug") || filter_str.contains("trace");

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_timer(fmt::time::uptime())
        .with_span_events(if timed_spans {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        });

    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}
