use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogFormat;

fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "result_analyzer=info,actix_web=info",
        1 => "result_analyzer=debug,actix_web=info",
        _ => "trace",
    }
}

/// `RUST_LOG` wins over the verbosity flag when set.
pub fn init(format: LogFormat, verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_span_list(false),
            )
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init(),
    }
}
