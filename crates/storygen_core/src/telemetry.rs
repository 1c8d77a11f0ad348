//! Tracing subscriber setup.
//!
//! Installs a `tracing` registry with an `EnvFilter` and a fmt layer. With the
//! `observability` feature an OpenTelemetry layer exporting spans to stdout is
//! stacked on top.

use storygen_error::{ConfigError, StorygenResult};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Options for [`init_tracing`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TracingOptions {
    /// Log at debug level when `RUST_LOG` is unset
    pub verbose: bool,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the defaults chosen from `options`.
///
/// # Errors
///
/// Returns error if a global subscriber is already installed.
pub fn init_tracing(options: TracingOptions) -> StorygenResult<()> {
    let default_directive = if options.verbose {
        "debug"
    } else {
        "info,storygen=debug"
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let fmt_layer = if options.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_level(true)
            .boxed()
    };

    let registry = tracing_subscriber::registry().with(env_filter).with(fmt_layer);

    #[cfg(feature = "observability")]
    let registry = registry.with(otel::layer());

    registry
        .try_init()
        .map_err(|e| ConfigError::new(format!("Failed to initialize tracing: {}", e)))?;

    tracing::debug!(?options, "Tracing initialized");
    Ok(())
}

/// Flush pending spans before exit.
#[cfg(feature = "observability")]
pub fn shutdown_tracing() {
    opentelemetry::global::shutdown_tracer_provider();
}

#[cfg(feature = "observability")]
mod otel {
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry_sdk::{
        Resource,
        trace::{RandomIdGenerator, Sampler, TracerProvider},
    };
    use opentelemetry_stdout::SpanExporter;

    pub(super) fn layer<S>() -> tracing_opentelemetry::OpenTelemetryLayer<S, opentelemetry_sdk::trace::Tracer>
    where
        S: tracing::Subscriber + for<'span> tracing_subscriber::registry::LookupSpan<'span>,
    {
        let provider = TracerProvider::builder()
            .with_simple_exporter(SpanExporter::default())
            .with_id_generator(RandomIdGenerator::default())
            .with_sampler(Sampler::AlwaysOn)
            .with_resource(Resource::default())
            .build();

        let tracer = provider.tracer("storygen");
        opentelemetry::global::set_tracer_provider(provider);

        tracing_opentelemetry::layer().with_tracer(tracer)
    }
}
