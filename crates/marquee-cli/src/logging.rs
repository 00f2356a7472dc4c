//! Tracing subscriber initialization.
//!
//! One-shot subcommands log to stdout. The browser owns the terminal, so
//! its logs go to a file that can be followed with `tail -f`.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

/// Installs the global subscriber.
///
/// Respects `RUST_LOG`, defaulting to `info`. With the `otel` feature and
/// `OTEL_EXPORTER_OTLP_ENDPOINT` set, spans are also exported over OTLP.
///
/// # Errors
///
/// Returns an error if the log file directory cannot be created.
pub fn init(log_file: Option<&Path>) -> Result<()> {
    let (writer, ansi) = make_writer(log_file)?;
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    #[cfg(not(feature = "otel"))]
    {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(writer)
            .with_ansi(ansi)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(writer)
            .with_ansi(ansi);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    Ok(())
}

/// Returns the writer and whether ANSI colors should be emitted.
fn make_writer(log_file: Option<&Path>) -> Result<(BoxMakeWriter, bool)> {
    let Some(path) = log_file else {
        return Ok((BoxMakeWriter::new(std::io::stdout), true));
    };

    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(directory)
        .with_context(|| format!("failed to create log directory {}", directory.display()))?;
    let file_name = path
        .file_name()
        .with_context(|| format!("invalid log file path: {}", path.display()))?;

    let appender = tracing_appender::rolling::never(directory, file_name);
    Ok((BoxMakeWriter::new(appender), false))
}
