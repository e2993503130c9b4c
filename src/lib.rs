// Copyright 2026 The greeter-service Authors
//
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! A greeting service with a single RPC: a caller sends a name and the server answers with a
//! greeting for it.
//!
//! The library holds everything both binaries share. The service definition lives here, and the
//! [`listener`] and [`connect`] modules drive it from either end of a TCP connection.

use opentelemetry::{trace::TracerProvider as _, KeyValue};
use opentelemetry_sdk::{trace::SdkTracerProvider, Resource};
use opentelemetry_semantic_conventions::resource::SERVICE_NAME;
use tracing_subscriber::{fmt::format::FmtSpan, prelude::*};

pub mod connect;
mod error;
pub mod greeting;
pub mod handler;
pub mod listener;
pub mod message;
pub mod pool;

pub use error::Error;
pub use message::{HelloRequest, HelloResponse};

/// This is the service definition. It defines one RPC, hello, which takes a request carrying a
/// name and returns a response carrying the greeting.
#[tarpc::service]
pub trait Greeter {
    /// Returns a greeting for the name in `request`.
    async fn hello(request: HelloRequest) -> HelloResponse;
}

/// Flushes any spans still buffered for export when dropped.
#[must_use = "dropping the guard immediately shuts down span export"]
#[derive(Debug)]
pub struct TracingGuard {
    provider: Option<SdkTracerProvider>,
}

impl Drop for TracingGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take() {
            if let Err(e) = provider.shutdown() {
                tracing::warn!("Failed to flush spans: {}", e);
            }
        }
    }
}

/// Initializes a tracing subscriber that logs to stderr, filtered by `RUST_LOG`.
///
/// When `export_otlp` is set, spans are also exported to an OTLP collector over gRPC, tagged
/// with `service_name`.
pub fn init_tracing(service_name: &'static str, export_otlp: bool) -> anyhow::Result<TracingGuard> {
    let provider = if export_otlp {
        let exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .build()?;
        let provider = SdkTracerProvider::builder()
            .with_batch_exporter(exporter)
            .with_resource(
                Resource::builder()
                    .with_attribute(KeyValue::new(SERVICE_NAME, service_name))
                    .build(),
            )
            .build();
        opentelemetry::global::set_tracer_provider(provider.clone());
        Some(provider)
    } else {
        None
    };
    let otel = provider
        .as_ref()
        .map(|provider| tracing_opentelemetry::layer().with_tracer(provider.tracer(service_name)));

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE),
        )
        .with(otel)
        .try_init()?;

    Ok(TracingGuard { provider })
}
