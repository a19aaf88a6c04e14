/*!
 * Operation Tracing
 * Structured tracing for chain resolution using the tracing crate
 *
 * Features:
 * - Trace ID per resolver operation for log correlation
 * - JSON-formatted logs for structured parsing
 * - Cache hit/miss and timing recorded on the operation span
 */

use std::time::Instant;
use tracing::{debug, span, warn, Level, Span};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};
use uuid::Uuid;

use crate::path::PathSpec;

/// Enables JSON output when set to `1` or `true`
pub const ENV_TRACE_JSON: &str = "LAYERED_VFS_TRACE_JSON";

/// Operations slower than this are logged at warn level
const SLOW_OPERATION_MILLIS: u128 = 100;

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - LAYERED_VFS_TRACE_JSON: Enable JSON output (default: false)
///
/// Does nothing if a global subscriber is already installed.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var(ENV_TRACE_JSON)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_line_number(true)
                    .with_file(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()
    };

    if installed.is_ok() {
        debug!(json = use_json, "Structured tracing initialized");
    }
}

/// Test-writer subscriber at debug level, safe to call from every test
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

/// Generate a unique trace ID for log correlation
pub fn generate_trace_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span around one resolver operation on one chain
pub struct OperationSpan {
    span: Span,
    start: Instant,
    trace_id: String,
}

impl OperationSpan {
    pub fn new(operation: &'static str, path_spec: &PathSpec) -> Self {
        let trace_id = generate_trace_id();
        let span = span!(
            Level::DEBUG,
            "resolve",
            trace_id = %trace_id,
            operation = operation,
            kind = %path_spec.kind(),
            depth = path_spec.depth(),
            cache = tracing::field::Empty,
            duration_us = tracing::field::Empty,
        );

        Self {
            span,
            start: Instant::now(),
            trace_id,
        }
    }

    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    /// Record whether the context already held the chain
    pub fn record_hit(&self, hit: bool) {
        self.span.record("cache", if hit { "hit" } else { "miss" });
    }

    /// Enter the span context
    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }
}

impl Drop for OperationSpan {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        self.span.record("duration_us", duration.as_micros() as u64);
        let _entered = self.span.enter();

        if duration.as_millis() > SLOW_OPERATION_MILLIS {
            warn!(
                trace_id = %self.trace_id,
                duration_ms = duration.as_millis() as u64,
                slow = true,
                "slow resolver operation"
            );
        }
    }
}

/// Create an operation span for `path_spec`
#[inline]
pub fn span_operation(operation: &'static str, path_spec: &PathSpec) -> OperationSpan {
    OperationSpan::new(operation, path_spec)
}
