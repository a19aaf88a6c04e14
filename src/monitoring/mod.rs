/*!
 * Monitoring
 * Structured tracing for resolver operations
 */

mod tracer;

pub use tracer::{generate_trace_id, init_test_tracing, init_tracing, span_operation, OperationSpan};
