/*!
 * Monitoring Module
 * Logging setup and diagnostic reporters
 */

mod tracer;
mod wait_status;

pub use tracer::{init_tracing, TRACE_JSON_VAR};
pub use wait_status::explain_wait_status;
