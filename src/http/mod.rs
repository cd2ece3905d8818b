//! HTTP protocol layer module
//!
//! Response construction shared by handlers and middleware.

pub mod response;

pub use response::{build_404_response, build_persist_failure_response, build_text_response};
