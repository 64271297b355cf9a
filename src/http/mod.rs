//! HTTP protocol layer module
//!
//! Protocol-level helpers decoupled from asset lookup: MIME inference,
//! conditional request evaluation, Range parsing, and response builders.

pub mod cache;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_304_response, build_404_response, build_416_response, build_500_response,
    build_ok_response, build_partial_response,
};
