//! HTTP protocol layer module
//!
//! Protocol helpers shared by the request handlers: response builders,
//! content negotiation, MIME detection, caching and Range parsing.

pub mod cache;
pub mod mime;
pub mod negotiate;
pub mod range;
pub mod response;

// Re-export commonly used types
pub use negotiate::ListFormat;
pub use range::{parse_range_header, ByteRange, RangeParseResult};
pub use response::{
    build_204_response, build_304_response, build_404_response, build_405_response,
    build_416_response, build_content_response, build_error_response, build_file_response,
    build_html_response, build_partial_response, Validators,
};
