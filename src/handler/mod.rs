//! Request handler module
//!
//! Routes requests to the four file operations: list, retrieve, upload
//! (raw body or multipart form) and delete.

pub mod delete;
pub mod listing;
pub mod router;
pub mod static_files;
pub mod upload;

// Re-export main entry point
pub use router::handle_request;
