//! globd: a minimal HTTP file-storage server
//!
//! Clients upload, list, fetch and delete files in one flat directory with
//! plain HTTP verbs. See `handler` for the routing table.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
pub mod storage;
