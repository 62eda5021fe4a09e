//! File removal

use crate::config::AppState;
use crate::error::RequestError;
use crate::http;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// Remove a stored entry; removing something already absent succeeds
pub async fn delete_file(
    name: &str,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, RequestError> {
    let removed = state.storage.remove(name).await?;
    state
        .logger
        .debug("Deleted", &[("file", &name), ("existed", &removed)]);
    Ok(http::build_204_response())
}
