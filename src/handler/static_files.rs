//! Static file serving module
//!
//! Serves stored files with content type detection, conditional requests
//! and byte ranges. `index.html` is answered from the page compiled into
//! the binary.

use crate::config::AppState;
use crate::error::RequestError;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, RangeParseResult, Validators};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{IF_MODIFIED_SINCE, IF_NONE_MATCH, RANGE};
use hyper::Response;
use std::path::Path;

/// Reserved name answered with [`INDEX_PAGE`]
pub const INDEX_PAGE_NAME: &str = "index.html";

/// Upload page shipped inside the binary
pub const INDEX_PAGE: &str = include_str!("index.html");

/// Serve a stored file, or the embedded page for the reserved name
pub async fn serve_file(
    ctx: &RequestContext<'_>,
    name: &str,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, RequestError> {
    if name == INDEX_PAGE_NAME {
        return Ok(http::build_html_response(INDEX_PAGE, ctx.is_head));
    }

    let file = state.storage.read(name).await?;
    state.logger.debug("Serving", &[("file", &name), ("size", &file.content.len())]);

    let etag = cache::generate_etag(&file.content);
    let last_modified = file.modified.map(cache::http_date);
    let validators = Validators {
        etag: &etag,
        last_modified: last_modified.as_deref(),
    };

    // If-None-Match takes precedence over If-Modified-Since
    let not_modified = match ctx.header(IF_NONE_MATCH) {
        Some(tags) => cache::check_etag_match(Some(tags), &etag),
        None => cache::not_modified_since(ctx.header(IF_MODIFIED_SINCE), file.modified),
    };
    if not_modified {
        return Ok(http::build_304_response(&validators));
    }

    let content_type = mime::content_type_for(Path::new(name), &file.content);
    let total_size = file.content.len();
    let data = Bytes::from(file.content);

    let response = match http::parse_range_header(ctx.header(RANGE), total_size) {
        RangeParseResult::Valid(range) => http::build_partial_response(
            data.slice(range.start..=range.end),
            content_type,
            &validators,
            range.start,
            range.end,
            total_size,
            ctx.is_head,
        ),
        RangeParseResult::NotSatisfiable => http::build_416_response(total_size),
        RangeParseResult::None => {
            http::build_file_response(data, content_type, &validators, ctx.is_head)
        }
    };
    Ok(response)
}
