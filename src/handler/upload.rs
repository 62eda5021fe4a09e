//! Upload handlers
//!
//! Two ways in: the raw request body written under the name from the path,
//! or a `multipart/form-data` body whose `file` part carries both name and
//! content. Both are capped at the configured size limit and replace any
//! existing file of the same name.

use crate::config::AppState;
use crate::error::RequestError;
use crate::handler::router::RequestContext;
use crate::http;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE};
use hyper::Response;
use multer::{Constraints, Multipart, SizeLimit};

/// Form part holding the uploaded file
pub const FORM_FIELD: &str = "file";

/// Room for boundaries, part headers and small extra fields on top of the
/// file itself
pub const FORM_OVERHEAD: usize = 64 << 10;

const BODY_TOO_LARGE: &str = "request body too large";

/// `PUT|POST /{file}`: the body becomes the file content
pub async fn upload_body<B>(
    ctx: &RequestContext<'_>,
    name: &str,
    body: B,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, RequestError>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    state.storage.resolve(name)?;
    let limit = state.size_limit();
    check_content_length(ctx, limit)?;

    let content = read_body(body, limit).await?;
    if content.is_empty() {
        return Err(RequestError::BadRequest("Empty body".to_string()));
    }

    state.storage.write(name, &content).await?;
    state
        .logger
        .debug("Body content written", &[("file", &name), ("size", &content.len())]);

    Ok(http::build_204_response())
}

/// `PUT|POST /`: store the `file` part of a multipart form
///
/// The size limit applies to the `file` part; the request as a whole may
/// exceed it by [`FORM_OVERHEAD`].
pub async fn upload_form<B>(
    ctx: &RequestContext<'_>,
    body: B,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, RequestError>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let content_type = ctx.header(CONTENT_TYPE).unwrap_or("");
    let boundary = multer::parse_boundary(content_type).map_err(|e| {
        RequestError::BadRequest(format!("request Content-Type isn't multipart/form-data: {e}"))
    })?;

    let limit = state.size_limit();
    let stream_limit = limit.saturating_add(FORM_OVERHEAD);
    check_content_length(ctx, stream_limit)?;

    let constraints = Constraints::new().size_limit(
        SizeLimit::new()
            .whole_stream(stream_limit as u64)
            .for_field(FORM_FIELD, limit as u64),
    );
    let mut multipart = Multipart::with_constraints(body.into_data_stream(), boundary, constraints);

    while let Some(field) = multipart.next_field().await.map_err(form_error)? {
        if field.name() != Some(FORM_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(base_name)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| {
                RequestError::BadRequest("http: no such file: form field has no filename".to_string())
            })?;
        state.storage.resolve(&filename)?;

        let content = field.bytes().await.map_err(form_error)?;
        state.logger.debug(
            "File received",
            &[
                ("filename", &filename),
                ("size", &content.len()),
                ("MIME", &crate::http::mime::sniff_content_type(&content)),
            ],
        );

        state.storage.write(&filename, &content).await?;
        state
            .logger
            .debug("Form content written", &[("file", &filename)]);

        return Ok(http::build_204_response());
    }

    Err(RequestError::BadRequest(format!(
        "http: no such file: missing form field {FORM_FIELD:?}"
    )))
}

/// Reject early when `Content-Length` already exceeds the limit
fn check_content_length(ctx: &RequestContext<'_>, limit: usize) -> Result<(), RequestError> {
    let Some(value) = ctx.header(CONTENT_LENGTH) else {
        return Ok(());
    };
    match value.trim().parse::<u64>() {
        Ok(size) if size > limit as u64 => Err(RequestError::BadRequest(format!(
            "{BODY_TOO_LARGE}: {size} bytes (max: {limit})"
        ))),
        Ok(_) => Ok(()),
        Err(_) => Err(RequestError::BadRequest(format!(
            "invalid Content-Length: {value:?}"
        ))),
    }
}

/// Collect at most `limit` bytes of body
async fn read_body<B>(body: B, limit: usize) -> Result<Bytes, RequestError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => Err(RequestError::BadRequest(
            format!("{BODY_TOO_LARGE} (max: {limit})"),
        )),
        Err(e) => Err(RequestError::BadRequest(e.to_string())),
    }
}

fn form_error(err: multer::Error) -> RequestError {
    match err {
        multer::Error::StreamSizeExceeded { limit } => {
            RequestError::BadRequest(format!("{BODY_TOO_LARGE} (max: {limit})"))
        }
        multer::Error::FieldSizeExceeded { limit, .. } => {
            RequestError::BadRequest(format!("form file too large (max: {limit})"))
        }
        other => RequestError::BadRequest(format!("malformed multipart form: {other}")),
    }
}

/// Last path segment of a client supplied filename, either separator style
fn base_name(filename: &str) -> String {
    filename
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(filename)
        .to_string()
}
