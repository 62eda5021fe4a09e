//! MIME type detection module
//!
//! Content-Type comes from the file extension; unknown extensions fall back
//! to sniffing the first bytes of the content.

use infer::MatcherType;
use std::path::Path;

/// Bytes inspected when sniffing
const SNIFF_LEN: usize = 512;

/// Get MIME Content-Type based on file extension
///
/// # Examples
/// ```
/// use globd::http::mime::get_content_type;
/// assert_eq!(get_content_type(Some("html")), Some("text/html; charset=utf-8"));
/// assert_eq!(get_content_type(Some("mp4")), Some("video/mp4"));
/// assert_eq!(get_content_type(None), None);
/// ```
pub fn get_content_type(extension: Option<&str>) -> Option<&'static str> {
    let extension = extension?.to_ascii_lowercase();
    let content_type = match extension.as_str() {
        // Text
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "txt" | "md" | "log" => "text/plain; charset=utf-8",
        "csv" => "text/csv; charset=utf-8",
        "xml" => "text/xml; charset=utf-8",

        // JavaScript/WASM
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "json" => "application/json",
        "wasm" => "application/wasm",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "avif" => "image/avif",

        // Video
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "ogv" => "video/ogg",
        "mov" => "video/quicktime",

        // Audio
        "mp3" => "audio/mpeg",
        "ogg" => "audio/ogg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        "m4a" => "audio/mp4",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",

        // Documents and archives
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" | "gzip" => "application/gzip",
        "tar" => "application/x-tar",

        _ => return None,
    };
    Some(content_type)
}

/// Guess a content type from leading bytes
///
/// Binary formats are recognized by their magic numbers; markup and text
/// are decided here so they always carry a charset.
pub fn sniff_content_type(content: &[u8]) -> &'static str {
    let head = &content[..content.len().min(SNIFF_LEN)];
    if let Some(kind) = infer::get(head).filter(|k| k.matcher_type() != MatcherType::Text) {
        return kind.mime_type();
    }

    let start = head
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(head.len());
    let trimmed = &head[start..];
    let lowered = trimmed
        .iter()
        .take(14)
        .map(u8::to_ascii_lowercase)
        .collect::<Vec<_>>();
    if lowered.starts_with(b"<!doctype html") || lowered.starts_with(b"<html") {
        return "text/html; charset=utf-8";
    }

    if looks_like_text(head) {
        "text/plain; charset=utf-8"
    } else {
        "application/octet-stream"
    }
}

/// Extension lookup first, sniffing second
pub fn content_type_for(path: &Path, content: &[u8]) -> &'static str {
    get_content_type(path.extension().and_then(|e| e.to_str()))
        .unwrap_or_else(|| sniff_content_type(content))
}

/// UTF-8 without control bytes other than common whitespace
fn looks_like_text(head: &[u8]) -> bool {
    // A multi-byte character may be cut at the sniff boundary
    let valid = match std::str::from_utf8(head) {
        Ok(s) => s,
        Err(e) if e.error_len().is_none() => match std::str::from_utf8(&head[..e.valid_up_to()]) {
            Ok(s) => s,
            Err(_) => return false,
        },
        Err(_) => return false,
    };
    !valid
        .chars()
        .any(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t' | '\x0c'))
}
