//! Directory listing with content negotiation

use crate::config::AppState;
use crate::error::RequestError;
use crate::handler::router::RequestContext;
use crate::http::{self, ListFormat};
use crate::storage::Entry;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// List the storage root as HTML, JSON or plain text
pub async fn list_files(
    ctx: &RequestContext<'_>,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, RequestError> {
    let format = ListFormat::from_headers(ctx.headers);
    let accept = ctx.header(hyper::header::ACCEPT).unwrap_or("");
    state.logger.debug(
        "Listing files",
        &[("accept", &accept), ("format", &format!("{format:?}"))],
    );

    let entries = state.storage.list().await?;

    let response = match format {
        ListFormat::Html => http::build_html_response(render_index(&entries), ctx.is_head),
        ListFormat::Json => {
            let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
            let json =
                serde_json::to_string(&names).map_err(|e| RequestError::Internal(e.to_string()))?;
            http::build_content_response(json, "application/json", ctx.is_head)
        }
        ListFormat::Text => {
            let text: String = entries.iter().map(|e| format!("{}\n", e.name)).collect();
            http::build_content_response(text, "text/plain; charset=utf-8", ctx.is_head)
        }
    };
    Ok(response)
}

/// Browser directory index: sorted links, directories suffixed with `/`
pub fn render_index(entries: &[Entry]) -> String {
    let mut sorted: Vec<&Entry> = entries.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));

    let mut html = String::from(
        "<!doctype html>\n<meta name=\"viewport\" content=\"width=device-width\">\n<pre>\n",
    );
    for entry in sorted {
        let suffix = if entry.is_dir { "/" } else { "" };
        html.push_str(&format!(
            "<a href=\"{}{suffix}\">{}{suffix}</a>\n",
            urlencoding::encode(&entry.name),
            escape_html(&entry.name),
        ));
    }
    html.push_str("</pre>\n");
    html
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, is_dir: bool) -> Entry {
        Entry {
            name: name.to_string(),
            is_dir,
        }
    }

    #[test]
    fn test_render_index_sorted() {
        let html = render_index(&[entry("b.txt", false), entry("a.txt", false), entry("dir", true)]);
        let a = html.find("a.txt").unwrap();
        let b = html.find("b.txt").unwrap();
        assert!(a < b);
        assert!(html.contains("<a href=\"dir/\">dir/</a>"));
        assert!(html.starts_with("<!doctype html>"));
    }

    #[test]
    fn test_render_index_escapes_names() {
        let html = render_index(&[entry("<b>&x y.txt", false)]);
        assert!(html.contains("&lt;b&gt;&amp;x y.txt</a>"));
        assert!(html.contains("href=\"%3Cb%3E%26x%20y.txt\""));
    }

    #[test]
    fn test_render_index_empty() {
        assert_eq!(
            render_index(&[]),
            "<!doctype html>\n<meta name=\"viewport\" content=\"width=device-width\">\n<pre>\n</pre>\n"
        );
    }
}
