//! HTML rendering for the informational page.

use std::borrow::Cow;
use std::io::{self, Write};
use std::time::Duration;

/// Value of the `X-Server` response header.
pub const SERVER_NAME: &str = "Golang-HA-Server";
/// Value of the `X-Version` response header.
pub const SERVER_VERSION: &str = "1.0.0";

/// What the page reports about the incoming request.
#[derive(Debug, Clone)]
pub struct RequestDetails<'a> {
    pub method: &'a str,
    pub path: &'a str,
    pub user_agent: &'a str,
    pub remote_addr: &'a str,
}

/// Everything shown on the page.
#[derive(Debug, Clone)]
pub struct PageDetails<'a> {
    /// Local wall-clock time, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
    pub environment: &'a str,
    pub hostname: &'a str,
    pub request: &'a RequestDetails<'a>,
    /// Time spent in the handler when rendering started.
    pub elapsed: Duration,
}

/// Escapes the characters that are significant in HTML text and attributes.
pub fn escape_html(input: &str) -> Cow<'_, str> {
    if !input.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(input);
    }
    let mut escaped = String::with_capacity(input.len() + 16);
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// Writes the full HTML document for `details` into `writer`.
pub fn render_page<W: Write>(writer: &mut W, details: &PageDetails<'_>) -> io::Result<()> {
    let request = details.request;
    write!(
        writer,
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Golang HA Server</title>
    <style>
        body {{ font-family: Arial, sans-serif; margin: 40px; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; }}
        .container {{ max-width: 800px; margin: 0 auto; background: rgba(255,255,255,0.1); padding: 30px; border-radius: 10px; }}
        h1 {{ color: #fff; text-align: center; margin-bottom: 30px; }}
        .info {{ background: rgba(255,255,255,0.2); padding: 20px; border-radius: 8px; margin: 20px 0; }}
        .metric {{ display: inline-block; margin: 10px; padding: 10px; background: rgba(255,255,255,0.1); border-radius: 5px; }}
        .status {{ color: #4CAF50; font-weight: bold; }}
    </style>
</head>
<body>
    <div class="container">
        <h1>Golang High Availability Server</h1>
        <div class="info">
            <h2>Server Information</h2>
            <div class="metric"><strong>Timestamp:</strong> {timestamp}</div>
            <div class="metric"><strong>Status:</strong> <span class="status">Healthy</span></div>
            <div class="metric"><strong>Version:</strong> {version}</div>
            <div class="metric"><strong>Environment:</strong> {environment}</div>
        </div>
        <div class="info">
            <h2>Request Details</h2>
            <div class="metric"><strong>Method:</strong> {method}</div>
            <div class="metric"><strong>Path:</strong> {path}</div>
            <div class="metric"><strong>User Agent:</strong> {user_agent}</div>
            <div class="metric"><strong>Remote Address:</strong> {remote_addr}</div>
        </div>
        <div class="info">
            <h2>System Information</h2>
            <div class="metric"><strong>Hostname:</strong> {hostname}</div>
            <div class="metric"><strong>Uptime:</strong> {elapsed:?}</div>
        </div>
    </div>
</body>
</html>
"#,
        timestamp = details.timestamp,
        version = SERVER_VERSION,
        environment = escape_html(details.environment),
        method = escape_html(request.method),
        path = escape_html(request.path),
        user_agent = escape_html(request.user_agent),
        remote_addr = escape_html(request.remote_addr),
        hostname = escape_html(details.hostname),
        elapsed = details.elapsed,
    )?;
    writer.flush()
}
