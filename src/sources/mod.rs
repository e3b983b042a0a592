//! Upstream label-data client and shared HTTP utilities.

use std::borrow::Cow;
use std::sync::OnceLock;
use std::time::Duration;

use reqwest::header::HeaderValue;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use tracing::warn;

use crate::error::DrugInfoError;

pub(crate) mod openfda;
pub(crate) mod request_log;

const ERROR_BODY_MAX_BYTES: usize = 2048;
pub(crate) const DEFAULT_MAX_BODY_BYTES: usize = 8 * 1024 * 1024;
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

static HTTP_CLIENT: OnceLock<ClientWithMiddleware> = OnceLock::new();

pub(crate) fn env_base(default: &'static str, env_var: &str) -> Cow<'static, str> {
    std::env::var(env_var)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(Cow::Owned)
        .unwrap_or_else(|| Cow::Borrowed(default))
}

pub(crate) fn build_client(timeout: Duration) -> Result<ClientWithMiddleware, DrugInfoError> {
    let base_client = reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(5))
        .user_agent(concat!("druginfo-web/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(DrugInfoError::HttpClientInit)?;

    Ok(ClientBuilder::new(base_client)
        .with(request_log::RequestLogMiddleware)
        .build())
}

/// Returns the shared outbound HTTP client.
///
/// - Timeout: 10s for the whole exchange, no retries
/// - Middleware: request logging only
pub(crate) fn shared_client() -> Result<ClientWithMiddleware, DrugInfoError> {
    if let Some(client) = HTTP_CLIENT.get() {
        return Ok(client.clone());
    }

    let client = build_client(REQUEST_TIMEOUT)?;
    match HTTP_CLIENT.set(client.clone()) {
        Ok(()) => Ok(client),
        Err(_) => HTTP_CLIENT.get().cloned().ok_or_else(|| DrugInfoError::Api {
            api: "http-client".into(),
            message: "Shared HTTP client initialization race".into(),
        }),
    }
}

pub(crate) fn body_excerpt(bytes: &[u8]) -> String {
    let full = String::from_utf8_lossy(bytes);

    let truncated: &str = if full.len() > ERROR_BODY_MAX_BYTES {
        let mut end = ERROR_BODY_MAX_BYTES;
        while end > 0 && !full.is_char_boundary(end) {
            end -= 1;
        }
        &full[..end]
    } else {
        full.as_ref()
    };

    let mut s = truncated.trim().replace(['\n', '\r', '\t'], " ");
    if full.len() > ERROR_BODY_MAX_BYTES {
        s.push_str(" …");
    }
    s
}

/// Rejects HTML bodies (proxy error pages, captive portals) before JSON
/// parsing so the failure is reported as an upstream error with an excerpt.
pub(crate) fn ensure_json_content_type(
    api: &str,
    content_type: Option<&HeaderValue>,
    body: &[u8],
) -> Result<(), DrugInfoError> {
    let Some(content_type) = content_type else {
        return Ok(());
    };

    let raw = match content_type.to_str() {
        Ok(v) => v.trim(),
        Err(_) => {
            warn!(
                source = api,
                "Response content-type header was not valid UTF-8; attempting JSON parse"
            );
            return Ok(());
        }
    };
    if raw.is_empty() {
        return Ok(());
    }

    let media_type = raw
        .split(';')
        .next()
        .map(str::trim)
        .unwrap_or_default()
        .to_ascii_lowercase();
    if matches!(media_type.as_str(), "text/html" | "application/xhtml+xml") {
        return Err(DrugInfoError::Api {
            api: api.to_string(),
            message: format!(
                "Unexpected HTML response (content-type: {raw}): {}",
                body_excerpt(body)
            ),
        });
    }

    Ok(())
}

pub(crate) async fn read_limited_body(
    mut resp: reqwest::Response,
    api: &str,
) -> Result<Vec<u8>, DrugInfoError> {
    let mut body: Vec<u8> = Vec::new();

    while let Some(chunk) = resp.chunk().await? {
        let next_len = body.len().saturating_add(chunk.len());
        if next_len > DEFAULT_MAX_BODY_BYTES {
            return Err(DrugInfoError::Api {
                api: api.to_string(),
                message: format!("Response body exceeded {DEFAULT_MAX_BODY_BYTES} bytes"),
            });
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body)
}
