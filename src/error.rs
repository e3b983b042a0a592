#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum DrugInfoError {
    #[error("HTTP client initialization failed: {0}")]
    HttpClientInit(reqwest::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP middleware error: {0}")]
    HttpMiddleware(#[from] reqwest_middleware::Error),

    #[error("API error from {api}: {message}")]
    Api { api: String, message: String },

    #[error("API JSON error from {api}: {source}")]
    ApiJson {
        api: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DrugInfoError {
    /// True for failures of the upstream exchange itself: transport, HTTP
    /// status, or an unparseable body. These collapse into "no data found";
    /// everything else is a local fault and is surfaced.
    pub fn is_upstream_failure(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::HttpMiddleware(_) | Self::Api { .. } | Self::ApiJson { .. }
        )
    }
}
