use std::time::Instant;

use http::Extensions;
use reqwest_middleware::{Middleware, Next};
use tracing::debug;

/// Logs every outbound request with its status and latency.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct RequestLogMiddleware;

#[async_trait::async_trait]
impl Middleware for RequestLogMiddleware {
    async fn handle(
        &self,
        req: reqwest::Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<reqwest::Response> {
        let method = req.method().clone();
        let host = req.url().host_str().unwrap_or("unknown-host").to_string();
        let path = req.url().path().to_string();
        let start = Instant::now();

        let result = next.run(req, extensions).await;
        let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        match &result {
            Ok(resp) => debug!(
                %method,
                %host,
                %path,
                status = resp.status().as_u16(),
                elapsed_ms,
                "upstream request completed"
            ),
            Err(err) => debug!(%method, %host, %path, elapsed_ms, "upstream request failed: {err}"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest_middleware::ClientBuilder;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn passes_responses_through_unchanged() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(418).set_body_string("teapot"))
            .expect(1)
            .mount(&server)
            .await;

        let client = ClientBuilder::new(reqwest::Client::new())
            .with(RequestLogMiddleware)
            .build();
        let resp = client
            .get(format!("{}/ping", server.uri()))
            .send()
            .await
            .expect("response");

        assert_eq!(resp.status().as_u16(), 418);
        assert_eq!(resp.text().await.expect("body"), "teapot");
    }
}
