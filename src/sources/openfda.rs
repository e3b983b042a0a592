use std::borrow::Cow;

use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::DrugInfoError;
use crate::utils::serde::StringOrVec;

const OPENFDA_BASE: &str = "https://api.fda.gov";
const OPENFDA_API: &str = "openfda";
const OPENFDA_BASE_ENV: &str = "DRUGINFO_OPENFDA_BASE";
const OPENFDA_API_KEY_ENV: &str = "OPENFDA_API_KEY";

const LABEL_SEARCH_FIELDS: [&str; 3] = [
    "openfda.generic_name",
    "openfda.substance_name",
    "openfda.brand_name",
];
const LABEL_SEARCH_LIMIT: &str = "1";
const MAX_TERM_BYTES: usize = 256;

#[derive(Clone)]
pub struct OpenFdaClient {
    client: reqwest_middleware::ClientWithMiddleware,
    base: Cow<'static, str>,
    api_key: Option<String>,
}

impl OpenFdaClient {
    pub fn new() -> Result<Self, DrugInfoError> {
        Ok(Self {
            client: crate::sources::shared_client()?,
            base: crate::sources::env_base(OPENFDA_BASE, OPENFDA_BASE_ENV),
            api_key: std::env::var(OPENFDA_API_KEY_ENV)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
        })
    }

    #[cfg(test)]
    pub(crate) fn new_for_test(base: String, api_key: Option<String>) -> Result<Self, DrugInfoError> {
        Self::new_for_test_with_timeout(base, api_key, crate::sources::REQUEST_TIMEOUT)
    }

    #[cfg(test)]
    pub(crate) fn new_for_test_with_timeout(
        base: String,
        api_key: Option<String>,
        timeout: std::time::Duration,
    ) -> Result<Self, DrugInfoError> {
        Ok(Self {
            client: crate::sources::build_client(timeout)?,
            base: Cow::Owned(base),
            api_key: api_key
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base.as_ref().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Search expression matching `term` as an exact phrase against the
    /// generic, substance, and brand name fields.
    pub(crate) fn label_query(term: &str) -> String {
        crate::utils::query::any_field_phrase(&LABEL_SEARCH_FIELDS, term)
    }

    async fn get_json_optional<T: DeserializeOwned>(
        &self,
        req: reqwest_middleware::RequestBuilder,
    ) -> Result<Option<T>, DrugInfoError> {
        let resp = req.send().await?;
        let status = resp.status();
        let content_type = resp.headers().get(CONTENT_TYPE).cloned();
        let bytes = crate::sources::read_limited_body(resp, OPENFDA_API).await?;

        if status.as_u16() == 404 {
            return Ok(None);
        }

        if !status.is_success() {
            let excerpt = crate::sources::body_excerpt(&bytes);
            return Err(DrugInfoError::Api {
                api: OPENFDA_API.to_string(),
                message: format!("HTTP {status}: {excerpt}"),
            });
        }

        crate::sources::ensure_json_content_type(OPENFDA_API, content_type.as_ref(), &bytes)?;
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| DrugInfoError::ApiJson {
                api: OPENFDA_API.to_string(),
                source,
            })
    }

    /// Looks up the first label whose generic, substance, or brand name
    /// matches `term`.
    ///
    /// Upstream failures (transport, non-success status, bad body) come back
    /// as [`LabelLookup::Unreachable`]; only local faults are returned as
    /// errors.
    pub async fn label_search(&self, term: &str) -> Result<LabelLookup, DrugInfoError> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(LabelLookup::NotFound);
        }
        if term.len() > MAX_TERM_BYTES {
            warn!(len = term.len(), "Drug name is too long; skipping label search");
            return Ok(LabelLookup::NotFound);
        }

        let q = Self::label_query(term);
        let url = self.endpoint("drug/label.json");
        let mut req = self
            .client
            .get(&url)
            .query(&[("search", q.as_str()), ("limit", LABEL_SEARCH_LIMIT)]);
        if let Some(key) = self.api_key.as_deref() {
            req = req.query(&[("api_key", key)]);
        }

        match self.get_json_optional::<LabelResponse>(req).await {
            Ok(Some(resp)) => {
                let first = resp.results.unwrap_or_default().into_iter().next();
                Ok(match first {
                    Some(record) => LabelLookup::Found(Box::new(record)),
                    None => LabelLookup::NotFound,
                })
            }
            Ok(None) => Ok(LabelLookup::NotFound),
            Err(err) if err.is_upstream_failure() => {
                warn!(term, "OpenFDA label search unavailable: {err}");
                Ok(LabelLookup::Unreachable {
                    reason: err.to_string(),
                })
            }
            Err(err) => Err(err),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LabelResponse {
    #[serde(default)]
    results: Option<Vec<LabelRecord>>,
}

/// Outcome of one label search.
#[derive(Debug)]
pub enum LabelLookup {
    Found(Box<LabelRecord>),
    NotFound,
    Unreachable { reason: String },
}

impl LabelLookup {
    /// Collapses the outcome to the record, treating an unreachable upstream
    /// the same as a miss.
    pub fn into_record(self) -> Option<LabelRecord> {
        match self {
            Self::Found(record) => Some(*record),
            Self::NotFound | Self::Unreachable { .. } => None,
        }
    }

    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Found(_) => "found",
            Self::NotFound => "not_found",
            Self::Unreachable { .. } => "unreachable",
        }
    }
}

/// One openFDA drug-label document, kept as the raw field map.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct LabelRecord(serde_json::Map<String, serde_json::Value>);

impl LabelRecord {
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    /// The `openfda` structured metadata. Each key is read on its own, so a
    /// missing or malformed key only blanks that key.
    pub fn metadata(&self) -> LabelMetadata {
        let Some(raw) = self.0.get("openfda") else {
            return LabelMetadata::default();
        };
        let Some(raw) = raw.as_object() else {
            debug!("Ignoring non-object openfda metadata");
            return LabelMetadata::default();
        };
        LabelMetadata {
            generic_name: metadata_field(raw, "generic_name"),
            brand_name: metadata_field(raw, "brand_name"),
            pharm_class_epc: metadata_field(raw, "pharm_class_epc"),
            pharm_class: metadata_field(raw, "pharm_class"),
            manufacturer_name: metadata_field(raw, "manufacturer_name"),
        }
    }
}

fn metadata_field(
    raw: &serde_json::Map<String, serde_json::Value>,
    key: &str,
) -> Option<StringOrVec> {
    let value = raw.get(key).filter(|v| !v.is_null())?;
    match StringOrVec::deserialize(value) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            debug!(key, "Ignoring malformed openfda metadata field: {err}");
            None
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LabelMetadata {
    pub generic_name: Option<StringOrVec>,
    pub brand_name: Option<StringOrVec>,
    pub pharm_class_epc: Option<StringOrVec>,
    pub pharm_class: Option<StringOrVec>,
    pub manufacturer_name: Option<StringOrVec>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn label_body(results: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "meta": {"results": {"skip": 0, "limit": 1, "total": 1}},
            "results": results
        })
    }

    #[test]
    fn label_query_matches_three_name_fields() {
        assert_eq!(
            OpenFdaClient::label_query("acetaminophen"),
            r#"(openfda.generic_name:"acetaminophen" OR openfda.substance_name:"acetaminophen" OR openfda.brand_name:"acetaminophen")"#
        );
    }

    #[tokio::test]
    async fn label_search_sends_phrase_query_with_limit_one() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/drug/label.json"))
            .and(query_param(
                "search",
                OpenFdaClient::label_query("metformin").as_str(),
            ))
            .and(query_param("limit", "1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(label_body(serde_json::json!([{"id": "first"}]))),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenFdaClient::new_for_test(server.uri(), None).unwrap();
        let lookup = client.label_search("metformin").await.unwrap();
        let record = lookup.into_record().expect("record");
        assert_eq!(record.get("id"), Some(&serde_json::json!("first")));
    }

    #[tokio::test]
    async fn label_search_keeps_only_first_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/drug/label.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(label_body(
                serde_json::json!([{"id": "first"}, {"id": "second"}]),
            )))
            .mount(&server)
            .await;

        let client = OpenFdaClient::new_for_test(server.uri(), None).unwrap();
        let lookup = client.label_search("metformin").await.unwrap();
        assert_eq!(lookup.outcome(), "found");
        let record = lookup.into_record().unwrap();
        assert_eq!(record.get("id"), Some(&serde_json::json!("first")));
    }

    #[tokio::test]
    async fn label_search_maps_404_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/drug/label.json"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "error": {"code": "NOT_FOUND", "message": "No matches found!"}
            })))
            .mount(&server)
            .await;

        let client = OpenFdaClient::new_for_test(server.uri(), None).unwrap();
        let lookup = client.label_search("notadrug").await.unwrap();
        assert!(matches!(lookup, LabelLookup::NotFound));
    }

    #[tokio::test]
    async fn label_search_maps_empty_or_missing_results_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/drug/label.json"))
            .and(query_param("search", OpenFdaClient::label_query("empty").as_str()))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(label_body(serde_json::json!([]))),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/drug/label.json"))
            .and(query_param("search", OpenFdaClient::label_query("bare").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let client = OpenFdaClient::new_for_test(server.uri(), None).unwrap();
        let empty = client.label_search("empty").await.unwrap();
        assert!(matches!(empty, LabelLookup::NotFound));
        let bare = client.label_search("bare").await.unwrap();
        assert!(matches!(bare, LabelLookup::NotFound));
    }

    #[tokio::test]
    async fn label_search_maps_server_error_to_unreachable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/drug/label.json"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let client = OpenFdaClient::new_for_test(server.uri(), None).unwrap();
        let lookup = client.label_search("metformin").await.unwrap();
        match lookup {
            LabelLookup::Unreachable { reason } => {
                assert!(reason.contains("429"));
                assert!(reason.contains("slow down"));
            }
            other => panic!("expected unreachable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn label_search_maps_malformed_body_to_unreachable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/drug/label.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/json")
                    .set_body_string("{\"results\": [oops"),
            )
            .mount(&server)
            .await;

        let client = OpenFdaClient::new_for_test(server.uri(), None).unwrap();
        let lookup = client.label_search("metformin").await.unwrap();
        assert_eq!(lookup.outcome(), "unreachable");
    }

    #[tokio::test]
    async fn label_search_maps_html_body_to_unreachable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/drug/label.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .set_body_string("<html>maintenance</html>"),
            )
            .mount(&server)
            .await;

        let client = OpenFdaClient::new_for_test(server.uri(), None).unwrap();
        let lookup = client.label_search("metformin").await.unwrap();
        assert_eq!(lookup.outcome(), "unreachable");
    }

    #[tokio::test]
    async fn label_search_maps_connection_error_to_unreachable() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let client = OpenFdaClient::new_for_test(base, None).unwrap();
        let lookup = client.label_search("metformin").await.unwrap();
        assert_eq!(lookup.outcome(), "unreachable");
        assert!(lookup.into_record().is_none());
    }

    #[tokio::test]
    async fn label_search_skips_network_for_blank_or_oversized_terms() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = OpenFdaClient::new_for_test(server.uri(), None).unwrap();
        assert!(matches!(
            client.label_search("   ").await.unwrap(),
            LabelLookup::NotFound
        ));
        let long = "x".repeat(MAX_TERM_BYTES + 1);
        assert!(matches!(
            client.label_search(&long).await.unwrap(),
            LabelLookup::NotFound
        ));
    }

    #[tokio::test]
    async fn label_search_includes_api_key_when_configured() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/drug/label.json"))
            .and(query_param("api_key", "test-key"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(label_body(serde_json::json!([{}]))),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenFdaClient::new_for_test(server.uri(), Some(" test-key ".into())).unwrap();
        let lookup = client.label_search("metformin").await.unwrap();
        assert_eq!(lookup.outcome(), "found");
    }

    #[tokio::test]
    async fn label_search_maps_timeout_to_unreachable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/drug/label.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(label_body(serde_json::json!([{"id": "late"}])))
                    .set_delay(std::time::Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let client = OpenFdaClient::new_for_test_with_timeout(
            server.uri(),
            None,
            std::time::Duration::from_millis(200),
        )
        .unwrap();
        let started = std::time::Instant::now();
        let lookup = client.label_search("metformin").await.unwrap();
        assert_eq!(lookup.outcome(), "unreachable");
        assert!(started.elapsed() < std::time::Duration::from_secs(3));
    }

    #[tokio::test]
    async fn label_search_maps_oversized_body_to_unreachable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/drug/label.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/json")
                    .set_body_bytes(vec![b' '; crate::sources::DEFAULT_MAX_BODY_BYTES + 1]),
            )
            .mount(&server)
            .await;

        let client = OpenFdaClient::new_for_test(server.uri(), None).unwrap();
        match client.label_search("metformin").await.unwrap() {
            LabelLookup::Unreachable { reason } => assert!(reason.contains("exceeded")),
            other => panic!("expected unreachable, got {other:?}"),
        }
    }

    #[test]
    fn metadata_keeps_valid_keys_when_a_sibling_is_malformed() {
        let label: LabelRecord = serde_json::from_value(serde_json::json!({
            "openfda": {
                "generic_name": ["METFORMIN"],
                "brand_name": [1],
                "manufacturer_name": null
            }
        }))
        .unwrap();
        let metadata = label.metadata();
        assert_eq!(
            metadata.generic_name.map(|v| v.join(", ")),
            Some("METFORMIN".to_string())
        );
        assert!(metadata.brand_name.is_none());
        assert!(metadata.manufacturer_name.is_none());
    }

    #[test]
    fn metadata_tolerates_missing_and_malformed_openfda() {
        let bare: LabelRecord = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(bare.metadata().generic_name.is_none());

        let malformed: LabelRecord =
            serde_json::from_value(serde_json::json!({"openfda": "not an object"})).unwrap();
        assert!(malformed.metadata().brand_name.is_none());

        let full: LabelRecord = serde_json::from_value(serde_json::json!({
            "openfda": {"generic_name": ["METFORMIN"], "manufacturer_name": "Acme"}
        }))
        .unwrap();
        let metadata = full.metadata();
        assert_eq!(
            metadata.generic_name.map(|v| v.join(", ")),
            Some("METFORMIN".to_string())
        );
        assert_eq!(
            metadata.manufacturer_name.map(|v| v.join(", ")),
            Some("Acme".to_string())
        );
    }
}
