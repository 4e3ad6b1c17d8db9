// Signed HTTP client for the upstream hotel-inventory supplier.
// Request and response bodies are opaque here; the hotel service owns the schema.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use flate2::read::GzDecoder;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_ENCODING, CONTENT_ENCODING, CONTENT_TYPE,
};
use sha2::{Digest, Sha256};
use std::io::Read;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const SEARCH_PATH: &str = "/hotel-api/1.0/hotels";
pub const HEADER_API_KEY: &str = "api-key";
pub const HEADER_SIGNATURE: &str = "x-signature";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

const APPLICATION_JSON: &str = "application/json";
const GZIP: &str = "gzip";

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("supplier API key and secret are required")]
    MissingCredentials,

    #[error("failed to initialise HTTP client: {0}")]
    Init(String),

    #[error("failed to create request: {0}")]
    InvalidRequest(String),

    #[error("failed to make API request: {0}")]
    Network(reqwest::Error),

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("API returned non-200 status code: {0}")]
    Status(u16),

    #[error("failed to read response body: {0}")]
    Body(reqwest::Error),

    #[error("failed to decompress response body: {0}")]
    Decompress(std::io::Error),
}

// Supplier connection settings, injected by the caller
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub api_secret: String,
    pub timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ClientConfig {
    pub fn has_credentials(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}

// Supplier client trait
#[async_trait]
pub trait SupplierClient: Send + Sync + 'static {
    // Send a serialized search request and return the (decompressed) response body
    async fn search(&self, request: Bytes) -> Result<Bytes, ClientError>;
}

pub struct SignedSupplierClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl SignedSupplierClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ClientError::Init(e.to_string()))?;

        Ok(Self { config, http })
    }

    /// Hex SHA-256 of `api_key || api_secret || timestamp`, where the
    /// timestamp is in Unix seconds.
    pub fn signature(&self, timestamp: i64) -> Result<String, ClientError> {
        if !self.config.has_credentials() {
            return Err(ClientError::MissingCredentials);
        }

        let mut hasher = Sha256::new();
        hasher.update(self.config.api_key.as_bytes());
        hasher.update(self.config.api_secret.as_bytes());
        hasher.update(timestamp.to_string().as_bytes());

        Ok(hex::encode(hasher.finalize()))
    }

    fn headers(&self, timestamp: i64) -> Result<HeaderMap, ClientError> {
        let signature = self.signature(timestamp)?;

        let api_key = HeaderValue::from_str(&self.config.api_key)
            .map_err(|e| ClientError::InvalidRequest(format!("invalid API key header: {}", e)))?;
        let signature = HeaderValue::from_str(&signature)
            .map_err(|e| ClientError::InvalidRequest(format!("invalid signature header: {}", e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        headers.insert(HEADER_API_KEY, api_key);
        headers.insert(HEADER_SIGNATURE, signature);
        headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static(GZIP));

        Ok(headers)
    }

    fn search_url(&self) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), SEARCH_PATH)
    }

    fn classify(&self, error: reqwest::Error) -> ClientError {
        if error.is_timeout() {
            ClientError::Timeout(self.config.timeout_ms)
        } else {
            ClientError::Network(error)
        }
    }
}

#[async_trait]
impl SupplierClient for SignedSupplierClient {
    async fn search(&self, request: Bytes) -> Result<Bytes, ClientError> {
        // Signed per call, the signature is only valid around the send time
        let headers = self.headers(Utc::now().timestamp())?;
        let url = self.search_url();
        let started = Instant::now();

        debug!(url = %url, bytes = request.len(), "sending supplier search");

        let response = self
            .http
            .post(&url)
            .headers(headers)
            .body(request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        info!(
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "supplier responded"
        );

        if !status.is_success() {
            warn!(status = status.as_u16(), "supplier rejected search");
            return Err(ClientError::Status(status.as_u16()));
        }

        let gzipped = response
            .headers()
            .get(CONTENT_ENCODING)
            .and_then(|value| value.to_str().ok())
            .map_or(false, |value| value.trim().eq_ignore_ascii_case(GZIP));

        let body = response.bytes().await.map_err(|e| match self.classify(e) {
            ClientError::Network(e) => ClientError::Body(e),
            other => other,
        })?;

        if gzipped {
            decompress(&body)
        } else {
            Ok(body)
        }
    }
}

fn decompress(body: &[u8]) -> Result<Bytes, ClientError> {
    let mut decoder = GzDecoder::new(body);
    let mut decoded = Vec::new();
    decoder
        .read_to_end(&mut decoded)
        .map_err(ClientError::Decompress)?;
    Ok(Bytes::from(decoded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderMap as ServerHeaders, StatusCode};
    use axum::routing::post;
    use axum::Router;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    const SUPPLIER_BODY: &str = r#"{"hotels":{"hotels":[{"code":123,"name":"Test Hotel","minRate":"100.00","maxRate":"200.00","currency":"EUR"}],"checkIn":"2024-01-01","checkOut":"2024-01-05","total":1}}"#;

    // Serve `app` on an ephemeral local port and return its base URL
    async fn spawn_supplier(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn test_config(base_url: &str) -> ClientConfig {
        ClientConfig {
            base_url: base_url.to_string(),
            api_key: "test-key".to_string(),
            api_secret: "test-secret".to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout_ms, 10_000);
        assert!(!config.has_credentials());
    }

    #[test]
    fn test_signature_is_sha256_of_key_secret_timestamp() {
        let client = SignedSupplierClient::new(test_config("http://unused")).unwrap();
        let signature = client.signature(1_700_000_000).unwrap();
        assert_eq!(
            signature,
            "5af15c8229489a203ae6b015242f9f73ef9f67eae9e48b8c9d5154fd35dc4e66"
        );
    }

    #[test]
    fn test_signature_depends_on_timestamp() {
        let client = SignedSupplierClient::new(test_config("http://unused")).unwrap();
        let first = client.signature(1_700_000_000).unwrap();
        let second = client.signature(1_700_000_001).unwrap();
        assert_ne!(first, second);
        assert_eq!(first.len(), 64);
    }

    #[test]
    fn test_signature_requires_credentials() {
        let mut config = test_config("http://unused");
        config.api_secret = String::new();
        let client = SignedSupplierClient::new(config).unwrap();

        let err = client.signature(1_700_000_000).unwrap_err();
        assert!(matches!(err, ClientError::MissingCredentials));
    }

    #[tokio::test]
    async fn test_search_sends_signed_request() {
        let captured: Arc<Mutex<Option<(ServerHeaders, String)>>> = Arc::new(Mutex::new(None));
        let sink = captured.clone();
        let app = Router::new().route(
            SEARCH_PATH,
            post(move |headers: ServerHeaders, body: String| {
                let sink = sink.clone();
                async move {
                    *sink.lock().unwrap() = Some((headers, body));
                    SUPPLIER_BODY
                }
            }),
        );
        let base_url = spawn_supplier(app).await;
        let client = SignedSupplierClient::new(test_config(&base_url)).unwrap();

        let request = Bytes::from_static(br#"{"stay":{"checkIn":"2024-01-01","checkOut":"2024-01-05"}}"#);
        let response = client.search(request.clone()).await.unwrap();
        assert_eq!(response, Bytes::from_static(SUPPLIER_BODY.as_bytes()));

        let (headers, body) = captured.lock().unwrap().take().unwrap();
        assert_eq!(body.as_bytes(), &request[..]);
        assert_eq!(headers.get("content-type").unwrap(), "application/json");
        assert_eq!(headers.get("api-key").unwrap(), "test-key");
        assert_eq!(headers.get("accept").unwrap(), "application/json");
        assert_eq!(headers.get("accept-encoding").unwrap(), "gzip");
        let signature = headers.get("x-signature").unwrap().to_str().unwrap();
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn test_search_decompresses_gzip() {
        let compressed = gzip(SUPPLIER_BODY.as_bytes());
        let app = Router::new().route(
            SEARCH_PATH,
            post(move || {
                let compressed = compressed.clone();
                async move { ([(header::CONTENT_ENCODING, "gzip")], compressed) }
            }),
        );
        let base_url = spawn_supplier(app).await;
        let client = SignedSupplierClient::new(test_config(&base_url)).unwrap();

        let response = client.search(Bytes::from_static(b"{}")).await.unwrap();
        assert_eq!(response, Bytes::from_static(SUPPLIER_BODY.as_bytes()));
    }

    #[tokio::test]
    async fn test_search_reports_bad_gzip() {
        let app = Router::new().route(
            SEARCH_PATH,
            post(|| async { ([(header::CONTENT_ENCODING, "gzip")], "definitely not gzip") }),
        );
        let base_url = spawn_supplier(app).await;
        let client = SignedSupplierClient::new(test_config(&base_url)).unwrap();

        let err = client.search(Bytes::from_static(b"{}")).await.unwrap_err();
        assert!(matches!(err, ClientError::Decompress(_)));
    }

    #[tokio::test]
    async fn test_search_non_success_status() {
        let app = Router::new().route(SEARCH_PATH, post(|| async { StatusCode::BAD_REQUEST }));
        let base_url = spawn_supplier(app).await;
        let client = SignedSupplierClient::new(test_config(&base_url)).unwrap();

        let err = client.search(Bytes::from_static(b"{}")).await.unwrap_err();
        assert!(matches!(err, ClientError::Status(400)));
        assert!(err
            .to_string()
            .contains("API returned non-200 status code"));
    }

    #[tokio::test]
    async fn test_search_times_out() {
        let app = Router::new().route(
            SEARCH_PATH,
            post(|| async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                SUPPLIER_BODY
            }),
        );
        let base_url = spawn_supplier(app).await;
        let mut config = test_config(&base_url);
        config.timeout_ms = 50;
        let client = SignedSupplierClient::new(config).unwrap();

        let err = client.search(Bytes::from_static(b"{}")).await.unwrap_err();
        assert!(matches!(err, ClientError::Timeout(50)));
    }

    #[tokio::test]
    async fn test_missing_credentials_skip_network() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new().route(
            SEARCH_PATH,
            post(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    SUPPLIER_BODY
                }
            }),
        );
        let base_url = spawn_supplier(app).await;
        let mut config = test_config(&base_url);
        config.api_key = String::new();
        let client = SignedSupplierClient::new(config).unwrap();

        let err = client.search(Bytes::from_static(b"{}")).await.unwrap_err();
        assert!(matches!(err, ClientError::MissingCredentials));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unreachable_supplier() {
        // Bind then drop to get a port nothing listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = SignedSupplierClient::new(test_config(&format!("http://{}", addr))).unwrap();
        let err = client.search(Bytes::from_static(b"{}")).await.unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));
    }
}
