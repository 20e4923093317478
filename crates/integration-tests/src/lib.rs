//! Integration tests for KiddieBox.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p kiddiebox-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `persistence` - File-backed collections, seeding, and malformed data
//! - `storefront_flow` - Accounts, checkout, admin, and chat across restarts
//! - `recommendations` - The Gemini client against a local HTTP server
//!
//! No external services are needed: Gemini is replaced by a local axum
//! server with a canned response.

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use url::Url;

use kiddiebox_storefront::Storefront;
use kiddiebox_storefront::db::FileStore;
use kiddiebox_storefront::recommend::{
    GeminiError, GenerationRequest, GenerativeModel, RecommendationClient,
};

// =============================================================================
// Data Directory
// =============================================================================

/// A fresh data directory, removed on drop even when a test fails.
pub struct TempDataDir {
    dir: TempDir,
}

impl TempDataDir {
    /// Create an empty data directory under the OS temp dir.
    ///
    /// # Panics
    ///
    /// Panics if the directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dir: tempfile::Builder::new()
                .prefix("kiddiebox-it-")
                .tempdir()
                .expect("create data directory"),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Open a file store on this directory.
    ///
    /// # Panics
    ///
    /// Panics if the store cannot be opened.
    #[must_use]
    pub fn store(&self) -> Arc<FileStore> {
        Arc::new(FileStore::open(self.path()).expect("open file store"))
    }

    /// Open a storefront on this directory with a model that always fails.
    ///
    /// # Panics
    ///
    /// Panics if the storefront cannot be opened.
    #[must_use]
    pub fn open_storefront(&self) -> Storefront<FileStore, FailingModel> {
        Storefront::new(self.store(), RecommendationClient::with_model(FailingModel))
            .expect("open storefront")
    }
}

impl Default for TempDataDir {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Models
// =============================================================================

/// A model whose every call fails like an overloaded API.
pub struct FailingModel;

impl GenerativeModel for FailingModel {
    async fn generate_json(&self, _request: &GenerationRequest) -> Result<String, GeminiError> {
        Err(GeminiError::Api {
            status: "UNAVAILABLE".to_string(),
            message: "The model is overloaded. Please try again later.".to_string(),
        })
    }
}

// =============================================================================
// Mock Gemini Server
// =============================================================================

/// A request as the mock server saw it.
#[derive(Debug)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: String,
}

impl RecordedRequest {
    /// A header value as text, if present.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The body parsed as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not JSON.
    #[must_use]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body is JSON")
    }
}

/// The canned reply for every request.
#[derive(Clone)]
struct MockState {
    status: StatusCode,
    headers: HeaderMap,
    body: Arc<str>,
    requests: mpsc::UnboundedSender<RecordedRequest>,
}

async fn respond(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let _ = state.requests.send(RecordedRequest {
        method,
        path: uri.path().to_string(),
        headers,
        body,
    });

    let mut response = (state.status, state.body.to_string()).into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response.headers_mut().extend(state.headers);
    response
}

/// A local axum server that answers every request with one canned
/// response and records what it received.
pub struct MockGemini {
    base_url: Url,
    requests: mpsc::UnboundedReceiver<RecordedRequest>,
    server: JoinHandle<()>,
}

impl MockGemini {
    /// Start a server answering with `status`, extra `headers`, and a JSON
    /// `body`.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound or a header is invalid.
    pub async fn start(status: StatusCode, headers: &[(&'static str, &str)], body: &str) -> Self {
        let mut extra = HeaderMap::new();
        for (name, value) in headers {
            extra.insert(
                HeaderName::from_static(*name),
                HeaderValue::from_str(value).expect("header value"),
            );
        }

        let (sender, requests) = mpsc::unbounded_channel();
        let state = MockState {
            status,
            headers: extra,
            body: Arc::from(body),
            requests: sender,
        };
        let router = Router::new().fallback(respond).with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Self {
            base_url: Url::parse(&format!("http://{addr}")).expect("base url"),
            requests,
            server,
        }
    }

    /// Base URL to configure the client with.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The next request the server received.
    ///
    /// # Panics
    ///
    /// Panics if the server stopped without receiving a request.
    pub async fn received(&mut self) -> RecordedRequest {
        self.requests.recv().await.expect("recorded request")
    }
}

impl Drop for MockGemini {
    fn drop(&mut self) {
        self.server.abort();
    }
}
