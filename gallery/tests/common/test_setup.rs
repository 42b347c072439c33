use std::sync::Arc;
use std::time::Duration;

use axum::{body::Body, http::Request, response::Response, Router};
use gallery::{
    notifications::ToastBoard,
    server,
    sync::{GallerySync, ListingPolicy},
    types::Environment,
};
use gallery_storage::mock::MockObjectStore;
use tower::ServiceExt;

use super::utils::{multipart_body, TestFile};

pub const TEST_BUCKET: &str = "test-gallery";
pub const TEST_REGION: &str = "eu-central-1";

/// Initialize tracing for tests
pub fn setup_test_env() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init()
        .ok();
}

/// Gallery wired to an in-memory store
pub struct TestContext {
    pub store: Arc<MockObjectStore>,
    pub toasts: Arc<ToastBoard>,
    pub gallery: Arc<GallerySync>,
    pub router: Router,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_policy(ListingPolicy::LastWriterWins)
    }

    pub fn with_policy(policy: ListingPolicy) -> Self {
        Self::with_store(MockObjectStore::new(TEST_BUCKET, TEST_REGION), policy)
    }

    pub fn with_store(store: MockObjectStore, policy: ListingPolicy) -> Self {
        setup_test_env();

        let store = Arc::new(store);
        let toasts = Arc::new(ToastBoard::new(Duration::from_secs(60)));
        let gallery = Arc::new(GallerySync::new(store.clone(), toasts.clone(), policy));

        let router = server::router(
            Environment::Development {
                endpoint_override: None,
            },
            gallery.clone(),
            toasts.clone(),
        );

        Self {
            store,
            toasts,
            gallery,
            router,
        }
    }

    /// Messages of the toasts currently shown
    pub fn toast_messages(&self) -> Vec<String> {
        self.toasts
            .active()
            .into_iter()
            .map(|toast| toast.message)
            .collect()
    }

    pub async fn send_request(
        &self,
        request: Request<Body>,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }

    pub async fn send_get_request(
        &self,
        route: &str,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let request = Request::builder()
            .uri(route)
            .method("GET")
            .body(Body::empty())?;
        self.send_request(request).await
    }

    pub async fn send_post_request(
        &self,
        route: &str,
        payload: serde_json::Value,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let request = Request::builder()
            .uri(route)
            .method("POST")
            .header("Content-Type", "application/json")
            .body(Body::from(payload.to_string()))?;
        self.send_request(request).await
    }

    pub async fn send_multipart_request(
        &self,
        route: &str,
        files: &[TestFile<'_>],
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let (content_type, body) = multipart_body(files);
        let request = Request::builder()
            .uri(route)
            .method("POST")
            .header("Content-Type", content_type)
            .body(Body::from(body))?;
        self.send_request(request).await
    }

    pub async fn send_delete_request(
        &self,
        route: &str,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let request = Request::builder()
            .uri(route)
            .method("DELETE")
            .body(Body::empty())?;
        self.send_request(request).await
    }
}
