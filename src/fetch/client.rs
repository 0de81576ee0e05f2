use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes requests for [`super::load_source`]; lets callers inject headers
/// or swap the transport.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
