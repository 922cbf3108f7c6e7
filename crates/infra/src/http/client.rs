//! Outbound HTTP with retry.
//!
//! The provider and LLM integrations only ever issue JSON POSTs and bare
//! GETs, so that is the whole surface. Requests are rebuilt from their parts
//! on every attempt; 5xx responses and transport failures are retried with a
//! doubling delay, 4xx responses go straight back to the caller.

use std::time::Duration;

use meetsync_domain::SyncError;
use reqwest::{Client as ReqwestClient, Method, Response};
use serde::Serialize;
use tracing::debug;

use crate::errors::InfraError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_ATTEMPTS: u32 = 3;
const DEFAULT_BACKOFF: Duration = Duration::from_millis(200);

#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    max_attempts: u32,
    base_backoff: Duration,
}

impl HttpClient {
    /// Client with the default timeout and retry policy.
    pub fn new() -> Result<Self, SyncError> {
        Self::with_policy(DEFAULT_TIMEOUT, DEFAULT_ATTEMPTS, DEFAULT_BACKOFF)
    }

    /// Client with an explicit timeout, attempt limit, and initial retry
    /// delay. The limit counts the first try.
    pub fn with_policy(
        timeout: Duration,
        max_attempts: u32,
        base_backoff: Duration,
    ) -> Result<Self, SyncError> {
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .no_proxy()
            .build()
            .map_err(|err| SyncError::from(InfraError::from(err)))?;
        Ok(Self { client, max_attempts: max_attempts.max(1), base_backoff })
    }

    /// GET with the given headers.
    pub async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<Response, SyncError> {
        self.dispatch(Method::GET, url, headers, None).await
    }

    /// POST the value as a JSON body with the given headers.
    pub async fn post_json<T: Serialize>(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &T,
    ) -> Result<Response, SyncError> {
        let body =
            serde_json::to_vec(body).map_err(|err| SyncError::from(InfraError::from(err)))?;
        self.dispatch(Method::POST, url, headers, Some(body)).await
    }

    async fn dispatch(
        &self,
        method: Method,
        url: &str,
        headers: &[(&str, &str)],
        body: Option<Vec<u8>>,
    ) -> Result<Response, SyncError> {
        let mut delay = self.base_backoff;
        let mut attempt = 1u32;

        loop {
            let mut request = self.client.request(method.clone(), url);
            for (name, value) in headers {
                request = request.header(*name, *value);
            }
            if let Some(bytes) = &body {
                request =
                    request.header("Content-Type", "application/json").body(bytes.clone());
            }
            debug!(%method, url, attempt, "dispatching request");

            let outcome = request.send().await;
            let retryable = match &outcome {
                Ok(response) => response.status().is_server_error(),
                Err(err) => err.is_timeout() || err.is_connect() || err.is_request(),
            };

            if !retryable || attempt >= self.max_attempts {
                return match outcome {
                    Ok(response) => {
                        debug!(%method, url, status = response.status().as_u16(), "request settled");
                        Ok(response)
                    }
                    Err(err) => Err(SyncError::from(InfraError::from(err))),
                };
            }

            debug!(url, attempt, ?delay, "retrying request");
            tokio::time::sleep(delay).await;
            delay = delay.saturating_mul(2);
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use reqwest::StatusCode;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn quick_client() -> HttpClient {
        HttpClient::with_policy(Duration::from_secs(5), 3, Duration::from_millis(5))
            .expect("http client")
    }

    #[tokio::test]
    async fn post_carries_json_body_and_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/submit"))
            .and(header("X-API-Key", "k1"))
            .and(body_json(json!({ "ping": true })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let response = quick_client()
            .post_json(
                &format!("{}/submit", server.uri()),
                &[("X-API-Key", "k1")],
                &json!({ "ping": true }),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn server_errors_are_retried_with_the_same_body() {
        let server = MockServer::start().await;
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        Mock::given(method("POST"))
            .and(body_json(json!({ "n": 7 })))
            .respond_with(move |_req: &wiremock::Request| {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    ResponseTemplate::new(502)
                } else {
                    ResponseTemplate::new(200)
                }
            })
            .expect(2)
            .mount(&server)
            .await;

        let response = quick_client()
            .post_json(&server.uri(), &[], &json!({ "n": 7 }))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn client_errors_settle_on_the_first_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let response = quick_client().get(&server.uri(), &[]).await.expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn exhausted_attempts_hand_back_the_last_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        let response = quick_client().get(&server.uri(), &[]).await.expect("response");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
