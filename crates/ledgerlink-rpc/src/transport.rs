//! Transport abstraction for the RPC client.
//!
//! A transport carries one serialized JSON-RPC request to the endpoint and
//! hands back the raw HTTP status and body. Interpreting the body is the
//! client's job.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use crate::config::{ProxyConfig, RpcConfig};
use crate::error::Result;

/// Status and body of one HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// A `200 OK` response.
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport trait for delivering JSON-RPC requests.
///
/// Implementations must be thread-safe (Send + Sync): one transport is shared
/// by every call a client makes, and calls may run concurrently.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST a request body and return the response.
    ///
    /// An `Err` means no response was obtained at all. Non-success statuses
    /// are returned as `Ok` for the caller to classify.
    async fn post(&self, body: String) -> Result<HttpResponse>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn post(&self, body: String) -> Result<HttpResponse> {
        (**self).post(body).await
    }
}

/// HTTP(S) transport backed by a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpTransport {
    /// Build a transport from configuration.
    pub fn new(config: &RpcConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone());

        builder = match &config.proxy {
            ProxyConfig::System => builder,
            ProxyConfig::Explicit(proxy) => builder.proxy(reqwest::Proxy::all(proxy.as_str())?),
            ProxyConfig::Disabled => builder.no_proxy(),
        };

        Ok(Self {
            client: builder.build()?,
            url: config.url.clone(),
        })
    }

    /// The endpoint requests are sent to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, body: String) -> Result<HttpResponse> {
        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}

/// A scripted in-memory transport for testing.
///
/// Responses are handed out in FIFO order; every request body is recorded.
pub mod memory {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Mutex, PoisonError};

    use crate::error::RpcError;

    /// One scripted outcome.
    #[derive(Debug, Clone)]
    enum Scripted {
        Response(HttpResponse),
        Failure(String),
    }

    /// In-memory transport implementation.
    #[derive(Debug, Default)]
    pub struct MemoryTransport {
        script: Mutex<VecDeque<Scripted>>,
        requests: Mutex<Vec<String>>,
    }

    impl MemoryTransport {
        /// Create an empty transport. Requests fail until responses are queued.
        pub fn new() -> Self {
            Self::default()
        }

        /// Create with a queue of responses.
        pub fn with_responses(responses: impl IntoIterator<Item = HttpResponse>) -> Self {
            let transport = Self::new();
            for response in responses {
                transport.push_response(response);
            }
            transport
        }

        /// Queue a response.
        pub fn push_response(&self, response: HttpResponse) {
            self.script
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push_back(Scripted::Response(response));
        }

        /// Queue a `200 OK` with the given JSON body.
        pub fn push_json(&self, body: impl Into<String>) {
            self.push_response(HttpResponse::ok(body));
        }

        /// Queue an I/O failure (no response at all).
        pub fn push_failure(&self, message: impl Into<String>) {
            self.script
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push_back(Scripted::Failure(message.into()));
        }

        /// Request bodies received so far, oldest first.
        pub fn requests(&self) -> Vec<String> {
            self.requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Number of queued responses not yet consumed.
        pub fn pending(&self) -> usize {
            self.script
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .len()
        }
    }

    #[async_trait]
    impl Transport for MemoryTransport {
        async fn post(&self, body: String) -> Result<HttpResponse> {
            self.requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(body);

            let next = self
                .script
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front();

            match next {
                Some(Scripted::Response(response)) => Ok(response),
                Some(Scripted::Failure(message)) => Err(RpcError::Io(message)),
                None => Err(RpcError::Io("no scripted response".into())),
            }
        }
    }
}
