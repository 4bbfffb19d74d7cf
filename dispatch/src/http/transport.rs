use reqwest::header::HeaderMap;
use reqwest::redirect::Policy;
use reqwest::{Client, Method};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tracing::debug;

use crate::errors::TransportError;

/// Fully configured request handed to a [`Transport`].
///
/// The transport takes it by value, so whatever it keeps is independent of
/// the request the router builds next.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<String>,
    pub include_credentials: bool,
}

/// Completed exchange as seen by the response classifier
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// `0` when the exchange produced no HTTP status at all
    pub status: u16,
    pub status_text: String,
    pub headers: HeaderMap,
    pub body: String,
}

impl TransportResponse {
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }
}

/// Invoked at most once with the outcome of a submitted request
pub type ResponseCallback =
    Box<dyn FnOnce(Result<TransportResponse, TransportError>) + Send + 'static>;

/// In-flight request owned by a transport
pub trait PendingRequest: Send + Sync {
    /// Abandon the request. A cancelled request never invokes its callback.
    fn cancel(&self);

    fn is_pending(&self) -> bool;
}

/// "Send request, receive callback" contract.
///
/// `send` returns as soon as the request is submitted. An `Err` means
/// nothing was sent and the callback has been dropped uncalled.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: HttpRequest,
        callback: ResponseCallback,
    ) -> Result<Box<dyn PendingRequest>, TransportError>;
}

/// Credentials attached to requests flagged with `include_credentials`
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: Option<String>,
}

/// [`Transport`] backed by `reqwest`, running each exchange as a task on
/// the current tokio runtime.
pub struct ReqwestTransport {
    client: Client,
    credentials: Option<Credentials>,
}

impl ReqwestTransport {
    pub fn new(credentials: Option<Credentials>, connect_timeout: Option<Duration>) -> anyhow::Result<Self> {
        // 307 must reach the classifier, so redirects are never followed here
        let mut builder = Client::builder().redirect(Policy::none());
        if let Some(timeout) = connect_timeout {
            builder = builder.connect_timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            credentials,
        })
    }
}

impl Transport for ReqwestTransport {
    fn send(
        &self,
        request: HttpRequest,
        callback: ResponseCallback,
    ) -> Result<Box<dyn PendingRequest>, TransportError> {
        let runtime = Handle::try_current().map_err(|e| TransportError::InvalidRequest {
            reason: format!("no async runtime available: {}", e),
        })?;

        let mut builder = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers);
        if request.include_credentials {
            if let Some(credentials) = &self.credentials {
                builder = builder.basic_auth(&credentials.username, credentials.password.as_ref());
            }
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        let prepared = builder.build()?;

        debug!("Submitting {} {}", prepared.method(), prepared.url());

        let client = self.client.clone();
        let task = runtime.spawn(async move {
            let outcome = fetch(&client, prepared).await;
            callback(outcome);
        });

        Ok(Box::new(TaskRequest {
            task: task.abort_handle(),
            cancelled: Arc::new(AtomicBool::new(false)),
        }))
    }
}

async fn fetch(client: &Client, request: reqwest::Request) -> Result<TransportResponse, TransportError> {
    let response = client.execute(request).await?;
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.text().await?;

    Ok(TransportResponse {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or_default().to_string(),
        headers,
        body,
    })
}

/// Spawned exchange; aborting the task drops the callback uncalled
struct TaskRequest {
    task: AbortHandle,
    cancelled: Arc<AtomicBool>,
}

impl PendingRequest for TaskRequest {
    fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            self.task.abort();
        }
    }

    fn is_pending(&self) -> bool {
        !self.cancelled.load(Ordering::SeqCst) && !self.task.is_finished()
    }
}
