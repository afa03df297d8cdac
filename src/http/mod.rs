//! JSON-over-HTTP helpers.
//!
//! Requests are cut off after the client timeout unless the caller passes an
//! abort registration, which then governs cancellation alone. The futures
//! need a tokio runtime, as reqwest does.

use std::time::Duration;

use futures::future::{AbortRegistration, Abortable};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Per-request settings.
#[derive(Debug, Default)]
pub struct RequestOptions {
    /// Overrides the helper's method (`GET` or `POST`).
    pub method: Option<Method>,
    pub headers: Vec<(String, String)>,
    /// Cancels the request when aborted. Disables the client timeout.
    pub signal: Option<AbortRegistration>,
}

impl RequestOptions {
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_signal(mut self, signal: AbortRegistration) -> Self {
        self.signal = Some(signal);
        self
    }
}

#[derive(Debug, Clone)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: Option<String>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn build(self) -> Result<HttpClient> {
        let mut builder = reqwest::Client::builder();
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }
        Ok(HttpClient {
            client: builder.build()?,
            timeout: self.timeout,
        })
    }
}

/// Thin JSON client over `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// A client with [`DEFAULT_TIMEOUT`].
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch and parse JSON.
    ///
    /// `204 No Content` is an error; any other empty body reads as `{}`.
    pub async fn get(&self, url: &str, options: RequestOptions) -> Result<Value> {
        let (status, body) = self.send(Method::GET, url, None, options).await?;
        if status == StatusCode::NO_CONTENT {
            return Err(Error::NoContent {
                url: url.to_string(),
            });
        }
        parse_json_or_empty(&body)
    }

    /// Fetch the body as text.
    pub async fn get_text(&self, url: &str, options: RequestOptions) -> Result<String> {
        let (_, body) = self.send(Method::GET, url, None, options).await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    /// Send `body` as JSON and parse the JSON reply.
    ///
    /// Unlike [`HttpClient::get`], `204 No Content` reads as `{}`.
    pub async fn post<T>(&self, url: &str, body: &T, options: RequestOptions) -> Result<Value>
    where
        T: Serialize + ?Sized,
    {
        let payload = serde_json::to_vec(body)?;
        let (status, body) = self
            .send(Method::POST, url, Some(payload), options)
            .await?;
        if status == StatusCode::NO_CONTENT {
            return Ok(empty_object());
        }
        parse_json_or_empty(&body)
    }

    async fn send(
        &self,
        default_method: Method,
        url: &str,
        payload: Option<Vec<u8>>,
        options: RequestOptions,
    ) -> Result<(StatusCode, Vec<u8>)> {
        let method = options.method.unwrap_or(default_method);
        tracing::debug!(%method, url, "sending request");

        let mut request = self.client.request(method, url);
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(payload) = payload {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .body(payload);
        }
        if options.signal.is_none() {
            request = request.timeout(self.timeout);
        }

        let exchange = async move {
            let response = request.send().await?;
            let status = response.status();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>((status, body.to_vec()))
        };

        let outcome = match options.signal {
            Some(signal) => Abortable::new(exchange, signal)
                .await
                .map_err(|_| Error::Aborted {
                    url: url.to_string(),
                })?,
            None => exchange.await,
        };

        let (status, body) = outcome.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    url: url.to_string(),
                }
            } else {
                Error::Transport(e)
            }
        })?;

        tracing::debug!(status = status.as_u16(), bytes = body.len(), url, "response");
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok((status, body))
    }
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

fn parse_json_or_empty(body: &[u8]) -> Result<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(empty_object());
    }
    Ok(serde_json::from_slice(body)?)
}
