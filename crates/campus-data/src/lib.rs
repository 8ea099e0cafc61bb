//! HTTP client and REST bindings for the campus marketplace backend.
//!
//! [`FetchClient`] is a small builder-style wrapper over `reqwest` that
//! buffers responses; [`MarketplaceApi`] uses it to implement the commerce
//! crate's [`ProductSource`](campus_commerce::search::ProductSource),
//! [`BookingGateway`](campus_commerce::checkout::BookingGateway) and
//! [`AccountGateway`](campus_commerce::account::AccountGateway) traits.
//!
//! # Example
//!
//! ```rust,no_run
//! use campus_commerce::search::{ProductQuery, ProductSource};
//! use campus_data::MarketplaceApi;
//!
//! # async fn run() -> Result<(), campus_commerce::CommerceError> {
//! let api = MarketplaceApi::new("http://localhost:5000");
//! let books = api
//!     .list_products(&ProductQuery::new().with_category("Books"))
//!     .await?;
//! println!("{} books listed", books.len());
//! # Ok(())
//! # }
//! ```

mod api;
mod error;
mod request;
mod response;
pub mod wire;

pub use api::{
    MarketplaceApi, BOOKING_FAILED, LOGIN_FAILED, SELLER_LOOKUP_FAILED, SIGNUP_FAILED,
};
pub use error::FetchError;
pub use request::{Method, RequestBuilder};
pub use response::Response;

use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Timeout applied to every request unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP client for making outbound requests.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: reqwest::Client,
    base_url: Option<String>,
    default_headers: HashMap<String, String>,
    timeout: Duration,
}

impl Default for FetchClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: None,
            default_headers: HashMap::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Send through a preconfigured `reqwest` client (proxies, TLS roots).
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Create a client with a base URL that will be prepended to all requests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a default header that will be included in all requests.
    pub fn with_default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Create a GET request.
    pub fn get(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Get, url)
    }

    /// Create a POST request.
    pub fn post(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Post, url)
    }

    /// Create a request with a custom method.
    pub fn request(&self, method: Method, url: impl Into<String>) -> ClientRequestBuilder {
        let url = url.into();
        let full_url = match &self.base_url {
            Some(base) if !url.starts_with("http://") && !url.starts_with("https://") => {
                format!("{}{}", base.trim_end_matches('/'), url)
            }
            _ => url,
        };

        let builder = RequestBuilder::new(method, full_url)
            .headers(self.default_headers.clone())
            .timeout(self.timeout);

        ClientRequestBuilder {
            http: self.http.clone(),
            builder,
        }
    }
}

/// A request builder bound to a client.
#[derive(Debug)]
pub struct ClientRequestBuilder {
    http: reqwest::Client,
    builder: RequestBuilder,
}

impl ClientRequestBuilder {
    /// The request as built so far.
    pub fn request(&self) -> &RequestBuilder {
        &self.builder
    }

    /// Append query parameters.
    pub fn query<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.builder = self.builder.query(pairs);
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: serde::Serialize>(mut self, value: &T) -> Result<Self, FetchError> {
        self.builder = self.builder.json(value)?;
        Ok(self)
    }

    /// Add a bearer token authorization header.
    pub fn bearer_auth(mut self, token: impl AsRef<str>) -> Self {
        self.builder = self.builder.bearer_auth(token);
        self
    }

    /// Send the request and buffer the whole response.
    pub async fn send(self) -> Result<Response, FetchError> {
        let RequestBuilder {
            method,
            url,
            headers,
            query,
            body,
            timeout,
        } = self.builder;

        debug!(method = method.as_str(), %url, "sending request");

        let mut request = self.http.request(method.into(), &url);
        if !query.is_empty() {
            request = request.query(&query);
        }
        for (key, value) in &headers {
            request = request.header(key.as_str(), value.as_str());
        }
        if let Some(body) = body {
            request = request.body(body);
        }
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
            .collect();
        let body = response.bytes().await?.to_vec();

        debug!(status, bytes = body.len(), "response received");
        Ok(Response::new(status, headers, body))
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FetchClient, FetchError, MarketplaceApi, Method, Response};
}
