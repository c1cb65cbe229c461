//! A reusable HTTP session for the Employees API.
//!
//! Every request carries the same default headers: the configured `Authorization` value and a
//! JSON `Content-Type`. The underlying connection pool is shared by all clones of a session.

use crate::error::ApiError;
use crate::Settings;
use http::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{Method, Request, StatusCode};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::io;
use std::time::Instant;
use url::Url;

#[cfg(feature = "rustls-tls")]
pub(crate) type Connector = hyper_rustls::HttpsConnector<HttpConnector>;
#[cfg(all(feature = "native-tls", not(feature = "rustls-tls")))]
pub(crate) type Connector = hyper_tls::HttpsConnector<HttpConnector>;
#[cfg(not(any(feature = "native-tls", feature = "rustls-tls")))]
pub(crate) type Connector = HttpConnector;

/// The HTTP connector shared by API sessions and WebDriver sessions.
#[cfg(feature = "rustls-tls")]
pub(crate) fn connector() -> io::Result<Connector> {
    Ok(hyper_rustls::HttpsConnectorBuilder::new()
        .with_native_roots()?
        .https_or_http()
        .enable_http1()
        .build())
}

/// The HTTP connector shared by API sessions and WebDriver sessions.
#[cfg(all(feature = "native-tls", not(feature = "rustls-tls")))]
pub(crate) fn connector() -> io::Result<Connector> {
    Ok(hyper_tls::HttpsConnector::new())
}

/// The HTTP connector shared by API sessions and WebDriver sessions.
#[cfg(not(any(feature = "native-tls", feature = "rustls-tls")))]
pub(crate) fn connector() -> io::Result<Connector> {
    Ok(HttpConnector::new())
}

/// An HTTP session preconfigured with authentication and JSON headers.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone)]
pub struct ApiSession {
    client: Client<Connector, Full<Bytes>>,
    headers: HeaderMap,
}

impl fmt::Debug for ApiSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiSession")
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ApiSession {
    /// Build a session that authenticates as described by `settings`.
    pub fn new(settings: &Settings) -> Result<Self, ApiError> {
        Self::with_authorization(&settings.authorization())
    }

    /// Build a session that sends the given `Authorization` header value.
    pub fn with_authorization(authorization: &str) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(authorization)
            .map_err(|e| ApiError::BadRequest(e.into()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        let json = HeaderValue::from_str(mime::APPLICATION_JSON.as_ref())
            .map_err(|e| ApiError::BadRequest(e.into()))?;
        headers.insert(CONTENT_TYPE, json.clone());
        headers.insert(ACCEPT, json);

        let connector = connector().map_err(ApiError::Tls)?;
        let client = Client::builder(TokioExecutor::new()).build(connector);
        Ok(ApiSession { client, headers })
    }

    /// The headers attached to every request.
    pub fn default_headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Issue a `GET` request.
    pub async fn get(&self, url: &Url) -> Result<ApiResponse, ApiError> {
        self.send(Method::GET, url, Bytes::new()).await
    }

    /// Issue a `DELETE` request.
    pub async fn delete(&self, url: &Url) -> Result<ApiResponse, ApiError> {
        self.send(Method::DELETE, url, Bytes::new()).await
    }

    /// Issue a `POST` request with `body` serialized as JSON.
    pub async fn post<T: Serialize + ?Sized>(
        &self,
        url: &Url,
        body: &T,
    ) -> Result<ApiResponse, ApiError> {
        let body = serde_json::to_vec(body)?;
        self.send(Method::POST, url, Bytes::from(body)).await
    }

    /// Issue a `PUT` request with `body` serialized as JSON.
    pub async fn put<T: Serialize + ?Sized>(
        &self,
        url: &Url,
        body: &T,
    ) -> Result<ApiResponse, ApiError> {
        let body = serde_json::to_vec(body)?;
        self.send(Method::PUT, url, Bytes::from(body)).await
    }

    /// Issue a request with the session's default headers and return the fully-read response.
    pub async fn send(
        &self,
        method: Method,
        url: &Url,
        body: Bytes,
    ) -> Result<ApiResponse, ApiError> {
        let mut req = Request::builder()
            .method(method.clone())
            .uri(url.as_str())
            .body(Full::new(body))?;
        req.headers_mut().extend(self.headers.clone());

        let started = Instant::now();
        let rsp = self.client.request(req).await.map_err(|e| {
            tracing::warn!(%method, %url, error = %e, "request failed");
            ApiError::from(e)
        })?;
        let (parts, body) = rsp.into_parts();
        let body = body.collect().await?.to_bytes();
        tracing::debug!(
            %method,
            %url,
            status = parts.status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "api request"
        );

        Ok(ApiResponse {
            status: parts.status,
            headers: parts.headers,
            body,
        })
    }
}

/// A fully-read HTTP response.
#[derive(Clone, Debug)]
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl ApiResponse {
    /// Assemble a response by hand.
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        ApiResponse {
            status,
            headers,
            body: body.into(),
        }
    }

    /// The HTTP status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The raw response body.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The response body as (lossily decoded) text.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the response body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}
