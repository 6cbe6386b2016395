//! Request descriptors and their builder.
//!
//! A [`RequestDescriptor`] is the immutable description of one logical
//! request: method, URL, headers, optional body, and an optional per-attempt
//! timeout override. The orchestrator never mutates a descriptor; request
//! interceptors produce a new descriptor instead.

use std::time::Duration;

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method};

use crate::fingerprint::Fingerprint;

/// An immutable description of one logical HTTP request.
///
/// Construct via [`RequestDescriptor::builder`]:
///
/// ```
/// use courier_core::RequestDescriptor;
/// use http::Method;
///
/// let request = RequestDescriptor::builder(Method::GET, "https://api.example.com/users")
///     .header(http::header::ACCEPT, "application/json".parse().unwrap())
///     .build();
///
/// assert!(request.is_get_like());
/// assert!(request.body().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    method: Method,
    url: String,
    headers: HeaderMap,
    body: Option<Bytes>,
    timeout: Option<Duration>,
}

impl RequestDescriptor {
    /// Creates a builder for a request with the given method and URL.
    pub fn builder(method: Method, url: impl Into<String>) -> RequestDescriptorBuilder {
        RequestDescriptorBuilder {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
            timeout: None,
        }
    }

    /// Returns the HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the target URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the header mapping.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the request body, if any.
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Returns the per-attempt timeout override, if any.
    ///
    /// `None` means the client-wide default applies.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Whether this request is safe to serve from cache (GET or HEAD).
    pub fn is_get_like(&self) -> bool {
        self.method == Method::GET || self.method == Method::HEAD
    }

    /// Computes the canonical fingerprint of this request.
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of(self)
    }

    /// Returns a copy of this descriptor with a different header mapping.
    ///
    /// This is the mutation seam for request interceptors: the original
    /// descriptor stays untouched.
    pub fn with_headers(&self, headers: HeaderMap) -> Self {
        Self {
            headers,
            ..self.clone()
        }
    }
}

/// Consuming builder for [`RequestDescriptor`].
#[derive(Debug)]
pub struct RequestDescriptorBuilder {
    method: Method,
    url: String,
    headers: HeaderMap,
    body: Option<Bytes>,
    timeout: Option<Duration>,
}

impl RequestDescriptorBuilder {
    /// Appends a header.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Replaces the whole header mapping.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Sets the request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Overrides the per-attempt timeout for this request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the descriptor.
    pub fn build(self) -> RequestDescriptor {
        RequestDescriptor {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
            timeout: self.timeout,
        }
    }
}
