//! Canonical request fingerprints.
//!
//! A [`Fingerprint`] identifies a logical request for caching and
//! deduplication. It is built deterministically from method, URL, body, and
//! the header mapping with header pairs sorted by name and value, so two
//! descriptors that differ only in header insertion order produce the same
//! fingerprint.
//!
//! ## Format
//!
//! When rendered to a string, fingerprints follow this format:
//! `method=GET&url=https://...&h:accept=application/json&body=1a2b3c`
//!
//! - Header parts carry an `h:` prefix so they cannot collide with the
//!   fixed parts
//! - The body part is a 64-bit digest in hex, omitted for bodyless requests
//!
//! ## Performance
//!
//! [`Fingerprint`] wraps its data in `Arc`, so `clone()` only bumps a
//! reference count. Keys are cloned on every cache and pending-table
//! operation, which makes this worth having.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use smol_str::SmolStr;

use crate::descriptor::RequestDescriptor;

/// Inner structure holding the canonical parts.
#[derive(Debug, Eq, PartialEq, Hash)]
struct FingerprintInner {
    method: SmolStr,
    url: SmolStr,
    /// Header pairs, sorted by name then value. Names are lowercase by
    /// `http::HeaderName` construction.
    headers: Vec<(SmolStr, SmolStr)>,
    /// Digest of the body bytes; `None` for bodyless requests.
    body_digest: Option<u64>,
}

/// Canonical identity of a logical request.
///
/// Used as the key for both the cache and the pending-request table.
/// Cheap to clone (`Arc` inside).
///
/// # Example
///
/// ```
/// use courier_core::RequestDescriptor;
/// use http::Method;
///
/// let a = RequestDescriptor::builder(Method::GET, "https://example.com")
///     .header(http::header::ACCEPT, "text/plain".parse().unwrap())
///     .header(http::header::USER_AGENT, "courier".parse().unwrap())
///     .build();
/// let b = RequestDescriptor::builder(Method::GET, "https://example.com")
///     .header(http::header::USER_AGENT, "courier".parse().unwrap())
///     .header(http::header::ACCEPT, "text/plain".parse().unwrap())
///     .build();
///
/// assert_eq!(a.fingerprint(), b.fingerprint());
/// ```
#[derive(Debug, Clone)]
pub struct Fingerprint {
    inner: Arc<FingerprintInner>,
}

impl Fingerprint {
    /// Computes the fingerprint of a request descriptor.
    pub fn of(request: &RequestDescriptor) -> Self {
        let mut headers: Vec<(SmolStr, SmolStr)> = request
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    SmolStr::new(name.as_str()),
                    SmolStr::new(String::from_utf8_lossy(value.as_bytes())),
                )
            })
            .collect();
        headers.sort_unstable();

        let body_digest = request.body().map(|body| {
            let mut hasher = DefaultHasher::new();
            body.hash(&mut hasher);
            hasher.finish()
        });

        Fingerprint {
            inner: Arc::new(FingerprintInner {
                method: SmolStr::new(request.method().as_str()),
                url: SmolStr::new(request.url()),
                headers,
                body_digest,
            }),
        }
    }

    /// Returns the method part of the fingerprint.
    pub fn method(&self) -> &str {
        &self.inner.method
    }

    /// Returns the URL part of the fingerprint.
    pub fn url(&self) -> &str {
        &self.inner.url
    }
}

impl PartialEq for Fingerprint {
    fn eq(&self, other: &Self) -> bool {
        // Fast path: same Arc pointer
        Arc::ptr_eq(&self.inner, &other.inner) || self.inner == other.inner
    }
}

impl Eq for Fingerprint {}

impl Hash for Fingerprint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "method={}&url={}", self.inner.method, self.inner.url)?;
        for (name, value) in &self.inner.headers {
            write!(f, "&h:{}={}", name, value)?;
        }
        if let Some(digest) = self.inner.body_digest {
            write!(f, "&body={:016x}", digest)?;
        }
        Ok(())
    }
}
