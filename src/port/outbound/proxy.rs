//! Proxy source port.

use std::fmt;

use async_trait::async_trait;

use crate::error::Result;

/// A healthy egress path: an HTTP client bound to one proxy, or a direct
/// connection when no proxy is configured.
#[derive(Clone)]
pub struct ProxyHandle {
    endpoint: Option<String>,
    client: reqwest::Client,
}

impl ProxyHandle {
    /// Handle that connects without a proxy.
    #[must_use]
    pub fn direct(client: reqwest::Client) -> Self {
        Self {
            endpoint: None,
            client,
        }
    }

    /// Handle that routes through the given proxy endpoint.
    pub fn via(endpoint: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            client,
        }
    }

    /// Proxy endpoint, or `None` for direct egress.
    #[must_use]
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// HTTP client configured for this egress path.
    #[must_use]
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

impl fmt::Debug for ProxyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyHandle")
            .field("endpoint", &self.endpoint.as_deref().unwrap_or("direct"))
            .finish_non_exhaustive()
    }
}

/// Supplier of healthy outbound connections.
#[async_trait]
pub trait ProxySource: Send + Sync {
    /// Bring the source to a ready state. Errors are fatal to startup.
    async fn initialize(&self) -> Result<()>;

    /// Acquire a handle not currently known to be failing.
    async fn acquire(&self) -> Result<ProxyHandle>;

    /// Report that work routed through `handle` failed at the transport level.
    ///
    /// Sources that track health may stop handing this path out. The
    /// default does nothing.
    fn report_failure(&self, _handle: &ProxyHandle) {}
}
