//! Rotating proxy pool.
//!
//! Builds one HTTP client per configured proxy endpoint and hands them out
//! round-robin. Endpoints reported as failing are skipped until every
//! endpoint has failed, at which point the failure marks are cleared and
//! rotation starts over.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::infrastructure::config::ScrapingConfig;
use crate::port::outbound::proxy::{ProxyHandle, ProxySource};

const USER_AGENT: &str = concat!("dealcast/", env!("CARGO_PKG_VERSION"));

/// Mutable rotation state, guarded by the pool mutex.
#[derive(Default)]
struct Rotation {
    handles: Vec<ProxyHandle>,
    failed: HashSet<usize>,
    next: usize,
}

/// Production [`ProxySource`] backed by a fixed endpoint list.
pub struct ProxyPool {
    endpoints: Vec<String>,
    max_proxies: usize,
    timeout: Duration,
    rotation: Mutex<Rotation>,
}

impl ProxyPool {
    pub fn new(endpoints: Vec<String>, max_proxies: usize, timeout: Duration) -> Self {
        Self {
            endpoints,
            max_proxies,
            timeout,
            rotation: Mutex::new(Rotation::default()),
        }
    }

    #[must_use]
    pub fn from_config(config: &ScrapingConfig) -> Self {
        Self::new(
            config.proxies.clone(),
            config.max_proxies,
            config.request_timeout(),
        )
    }

    /// Number of egress paths in rotation.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rotation.lock().handles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn client(&self, proxy: Option<&str>) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT);
        if let Some(endpoint) = proxy {
            let proxy = reqwest::Proxy::all(endpoint)
                .map_err(|e| Error::Proxy(format!("invalid proxy {endpoint}: {e}")))?;
            builder = builder.proxy(proxy);
        }
        builder
            .build()
            .map_err(|e| Error::Proxy(format!("failed to build client: {e}")))
    }
}

#[async_trait]
impl ProxySource for ProxyPool {
    async fn initialize(&self) -> Result<()> {
        let handles = if self.endpoints.is_empty() {
            info!("No proxies configured, using direct connection");
            vec![ProxyHandle::direct(self.client(None)?)]
        } else {
            let mut endpoints = self.endpoints.clone();
            endpoints.shuffle(&mut rand::thread_rng());
            endpoints.truncate(self.max_proxies);

            let mut handles = Vec::with_capacity(endpoints.len());
            for endpoint in endpoints {
                let client = self.client(Some(&endpoint))?;
                handles.push(ProxyHandle::via(endpoint, client));
            }
            info!(
                proxies = handles.len(),
                configured = self.endpoints.len(),
                "Proxy pool initialized"
            );
            handles
        };

        if handles.is_empty() {
            return Err(Error::Proxy("no usable proxies".to_string()));
        }

        *self.rotation.lock() = Rotation {
            handles,
            failed: HashSet::new(),
            next: 0,
        };
        Ok(())
    }

    async fn acquire(&self) -> Result<ProxyHandle> {
        let mut rotation = self.rotation.lock();
        let count = rotation.handles.len();
        if count == 0 {
            return Err(Error::Proxy("proxy pool not initialized".to_string()));
        }

        if rotation.failed.len() >= count {
            warn!(proxies = count, "All proxies marked failing, resetting rotation");
            rotation.failed.clear();
        }

        let start = rotation.next;
        let index = (0..count)
            .map(|offset| (start + offset) % count)
            .find(|index| !rotation.failed.contains(index))
            .unwrap_or(start % count);
        rotation.next = (index + 1) % count;

        let handle = rotation.handles[index].clone();
        debug!(proxy = ?handle, "Proxy acquired");
        Ok(handle)
    }

    fn report_failure(&self, handle: &ProxyHandle) {
        let Some(endpoint) = handle.endpoint() else {
            return;
        };
        let mut rotation = self.rotation.lock();
        if let Some(index) = rotation
            .handles
            .iter()
            .position(|h| h.endpoint() == Some(endpoint))
        {
            rotation.failed.insert(index);
            warn!(proxy = endpoint, "Proxy marked failing");
        }
    }
}
