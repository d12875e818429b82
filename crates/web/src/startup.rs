//! Process startup hook.
//!
//! On a server runtime the hook installs outbound proxy settings exactly once,
//! producing the HTTP client every outbound call shares. On any other runtime
//! it does nothing. The server binary keeps its hook in a `static`, so the
//! installed client lives for the whole process.

use std::fmt;
use std::sync::OnceLock;

use crate::config::AppConfig;

/// Shared outbound HTTP client.
pub type HttpClient = reqwest::Client;

/// Execution context the process is running in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Runtime {
    /// Full server process (default).
    #[default]
    Server,
    /// Restricted edge context; no process-wide setup is allowed.
    Edge,
}

impl Runtime {
    /// Parse the `APP_RUNTIME` value. Unset means `Server`.
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("edge") => Self::Edge,
            _ => Self::Server,
        }
    }

    #[must_use]
    pub const fn is_server(self) -> bool {
        matches!(self, Self::Server)
    }
}

/// Outbound proxy settings.
///
/// Implements `Debug` manually since proxy URLs may embed credentials.
#[derive(Clone, Default)]
pub struct ProxySettings {
    pub https_proxy: Option<String>,
    pub http_proxy: Option<String>,
    pub no_proxy: Option<String>,
}

impl fmt::Debug for ProxySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("ProxySettings")
            .field("https_proxy", &redact(&self.https_proxy))
            .field("http_proxy", &redact(&self.http_proxy))
            .field("no_proxy", &self.no_proxy)
            .finish()
    }
}

impl ProxySettings {
    /// Read proxy variables, preferring the upper-case spelling.
    pub fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |upper: &str, lower: &str| {
            lookup(upper)
                .or_else(|| lookup(lower))
                .filter(|v| !v.trim().is_empty())
        };

        Self {
            https_proxy: read("HTTPS_PROXY", "https_proxy"),
            http_proxy: read("HTTP_PROXY", "http_proxy"),
            no_proxy: read("NO_PROXY", "no_proxy"),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.https_proxy.is_none() && self.http_proxy.is_none()
    }
}

/// Build the shared outbound client with the configured proxies.
///
/// An unusable proxy URL is logged and the client falls back to direct
/// connections.
#[must_use]
pub fn install_proxy(settings: &ProxySettings) -> HttpClient {
    match build_client(settings) {
        Ok(client) => {
            if settings.is_empty() {
                tracing::debug!("No outbound proxy configured");
            } else {
                tracing::info!(proxy = ?settings, "Outbound proxy installed");
            }
            client
        }
        Err(e) => {
            tracing::warn!(error = %e, "Invalid proxy configuration, using direct connections");
            HttpClient::new()
        }
    }
}

fn build_client(settings: &ProxySettings) -> Result<HttpClient, reqwest::Error> {
    // Only the proxies named here apply; ambient system proxy detection is off.
    let mut builder = HttpClient::builder().no_proxy();
    let no_proxy = settings
        .no_proxy
        .as_deref()
        .and_then(reqwest::NoProxy::from_string);

    if let Some(url) = &settings.https_proxy {
        builder = builder.proxy(reqwest::Proxy::https(url.as_str())?.no_proxy(no_proxy.clone()));
    }
    if let Some(url) = &settings.http_proxy {
        builder = builder.proxy(reqwest::Proxy::http(url.as_str())?.no_proxy(no_proxy));
    }

    builder.build()
}

/// One-shot startup hook.
#[derive(Debug, Default)]
pub struct StartupHook {
    client: OnceLock<HttpClient>,
}

impl StartupHook {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            client: OnceLock::new(),
        }
    }

    /// Run `setup` once if `runtime` is a server.
    ///
    /// Later calls return the client from the first call without running
    /// `setup` again. Non-server runtimes return `None` and leave the hook
    /// uninitialized.
    pub fn register<F>(&self, runtime: Runtime, setup: F) -> Option<&HttpClient>
    where
        F: FnOnce() -> HttpClient,
    {
        if !runtime.is_server() {
            tracing::debug!(?runtime, "Skipping startup hook outside server runtime");
            return None;
        }

        Some(self.client.get_or_init(setup))
    }

    /// Run the hook with the proxy settings from `config`.
    pub fn run(&self, config: &AppConfig) -> Option<&HttpClient> {
        self.register(config.runtime, || install_proxy(&config.proxy))
    }
}
