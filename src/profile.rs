use std::time::Duration;

/// URL scheme used to reach the service endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scheme {
    Http,
    #[default]
    Https,
}

impl Scheme {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

/// HTTP method for the request. v3 signing always uses POST; GET is only
/// meaningful with the legacy v1 signer, which carries parameters in the
/// query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    Get,
    #[default]
    Post,
}

impl HttpMethod {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// Signing scheme selected by the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignMethod {
    /// Legacy HMAC-SHA1 signature carried as a `Signature` parameter.
    HmacSha1,
    /// Current TC3-HMAC-SHA256 signature carried in `Authorization`.
    #[default]
    Tc3HmacSha256,
}

/// Language for service error messages, sent as `X-TC-Language`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    En,
    Zh,
}

impl Language {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Language::En => "en-US",
            Language::Zh => "zh-CN",
        }
    }
}

/// Retry policy applied by the transport.
///
/// `max_attempts` counts the initial attempt, so `1` disables retries.
/// Delays grow exponentially from `base_delay` up to `max_delay`, with
/// 50-100% jitter applied to each sleep.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// A policy that performs a single attempt and never retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }
}

/// Client-wide configuration, immutable after the client is built.
#[derive(Debug, Clone)]
pub struct ClientProfile {
    pub scheme: Scheme,
    pub method: HttpMethod,
    /// Per-request HTTP timeout applied by the transport. Distinct from a
    /// call deadline: expiry surfaces as a retryable transport error.
    pub request_timeout: Duration,
    pub sign_method: SignMethod,
    /// Full endpoint host override, e.g. `cvm.internal.example.com`.
    pub endpoint: Option<String>,
    /// Use the region-specific host `cvm.<region>.tencentcloudapi.com`.
    pub regional_endpoint: bool,
    pub language: Option<Language>,
    /// Log request and response bodies at debug level.
    pub debug: bool,
    /// Disable TLS certificate verification. Testing only.
    pub skip_tls_verify: bool,
    /// Proxy URL for all requests.
    pub proxy: Option<String>,
    pub retry: RetryPolicy,
}

impl Default for ClientProfile {
    fn default() -> Self {
        Self {
            scheme: Scheme::default(),
            method: HttpMethod::default(),
            request_timeout: Duration::from_secs(60),
            sign_method: SignMethod::default(),
            endpoint: None,
            regional_endpoint: false,
            language: None,
            debug: false,
            skip_tls_verify: false,
            proxy: None,
            retry: RetryPolicy::default(),
        }
    }
}

impl ClientProfile {
    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_sign_method(mut self, sign_method: SignMethod) -> Self {
        self.sign_method = sign_method;
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_regional_endpoint(mut self, regional: bool) -> Self {
        self.regional_endpoint = regional;
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_skip_tls_verify(mut self, skip: bool) -> Self {
        self.skip_tls_verify = skip;
        self
    }

    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}
