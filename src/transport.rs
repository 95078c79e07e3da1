//! HTTP transport: client construction from the profile and single
//! round trips. Retry orchestration lives in the client pipeline.

use tracing::debug;

use crate::error::{CvmError, Result};
use crate::profile::{ClientProfile, HttpMethod};
use crate::request::WireRequest;

/// Builds the shared connection-pooled HTTP client from profile options.
pub(crate) fn build_http_client(profile: &ClientProfile) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().timeout(profile.request_timeout);

    if profile.skip_tls_verify {
        builder = builder.danger_accept_invalid_certs(true);
    }
    if let Some(proxy) = &profile.proxy {
        let proxy = reqwest::Proxy::all(proxy)
            .map_err(|e| CvmError::Config(format!("invalid proxy URL: {}", e)))?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| CvmError::Config(format!("failed to build HTTP client: {}", e)))
}

/// Performs one signed round trip and returns the raw status and body.
///
/// Errors are returned as raw `reqwest::Error` so the retry loop can
/// classify them (connect-stage vs later) before they are mapped into
/// [`CvmError::Transport`].
pub(crate) async fn round_trip(
    http: &reqwest::Client,
    wire: WireRequest,
) -> std::result::Result<(u16, Vec<u8>), reqwest::Error> {
    let mut builder = match wire.method {
        HttpMethod::Get => http.get(&wire.url),
        HttpMethod::Post => http.post(&wire.url),
    };
    for (name, value) in &wire.headers {
        builder = builder.header(*name, value);
    }
    if !wire.body.is_empty() {
        builder = builder.body(wire.body);
    }

    let response = builder.send().await?;
    let status = response.status().as_u16();
    let body = response.bytes().await?;
    debug!(status, bytes = body.len(), "received response");
    Ok((status, body.to_vec()))
}

/// Maps a transport failure into the public error type once retries are
/// exhausted or ruled out.
pub(crate) fn map_transport_error(err: reqwest::Error) -> CvmError {
    CvmError::Transport {
        status: err.status().map(|s| s.as_u16()),
        message: err.to_string(),
    }
}
