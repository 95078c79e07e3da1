//! Request signing: legacy HMAC-SHA1 and TC3-HMAC-SHA256.

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::error::{CvmError, Result};

type HmacSha1 = Hmac<Sha1>;
type HmacSha256 = Hmac<Sha256>;

pub(crate) const TC3_ALGORITHM: &str = "TC3-HMAC-SHA256";
const TC3_REQUEST: &str = "tc3_request";

/// Headers included in the TC3 signature, lowercase and sorted.
const TC3_SIGNED_HEADERS: &str = "content-type;host";

fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn hmac_sha256(key: &[u8], data: &str) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| CvmError::Signing(format!("HMAC key error: {}", e)))?;
    mac.update(data.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Computes the legacy v1 signature over a parameter set.
///
/// Steps:
/// 1. Sort params by key byte-wise (BTreeMap provides this).
/// 2. Canonical query: `k1=v1&k2=v2&...` with raw, unencoded values.
/// 3. String-to-sign: `{method}{host}{path}?{canonical_query}`.
/// 4. Base64-encoded HMAC-SHA1 with the secret key.
pub(crate) fn sign_v1(
    params: &BTreeMap<String, String>,
    secret_key: &str,
    method: &str,
    host: &str,
    path: &str,
) -> Result<String> {
    if secret_key.is_empty() {
        return Err(CvmError::Signing("secret key is empty".into()));
    }

    let canonical_query: String = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let string_to_sign = format!("{}{}{}?{}", method, host, path, canonical_query);

    let mut mac = HmacSha1::new_from_slice(secret_key.as_bytes())
        .map_err(|e| CvmError::Signing(format!("HMAC key error: {}", e)))?;
    mac.update(string_to_sign.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

/// Inputs for the TC3-HMAC-SHA256 authorization computation.
///
/// `timestamp` is the same Unix-seconds value written into the
/// `X-TC-Timestamp` header; the signature is deterministic for a fixed
/// input set.
pub(crate) struct Tc3Request<'a> {
    pub secret_id: &'a str,
    pub secret_key: &'a str,
    pub host: &'a str,
    pub method: &'a str,
    pub content_type: &'a str,
    pub payload: &'a [u8],
    pub service: &'a str,
    pub timestamp: i64,
}

/// Computes the TC3 `Authorization` header value.
///
/// Canonical request, string-to-sign and the four-step derived key follow
/// the TC3 scheme: `HMAC(HMAC(HMAC("TC3"+key, date), service), "tc3_request")`
/// signs `TC3-HMAC-SHA256\n{timestamp}\n{date}/{service}/tc3_request\n{hash}`.
pub(crate) fn tc3_authorization(req: &Tc3Request<'_>) -> Result<String> {
    if req.secret_id.is_empty() || req.secret_key.is_empty() {
        return Err(CvmError::Signing("secret id or key is empty".into()));
    }

    let canonical_headers = format!("content-type:{}\nhost:{}\n", req.content_type, req.host);
    let canonical_request = format!(
        "{}\n/\n\n{}\n{}\n{}",
        req.method,
        canonical_headers,
        TC3_SIGNED_HEADERS,
        sha256_hex(req.payload),
    );

    let date = chrono::DateTime::from_timestamp(req.timestamp, 0)
        .ok_or_else(|| CvmError::Signing(format!("timestamp {} out of range", req.timestamp)))?
        .format("%Y-%m-%d")
        .to_string();
    let credential_scope = format!("{}/{}/{}", date, req.service, TC3_REQUEST);
    let string_to_sign = format!(
        "{}\n{}\n{}\n{}",
        TC3_ALGORITHM,
        req.timestamp,
        credential_scope,
        sha256_hex(canonical_request.as_bytes()),
    );

    let secret_date = hmac_sha256(format!("TC3{}", req.secret_key).as_bytes(), &date)?;
    let secret_service = hmac_sha256(&secret_date, req.service)?;
    let secret_signing = hmac_sha256(&secret_service, TC3_REQUEST)?;
    let signature = hex::encode(hmac_sha256(&secret_signing, &string_to_sign)?);

    Ok(format!(
        "{} Credential={}/{}, SignedHeaders={}, Signature={}",
        TC3_ALGORITHM, req.secret_id, credential_scope, TC3_SIGNED_HEADERS, signature,
    ))
}
