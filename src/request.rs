//! Wire request construction: action metadata, parameter serialization
//! and signing for both wire formats.

use std::collections::BTreeMap;

use rand::Rng;
use serde::Serialize;
use serde_json::Value;

use crate::credential::Credential;
use crate::error::{CvmError, Result};
use crate::profile::{ClientProfile, HttpMethod, SignMethod};
use crate::sign::{Tc3Request, sign_v1, tc3_authorization};

pub(crate) const HEADER_ACTION: &str = "X-TC-Action";
pub(crate) const HEADER_VERSION: &str = "X-TC-Version";
pub(crate) const HEADER_REGION: &str = "X-TC-Region";
pub(crate) const HEADER_TIMESTAMP: &str = "X-TC-Timestamp";
pub(crate) const HEADER_TOKEN: &str = "X-TC-Token";
pub(crate) const HEADER_LANGUAGE: &str = "X-TC-Language";
pub(crate) const HEADER_REQUEST_CLIENT: &str = "X-TC-RequestClient";

/// Value sent in `X-TC-RequestClient` to identify this SDK.
pub(crate) const REQUEST_CLIENT: &str = concat!("rs-tc-cvm/", env!("CARGO_PKG_VERSION"));

const CONTENT_TYPE_JSON: &str = "application/json";
const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

/// A typed request bound to its remote action name.
///
/// Implemented by every generated request type; the client uses
/// `Self::ACTION` to stamp the envelope and to decide idempotency for
/// retries.
pub trait ServiceRequest: Serialize {
    /// The remote action name, e.g. `DescribeInstances`.
    const ACTION: &'static str;
}

/// A transport-ready request: everything signed and serialized.
pub(crate) struct WireRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Vec<u8>,
}

/// Flattens a serialized request into v1 form parameters.
///
/// Nested objects become `Parent.Field`; arrays become `Parent.N.Field`
/// with 1-based indices; booleans serialize as `TRUE`/`FALSE`; null
/// (absent optional) fields are omitted entirely.
pub(crate) fn flatten_params(payload: &Value) -> Result<BTreeMap<String, String>> {
    let Value::Object(_) = payload else {
        return Err(CvmError::InvalidRequest(
            "request must serialize to a JSON object".into(),
        ));
    };
    let mut params = BTreeMap::new();
    walk("", payload, &mut params);
    Ok(params)
}

fn walk(prefix: &str, value: &Value, params: &mut BTreeMap<String, String>) {
    match value {
        Value::Null => {}
        Value::Bool(b) => {
            params.insert(prefix.to_string(), if *b { "TRUE" } else { "FALSE" }.into());
        }
        Value::Number(n) => {
            params.insert(prefix.to_string(), n.to_string());
        }
        Value::String(s) => {
            params.insert(prefix.to_string(), s.clone());
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                walk(&format!("{}.{}", prefix, i + 1), item, params);
            }
        }
        Value::Object(fields) => {
            for (key, item) in fields {
                let child = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                walk(&child, item, params);
            }
        }
    }
}

fn form_encode(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Builds the signed, transport-ready form of one call attempt.
///
/// `timestamp` is stamped into the request and fed to the signer, so the
/// signed value and the transmitted value are always the same. Called
/// once per attempt; each retry gets a fresh timestamp and signature.
#[allow(clippy::too_many_arguments)]
pub(crate) fn build_wire_request(
    action: &str,
    api_version: &str,
    service: &str,
    payload: &Value,
    credential: &Credential,
    region: &str,
    host: &str,
    profile: &ClientProfile,
    timestamp: i64,
) -> Result<WireRequest> {
    match profile.sign_method {
        SignMethod::Tc3HmacSha256 => build_v3(
            action,
            api_version,
            service,
            payload,
            credential,
            region,
            host,
            profile,
            timestamp,
        ),
        SignMethod::HmacSha1 => build_v1(
            action,
            api_version,
            payload,
            credential,
            region,
            host,
            profile,
            timestamp,
        ),
    }
}

#[allow(clippy::too_many_arguments)]
fn build_v3(
    action: &str,
    api_version: &str,
    service: &str,
    payload: &Value,
    credential: &Credential,
    region: &str,
    host: &str,
    profile: &ClientProfile,
    timestamp: i64,
) -> Result<WireRequest> {
    let body = serde_json::to_vec(payload)?;

    let authorization = tc3_authorization(&Tc3Request {
        secret_id: &credential.secret_id,
        secret_key: &credential.secret_key,
        host,
        method: "POST",
        content_type: CONTENT_TYPE_JSON,
        payload: &body,
        service,
        timestamp,
    })?;

    let mut headers = vec![
        ("Host", host.to_string()),
        ("Content-Type", CONTENT_TYPE_JSON.to_string()),
        ("Authorization", authorization),
        (HEADER_ACTION, action.to_string()),
        (HEADER_VERSION, api_version.to_string()),
        (HEADER_REGION, region.to_string()),
        (HEADER_TIMESTAMP, timestamp.to_string()),
        (HEADER_REQUEST_CLIENT, REQUEST_CLIENT.to_string()),
    ];
    if let Some(language) = profile.language {
        headers.push((HEADER_LANGUAGE, language.as_str().to_string()));
    }
    if let Some(token) = &credential.token {
        headers.push((HEADER_TOKEN, token.clone()));
    }

    Ok(WireRequest {
        // TC3 always travels as POST / with a JSON body.
        method: HttpMethod::Post,
        url: format!("{}://{}/", profile.scheme.as_str(), host),
        headers,
        body,
    })
}

#[allow(clippy::too_many_arguments)]
fn build_v1(
    action: &str,
    api_version: &str,
    payload: &Value,
    credential: &Credential,
    region: &str,
    host: &str,
    profile: &ClientProfile,
    timestamp: i64,
) -> Result<WireRequest> {
    let mut params = flatten_params(payload)?;

    params.insert("Action".into(), action.to_string());
    params.insert("Version".into(), api_version.to_string());
    params.insert("Region".into(), region.to_string());
    params.insert("Timestamp".into(), timestamp.to_string());
    params.insert(
        "Nonce".into(),
        rand::thread_rng().gen_range(1u32..=u32::MAX).to_string(),
    );
    params.insert("SecretId".into(), credential.secret_id.clone());
    params.insert("SignatureMethod".into(), "HmacSHA1".to_string());
    if let Some(token) = &credential.token {
        params.insert("Token".into(), token.clone());
    }
    if let Some(language) = profile.language {
        params.insert("Language".into(), language.as_str().to_string());
    }

    let signature = sign_v1(
        &params,
        &credential.secret_key,
        profile.method.as_str(),
        host,
        "/",
    )?;
    params.insert("Signature".into(), signature);

    let encoded = form_encode(&params);
    let scheme = profile.scheme.as_str();

    Ok(match profile.method {
        HttpMethod::Get => WireRequest {
            method: HttpMethod::Get,
            url: format!("{}://{}/?{}", scheme, host, encoded),
            headers: vec![("Host", host.to_string())],
            body: Vec::new(),
        },
        HttpMethod::Post => WireRequest {
            method: HttpMethod::Post,
            url: format!("{}://{}/", scheme, host),
            headers: vec![
                ("Host", host.to_string()),
                ("Content-Type", CONTENT_TYPE_FORM.to_string()),
            ],
            body: encoded.into_bytes(),
        },
    })
}
