//! Decoding of the uniform response envelope
//! `{"Response": {..., "RequestId", "Error"?: {"Code", "Message"}}}`.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{CvmError, MAX_ERROR_BODY_CHARS, Result, truncate_str};

#[derive(Deserialize)]
struct Outer {
    #[serde(rename = "Response")]
    response: serde_json::Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ErrorInfo {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// Decodes a raw response into the typed payload or a structured error.
///
/// The provider returns HTTP 200 for most service errors, so the body is
/// inspected first: a non-empty `Error.Code` yields `Service` regardless
/// of status. A body that does not parse as the envelope surfaces as
/// `Transport` for non-2xx statuses and as a deserialization error
/// otherwise.
pub(crate) fn decode_response<T: DeserializeOwned>(status: u16, body: &[u8]) -> Result<T> {
    let text = String::from_utf8_lossy(body);

    let outer: Outer = match serde_json::from_str(&text) {
        Ok(outer) => outer,
        Err(e) => {
            if !(200..300).contains(&status) {
                return Err(CvmError::Transport {
                    status: Some(status),
                    message: format!("body: {}", truncate_str(&text, MAX_ERROR_BODY_CHARS)),
                });
            }
            return Err(CvmError::Deserialize(e));
        }
    };

    let request_id = outer
        .response
        .get("RequestId")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    if let Some(raw_error) = outer.response.get("Error") {
        let info: ErrorInfo = serde_json::from_value(raw_error.clone())?;
        if !info.code.is_empty() {
            return Err(CvmError::Service {
                code: info.code,
                message: info.message,
                request_id,
            });
        }
    }

    serde_json::from_value(outer.response).map_err(CvmError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DescribeZonesResponse, TerminateInstancesResponse};

    #[test]
    fn success_decodes_typed_payload() {
        let body = br#"{"Response":{"RequestId":"r1","TotalCount":1,"ZoneSet":[
            {"Zone":"ap-guangzhou-3","ZoneName":"Guangzhou Zone 3","ZoneId":"100003","ZoneState":"AVAILABLE"}
        ]}}"#;
        let resp: DescribeZonesResponse = decode_response(200, body).unwrap();
        assert_eq!(resp.request_id, "r1");
        assert_eq!(resp.total_count, Some(1));
        let zones = resp.zone_set.unwrap();
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].zone.as_deref(), Some("ap-guangzhou-3"));
    }

    #[test]
    fn empty_zone_set() {
        let body = br#"{"Response":{"RequestId":"r1","ZoneSet":[]}}"#;
        let resp: DescribeZonesResponse = decode_response(200, body).unwrap();
        assert_eq!(resp.request_id, "r1");
        assert_eq!(resp.zone_set.unwrap().len(), 0);
    }

    #[test]
    fn error_code_yields_service_error() {
        let body = br#"{"Response":{"RequestId":"r2","Error":{
            "Code":"InvalidInstanceId.NotFound","Message":"instance not found"}}}"#;
        let err = decode_response::<TerminateInstancesResponse>(200, body).unwrap_err();
        match err {
            CvmError::Service {
                code,
                message,
                request_id,
            } => {
                assert_eq!(code, "InvalidInstanceId.NotFound");
                assert_eq!(message, "instance not found");
                assert_eq!(request_id, "r2");
            }
            other => panic!("expected Service, got: {:?}", other),
        }
    }

    #[test]
    fn error_branch_is_exclusive() {
        // Error present means no typed payload even when the payload
        // fields would also parse.
        let body = br#"{"Response":{"RequestId":"r3","TotalCount":0,"ZoneSet":[],
            "Error":{"Code":"InternalError","Message":"oops"}}}"#;
        let result = decode_response::<DescribeZonesResponse>(200, body);
        assert!(matches!(result, Err(CvmError::Service { .. })));
    }

    #[test]
    fn empty_error_code_is_not_an_error() {
        let body = br#"{"Response":{"RequestId":"r4","ZoneSet":[],"Error":{"Code":"","Message":""}}}"#;
        let resp: DescribeZonesResponse = decode_response(200, body).unwrap();
        assert_eq!(resp.request_id, "r4");
    }

    #[test]
    fn non_2xx_unparseable_is_transport() {
        let err = decode_response::<DescribeZonesResponse>(502, b"Bad Gateway").unwrap_err();
        match err {
            CvmError::Transport { status, message } => {
                assert_eq!(status, Some(502));
                assert!(message.contains("Bad Gateway"));
            }
            other => panic!("expected Transport, got: {:?}", other),
        }
    }

    #[test]
    fn service_error_on_non_2xx_status() {
        // Some errors arrive with a non-200 status but a decodable body;
        // the decoded code still wins.
        let body = br#"{"Response":{"RequestId":"r5","Error":{
            "Code":"RequestLimitExceeded","Message":"rate limited"}}}"#;
        let err = decode_response::<DescribeZonesResponse>(429, body).unwrap_err();
        assert_eq!(err.code(), Some("RequestLimitExceeded"));
        assert_eq!(err.request_id(), Some("r5"));
    }

    #[test]
    fn ok_status_unparseable_is_deserialize() {
        let err = decode_response::<DescribeZonesResponse>(200, b"not json").unwrap_err();
        assert!(matches!(err, CvmError::Deserialize(_)));
    }
}
