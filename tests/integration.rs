use mockito::{Matcher, Server};
use rs_tc_cvm::{
    AssociateInstancesKeyPairsRequest, Client, ClientProfile, Credential, CvmError,
    DescribeInstancesRequest, DescribeZonesRequest, HttpMethod, RetryPolicy, RunInstancesRequest,
    Scheme, SignMethod, TerminateInstancesRequest,
};

fn test_credential() -> Credential {
    Credential::new(
        "AKIDz8krbsJ5yKBZQpn74WFkmLPx3EXAMPLE",
        "Gu5t9xGARNpq86cd98joQYCN3EXAMPLE",
    )
}

/// Points the client at a mockito server. mockito serves plain HTTP, so
/// the scheme is downgraded and the host:port used as the endpoint.
fn profile_for(server: &Server) -> ClientProfile {
    let host = server
        .url()
        .strip_prefix("http://")
        .expect("mockito serves http")
        .to_string();
    ClientProfile::default()
        .with_scheme(Scheme::Http)
        .with_endpoint(host)
        .with_retry(RetryPolicy::no_retry())
}

fn test_client(server: &Server) -> Client {
    Client::builder("ap-guangzhou")
        .credential(test_credential())
        .profile(profile_for(server))
        .build()
        .expect("failed to build client")
}

#[tokio::test]
async fn describe_zones_success() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/")
        .match_header("Content-Type", "application/json")
        .match_header("X-TC-Action", "DescribeZones")
        .match_header("X-TC-Version", "2017-03-12")
        .match_header("X-TC-Region", "ap-guangzhou")
        .match_header(
            "Authorization",
            Matcher::Regex(
                r"^TC3-HMAC-SHA256 Credential=AKIDz8krbsJ5yKBZQpn74WFkmLPx3EXAMPLE/\d{4}-\d{2}-\d{2}/cvm/tc3_request, SignedHeaders=content-type;host, Signature=[0-9a-f]{64}$".into(),
            ),
        )
        .match_body("{}")
        .with_status(200)
        .with_header("Content-Type", "application/json")
        .with_body(r#"{"Response":{"RequestId":"r1","ZoneSet":[]}}"#)
        .create_async()
        .await;

    let client = test_client(&server);
    let resp = client
        .describe_zones(DescribeZonesRequest::default())
        .await
        .expect("describe_zones should succeed");

    assert_eq!(resp.request_id, "r1");
    assert_eq!(resp.zone_set.unwrap().len(), 0);

    mock.assert_async().await;
}

#[tokio::test]
async fn service_error_passthrough() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/")
        .match_header("X-TC-Action", "AssociateInstancesKeyPairs")
        .with_status(200)
        .with_header("Content-Type", "application/json")
        .with_body(
            r#"{"Response":{"RequestId":"r2","Error":{
                "Code":"InvalidInstanceId.NotFound",
                "Message":"The instance `ins-missing` does not exist."}}}"#,
        )
        .create_async()
        .await;

    let client = test_client(&server);
    let err = client
        .associate_instances_key_pairs(AssociateInstancesKeyPairsRequest {
            key_ids: vec!["skey-1".into()],
            instance_ids: vec!["ins-missing".into()],
            force_reboot: None,
        })
        .await
        .unwrap_err();

    match err {
        CvmError::Service {
            code, request_id, ..
        } => {
            assert_eq!(code, "InvalidInstanceId.NotFound");
            assert_eq!(request_id, "r2");
        }
        other => panic!("expected Service, got: {:?}", other),
    }

    mock.assert_async().await;
}

#[tokio::test]
async fn missing_credential_opens_no_socket() {
    let mut server = Server::new_async().await;

    // A spy mock that must never be hit.
    let mock = server.mock("POST", "/").expect(0).create_async().await;

    let client = Client::builder("ap-guangzhou")
        .profile(profile_for(&server))
        .build()
        .unwrap();
    let err = client
        .run_instances(RunInstancesRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CvmError::MissingCredential(_)));

    mock.assert_async().await;
}

#[tokio::test]
async fn session_token_sent_as_header() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/")
        .match_header("X-TC-Token", "tok")
        .with_status(200)
        .with_header("Content-Type", "application/json")
        .with_body(r#"{"Response":{"RequestId":"r6","ZoneSet":[]}}"#)
        .create_async()
        .await;

    let client = Client::builder("ap-guangzhou")
        .credential(test_credential().with_token("tok"))
        .profile(profile_for(&server))
        .build()
        .unwrap();
    let resp = client
        .describe_zones(DescribeZonesRequest::default())
        .await
        .expect("describe_zones should succeed");
    assert_eq!(resp.request_id, "r6");

    mock.assert_async().await;
}

#[tokio::test]
async fn retry_exhaustion_hits_transport_exactly_max_attempts() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/")
        .with_status(500)
        .with_body("internal failure")
        .expect(3)
        .create_async()
        .await;

    let profile = profile_for(&server).with_retry(RetryPolicy {
        max_attempts: 3,
        base_delay: std::time::Duration::from_millis(1),
        max_delay: std::time::Duration::from_millis(5),
    });
    let client = Client::builder("ap-guangzhou")
        .credential(test_credential())
        .profile(profile)
        .build()
        .unwrap();

    let err = client
        .describe_instances(DescribeInstancesRequest::default())
        .await
        .unwrap_err();
    match err {
        CvmError::Transport { status, .. } => assert_eq!(status, Some(500)),
        other => panic!("expected Transport, got: {:?}", other),
    }

    mock.assert_async().await;
}

#[tokio::test]
async fn retryable_service_code_retried_until_exhaustion() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/")
        .with_status(200)
        .with_header("Content-Type", "application/json")
        .with_body(
            r#"{"Response":{"RequestId":"r-limit","Error":{
                "Code":"RequestLimitExceeded","Message":"rate limited"}}}"#,
        )
        .expect(2)
        .create_async()
        .await;

    let profile = profile_for(&server).with_retry(RetryPolicy {
        max_attempts: 2,
        base_delay: std::time::Duration::from_millis(1),
        max_delay: std::time::Duration::from_millis(5),
    });
    let client = Client::builder("ap-guangzhou")
        .credential(test_credential())
        .profile(profile)
        .build()
        .unwrap();

    let err = client
        .describe_instances(DescribeInstancesRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some("RequestLimitExceeded"));

    mock.assert_async().await;
}

#[tokio::test]
async fn non_retryable_error_hits_once() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/")
        .with_status(200)
        .with_header("Content-Type", "application/json")
        .with_body(
            r#"{"Response":{"RequestId":"r-bad","Error":{
                "Code":"InvalidParameterValue.LimitExceeded","Message":"limit too large"}}}"#,
        )
        .expect(1)
        .create_async()
        .await;

    let profile = profile_for(&server).with_retry(RetryPolicy {
        max_attempts: 3,
        base_delay: std::time::Duration::from_millis(1),
        max_delay: std::time::Duration::from_millis(5),
    });
    let client = Client::builder("ap-guangzhou")
        .credential(test_credential())
        .profile(profile)
        .build()
        .unwrap();

    let err = client
        .describe_instances(DescribeInstancesRequest {
            limit: Some(10_000),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some("InvalidParameterValue.LimitExceeded"));

    mock.assert_async().await;
}

#[tokio::test]
async fn mutating_action_never_retries_a_response() {
    let mut server = Server::new_async().await;

    // 500 on a TerminateInstances response: ambiguous, must not re-send.
    let mock = server
        .mock("POST", "/")
        .with_status(500)
        .with_body("boom")
        .expect(1)
        .create_async()
        .await;

    let profile = profile_for(&server).with_retry(RetryPolicy {
        max_attempts: 3,
        base_delay: std::time::Duration::from_millis(1),
        max_delay: std::time::Duration::from_millis(5),
    });
    let client = Client::builder("ap-guangzhou")
        .credential(test_credential())
        .profile(profile)
        .build()
        .unwrap();

    let err = client
        .terminate_instances(TerminateInstancesRequest {
            instance_ids: vec!["ins-1".into()],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CvmError::Transport { status: Some(500), .. }));

    mock.assert_async().await;
}

#[tokio::test]
async fn v1_post_sends_form_body() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/")
        .match_header("Content-Type", "application/x-www-form-urlencoded")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("Action".into(), "DescribeZones".into()),
            Matcher::UrlEncoded("Version".into(), "2017-03-12".into()),
            Matcher::UrlEncoded("Region".into(), "ap-guangzhou".into()),
            Matcher::UrlEncoded("SignatureMethod".into(), "HmacSHA1".into()),
            Matcher::Regex("Signature=".into()),
        ]))
        .with_status(200)
        .with_header("Content-Type", "application/json")
        .with_body(r#"{"Response":{"RequestId":"r-v1","ZoneSet":[]}}"#)
        .create_async()
        .await;

    let profile = profile_for(&server).with_sign_method(SignMethod::HmacSha1);
    let client = Client::builder("ap-guangzhou")
        .credential(test_credential())
        .profile(profile)
        .build()
        .unwrap();

    let resp = client
        .describe_zones(DescribeZonesRequest::default())
        .await
        .expect("v1 describe_zones should succeed");
    assert_eq!(resp.request_id, "r-v1");

    mock.assert_async().await;
}

#[tokio::test]
async fn v1_get_sends_query_params() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/")
        .match_query(Matcher::UrlEncoded("Action".into(), "DescribeZones".into()))
        .with_status(200)
        .with_header("Content-Type", "application/json")
        .with_body(r#"{"Response":{"RequestId":"r-v1get","ZoneSet":[]}}"#)
        .create_async()
        .await;

    let profile = profile_for(&server)
        .with_sign_method(SignMethod::HmacSha1)
        .with_method(HttpMethod::Get);
    let client = Client::builder("ap-guangzhou")
        .credential(test_credential())
        .profile(profile)
        .build()
        .unwrap();

    let resp = client
        .describe_zones(DescribeZonesRequest::default())
        .await
        .expect("v1 GET describe_zones should succeed");
    assert_eq!(resp.request_id, "r-v1get");

    mock.assert_async().await;
}

#[tokio::test]
async fn concurrent_calls_share_one_client() {
    use std::sync::Arc;
    use tokio::task::JoinSet;

    let mut server = Server::new_async().await;
    server
        .mock("POST", "/")
        .with_status(200)
        .with_header("Content-Type", "application/json")
        .with_body(r#"{"Response":{"RequestId":"r-conc","TotalCount":0,"InstanceSet":[]}}"#)
        .expect(5)
        .create_async()
        .await;

    let client = Arc::new(test_client(&server));
    let mut tasks = JoinSet::new();
    for _ in 0..5 {
        let client = Arc::clone(&client);
        tasks.spawn(async move {
            client
                .describe_instances(DescribeInstancesRequest::default())
                .await
        });
    }

    let mut success_count = 0;
    while let Some(result) = tasks.join_next().await {
        if result.unwrap().is_ok() {
            success_count += 1;
        }
    }
    assert_eq!(success_count, 5);
}
