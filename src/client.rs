use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::context::CallContext;
use crate::credential::{ChainProvider, Credential, CredentialProvider, StaticProvider};
use crate::error::{CvmError, Result};
use crate::models::*;
use crate::profile::ClientProfile;
use crate::request::{ServiceRequest, build_wire_request};
use crate::response::decode_response;
use crate::{retry, transport};

/// Service name stamped on every call.
pub const SERVICE: &str = "cvm";
/// API version stamped on every call.
pub const API_VERSION: &str = "2017-03-12";

const ROOT_DOMAIN: &str = "tencentcloudapi.com";

/// Async client for the Tencent Cloud CVM API.
///
/// Immutable after construction; one instance is safe for concurrent use
/// from many tasks. Every call runs the same pipeline: credential fetch →
/// sign → send → decode, with retries under the profile's policy.
pub struct Client {
    http: reqwest::Client,
    provider: Option<Arc<dyn CredentialProvider>>,
    region: String,
    profile: ClientProfile,
    host: String,
}

/// Builds a [`Client`]. A client built without a credential fails every
/// call with `MissingCredential` before touching the network.
pub struct ClientBuilder {
    region: String,
    profile: ClientProfile,
    provider: Option<Arc<dyn CredentialProvider>>,
}

impl ClientBuilder {
    /// Binds a fixed credential.
    pub fn credential(mut self, credential: Credential) -> Self {
        self.provider = Some(Arc::new(StaticProvider::new(credential)));
        self
    }

    /// Binds a dynamic credential provider.
    pub fn provider(mut self, provider: Arc<dyn CredentialProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn profile(mut self, profile: ClientProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn build(self) -> Result<Client> {
        let host = match &self.profile.endpoint {
            Some(endpoint) => endpoint.clone(),
            None if self.profile.regional_endpoint && !self.region.is_empty() => {
                format!("{}.{}.{}", SERVICE, self.region, ROOT_DOMAIN)
            }
            None => format!("{}.{}", SERVICE, ROOT_DOMAIN),
        };
        let http = transport::build_http_client(&self.profile)?;
        Ok(Client {
            http,
            provider: self.provider,
            region: self.region,
            profile: self.profile,
            host,
        })
    }
}

impl Client {
    /// Starts building a client for the given region.
    pub fn builder(region: impl Into<String>) -> ClientBuilder {
        ClientBuilder {
            region: region.into(),
            profile: ClientProfile::default(),
            provider: None,
        }
    }

    /// Creates a client with an explicit credential and default profile.
    pub fn new(credential: Credential, region: impl Into<String>) -> Result<Self> {
        Self::builder(region).credential(credential).build()
    }

    /// Creates a client using the default credential chain (env vars →
    /// profile file).
    pub fn from_env(region: impl Into<String>) -> Result<Self> {
        Self::builder(region)
            .provider(Arc::new(ChainProvider::default_chain()))
            .build()
    }

    /// Returns the endpoint host calls are sent to.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the region bound at construction.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Invokes `Q::ACTION` with a background context.
    pub async fn call<Q, T>(&self, request: &Q) -> Result<T>
    where
        Q: ServiceRequest,
        T: DeserializeOwned,
    {
        self.call_ctx(&CallContext::background(), request).await
    }

    /// Invokes `Q::ACTION` under the caller's cancellation and deadline.
    pub async fn call_ctx<Q, T>(&self, ctx: &CallContext, request: &Q) -> Result<T>
    where
        Q: ServiceRequest,
        T: DeserializeOwned,
    {
        let provider = self.provider.as_ref().ok_or_else(|| {
            CvmError::MissingCredential("no credential bound to client".into())
        })?;
        let payload = serde_json::to_value(request)?;
        ctx.guard(self.run_pipeline(provider.as_ref(), Q::ACTION, payload))
            .await
    }

    async fn run_pipeline<T: DeserializeOwned>(
        &self,
        provider: &dyn CredentialProvider,
        action: &str,
        payload: serde_json::Value,
    ) -> Result<T> {
        let idempotent = retry::is_idempotent_action(action);
        let max_attempts = self.profile.retry.max_attempts.max(1);
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            if attempt > 1 {
                let delay = retry::backoff_delay(&self.profile.retry, attempt - 1);
                debug!(action, attempt, ?delay, "backing off before retry");
                tokio::time::sleep(delay).await;
            }

            let credential = provider.get()?;
            credential.validate()?;

            // Each attempt is signed afresh; the timestamp below is both
            // signed and transmitted.
            let timestamp = chrono::Utc::now().timestamp();
            let wire = build_wire_request(
                action,
                API_VERSION,
                SERVICE,
                &payload,
                &credential,
                &self.region,
                &self.host,
                &self.profile,
                timestamp,
            )?;
            if self.profile.debug {
                debug!(
                    action,
                    url = %wire.url,
                    body = %String::from_utf8_lossy(&wire.body),
                    "sending request"
                );
            }

            match transport::round_trip(&self.http, wire).await {
                Err(err) => {
                    if attempt < max_attempts && retry::should_retry_transport(&err, idempotent) {
                        warn!(action, attempt, error = %err, "transport failure, retrying");
                        continue;
                    }
                    return Err(transport::map_transport_error(err));
                }
                Ok((status, body)) => {
                    if self.profile.debug {
                        debug!(
                            action,
                            status,
                            body = %String::from_utf8_lossy(&body),
                            "received response body"
                        );
                    }
                    match decode_response::<T>(status, &body) {
                        Err(err) if attempt < max_attempts && idempotent && err.is_retryable() => {
                            warn!(action, attempt, error = %err, "retryable failure, retrying");
                        }
                        other => return other,
                    }
                }
            }
        }
    }
}

/// Declares the two façade methods for one action: a context-less
/// convenience and a `_ctx` variant threading the caller's [`CallContext`].
macro_rules! actions {
    ($( $(#[$doc:meta])* $name:ident / $name_ctx:ident : $req:ty => $resp:ty; )*) => {
        impl Client {
            $(
                $(#[$doc])*
                pub async fn $name(&self, request: $req) -> Result<$resp> {
                    self.call(&request).await
                }

                $(#[$doc])*
                ///
                /// Runs under the caller's cancellation and deadline.
                pub async fn $name_ctx(
                    &self,
                    ctx: &CallContext,
                    request: $req,
                ) -> Result<$resp> {
                    self.call_ctx(ctx, &request).await
                }
            )*
        }
    };
}

actions! {
    /// Queries the regions the service is available in.
    describe_regions / describe_regions_ctx:
        DescribeRegionsRequest => DescribeRegionsResponse;

    /// Queries the availability zones of the current region.
    describe_zones / describe_zones_ctx:
        DescribeZonesRequest => DescribeZonesResponse;

    /// Queries instance details, filterable by id, zone or state.
    describe_instances / describe_instances_ctx:
        DescribeInstancesRequest => DescribeInstancesResponse;

    /// Launches one or more instances.
    run_instances / run_instances_ctx:
        RunInstancesRequest => RunInstancesResponse;

    /// Starts stopped instances.
    start_instances / start_instances_ctx:
        StartInstancesRequest => StartInstancesResponse;

    /// Stops running instances.
    stop_instances / stop_instances_ctx:
        StopInstancesRequest => StopInstancesResponse;

    /// Restarts running instances.
    reboot_instances / reboot_instances_ctx:
        RebootInstancesRequest => RebootInstancesResponse;

    /// Terminates instances; pay-as-you-go instances are released.
    terminate_instances / terminate_instances_ctx:
        TerminateInstancesRequest => TerminateInstancesResponse;

    /// Changes the hardware specification of instances.
    reset_instances_type / reset_instances_type_ctx:
        ResetInstancesTypeRequest => ResetInstancesTypeResponse;

    /// Queries available images.
    describe_images / describe_images_ctx:
        DescribeImagesRequest => DescribeImagesResponse;

    /// Creates a custom image from an instance.
    create_image / create_image_ctx:
        CreateImageRequest => CreateImageResponse;

    /// Deletes custom images.
    delete_images / delete_images_ctx:
        DeleteImagesRequest => DeleteImagesResponse;

    /// Queries SSH key pairs.
    describe_key_pairs / describe_key_pairs_ctx:
        DescribeKeyPairsRequest => DescribeKeyPairsResponse;

    /// Creates an SSH key pair; the private key is only returned here.
    create_key_pair / create_key_pair_ctx:
        CreateKeyPairRequest => CreateKeyPairResponse;

    /// Deletes SSH key pairs.
    delete_key_pairs / delete_key_pairs_ctx:
        DeleteKeyPairsRequest => DeleteKeyPairsResponse;

    /// Binds key pairs to instances.
    associate_instances_key_pairs / associate_instances_key_pairs_ctx:
        AssociateInstancesKeyPairsRequest => AssociateInstancesKeyPairsResponse;

    /// Unbinds key pairs from instances.
    disassociate_instances_key_pairs / disassociate_instances_key_pairs_ctx:
        DisassociateInstancesKeyPairsRequest => DisassociateInstancesKeyPairsResponse;

    /// Queries dedicated hosts.
    describe_hosts / describe_hosts_ctx:
        DescribeHostsRequest => DescribeHostsResponse;

    /// Allocates dedicated hosts.
    allocate_hosts / allocate_hosts_ctx:
        AllocateHostsRequest => AllocateHostsResponse;

    /// Queries reserved instances.
    describe_reserved_instances / describe_reserved_instances_ctx:
        DescribeReservedInstancesRequest => DescribeReservedInstancesResponse;

    /// Queries launch templates.
    describe_launch_templates / describe_launch_templates_ctx:
        DescribeLaunchTemplatesRequest => DescribeLaunchTemplatesResponse;

    /// Deletes a launch template and all its versions.
    delete_launch_template / delete_launch_template_ctx:
        DeleteLaunchTemplateRequest => DeleteLaunchTemplateResponse;

    /// Creates a spread placement group.
    create_disaster_recover_group / create_disaster_recover_group_ctx:
        CreateDisasterRecoverGroupRequest => CreateDisasterRecoverGroupResponse;

    /// Queries spread placement groups.
    describe_disaster_recover_groups / describe_disaster_recover_groups_ctx:
        DescribeDisasterRecoverGroupsRequest => DescribeDisasterRecoverGroupsResponse;

    /// Deletes an empty spread placement group.
    delete_disaster_recover_group / delete_disaster_recover_group_ctx:
        DeleteDisasterRecoverGroupRequest => DeleteDisasterRecoverGroupResponse;

    /// Quotes the price of launching instances without creating them.
    inquiry_price_run_instances / inquiry_price_run_instances_ctx:
        InquiryPriceRunInstancesRequest => InquiryPriceRunInstancesResponse;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_credential() -> Credential {
        Credential::new("test-id", "test-key")
    }

    #[test]
    fn default_endpoint() {
        let client = Client::new(test_credential(), "ap-guangzhou").unwrap();
        assert_eq!(client.host(), "cvm.tencentcloudapi.com");
        assert_eq!(client.region(), "ap-guangzhou");
    }

    #[test]
    fn regional_endpoint() {
        let client = Client::builder("ap-shanghai")
            .credential(test_credential())
            .profile(ClientProfile::default().with_regional_endpoint(true))
            .build()
            .unwrap();
        assert_eq!(client.host(), "cvm.ap-shanghai.tencentcloudapi.com");
    }

    #[test]
    fn endpoint_override_wins() {
        let client = Client::builder("ap-guangzhou")
            .credential(test_credential())
            .profile(
                ClientProfile::default()
                    .with_regional_endpoint(true)
                    .with_endpoint("cvm.internal.example.com"),
            )
            .build()
            .unwrap();
        assert_eq!(client.host(), "cvm.internal.example.com");
    }

    #[tokio::test]
    async fn missing_credential_fails_before_network() {
        let client = Client::builder("ap-guangzhou").build().unwrap();
        let err = client
            .run_instances(RunInstancesRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CvmError::MissingCredential(_)));
    }

    #[tokio::test]
    async fn empty_secret_id_fails_before_network() {
        let client = Client::new(Credential::new("", ""), "ap-guangzhou").unwrap();
        let err = client
            .describe_instances(DescribeInstancesRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CvmError::MissingCredential(_)));
    }
}
