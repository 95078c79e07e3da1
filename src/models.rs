//! Typed request and response schemas for a representative set of CVM
//! actions. Request keys serialize in PascalCase with absent optionals
//! omitted; adding an action means declaring its two structs and one
//! `impl_action!` line.

use serde::{Deserialize, Serialize};

use crate::request::ServiceRequest;

macro_rules! impl_action {
    ($req:ty, $action:literal) => {
        impl ServiceRequest for $req {
            const ACTION: &'static str = $action;
        }
    };
}

// ---------------------------------------------------------------- shared

/// Key-value filter used by the Describe* family.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Filter {
    pub name: String,
    pub values: Vec<String>,
}

/// Location of an instance: zone plus optional project and dedicated host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Placement {
    pub zone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_id: Option<String>,
}

/// Billed price for a resource.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemPrice {
    pub unit_price: Option<f64>,
    pub charge_unit: Option<String>,
    pub original_price: Option<f64>,
    pub discount_price: Option<f64>,
}

// --------------------------------------------------------------- regions

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeRegionsRequest {}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegionInfo {
    pub region: Option<String>,
    pub region_name: Option<String>,
    pub region_state: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeRegionsResponse {
    pub request_id: String,
    pub total_count: Option<i64>,
    pub region_set: Option<Vec<RegionInfo>>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeZonesRequest {}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Zone {
    pub zone: Option<String>,
    pub zone_name: Option<String>,
    pub zone_id: Option<String>,
    pub zone_state: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeZonesResponse {
    pub request_id: String,
    pub total_count: Option<i64>,
    pub zone_set: Option<Vec<Zone>>,
}

// ------------------------------------------------------------- instances

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeInstancesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<Filter>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Instance {
    pub instance_id: Option<String>,
    pub instance_name: Option<String>,
    pub instance_state: Option<String>,
    pub instance_type: Option<String>,
    pub placement: Option<Placement>,
    #[serde(rename = "CPU")]
    pub cpu: Option<i64>,
    pub memory: Option<i64>,
    pub image_id: Option<String>,
    pub private_ip_addresses: Option<Vec<String>>,
    pub public_ip_addresses: Option<Vec<String>>,
    pub created_time: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeInstancesResponse {
    pub request_id: String,
    pub total_count: Option<i64>,
    pub instance_set: Option<Vec<Instance>>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RunInstancesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placement: Option<Placement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_group_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dry_run: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RunInstancesResponse {
    pub request_id: String,
    pub instance_id_set: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StartInstancesRequest {
    pub instance_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StartInstancesResponse {
    pub request_id: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StopInstancesRequest {
    pub instance_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stopped_mode: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StopInstancesResponse {
    pub request_id: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RebootInstancesRequest {
    pub instance_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RebootInstancesResponse {
    pub request_id: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TerminateInstancesRequest {
    pub instance_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TerminateInstancesResponse {
    pub request_id: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResetInstancesTypeRequest {
    pub instance_ids: Vec<String>,
    pub instance_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_stop: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResetInstancesTypeResponse {
    pub request_id: String,
}

// ---------------------------------------------------------------- images

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeImagesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<Filter>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Image {
    pub image_id: Option<String>,
    pub image_name: Option<String>,
    pub image_state: Option<String>,
    pub image_type: Option<String>,
    pub image_size: Option<i64>,
    pub os_name: Option<String>,
    pub created_time: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeImagesResponse {
    pub request_id: String,
    pub total_count: Option<i64>,
    pub image_set: Option<Vec<Image>>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateImageRequest {
    pub instance_id: String,
    pub image_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_poweroff: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateImageResponse {
    pub request_id: String,
    pub image_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteImagesRequest {
    pub image_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_binded_snap: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteImagesResponse {
    pub request_id: String,
}

// ------------------------------------------------------------- key pairs

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeyPair {
    pub key_id: Option<String>,
    pub key_name: Option<String>,
    pub public_key: Option<String>,
    /// Only returned by CreateKeyPair, never by Describe.
    pub private_key: Option<String>,
    pub created_time: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeKeyPairsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<Filter>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeKeyPairsResponse {
    pub request_id: String,
    pub total_count: Option<i64>,
    pub key_pair_set: Option<Vec<KeyPair>>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateKeyPairRequest {
    pub key_name: String,
    pub project_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateKeyPairResponse {
    pub request_id: String,
    pub key_pair: Option<KeyPair>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteKeyPairsRequest {
    pub key_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteKeyPairsResponse {
    pub request_id: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AssociateInstancesKeyPairsRequest {
    pub key_ids: Vec<String>,
    pub instance_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_reboot: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AssociateInstancesKeyPairsResponse {
    pub request_id: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DisassociateInstancesKeyPairsRequest {
    pub key_ids: Vec<String>,
    pub instance_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_reboot: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DisassociateInstancesKeyPairsResponse {
    pub request_id: String,
}

// ----------------------------------------------------- dedicated hosts

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeHostsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<Filter>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HostItem {
    pub host_id: Option<String>,
    pub host_name: Option<String>,
    pub host_type: Option<String>,
    pub host_state: Option<String>,
    pub placement: Option<Placement>,
    pub created_time: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeHostsResponse {
    pub request_id: String,
    pub total_count: Option<i64>,
    pub host_set: Option<Vec<HostItem>>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AllocateHostsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placement: Option<Placement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_count: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AllocateHostsResponse {
    pub request_id: String,
    pub host_id_set: Option<Vec<String>>,
}

// ---------------------------------------------------------- reservations

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeReservedInstancesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<Filter>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReservedInstance {
    pub reserved_instances_id: Option<String>,
    pub instance_type: Option<String>,
    pub zone: Option<String>,
    pub state: Option<String>,
    pub instance_count: Option<i64>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeReservedInstancesResponse {
    pub request_id: String,
    pub total_count: Option<i64>,
    pub reserved_instances_set: Option<Vec<ReservedInstance>>,
}

// ------------------------------------------------------ launch templates

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeLaunchTemplatesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch_template_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<Filter>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LaunchTemplateInfo {
    pub launch_template_id: Option<String>,
    pub launch_template_name: Option<String>,
    pub default_version_number: Option<i64>,
    pub latest_version_number: Option<i64>,
    pub created_by: Option<String>,
    pub creation_time: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeLaunchTemplatesResponse {
    pub request_id: String,
    pub total_count: Option<i64>,
    pub launch_template_set: Option<Vec<LaunchTemplateInfo>>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteLaunchTemplateRequest {
    pub launch_template_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteLaunchTemplateResponse {
    pub request_id: String,
}

// ------------------------------------------------------ placement groups

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateDisasterRecoverGroupRequest {
    pub name: String,
    /// Group strategy: `HOST`, `SW` or `RACK`.
    pub r#type: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateDisasterRecoverGroupResponse {
    pub request_id: String,
    pub disaster_recover_group_id: Option<String>,
    pub name: Option<String>,
    pub r#type: Option<String>,
    pub cvm_quota_total: Option<i64>,
    pub current_num: Option<i64>,
    pub create_time: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeDisasterRecoverGroupsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disaster_recover_group_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DisasterRecoverGroup {
    pub disaster_recover_group_id: Option<String>,
    pub name: Option<String>,
    pub r#type: Option<String>,
    pub cvm_quota_total: Option<i64>,
    pub current_num: Option<i64>,
    pub instance_ids: Option<Vec<String>>,
    pub create_time: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeDisasterRecoverGroupsResponse {
    pub request_id: String,
    pub total_count: Option<i64>,
    pub disaster_recover_group_set: Option<Vec<DisasterRecoverGroup>>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteDisasterRecoverGroupRequest {
    pub disaster_recover_group_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteDisasterRecoverGroupResponse {
    pub request_id: String,
}

// --------------------------------------------------------------- pricing

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InquiryPriceRunInstancesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placement: Option<Placement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_count: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Price {
    pub instance_price: Option<ItemPrice>,
    pub bandwidth_price: Option<ItemPrice>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InquiryPriceRunInstancesResponse {
    pub request_id: String,
    pub price: Option<Price>,
}

impl_action!(DescribeRegionsRequest, "DescribeRegions");
impl_action!(DescribeZonesRequest, "DescribeZones");
impl_action!(DescribeInstancesRequest, "DescribeInstances");
impl_action!(RunInstancesRequest, "RunInstances");
impl_action!(StartInstancesRequest, "StartInstances");
impl_action!(StopInstancesRequest, "StopInstances");
impl_action!(RebootInstancesRequest, "RebootInstances");
impl_action!(TerminateInstancesRequest, "TerminateInstances");
impl_action!(ResetInstancesTypeRequest, "ResetInstancesType");
impl_action!(DescribeImagesRequest, "DescribeImages");
impl_action!(CreateImageRequest, "CreateImage");
impl_action!(DeleteImagesRequest, "DeleteImages");
impl_action!(DescribeKeyPairsRequest, "DescribeKeyPairs");
impl_action!(CreateKeyPairRequest, "CreateKeyPair");
impl_action!(DeleteKeyPairsRequest, "DeleteKeyPairs");
impl_action!(
    AssociateInstancesKeyPairsRequest,
    "AssociateInstancesKeyPairs"
);
impl_action!(
    DisassociateInstancesKeyPairsRequest,
    "DisassociateInstancesKeyPairs"
);
impl_action!(DescribeHostsRequest, "DescribeHosts");
impl_action!(AllocateHostsRequest, "AllocateHosts");
impl_action!(DescribeReservedInstancesRequest, "DescribeReservedInstances");
impl_action!(DescribeLaunchTemplatesRequest, "DescribeLaunchTemplates");
impl_action!(DeleteLaunchTemplateRequest, "DeleteLaunchTemplate");
impl_action!(
    CreateDisasterRecoverGroupRequest,
    "CreateDisasterRecoverGroup"
);
impl_action!(
    DescribeDisasterRecoverGroupsRequest,
    "DescribeDisasterRecoverGroups"
);
impl_action!(
    DeleteDisasterRecoverGroupRequest,
    "DeleteDisasterRecoverGroup"
);
impl_action!(InquiryPriceRunInstancesRequest, "InquiryPriceRunInstances");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_pascal_case_omitting_absent() {
        let req = DescribeInstancesRequest {
            instance_ids: Some(vec!["ins-1".into()]),
            limit: Some(20),
            ..Default::default()
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["InstanceIds"][0], "ins-1");
        assert_eq!(json["Limit"], 20);
        assert!(json.get("Filters").is_none());
        assert!(json.get("Offset").is_none());
    }

    #[test]
    fn empty_request_serializes_to_empty_object() {
        let json = serde_json::to_string(&DescribeZonesRequest::default()).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn type_keyword_field_round_trips() {
        let req = CreateDisasterRecoverGroupRequest {
            name: "dr-1".into(),
            r#type: "HOST".into(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["Type"], "HOST");
    }

    #[test]
    fn instance_deserializes_cpu_rename() {
        let json = r#"{"InstanceId":"ins-1","CPU":4,"Memory":8}"#;
        let instance: Instance = serde_json::from_str(json).unwrap();
        assert_eq!(instance.cpu, Some(4));
        assert_eq!(instance.memory, Some(8));
    }

    #[test]
    fn action_constants() {
        assert_eq!(DescribeInstancesRequest::ACTION, "DescribeInstances");
        assert_eq!(RunInstancesRequest::ACTION, "RunInstances");
        assert_eq!(
            AssociateInstancesKeyPairsRequest::ACTION,
            "AssociateInstancesKeyPairs"
        );
    }
}
