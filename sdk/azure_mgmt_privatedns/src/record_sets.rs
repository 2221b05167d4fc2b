//! Record sets of a private zone.
//!
//! Record sets are written synchronously; none of these operations return a
//! poller. The `SOA` record set is created with the zone and can be updated
//! but not created or deleted.

use azure_mgmt_core::client::ArmClient;
use azure_mgmt_core::error::ArmResult;
use azure_mgmt_core::pager::Pager;
use azure_mgmt_core::request::ArmRequest;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::models::{
    with_if_match, with_preconditions, CreateOrUpdateOptions, IfMatchOptions,
    RecordSetListOptions, API_VERSION,
};

const RECORD_SET_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Network/privateDnsZones/{privateZoneName}/{recordType}/{relativeRecordSetName}";
const RECORD_TYPE_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Network/privateDnsZones/{privateZoneName}/{recordType}";
const ALL_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Network/privateDnsZones/{privateZoneName}/ALL";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// DNS record types supported by private zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
    Aaaa,
    Cname,
    Mx,
    Ptr,
    Soa,
    Srv,
    Txt,
}

impl RecordType {
    /// The path segment of the record type, e.g. `AAAA`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Mx => "MX",
            Self::Ptr => "PTR",
            Self::Soa => "SOA",
            Self::Srv => "SRV",
            Self::Txt => "TXT",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ARecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4_address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AaaaRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CnameRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cname: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MxRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preference: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PtrRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ptrdname: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoaRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<i64>,
    /// Seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_ttl: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SrvRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TxtRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Vec<String>>,
}

/// Records of a record set. Only the list matching the set's type is used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSetProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<i64>,
    /// Read-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fqdn: Option<String>,
    /// Read-only. `true` for records registered by a linked virtual network.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_auto_registered: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a_records: Option<Vec<ARecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aaaa_records: Option<Vec<AaaaRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cname_record: Option<CnameRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mx_records: Option<Vec<MxRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ptr_records: Option<Vec<PtrRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soa_record: Option<SoaRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub srv_records: Option<Vec<SrvRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txt_records: Option<Vec<TxtRecord>>,
}

/// A record set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<RecordSetProperties>,
}

impl RecordSet {
    /// An A record set with the given TTL and IPv4 addresses.
    pub fn a(ttl: i64, addresses: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let records = addresses
            .into_iter()
            .map(|a| ARecord {
                ipv4_address: Some(a.into()),
            })
            .collect();
        Self::with_properties(RecordSetProperties {
            ttl: Some(ttl),
            a_records: Some(records),
            ..Default::default()
        })
    }

    /// A CNAME record set pointing at `cname`.
    pub fn cname(ttl: i64, cname: impl Into<String>) -> Self {
        Self::with_properties(RecordSetProperties {
            ttl: Some(ttl),
            cname_record: Some(CnameRecord {
                cname: Some(cname.into()),
            }),
            ..Default::default()
        })
    }

    /// A record set with arbitrary properties.
    pub fn with_properties(properties: RecordSetProperties) -> Self {
        Self {
            properties: Some(properties),
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------
// API functions
// ---------------------------------------------------------------------------

fn record_set_url(
    client: &ArmClient,
    resource_group_name: &str,
    private_zone_name: &str,
    record_type: RecordType,
    relative_record_set_name: &str,
) -> ArmResult<url::Url> {
    client
        .path(RECORD_SET_PATH)
        .subscription()?
        .param("resourceGroupName", resource_group_name)?
        .param("privateZoneName", private_zone_name)?
        .param("recordType", record_type.as_str())?
        .param("relativeRecordSetName", relative_record_set_name)?
        .into_url(API_VERSION)
}

fn list_request(url: url::Url, options: Option<&RecordSetListOptions>) -> ArmRequest {
    ArmRequest::get(url)
        .query_opt("$top", options.and_then(|o| o.top))
        .query_opt(
            "$recordsetnamesuffix",
            options.and_then(|o| o.record_set_name_suffix.as_deref()),
        )
}

/// Create or replace a record set. `@` names the zone apex.
///
/// # Example
///
/// ```rust,no_run
/// # use azure_mgmt_core::client::ArmClient;
/// # use azure_mgmt_privatedns::record_sets::{self, RecordSet, RecordType};
/// # async fn example(client: &ArmClient) -> azure_mgmt_core::ArmResult<()> {
/// let record_set = record_sets::create_or_update(
///     client,
///     "my-rg",
///     "privatezone1.com",
///     RecordType::A,
///     "www",
///     &RecordSet::a(3600, ["10.0.0.4"]),
///     None,
/// )
/// .await?;
/// println!("{:?}", record_set.properties.and_then(|p| p.fqdn));
/// # Ok(())
/// # }
/// ```
#[tracing::instrument(
    name = "arm::privatedns::record_sets::create_or_update",
    skip(client, parameters, options),
    fields(zone = %private_zone_name, record_type = %record_type, record_set = %relative_record_set_name)
)]
pub async fn create_or_update(
    client: &ArmClient,
    resource_group_name: &str,
    private_zone_name: &str,
    record_type: RecordType,
    relative_record_set_name: &str,
    parameters: &RecordSet,
    options: Option<&CreateOrUpdateOptions>,
) -> ArmResult<RecordSet> {
    tracing::debug!("writing record set");

    let url = record_set_url(
        client,
        resource_group_name,
        private_zone_name,
        record_type,
        relative_record_set_name,
    )?;
    let request = with_preconditions(ArmRequest::put(url).json(parameters)?, options)?;
    client.send_json(&request, &[200, 201]).await
}

/// Update a record set. Absent properties keep their current value.
#[tracing::instrument(
    name = "arm::privatedns::record_sets::update",
    skip(client, parameters, options),
    fields(zone = %private_zone_name, record_type = %record_type, record_set = %relative_record_set_name)
)]
pub async fn update(
    client: &ArmClient,
    resource_group_name: &str,
    private_zone_name: &str,
    record_type: RecordType,
    relative_record_set_name: &str,
    parameters: &RecordSet,
    options: Option<&IfMatchOptions>,
) -> ArmResult<RecordSet> {
    tracing::debug!("updating record set");

    let url = record_set_url(
        client,
        resource_group_name,
        private_zone_name,
        record_type,
        relative_record_set_name,
    )?;
    let request = with_if_match(ArmRequest::patch(url).json(parameters)?, options)?;
    client.send_json(&request, &[200]).await
}

/// Delete a record set.
#[tracing::instrument(
    name = "arm::privatedns::record_sets::delete",
    skip(client, options),
    fields(zone = %private_zone_name, record_type = %record_type, record_set = %relative_record_set_name)
)]
pub async fn delete(
    client: &ArmClient,
    resource_group_name: &str,
    private_zone_name: &str,
    record_type: RecordType,
    relative_record_set_name: &str,
    options: Option<&IfMatchOptions>,
) -> ArmResult<()> {
    tracing::debug!("deleting record set");

    let url = record_set_url(
        client,
        resource_group_name,
        private_zone_name,
        record_type,
        relative_record_set_name,
    )?;
    let request = with_if_match(ArmRequest::delete(url), options)?;
    client.send(&request, &[200, 204]).await?;
    Ok(())
}

/// Get a record set.
#[tracing::instrument(
    name = "arm::privatedns::record_sets::get",
    skip(client),
    fields(zone = %private_zone_name, record_type = %record_type, record_set = %relative_record_set_name)
)]
pub async fn get(
    client: &ArmClient,
    resource_group_name: &str,
    private_zone_name: &str,
    record_type: RecordType,
    relative_record_set_name: &str,
) -> ArmResult<RecordSet> {
    tracing::debug!("getting record set");

    let url = record_set_url(
        client,
        resource_group_name,
        private_zone_name,
        record_type,
        relative_record_set_name,
    )?;
    client.send_json(&ArmRequest::get(url), &[200]).await
}

/// List the record sets of one type in a zone.
#[tracing::instrument(
    name = "arm::privatedns::record_sets::list_by_type",
    skip(client, options),
    fields(zone = %private_zone_name, record_type = %record_type)
)]
pub fn list_by_type(
    client: &ArmClient,
    resource_group_name: &str,
    private_zone_name: &str,
    record_type: RecordType,
    options: Option<&RecordSetListOptions>,
) -> ArmResult<Pager<RecordSet>> {
    let url = client
        .path(RECORD_TYPE_PATH)
        .subscription()?
        .param("resourceGroupName", resource_group_name)?
        .param("privateZoneName", private_zone_name)?
        .param("recordType", record_type.as_str())?
        .into_url(API_VERSION)?;
    Ok(Pager::new(client, list_request(url, options)))
}

/// List every record set in a zone.
#[tracing::instrument(
    name = "arm::privatedns::record_sets::list",
    skip(client, options),
    fields(zone = %private_zone_name)
)]
pub fn list(
    client: &ArmClient,
    resource_group_name: &str,
    private_zone_name: &str,
    options: Option<&RecordSetListOptions>,
) -> ArmResult<Pager<RecordSet>> {
    let url = client
        .path(ALL_PATH)
        .subscription()?
        .param("resourceGroupName", resource_group_name)?
        .param("privateZoneName", private_zone_name)?
        .into_url(API_VERSION)?;
    Ok(Pager::new(client, list_request(url, options)))
}
