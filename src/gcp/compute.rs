//! Compute Engine instance shapes
//!
//! Request and response bodies of the `instances` resource, limited to the
//! fields this crate translates. Lists keep the order the API gives them.

use crate::translate::presence::{FieldMask, ForceSend, Presence};
use serde::{Deserialize, Serialize};

/// Access config type the API accepts for external NAT
pub const ONE_TO_ONE_NAT: &str = "ONE_TO_ONE_NAT";

/// Compute instance (subset)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub zone: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub self_link: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub network_interfaces: Vec<NetworkInterface>,
    #[serde(default)]
    pub scheduling: Scheduling,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub service_accounts: Vec<ServiceAccount>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub guest_accelerators: Vec<AcceleratorConfig>,
    /// `None` leaves tags untouched; `Some` with no items clears them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
}

/// Scheduling options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scheduling {
    #[serde(default, skip_serializing_if = "Presence::is_omitted")]
    pub automatic_restart: Presence<bool>,
    #[serde(default, skip_serializing_if = "Presence::is_omitted")]
    pub preemptible: Presence<bool>,
    #[serde(default, skip_serializing_if = "Presence::is_omitted")]
    pub on_host_maintenance: Presence<String>,
    #[serde(default, skip_serializing_if = "Presence::is_omitted")]
    pub node_affinities: Presence<Vec<SchedulingNodeAffinity>>,
}

impl Scheduling {
    pub const AUTOMATIC_RESTART: &'static str = "automaticRestart";
    pub const PREEMPTIBLE: &'static str = "preemptible";
    pub const ON_HOST_MAINTENANCE: &'static str = "onHostMaintenance";
    pub const NODE_AFFINITIES: &'static str = "nodeAffinities";
}

impl ForceSend for Scheduling {
    fn force_send_fields(&self) -> FieldMask {
        let mut mask = FieldMask::new();
        mask.mark_if_explicit(Self::AUTOMATIC_RESTART, &self.automatic_restart);
        mask.mark_if_explicit(Self::PREEMPTIBLE, &self.preemptible);
        mask.mark_if_explicit(Self::ON_HOST_MAINTENANCE, &self.on_host_maintenance);
        mask.mark_if_explicit(Self::NODE_AFFINITIES, &self.node_affinities);
        mask
    }
}

/// Sole-tenant node affinity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingNodeAffinity {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub operator: String,
    #[serde(default)]
    pub values: Vec<String>,
}

/// Network interface
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterface {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub network: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub subnetwork: String,
    #[serde(rename = "networkIP", default, skip_serializing_if = "String::is_empty")]
    pub network_ip: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub access_configs: Vec<AccessConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alias_ip_ranges: Vec<AliasIpRange>,
}

/// External access configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessConfig {
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(rename = "natIP", default, skip_serializing_if = "String::is_empty")]
    pub nat_ip: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub network_tier: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub set_public_ptr: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub public_ptr_domain_name: String,
}

/// Alias IP range
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasIpRange {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ip_cidr_range: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub subnetwork_range_name: String,
}

/// Service account attached to the instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAccount {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub scopes: Vec<String>,
}

/// Guest accelerator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceleratorConfig {
    #[serde(default)]
    pub accelerator_count: i64,
    #[serde(default)]
    pub accelerator_type: String,
}

/// Network tags with their optimistic-concurrency fingerprint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tags {
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub fingerprint: String,
}
