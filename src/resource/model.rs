//! Declarative instance model
//!
//! What a user writes (and what a state store persists): typed, validated once
//! when it is read, with unordered collections held as canonical sets.

use crate::translate::set::{CanonicalSet, ScopeKey};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Declared instance configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceConfig {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub zone: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub network_interface: Vec<NetworkInterfaceConfig>,
    /// `None` when absent; `[null]` is kept so expand can reject it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduling: Option<Vec<Option<SchedulingConfig>>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub service_account: Vec<ServiceAccountConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub guest_accelerator: Vec<GuestAcceleratorConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<CanonicalSet<String>>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tags_fingerprint: String,
}

impl InstanceConfig {
    /// Parse YAML (or JSON, which YAML accepts)
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse instance configuration")
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse instance configuration")
    }

    /// Read a configuration file from disk; `.json` files are parsed strictly as JSON
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let parsed = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_yaml_str(&content),
        };
        parsed.with_context(|| format!("Invalid config in {}", path.display()))
    }
}

/// Scheduling block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub automatic_restart: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preemptible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_host_maintenance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_affinities: Option<CanonicalSet<NodeAffinityConfig>>,
}

/// Node affinity; a set member keyed by all three fields
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeAffinityConfig {
    pub key: String,
    pub operator: String,
    #[serde(default)]
    pub values: CanonicalSet<String>,
}

/// Network interface block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInterfaceConfig {
    /// Only present when the API assigned one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub network: String,
    #[serde(default)]
    pub subnetwork: String,
    #[serde(default)]
    pub subnetwork_project: String,
    #[serde(default)]
    pub network_ip: String,
    #[serde(default)]
    pub access_config: Vec<AccessConfigConfig>,
    #[serde(default)]
    pub alias_ip_range: Vec<AliasIpRangeConfig>,
}

/// External access block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessConfigConfig {
    #[serde(default)]
    pub nat_ip: String,
    #[serde(default)]
    pub network_tier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_ptr_domain_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasIpRangeConfig {
    pub ip_cidr_range: String,
    #[serde(default)]
    pub subnetwork_range_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceAccountConfig {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub scopes: CanonicalSet<String, ScopeKey>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestAcceleratorConfig {
    pub count: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Flattened view of a live instance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceState {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub zone: String,
    #[serde(default)]
    pub network_interface: Vec<NetworkInterfaceConfig>,
    #[serde(default)]
    pub scheduling: Vec<SchedulingConfig>,
    #[serde(default)]
    pub service_account: Vec<ServiceAccountConfig>,
    #[serde(default)]
    pub guest_accelerator: Vec<GuestAcceleratorConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<CanonicalSet<String>>,
    #[serde(default)]
    pub tags_fingerprint: String,
    /// Region of the last network interface's subnetwork
    #[serde(default)]
    pub region: String,
    /// First non-empty internal address
    #[serde(default)]
    pub internal_ip: String,
    /// First non-empty external address
    #[serde(default)]
    pub external_ip: String,
}

impl InstanceState {
    /// Address to reach the instance on: external if it has one, else internal
    pub fn connection_host(&self) -> Option<&str> {
        [self.external_ip.as_str(), self.internal_ip.as_str()]
            .into_iter()
            .find(|ip| !ip.is_empty())
    }
}
