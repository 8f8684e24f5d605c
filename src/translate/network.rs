//! Network interface translation, including access configs and alias IP ranges

use crate::error::{Result, TranslateError};
use crate::gcp::compute::{AccessConfig, AliasIpRange, NetworkInterface, ONE_TO_ONE_NAT};
use crate::resolver::{convert_self_link_to_v1, FieldContext, ReferenceKind, ReferenceResolver};
use crate::resource::model::{AccessConfigConfig, AliasIpRangeConfig, NetworkInterfaceConfig};

/// Result of flattening an instance's interfaces
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlattenedInterfaces {
    pub interfaces: Vec<NetworkInterfaceConfig>,
    /// Region of the last interface's subnetwork
    pub region: String,
    /// First non-empty internal address, in declared order
    pub internal_ip: String,
    /// First non-empty external address, in declared order
    pub external_ip: String,
}

pub fn expand(
    configs: &[NetworkInterfaceConfig],
    resolver: &dyn ReferenceResolver,
) -> Result<Vec<NetworkInterface>> {
    configs
        .iter()
        .enumerate()
        .map(|(i, config)| expand_interface(i, config, resolver))
        .collect()
}

fn expand_interface(
    index: usize,
    config: &NetworkInterfaceConfig,
    resolver: &dyn ReferenceResolver,
) -> Result<NetworkInterface> {
    // Both may be set: a flattened interface carries both and must re-expand
    if config.network.trim().is_empty() && config.subnetwork.trim().is_empty() {
        return Err(TranslateError::config_shape(format!(
            "network_interface.{}: at least one of network or subnetwork must be provided",
            index
        )));
    }

    let network_path = format!("network_interface.{}.network", index);
    let network = resolver
        .resolve(
            ReferenceKind::Network,
            &config.network,
            &FieldContext::new(&network_path),
        )
        .map_err(|e| TranslateError::resolution(&network_path, e))?;

    let subnetwork_path = format!("network_interface.{}.subnetwork", index);
    let subnetwork_field = FieldContext::new(&subnetwork_path)
        .with_project(Some(config.subnetwork_project.as_str()));
    let subnetwork = resolver
        .resolve(ReferenceKind::Subnetwork, &config.subnetwork, &subnetwork_field)
        .map_err(|e| TranslateError::resolution(&subnetwork_path, e))?;

    tracing::debug!(
        "network_interface.{}: network={:?} subnetwork={:?}",
        index,
        network.relative_link(),
        subnetwork.relative_link()
    );

    Ok(NetworkInterface {
        name: String::new(),
        network: network.relative_link(),
        subnetwork: subnetwork.relative_link(),
        network_ip: config.network_ip.clone(),
        access_configs: expand_access_configs(&config.access_config),
        alias_ip_ranges: expand_alias_ip_ranges(&config.alias_ip_range),
    })
}

pub fn expand_access_configs(configs: &[AccessConfigConfig]) -> Vec<AccessConfig> {
    configs
        .iter()
        .map(|config| {
            let mut access = AccessConfig {
                kind: ONE_TO_ONE_NAT.to_string(),
                nat_ip: config.nat_ip.clone(),
                network_tier: config.network_tier.clone(),
                ..Default::default()
            };
            if let Some(ptr) = config.public_ptr_domain_name.as_deref().filter(|p| !p.is_empty()) {
                access.set_public_ptr = true;
                access.public_ptr_domain_name = ptr.to_string();
            }
            access
        })
        .collect()
}

pub fn expand_alias_ip_ranges(ranges: &[AliasIpRangeConfig]) -> Vec<AliasIpRange> {
    ranges
        .iter()
        .map(|range| AliasIpRange {
            ip_cidr_range: range.ip_cidr_range.clone(),
            subnetwork_range_name: range.subnetwork_range_name.clone(),
        })
        .collect()
}

/// Flatten response interfaces.
///
/// The subnetwork of every interface is resolved to recover its project and
/// region; a failure there fails the whole flatten since region is derived,
/// not stored. Each interface overwrites the running region, so the last one
/// wins.
pub fn flatten(
    interfaces: &[NetworkInterface],
    resolver: &dyn ReferenceResolver,
) -> Result<FlattenedInterfaces> {
    let mut flattened = FlattenedInterfaces {
        interfaces: Vec::with_capacity(interfaces.len()),
        ..Default::default()
    };

    for (i, iface) in interfaces.iter().enumerate() {
        let (access_config, nat_ip) = flatten_access_configs(&iface.access_configs);

        let subnetwork_path = format!("network_interface.{}.subnetwork", i);
        let subnet = resolver
            .resolve(
                ReferenceKind::Subnetwork,
                &iface.subnetwork,
                &FieldContext::new(&subnetwork_path),
            )
            .map_err(|e| TranslateError::resolution(&subnetwork_path, e))?;
        flattened.region = subnet.region.clone().unwrap_or_default();

        flattened.interfaces.push(NetworkInterfaceConfig {
            name: Some(iface.name.clone()).filter(|n| !n.is_empty()),
            network: convert_self_link_to_v1(&iface.network),
            subnetwork: subnet.self_link(),
            subnetwork_project: subnet.project,
            network_ip: iface.network_ip.clone(),
            access_config,
            alias_ip_range: flatten_alias_ip_ranges(&iface.alias_ip_ranges),
        });

        if flattened.internal_ip.is_empty() {
            flattened.internal_ip = iface.network_ip.clone();
        }
        if flattened.external_ip.is_empty() {
            flattened.external_ip = nat_ip;
        }
    }

    Ok(flattened)
}

/// Flatten access configs, also returning the first non-empty NAT address
pub fn flatten_access_configs(configs: &[AccessConfig]) -> (Vec<AccessConfigConfig>, String) {
    let mut nat_ip = String::new();
    let flattened: Vec<AccessConfigConfig> = configs
        .iter()
        .map(|ac| {
            if nat_ip.is_empty() {
                nat_ip = ac.nat_ip.clone();
            }
            AccessConfigConfig {
                nat_ip: ac.nat_ip.clone(),
                network_tier: ac.network_tier.clone(),
                public_ptr_domain_name: ac
                    .set_public_ptr
                    .then(|| ac.public_ptr_domain_name.clone()),
            }
        })
        .collect();
    (flattened, nat_ip)
}

pub fn flatten_alias_ip_ranges(ranges: &[AliasIpRange]) -> Vec<AliasIpRangeConfig> {
    ranges
        .iter()
        .map(|range| AliasIpRangeConfig {
            ip_cidr_range: range.ip_cidr_range.clone(),
            subnetwork_range_name: range.subnetwork_range_name.clone(),
        })
        .collect()
}
