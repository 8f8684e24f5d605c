//! Instance assembly: composes the block translators

use crate::error::Result;
use crate::gcp::compute::Instance;
use crate::resolver::ReferenceResolver;
use crate::resource::model::{InstanceConfig, InstanceState};
use crate::translate::{accelerator, network, scheduling, service_account, tags};

/// Build the request body for an instance
pub fn expand_instance(config: &InstanceConfig, resolver: &dyn ReferenceResolver) -> Result<Instance> {
    tracing::debug!("expanding instance {:?}", config.name);

    Ok(Instance {
        name: config.name.clone(),
        zone: config.zone.clone(),
        self_link: String::new(),
        network_interfaces: network::expand(&config.network_interface, resolver)?,
        scheduling: scheduling::expand(config.scheduling.as_deref())?,
        service_accounts: service_account::expand(&config.service_account),
        guest_accelerators: accelerator::expand(&config.guest_accelerator),
        tags: tags::expand(config.tags.as_ref(), &config.tags_fingerprint),
    })
}

/// Read an instance response back into declarative form
pub fn flatten_instance(instance: &Instance, resolver: &dyn ReferenceResolver) -> Result<InstanceState> {
    tracing::debug!("flattening instance {:?}", instance.name);

    let interfaces = network::flatten(&instance.network_interfaces, resolver)?;
    let (tags, tags_fingerprint) = tags::flatten(instance.tags.as_ref());

    Ok(InstanceState {
        name: instance.name.clone(),
        zone: short_name(&instance.zone).to_string(),
        network_interface: interfaces.interfaces,
        scheduling: scheduling::flatten(&instance.scheduling),
        service_account: service_account::flatten(&instance.service_accounts),
        guest_accelerator: accelerator::flatten(&instance.guest_accelerators),
        tags,
        tags_fingerprint,
        region: interfaces.region,
        internal_ip: interfaces.internal_ip,
        external_ip: interfaces.external_ip,
    })
}

/// Last path segment of a self-link (`.../zones/us-central1-a` -> `us-central1-a`)
fn short_name(link: &str) -> &str {
    link.rsplit('/').next().unwrap_or(link)
}
