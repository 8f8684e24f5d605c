//! Guest accelerator translation
//!
//! A structural copy in both directions. Order is kept as given.

use crate::gcp::compute::AcceleratorConfig;
use crate::resource::model::GuestAcceleratorConfig;

pub fn expand(configs: &[GuestAcceleratorConfig]) -> Vec<AcceleratorConfig> {
    configs
        .iter()
        .map(|config| AcceleratorConfig {
            accelerator_count: config.count,
            accelerator_type: config.kind.clone(),
        })
        .collect()
}

pub fn flatten(accelerators: &[AcceleratorConfig]) -> Vec<GuestAcceleratorConfig> {
    accelerators
        .iter()
        .map(|accelerator| GuestAcceleratorConfig {
            count: accelerator.accelerator_count,
            kind: accelerator.accelerator_type.clone(),
        })
        .collect()
}
