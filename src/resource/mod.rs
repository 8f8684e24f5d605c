//! Declarative resource layer
//!
//! This module holds the user-facing side of the translation: the typed
//! declarative model, the embedded scope alias registry, and drift detection
//! between a declaration and a flattened live instance.
//!
//! # Architecture
//!
//! - [`model`] - Declared configuration and flattened state structures
//! - [`registry`] - Loads and caches scope aliases from embedded JSON
//! - [`drift`] - Compares declared configuration against live state
//!
//! # Example
//!
//! ```ignore
//! use crate::resource::model::InstanceConfig;
//! use crate::resource::drift;
//!
//! fn check(yaml: &str, state: &InstanceState) -> anyhow::Result<()> {
//!     let declared = InstanceConfig::from_yaml_str(yaml)?;
//!     for d in drift::detect(&declared, state)? {
//!         println!("{}", d);
//!     }
//!     Ok(())
//! }
//! ```

pub mod drift;
pub mod model;
pub mod registry;

pub use model::{InstanceConfig, InstanceState};
