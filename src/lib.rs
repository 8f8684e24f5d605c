//! Declarative Compute Engine instance translation
//!
//! Expands a declarative instance description into the Compute API request
//! shape and flattens API responses back into declarative form, so that a
//! declaration and a live instance can be compared for drift.
//!
//! ```ignore
//! use gce_translate::resolver::SelfLinkResolver;
//! use gce_translate::resource::InstanceConfig;
//! use gce_translate::translate::{expand_instance, flatten_instance};
//!
//! let resolver = SelfLinkResolver::new("my-project", "us-central1");
//! let config = InstanceConfig::from_yaml_str(yaml)?;
//! let request = expand_instance(&config, &resolver)?;
//! let state = flatten_instance(&response, &resolver)?;
//! ```

pub mod config;
pub mod error;
pub mod gcp;
pub mod resolver;
pub mod resource;
pub mod translate;

pub use error::{Result, TranslateError};
