//! Expand/flatten translators
//!
//! Each block translator maps one sub-structure of an instance between its
//! declarative form ([`crate::resource::model`]) and the Compute API shape
//! ([`crate::gcp::compute`]).
//!
//! # Module Structure
//!
//! - [`set`] - Order-independent canonical sets
//! - [`presence`] - Omitted / defaulted / explicit field values and force-send masks
//! - [`scheduling`], [`network`], [`service_account`], [`accelerator`], [`tags`] - Block translators
//! - [`instance`] - Composition of the blocks into a whole instance

pub mod accelerator;
pub mod instance;
pub mod network;
pub mod presence;
pub mod scheduling;
pub mod service_account;
pub mod set;
pub mod tags;

pub use instance::{expand_instance, flatten_instance};
