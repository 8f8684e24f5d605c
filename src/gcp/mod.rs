//! GCP API interaction module
//!
//! Compute Engine request/response shapes, plus the transport needed to read a
//! live instance.
//!
//! # Module Structure
//!
//! - [`auth`] - GCP authentication and gcloud defaults
//! - [`client`] - Client for the Compute instances API
//! - [`compute`] - Instance request/response shapes
//! - [`http`] - HTTP utilities for REST API calls
//!
//! # Example
//!
//! ```ignore
//! use crate::gcp::client::GcpClient;
//!
//! async fn example() -> anyhow::Result<()> {
//!     let client = GcpClient::new("my-project", "us-central1-a").await?;
//!     let instance = client.get_instance("web-1").await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod compute;
pub mod http;
