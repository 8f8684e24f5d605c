//! GCP Client
//!
//! Authenticated access to the Compute instances API, used to read the live
//! state that flatten turns back into declarative form.

use super::auth::{region_from_zone, GcpCredentials};
use super::compute::Instance;
use super::http::GcpHttpClient;
use anyhow::{Context, Result};

/// Default Compute API root
pub const COMPUTE_API_BASE: &str = "https://compute.googleapis.com/compute/v1";

/// Main GCP client
#[derive(Clone)]
pub struct GcpClient {
    pub credentials: GcpCredentials,
    pub http: GcpHttpClient,
    pub project_id: String,
    pub zone: String,
}

impl GcpClient {
    /// Create a new GCP client
    pub async fn new(project_id: &str, zone: &str) -> Result<Self> {
        let credentials = GcpCredentials::new()
            .await
            .context("Failed to initialize GCP credentials")?;

        let http = GcpHttpClient::new()?;

        Ok(Self {
            credentials,
            http,
            project_id: project_id.to_string(),
            zone: zone.to_string(),
        })
    }

    /// Region of the client's zone
    pub fn get_region(&self) -> String {
        region_from_zone(&self.zone)
    }

    /// Zonal Compute API URL for a resource path
    pub fn compute_zonal_url(&self, resource: &str) -> String {
        zonal_url(COMPUTE_API_BASE, &self.project_id, &self.zone, resource)
    }

    /// Fetch one instance
    pub async fn get_instance(&self, name: &str) -> Result<Instance> {
        let url = self.compute_zonal_url(&format!("instances/{}", urlencoding::encode(name)));
        let token = self.credentials.get_token().await?;
        self.http
            .get_json(&url, &token)
            .await
            .with_context(|| format!("Failed to fetch instance {}", name))
    }
}

/// `{base}/projects/{project}/zones/{zone}/{resource}`
pub fn zonal_url(base: &str, project: &str, zone: &str, resource: &str) -> String {
    format!(
        "{}/projects/{}/zones/{}/{}",
        base.trim_end_matches('/'),
        project,
        zone,
        resource
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zonal_url() {
        assert_eq!(
            zonal_url(COMPUTE_API_BASE, "my-project", "us-central1-a", "instances/vm"),
            "https://compute.googleapis.com/compute/v1/projects/my-project/zones/us-central1-a/instances/vm"
        );
        assert_eq!(
            zonal_url("http://127.0.0.1:8080/", "p", "z", "instances"),
            "http://127.0.0.1:8080/projects/p/zones/z/instances"
        );
    }
}
