//! Integration tests for the GCP HTTP client using wiremock
//!
//! These tests serve canned Compute API responses and check that they are
//! fetched, decoded and flattened correctly.

use gce_translate::gcp::client::zonal_url;
use gce_translate::gcp::compute::Instance;
use gce_translate::gcp::http::{format_gcp_error, GcpHttpClient};
use gce_translate::resolver::SelfLinkResolver;
use gce_translate::translate::flatten_instance;
use serde_json::json;
use wiremock::matchers::{bearer_token, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const INSTANCE_PATH: &str = "/projects/test-project/zones/us-central1-a/instances/web-1";

fn instance_body() -> serde_json::Value {
    json!({
        "kind": "compute#instance",
        "name": "web-1",
        "zone": "https://www.googleapis.com/compute/v1/projects/test-project/zones/us-central1-a",
        "networkInterfaces": [
            {
                "name": "nic0",
                "network": "https://www.googleapis.com/compute/beta/projects/test-project/global/networks/default",
                "subnetwork": "https://www.googleapis.com/compute/beta/projects/test-project/regions/us-central1/subnetworks/default",
                "networkIP": "10.128.0.7",
                "accessConfigs": [
                    {
                        "type": "ONE_TO_ONE_NAT",
                        "natIP": "34.70.1.2",
                        "networkTier": "PREMIUM",
                        "setPublicPtr": true,
                        "publicPtrDomainName": "web.example.com."
                    }
                ]
            },
            {
                "name": "nic1",
                "network": "https://www.googleapis.com/compute/v1/projects/test-project/global/networks/backend",
                "subnetwork": "https://www.googleapis.com/compute/v1/projects/host-project/regions/us-east1/subnetworks/backend",
                "networkIP": "10.2.0.3",
                "aliasIpRanges": [
                    { "ipCidrRange": "10.2.1.0/24", "subnetworkRangeName": "pods" }
                ]
            }
        ],
        "scheduling": {
            "onHostMaintenance": "MIGRATE",
            "automaticRestart": true,
            "preemptible": false
        },
        "serviceAccounts": [
            {
                "email": "123-compute@developer.gserviceaccount.com",
                "scopes": [
                    "https://www.googleapis.com/auth/devstorage.read_only",
                    "https://www.googleapis.com/auth/logging.write"
                ]
            }
        ],
        "tags": { "items": ["web", "ssh"], "fingerprint": "42WmSpB8rSM=" }
    })
}

/// Test module for HTTP client integration tests
mod http_client_tests {
    use super::*;

    /// A fetched instance decodes and flattens end to end
    #[tokio::test]
    async fn test_fetch_and_flatten_instance() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(INSTANCE_PATH))
            .and(bearer_token("test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(instance_body()))
            .mount(&server)
            .await;

        let http = GcpHttpClient::new().expect("client should build");
        let url = zonal_url(&server.uri(), "test-project", "us-central1-a", "instances/web-1");
        let instance: Instance = http
            .get_json(&url, "test-token")
            .await
            .expect("Request should succeed");

        let state = flatten_instance(&instance, &SelfLinkResolver::new("test-project", "us-central1"))
            .expect("flatten should succeed");

        assert_eq!(state.zone, "us-central1-a");
        assert_eq!(state.network_interface.len(), 2);
        assert_eq!(state.internal_ip, "10.128.0.7");
        assert_eq!(state.external_ip, "34.70.1.2");
        // Last interface wins
        assert_eq!(state.region, "us-east1");
        assert_eq!(state.network_interface[1].subnetwork_project, "host-project");
        assert_eq!(
            state.network_interface[0].network,
            "https://www.googleapis.com/compute/v1/projects/test-project/global/networks/default"
        );
        assert_eq!(
            state.network_interface[0].access_config[0]
                .public_ptr_domain_name
                .as_deref(),
            Some("web.example.com.")
        );
        assert_eq!(state.scheduling[0].automatic_restart, Some(true));
        assert_eq!(state.tags.as_ref().map(|t| t.len()), Some(2));
        assert_eq!(state.tags_fingerprint, "42WmSpB8rSM=");
    }

    /// Test 404 response surfaces as an error with a friendly message
    #[tokio::test]
    async fn test_404_returns_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(INSTANCE_PATH))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": { "code": 404, "message": "The resource was not found" }
            })))
            .mount(&server)
            .await;

        let http = GcpHttpClient::new().expect("client should build");
        let url = format!("{}{}", server.uri(), INSTANCE_PATH);
        let err = http
            .get_json::<Instance>(&url, "test-token")
            .await
            .expect_err("404 should fail");

        assert_eq!(format_gcp_error(&err), "Resource not found.");
    }

    /// Test 401 response indicates authentication failure
    #[tokio::test]
    async fn test_401_returns_unauthorized() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(INSTANCE_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": { "code": 401, "message": "Invalid credentials" }
            })))
            .mount(&server)
            .await;

        let http = GcpHttpClient::new().expect("client should build");
        let url = format!("{}{}", server.uri(), INSTANCE_PATH);
        let err = http
            .get_json::<Instance>(&url, "bad-token")
            .await
            .expect_err("401 should fail");

        assert!(format_gcp_error(&err).starts_with("Authentication failed"));
    }

    /// Test a malformed body is reported as a parse failure
    #[tokio::test]
    async fn test_invalid_json_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(INSTANCE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let http = GcpHttpClient::new().expect("client should build");
        let url = format!("{}{}", server.uri(), INSTANCE_PATH);
        let err = http
            .get_json::<Instance>(&url, "test-token")
            .await
            .expect_err("bad body should fail");

        assert!(err.to_string().contains("Failed to parse response JSON"));
    }
}
