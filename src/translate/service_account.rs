//! Service account translation

use crate::gcp::compute::ServiceAccount;
use crate::resource::model::ServiceAccountConfig;
use crate::resource::registry::canonicalize_scopes;

/// Email the API substitutes with the project's default compute account
pub const DEFAULT_EMAIL: &str = "default";

pub fn expand(configs: &[ServiceAccountConfig]) -> Vec<ServiceAccount> {
    configs
        .iter()
        .map(|config| ServiceAccount {
            email: if config.email.is_empty() {
                DEFAULT_EMAIL.to_string()
            } else {
                config.email.clone()
            },
            scopes: canonicalize_scopes(&config.scopes),
        })
        .collect()
}

pub fn flatten(accounts: &[ServiceAccount]) -> Vec<ServiceAccountConfig> {
    accounts
        .iter()
        .map(|account| ServiceAccountConfig {
            email: account.email.clone(),
            scopes: account.scopes.iter().cloned().collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(email: &str, scopes: &[&str]) -> ServiceAccountConfig {
        ServiceAccountConfig {
            email: email.to_string(),
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_empty_email_becomes_default() {
        let accounts = expand(&[config("", &["cloud-platform"])]);
        assert_eq!(accounts[0].email, "default");
        assert_eq!(
            accounts[0].scopes,
            vec!["https://www.googleapis.com/auth/cloud-platform".to_string()]
        );
    }

    #[test]
    fn test_explicit_email_kept() {
        let email = "runner@my-project.iam.gserviceaccount.com";
        assert_eq!(expand(&[config(email, &[])])[0].email, email);
    }

    #[test]
    fn test_flatten_scopes_are_order_independent_and_alias_aware() {
        let flat = flatten(&[ServiceAccount {
            email: "default".to_string(),
            scopes: vec![
                "https://www.googleapis.com/auth/devstorage.read_only".to_string(),
                "https://www.googleapis.com/auth/compute.readonly".to_string(),
            ],
        }]);
        assert_eq!(flat[0], config("default", &["compute-ro", "storage-ro"]));
    }

    #[test]
    fn test_round_trip() {
        let declared = config("sa@p.iam.gserviceaccount.com", &["userinfo-email", "compute-rw"]);
        let flat = flatten(&expand(&[declared.clone()]));
        assert_eq!(flat, vec![declared]);
    }
}
