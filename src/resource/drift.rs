//! Drift detection
//!
//! Compares a declared configuration with the flattened state of the live
//! instance. Only what the declaration says is checked: fields it leaves out
//! or leaves empty are computed by the API and never count as drift.

use super::model::{InstanceConfig, InstanceState};
use crate::resource::registry::canonicalize_scope;
use serde_json::Value;
use std::fmt;

/// Fields holding a resource name or self-link
const REFERENCE_FIELDS: &[&str] = &["network", "subnetwork"];

/// A declared value that the live instance does not match
#[derive(Debug, Clone, PartialEq)]
pub struct Drift {
    pub path: String,
    pub declared: Value,
    pub actual: Value,
}

impl fmt::Display for Drift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: declared {} but found {}", self.path, self.declared, self.actual)
    }
}

/// List every declared field whose live value differs
pub fn detect(declared: &InstanceConfig, state: &InstanceState) -> anyhow::Result<Vec<Drift>> {
    let mut declared = declared.clone();
    // Scopes are compared by their canonical URI
    for account in &mut declared.service_account {
        account.scopes = account
            .scopes
            .iter()
            .map(|s| canonicalize_scope(s))
            .collect();
    }

    let mut declared = serde_json::to_value(&declared)?;
    if let Some(obj) = declared.as_object_mut() {
        // A single-block list on the state side; unwrap null blocks to compare
        let undeclared = match obj.get_mut("scheduling") {
            Some(Value::Array(blocks)) => {
                blocks.retain(|b| !b.is_null());
                blocks.is_empty()
            }
            _ => false,
        };
        // An empty list only asks for the server defaults
        if undeclared {
            obj.remove("scheduling");
        }
    }

    let mut state = serde_json::to_value(state)?;
    if let Some(accounts) = state
        .get_mut("service_account")
        .and_then(Value::as_array_mut)
    {
        for account in accounts {
            if let Some(Value::Array(scopes)) = account.get_mut("scopes") {
                for scope in scopes.iter_mut() {
                    if let Some(s) = scope.as_str() {
                        *scope = Value::String(canonicalize_scope(s));
                    }
                }
                scopes.sort_by(|a, b| a.as_str().cmp(&b.as_str()));
            }
        }
    }

    let mut drifts = Vec::new();
    compare(&mut drifts, "", &declared, &state);
    if !drifts.is_empty() {
        tracing::info!("detected {} drifted field(s)", drifts.len());
    }
    Ok(drifts)
}

fn compare(drifts: &mut Vec<Drift>, path: &str, declared: &Value, actual: &Value) {
    match (declared, actual) {
        (Value::Null, _) => {}
        (Value::String(s), _) if s.is_empty() => {}
        // The API leaves zero values out of its responses
        (d, Value::Null) if is_zero(d) => {}
        (Value::Object(fields), _) => {
            for (key, value) in fields {
                let child = join(path, key);
                let actual_value = actual.get(key).unwrap_or(&Value::Null);
                if REFERENCE_FIELDS.contains(&key.as_str()) {
                    if let (Some(d), Some(a)) = (value.as_str(), actual_value.as_str()) {
                        if !d.is_empty() && !same_reference(d, a) {
                            drifts.push(drift(&child, value, actual_value));
                        }
                        continue;
                    }
                }
                compare(drifts, &child, value, actual_value);
            }
        }
        (Value::Array(items), Value::Array(actual_items)) if items.len() == actual_items.len() => {
            for (i, (d, a)) in items.iter().zip(actual_items).enumerate() {
                compare(drifts, &format!("{}.{}", path, i), d, a);
            }
        }
        (d, a) if d != a => drifts.push(drift(path, d, a)),
        _ => {}
    }
}

fn is_zero(value: &Value) -> bool {
    match value {
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn drift(path: &str, declared: &Value, actual: &Value) -> Drift {
    Drift {
        path: path.to_string(),
        declared: declared.clone(),
        actual: actual.clone(),
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

/// A name matches any link ending in it; two links match on their project-relative part
fn same_reference(declared: &str, actual: &str) -> bool {
    if declared == actual {
        return true;
    }
    let relative = |link: &str| link.find("projects/").map(|i| link[i..].to_string());
    match (relative(declared), relative(actual)) {
        (Some(d), Some(a)) => d == a,
        _ => last_segment(declared) == last_segment(actual),
    }
}

fn last_segment(link: &str) -> &str {
    link.rsplit('/').next().unwrap_or(link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::model::{NetworkInterfaceConfig, SchedulingConfig, ServiceAccountConfig};
    use crate::translate::set::string_set;

    fn state() -> InstanceState {
        InstanceState {
            name: "vm".to_string(),
            network_interface: vec![NetworkInterfaceConfig {
                network: "https://www.googleapis.com/compute/v1/projects/p/global/networks/default"
                    .to_string(),
                network_ip: "10.0.0.2".to_string(),
                ..Default::default()
            }],
            scheduling: vec![SchedulingConfig {
                automatic_restart: Some(true),
                preemptible: Some(false),
                on_host_maintenance: Some("MIGRATE".to_string()),
                node_affinities: Some(Default::default()),
            }],
            service_account: vec![ServiceAccountConfig {
                email: "123-compute@developer.gserviceaccount.com".to_string(),
                scopes: ["https://www.googleapis.com/auth/compute.readonly".to_string()]
                    .into_iter()
                    .collect(),
            }],
            tags: Some(string_set(["ssh", "web"])),
            ..Default::default()
        }
    }

    #[test]
    fn test_matching_config_has_no_drift() {
        let declared = InstanceConfig::from_yaml_str(
            r#"
name: vm
network_interface:
  - network: default
scheduling:
  - automatic_restart: true
service_account:
  - scopes: [compute-ro]
tags: [web, ssh]
"#,
        )
        .unwrap();
        assert_eq!(detect(&declared, &state()).unwrap(), vec![]);
    }

    #[test]
    fn test_changed_fields_are_reported() {
        let declared = InstanceConfig::from_yaml_str(
            r#"
network_interface:
  - network: other
scheduling:
  - preemptible: true
tags: [web]
"#,
        )
        .unwrap();
        let drifts = detect(&declared, &state()).unwrap();
        let paths: Vec<&str> = drifts.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["network_interface.0.network", "scheduling.0.preemptible", "tags"]
        );
    }

    #[test]
    fn test_empty_scheduling_list_is_undeclared() {
        let declared = InstanceConfig {
            name: "vm".to_string(),
            scheduling: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(detect(&declared, &state()).unwrap(), vec![]);

        let declared = InstanceConfig {
            scheduling: Some(vec![None]),
            ..Default::default()
        };
        assert_eq!(detect(&declared, &state()).unwrap(), vec![]);
    }

    #[test]
    fn test_declared_zero_matches_omitted_response_field() {
        let declared = InstanceConfig::from_yaml_str(
            r#"
scheduling:
  - preemptible: false
    node_affinities: []
"#,
        )
        .unwrap();
        let mut live = state();
        live.scheduling = vec![SchedulingConfig {
            automatic_restart: Some(true),
            ..Default::default()
        }];
        assert_eq!(detect(&declared, &live).unwrap(), vec![]);

        let declared = InstanceConfig::from_yaml_str("scheduling:\n  - preemptible: true\n").unwrap();
        let drifts = detect(&declared, &live).unwrap();
        assert_eq!(drifts.len(), 1);
        assert_eq!(drifts[0].path, "scheduling.0.preemptible");
    }

    #[test]
    fn test_same_reference() {
        assert!(same_reference(
            "projects/p/global/networks/default",
            "https://www.googleapis.com/compute/v1/projects/p/global/networks/default"
        ));
        assert!(same_reference("default", "projects/p/global/networks/default"));
        assert!(!same_reference(
            "projects/q/global/networks/default",
            "projects/p/global/networks/default"
        ));
    }
}
