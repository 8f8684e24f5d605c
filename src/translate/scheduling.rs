//! Scheduling block translation

use crate::error::{Result, TranslateError};
use crate::gcp::compute::{Scheduling, SchedulingNodeAffinity};
use crate::resource::model::{NodeAffinityConfig, SchedulingConfig};
use crate::translate::presence::Presence;
use crate::translate::set::CanonicalSet;

/// Operators the API accepts on a node affinity
const NODE_AFFINITY_OPERATORS: &[&str] = &["IN", "NOT"];

/// Build the request scheduling object.
///
/// An absent or empty block still has to say `automaticRestart: true`: the API
/// would otherwise treat the missing field as false. That default is not
/// marked for force-send.
pub fn expand(blocks: Option<&[Option<SchedulingConfig>]>) -> Result<Scheduling> {
    let blocks = match blocks {
        None | Some([]) => {
            tracing::debug!("no scheduling block, defaulting automatic_restart");
            return Ok(Scheduling {
                automatic_restart: Presence::Default(true),
                ..Default::default()
            });
        }
        Some(blocks) => blocks,
    };

    let original = match blocks {
        [Some(block)] => block,
        _ => {
            return Err(TranslateError::config_shape(
                "expected exactly one scheduling block",
            ))
        }
    };

    let node_affinities = match &original.node_affinities {
        Some(affinities) => Presence::Explicit(
            affinities
                .iter()
                .map(expand_node_affinity)
                .collect::<Result<Vec<_>>>()?,
        ),
        None => Presence::Omitted,
    };

    Ok(Scheduling {
        automatic_restart: original.automatic_restart.into(),
        preemptible: original.preemptible.into(),
        on_host_maintenance: original.on_host_maintenance.clone().into(),
        node_affinities,
    })
}

fn expand_node_affinity(affinity: &NodeAffinityConfig) -> Result<SchedulingNodeAffinity> {
    if !NODE_AFFINITY_OPERATORS.contains(&affinity.operator.as_str()) {
        return Err(TranslateError::config_shape(format!(
            "node affinity operator for {:?} must be one of {:?}, got {:?}",
            affinity.key, NODE_AFFINITY_OPERATORS, affinity.operator
        )));
    }

    Ok(SchedulingNodeAffinity {
        key: affinity.key.clone(),
        operator: affinity.operator.clone(),
        values: affinity.values.to_vec(),
    })
}

/// Read a response scheduling object back into a single declarative block.
///
/// Only fields the response carried are set, so a block that was expanded
/// from a partial declaration flattens back to the same partial block.
pub fn flatten(scheduling: &Scheduling) -> Vec<SchedulingConfig> {
    let node_affinities = scheduling.node_affinities.value().map(|affinities| {
        affinities
            .iter()
            .map(|na| NodeAffinityConfig {
                key: na.key.clone(),
                operator: na.operator.clone(),
                values: na.values.iter().cloned().collect(),
            })
            .collect::<CanonicalSet<_>>()
    });

    vec![SchedulingConfig {
        automatic_restart: scheduling.automatic_restart.value().copied(),
        preemptible: scheduling.preemptible.value().copied(),
        on_host_maintenance: scheduling.on_host_maintenance.value().cloned(),
        node_affinities,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::presence::ForceSend;
    use crate::translate::set::string_set;

    fn affinity(key: &str, operator: &str, values: &[&str]) -> NodeAffinityConfig {
        NodeAffinityConfig {
            key: key.to_string(),
            operator: operator.to_string(),
            values: string_set(values.iter().copied()),
        }
    }

    #[test]
    fn test_absent_and_empty_default_automatic_restart() {
        for blocks in [None, Some(&[][..])] {
            let scheduling = expand(blocks).unwrap();
            assert_eq!(scheduling.automatic_restart, Presence::Default(true));
            assert!(scheduling.preemptible.is_omitted());
            assert!(scheduling.on_host_maintenance.is_omitted());
            assert!(scheduling.node_affinities.is_omitted());
            assert!(scheduling.force_send_fields().is_empty());
        }
    }

    #[test]
    fn test_two_blocks_rejected() {
        let blocks = vec![Some(SchedulingConfig::default()), Some(SchedulingConfig::default())];
        let err = expand(Some(blocks.as_slice())).unwrap_err();
        assert!(err.is_config_shape());
        assert_eq!(err.to_string(), "expected exactly one scheduling block");
    }

    #[test]
    fn test_null_block_rejected() {
        let err = expand(Some(&[None][..])).unwrap_err();
        assert!(err.is_config_shape());
    }

    #[test]
    fn test_explicit_zero_values_are_marked() {
        let blocks = vec![Some(SchedulingConfig {
            automatic_restart: Some(false),
            preemptible: Some(false),
            on_host_maintenance: Some(String::new()),
            node_affinities: None,
        })];
        let scheduling = expand(Some(blocks.as_slice())).unwrap();
        let mask = scheduling.force_send_fields();
        assert!(mask.is_marked(Scheduling::AUTOMATIC_RESTART));
        assert!(mask.is_marked(Scheduling::PREEMPTIBLE));
        assert!(mask.is_marked(Scheduling::ON_HOST_MAINTENANCE));
        assert!(!mask.is_marked(Scheduling::NODE_AFFINITIES));
        assert_eq!(scheduling.automatic_restart, Presence::Explicit(false));
    }

    #[test]
    fn test_unset_fields_in_present_block_are_omitted() {
        let blocks = vec![Some(SchedulingConfig {
            preemptible: Some(true),
            ..Default::default()
        })];
        let scheduling = expand(Some(blocks.as_slice())).unwrap();
        assert!(scheduling.automatic_restart.is_omitted());
        assert_eq!(scheduling.force_send_fields().len(), 1);
    }

    #[test]
    fn test_node_affinities_expand_and_mark() {
        let blocks = vec![Some(SchedulingConfig {
            node_affinities: Some(
                vec![affinity("env", "IN", &["prod"]), affinity("tier", "NOT", &["db"])]
                    .into_iter()
                    .collect(),
            ),
            ..Default::default()
        })];
        let scheduling = expand(Some(blocks.as_slice())).unwrap();
        assert!(scheduling.force_send_fields().is_marked(Scheduling::NODE_AFFINITIES));
        let affinities = scheduling.node_affinities.value().unwrap();
        assert_eq!(affinities.len(), 2);
        assert!(affinities.iter().all(|a| !a.key.is_empty()));
    }

    #[test]
    fn test_invalid_operator_rejected() {
        let blocks = vec![Some(SchedulingConfig {
            node_affinities: Some(vec![affinity("env", "EQUALS", &["prod"])].into_iter().collect()),
            ..Default::default()
        })];
        assert!(expand(Some(blocks.as_slice())).unwrap_err().is_config_shape());
    }

    #[test]
    fn test_flatten_leaves_missing_fields_unset() {
        let scheduling = Scheduling {
            on_host_maintenance: Presence::Explicit("TERMINATE".to_string()),
            ..Default::default()
        };
        let flat = flatten(&scheduling);
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].automatic_restart, None);
        assert_eq!(flat[0].preemptible, None);
        assert_eq!(flat[0].on_host_maintenance.as_deref(), Some("TERMINATE"));
        assert_eq!(flat[0].node_affinities, None);
    }

    #[test]
    fn test_partial_block_round_trips() {
        let block = SchedulingConfig {
            preemptible: Some(true),
            ..Default::default()
        };
        let expanded = expand(Some(&[Some(block.clone())][..])).unwrap();
        assert_eq!(flatten(&expanded), vec![block]);
    }

    #[test]
    fn test_empty_affinity_list_round_trips() {
        let block = SchedulingConfig {
            node_affinities: Some(CanonicalSet::new()),
            ..Default::default()
        };
        let expanded = expand(Some(&[Some(block.clone())][..])).unwrap();
        assert!(expanded.force_send_fields().is_marked(Scheduling::NODE_AFFINITIES));
        assert_eq!(flatten(&expanded), vec![block]);
    }

    #[test]
    fn test_flatten_ignores_affinity_order_and_duplicates() {
        let a = SchedulingNodeAffinity {
            key: "env".to_string(),
            operator: "IN".to_string(),
            values: vec!["b".to_string(), "a".to_string()],
        };
        let b = SchedulingNodeAffinity {
            key: "zone".to_string(),
            operator: "NOT".to_string(),
            values: vec!["x".to_string()],
        };
        let one = Scheduling {
            node_affinities: Presence::Explicit(vec![a.clone(), b.clone()]),
            ..Default::default()
        };
        let two = Scheduling {
            node_affinities: Presence::Explicit(vec![b, a.clone(), a]),
            ..Default::default()
        };
        assert_eq!(flatten(&one), flatten(&two));
    }

    #[test]
    fn test_round_trip() {
        let block = SchedulingConfig {
            automatic_restart: Some(false),
            preemptible: Some(true),
            on_host_maintenance: Some("TERMINATE".to_string()),
            node_affinities: Some(vec![affinity("env", "IN", &["a", "b"])].into_iter().collect()),
        };
        let expanded = expand(Some(&[Some(block.clone())][..])).unwrap();
        assert_eq!(flatten(&expanded), vec![block]);
    }
}
