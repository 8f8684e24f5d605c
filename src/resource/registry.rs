//! Scope Registry - Load service-account scope aliases from JSON
//!
//! Users may write short scope aliases (`compute-ro`, `storage-rw`) where the
//! API only ever returns full OAuth URIs. The alias table is embedded at
//! compile time and parsed once on first use.

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Embedded scope alias file (compiled into the binary)
const SCOPE_FILE: &str = include_str!("../resources/scopes.json");

/// Root structure of resources/scopes.json
#[derive(Debug, Clone, Deserialize)]
pub struct ScopeRegistry {
    #[serde(default)]
    pub scope_aliases: HashMap<String, String>,
}

/// Global registry loaded from JSON
static REGISTRY: OnceLock<ScopeRegistry> = OnceLock::new();

/// Get the scope registry (loads from embedded JSON on first access)
pub fn get_registry() -> &'static ScopeRegistry {
    REGISTRY.get_or_init(|| {
        serde_json::from_str(SCOPE_FILE)
            .unwrap_or_else(|e| panic!("Failed to parse embedded scope JSON: {}", e))
    })
}

/// Expand a scope alias to its full URI; anything else is returned trimmed
pub fn canonicalize_scope(scope: &str) -> String {
    let scope = scope.trim();
    get_registry()
        .scope_aliases
        .get(scope)
        .cloned()
        .unwrap_or_else(|| scope.to_string())
}

/// Canonicalize every scope, keeping order
pub fn canonicalize_scopes<'a, I>(scopes: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    scopes.into_iter().map(|s| canonicalize_scope(s)).collect()
}

/// All known aliases, sorted (listed by the `scopes` subcommand)
pub fn get_all_scope_aliases() -> Vec<&'static str> {
    let mut keys: Vec<&'static str> = get_registry()
        .scope_aliases
        .keys()
        .map(|s| s.as_str())
        .collect();
    keys.sort_unstable();
    keys
}
