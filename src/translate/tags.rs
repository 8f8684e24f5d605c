//! Network tag translation
//!
//! Absent tags produce no tags object at all, which tells the transport to
//! leave the instance's tags alone. Present-but-empty tags produce an object
//! with no items, which clears them.

use crate::gcp::compute::Tags;
use crate::translate::set::CanonicalSet;

pub fn expand(tags: Option<&CanonicalSet<String>>, fingerprint: &str) -> Option<Tags> {
    tags.map(|items| Tags {
        items: items.to_vec(),
        fingerprint: fingerprint.to_string(),
    })
}

/// Returns the tag set (absent when the response had none) and its fingerprint
pub fn flatten(tags: Option<&Tags>) -> (Option<CanonicalSet<String>>, String) {
    match tags {
        Some(tags) => (
            Some(tags.items.iter().cloned().collect()),
            tags.fingerprint.clone(),
        ),
        None => (None, String::new()),
    }
}
