//! Field presence
//!
//! The Compute API treats a missing field as "use the server default". A zero
//! value the caller set on purpose must therefore still go on the wire.
//! [`Presence`] records, per field, whether a value was supplied by the
//! caller, injected as a translator default, or left out entirely.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;

/// A request field together with how it came to have its value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Presence<T> {
    /// Not supplied: omitted from the request so the server defaults it
    #[default]
    Omitted,
    /// Injected by the translator: sent, but not marked for force-send
    Default(T),
    /// Supplied by the caller: sent even when it is the zero value
    Explicit(T),
}

impl<T> Presence<T> {
    pub fn is_omitted(&self) -> bool {
        matches!(self, Presence::Omitted)
    }

    pub fn is_explicit(&self) -> bool {
        matches!(self, Presence::Explicit(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Presence::Omitted => None,
            Presence::Default(v) | Presence::Explicit(v) => Some(v),
        }
    }
}

impl<T: Clone + Default> Presence<T> {
    /// The value, or the type's zero value when omitted
    pub fn value_or_zero(&self) -> T {
        self.value().cloned().unwrap_or_default()
    }
}

impl<T> From<Option<T>> for Presence<T> {
    /// A caller-supplied optional value
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Presence::Explicit(v),
            None => Presence::Omitted,
        }
    }
}

impl<T: Serialize> Serialize for Presence<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Presence<T> {
    /// Values present in a response count as explicit; null reads as omitted.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Option::<T>::deserialize(deserializer)?.into())
    }
}

/// API field names a transport must send even when zero-valued
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMask {
    fields: BTreeSet<&'static str>,
}

impl FieldMask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&mut self, field: &'static str) {
        self.fields.insert(field);
    }

    /// Mark `field` when `presence` is explicit
    pub fn mark_if_explicit<T>(&mut self, field: &'static str, presence: &Presence<T>) {
        if presence.is_explicit() {
            self.mark(field);
        }
    }

    pub fn is_marked(&self, field: &str) -> bool {
        self.fields.contains(field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().copied()
    }
}

/// Remote objects that carry explicit fields
pub trait ForceSend {
    fn force_send_fields(&self) -> FieldMask;
}
