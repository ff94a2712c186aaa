// src/models.rs

use serde::{Deserialize, Deserializer};

pub mod auth;
pub mod message;
pub mod rbac;
pub mod shift;
pub mod till;
pub mod time_entry;
pub mod venue;

/// Campo anulável em PATCH: ausente vira `None`, `null` vira `Some(None)`.
/// Usar junto com `#[serde(default)]`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
