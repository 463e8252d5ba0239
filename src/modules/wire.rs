//! Serde helpers shared by the wire DTOs.

use serde::{Deserialize, Deserializer};

/// Deserializes an explicit `null` as the field's default.
///
/// `#[serde(default)]` only covers absent keys; web clients also send `null`
/// for fields they leave unset.
///
/// # Errors
///
/// Will return the deserializer's error if the value is neither `null` nor a
/// valid `T`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
