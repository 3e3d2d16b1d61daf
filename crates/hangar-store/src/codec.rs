//! Binary serialization of store models.
//!
//! Entities cross thread and process boundaries (UI shells, drag payloads)
//! as compact bincode frames.  Any serde type goes through the same pair of
//! helpers, so adding an entity never means adding codec code.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// Encode a value to its bincode wire form.
pub fn to_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(bincode::serialize(value)?)
}

/// Decode a value from its bincode wire form.
pub fn from_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(bincode::deserialize(bytes)?)
}
