use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Hexadecimal form of a byte string stored as an opaque ledger blob.
///
/// Invariants:
/// - Only `[0-9a-f]` characters (uppercase input is normalized on parse).
/// - An even number of digits; exactly two per original byte, so leading
///   zero bytes survive a round-trip.
///
/// The empty encoding is representable: the ledger may hand back an item with
/// an empty `data` field, and callers decide what that means.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityEncoding(String);

impl EntityEncoding {
    /// Encode raw bytes, two lowercase digits per byte.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(hex::encode(bytes))
    }

    /// Parse an existing hex string.
    pub fn parse(s: impl AsRef<str>) -> Result<Self, TypeError> {
        let s = s.as_ref();
        if s.len() % 2 != 0 {
            return Err(TypeError::InvalidHex(format!(
                "odd number of digits ({})",
                s.len()
            )));
        }
        if let Some((idx, c)) = s.char_indices().find(|(_, c)| !c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidHex(format!(
                "invalid character {c:?} at position {idx}"
            )));
        }
        Ok(Self(s.to_ascii_lowercase()))
    }

    /// The empty encoding (zero bytes).
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode back into the original bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, TypeError> {
        hex::decode(&self.0).map_err(|e| TypeError::InvalidHex(e.to_string()))
    }

    /// Number of bytes represented.
    pub fn byte_len(&self) -> usize {
        self.0.len() / 2
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for EntityEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.len() > 16 {
            write!(f, "EntityEncoding({}…, {} bytes)", &self.0[..16], self.byte_len())
        } else {
            write!(f, "EntityEncoding({})", self.0)
        }
    }
}

impl fmt::Display for EntityEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EntityEncoding {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<EntityEncoding> for String {
    fn from(encoding: EntityEncoding) -> Self {
        encoding.0
    }
}

impl AsRef<str> for EntityEncoding {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
