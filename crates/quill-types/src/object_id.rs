use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid object id '{0}': expected 24 hex characters or a 12-byte string")]
pub struct InvalidObjectId(pub String);

/// 12-byte document identifier, a thin wrapper over the BSON object id.
///
/// Parsing accepts either the 24-character hex form or a 12-byte string whose
/// bytes are used verbatim, so `"aaaaaaaaaaaa"` and
/// `"616161616161616161616161"` name the same id. Display and JSON are
/// always the plain hex string, never the extended `{"$oid": ..}` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(bson::oid::ObjectId);

impl ObjectId {
    pub fn new() -> Self {
        Self(bson::oid::ObjectId::new())
    }

    pub fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bson::oid::ObjectId::from_bytes(bytes))
    }

    pub fn bytes(&self) -> [u8; 12] {
        self.0.bytes()
    }

    pub fn parse(s: &str) -> Result<Self, InvalidObjectId> {
        match s.len() {
            24 => bson::oid::ObjectId::parse_str(s)
                .map(Self)
                .map_err(|_| InvalidObjectId(s.to_string())),
            12 => {
                let mut bytes = [0u8; 12];
                bytes.copy_from_slice(s.as_bytes());
                Ok(Self::from_bytes(bytes))
            }
            _ => Err(InvalidObjectId(s.to_string())),
        }
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }

    /// Seconds since the epoch encoded in the first four bytes.
    pub fn timestamp(&self) -> u32 {
        let b = self.bytes();
        u32::from_be_bytes([b[0], b[1], b[2], b[3]])
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = InvalidObjectId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twelve_byte_string_is_taken_verbatim() {
        let id = ObjectId::parse("aaaaaaaaaaaa").unwrap();
        assert_eq!(id.bytes(), [b'a'; 12]);
        assert_eq!(id.to_string(), "616161616161616161616161");
    }

    #[test]
    fn hex_and_raw_forms_name_the_same_id() {
        let raw = ObjectId::parse("bbbbbbbbbbbb").unwrap();
        let hex = ObjectId::parse("626262626262626262626262").unwrap();
        assert_eq!(raw, hex);
    }

    #[test]
    fn uppercase_hex_is_accepted_and_rendered_lowercase() {
        let id: ObjectId = "65A1B2C3D4E5F60718293A4B".parse().unwrap();
        assert_eq!(id.to_hex(), "65a1b2c3d4e5f60718293a4b");
    }

    #[test]
    fn rejects_bad_lengths_and_non_hex() {
        assert!(ObjectId::parse("").is_err());
        assert!(ObjectId::parse("short").is_err());
        assert!(ObjectId::parse("zzzzzzzzzzzzzzzzzzzzzzzz").is_err());
        assert!(ObjectId::parse("aaaaaaaaaaaaa").is_err());
    }

    #[test]
    fn generated_ids_are_distinct_and_timestamped() {
        let before = chrono::Utc::now().timestamp() as u32;
        let a = ObjectId::new();
        let b = ObjectId::new();
        assert_ne!(a, b);
        assert!(a.timestamp() >= before);
        // Same process, same middle section.
        assert_eq!(a.bytes()[4..9], b.bytes()[4..9]);
    }

    #[test]
    fn serde_uses_hex_string() {
        let id = ObjectId::parse("cccccccccccc").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"636363636363636363636363\"");

        let back: ObjectId = serde_json::from_str("\"cccccccccccc\"").unwrap();
        assert_eq!(back, id);

        let bad = serde_json::from_str::<ObjectId>("\"nope\"");
        assert!(bad.is_err());
    }
}
