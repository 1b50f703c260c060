use mcr_types::{EntityEncoding, TypeError};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{CodecError, CodecResult};

/// Converts entities to and from the hex-of-UTF-8-JSON form stored on the
/// ledger.
///
/// Hex rules are those of [`EntityEncoding`]: every byte becomes two
/// lowercase digits, so leading zero bytes are never dropped.
pub struct EntityCodec;

impl EntityCodec {
    /// Serialize `entity` to JSON and hex-encode the UTF-8 bytes.
    pub fn serialize<E: Serialize + ?Sized>(entity: &E) -> CodecResult<EntityEncoding> {
        let json = serde_json::to_vec(entity)?;
        Ok(EntityEncoding::from_bytes(&json))
    }

    /// Reverse of [`serialize`](Self::serialize). Blank input decodes to
    /// `None`.
    pub fn deserialize<E: DeserializeOwned>(hex: &str) -> CodecResult<Option<E>> {
        let hex = hex.trim();
        if hex.is_empty() {
            return Ok(None);
        }
        let encoding = EntityEncoding::parse(hex).map_err(invalid_hex)?;
        Self::deserialize_encoding(&encoding)
    }

    pub fn deserialize_encoding<E: DeserializeOwned>(
        encoding: &EntityEncoding,
    ) -> CodecResult<Option<E>> {
        if encoding.is_empty() {
            return Ok(None);
        }
        let bytes = encoding.to_bytes().map_err(invalid_hex)?;
        let json = std::str::from_utf8(&bytes).map_err(|e| CodecError::Utf8(e.to_string()))?;
        Ok(Some(serde_json::from_str(json)?))
    }
}

/// Lowercase hex, two digits per byte.
pub fn hex_encode(bytes: &[u8]) -> String {
    EntityEncoding::from_bytes(bytes).into()
}

/// Decode hex of either case into exactly the bytes it spells.
pub fn hex_decode(s: &str) -> CodecResult<Vec<u8>> {
    EntityEncoding::parse(s)
        .and_then(|encoding| encoding.to_bytes())
        .map_err(invalid_hex)
}

fn invalid_hex(err: TypeError) -> CodecError {
    match err {
        TypeError::InvalidHex(detail) => CodecError::InvalidHex(detail),
        other => CodecError::InvalidHex(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde::Deserialize;
    use std::collections::BTreeMap;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Order {
        id: String,
        qty: u32,
        note: Option<String>,
        tags: Vec<String>,
    }

    fn order() -> Order {
        Order {
            id: "o-1".into(),
            qty: 3,
            note: Some("naïve ☕".into()),
            tags: vec!["a".into(), "b".into()],
        }
    }

    #[test]
    fn empty_object_is_7b7d() {
        let enc = EntityCodec::serialize(&BTreeMap::<String, u8>::new()).unwrap();
        assert_eq!(enc.as_str(), "7b7d");
    }

    #[test]
    fn entity_roundtrip() {
        let enc = EntityCodec::serialize(&order()).unwrap();
        assert!(enc.as_str().chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
        let back: Order = EntityCodec::deserialize_encoding(&enc).unwrap().unwrap();
        assert_eq!(back, order());
    }

    #[test]
    fn blank_input_is_none() {
        assert!(EntityCodec::deserialize::<Order>("").unwrap().is_none());
        assert!(EntityCodec::deserialize::<Order>("   ").unwrap().is_none());
    }

    #[test]
    fn malformed_hex_fails() {
        let err = EntityCodec::deserialize::<Order>("7b7").unwrap_err();
        assert!(matches!(err, CodecError::InvalidHex(_)));
        let err = EntityCodec::deserialize::<Order>("zz").unwrap_err();
        assert!(matches!(err, CodecError::InvalidHex(_)));
    }

    #[test]
    fn malformed_json_fails() {
        let hex = hex_encode(b"{not json");
        let err = EntityCodec::deserialize::<Order>(&hex).unwrap_err();
        assert!(matches!(err, CodecError::Json(_)));
    }

    #[test]
    fn wrong_shape_fails() {
        let hex = hex_encode(br#"{"id":"o-1"}"#);
        assert!(matches!(EntityCodec::deserialize::<Order>(&hex), Err(CodecError::Json(_))));
    }

    #[test]
    fn invalid_utf8_fails() {
        let err = EntityCodec::deserialize::<Order>("ff").unwrap_err();
        assert!(matches!(err, CodecError::Utf8(_)));
    }

    #[test]
    fn uppercase_hex_accepted() {
        let back: BTreeMap<String, u8> = EntityCodec::deserialize("7B7D").unwrap().unwrap();
        assert!(back.is_empty());
    }

    #[test]
    fn hex_rules_follow_entity_encoding() {
        for bad in ["7b7", "zz", "0g", "7b 7d"] {
            assert!(EntityEncoding::parse(bad).is_err());
            assert!(matches!(hex_decode(bad), Err(CodecError::InvalidHex(_))));
            assert!(matches!(
                EntityCodec::deserialize::<Order>(bad),
                Err(CodecError::InvalidHex(_))
            ));
        }
        assert_eq!(hex_encode(b"{}"), EntityEncoding::from_bytes(b"{}").as_str());
        assert_eq!(hex_decode("7B7D").unwrap(), b"{}");
    }

    #[test]
    fn leading_zero_byte_preserved() {
        let bytes = [0u8, 0, 1, 255];
        assert_eq!(hex_encode(&bytes), "000001ff");
        assert_eq!(hex_decode("000001ff").unwrap(), bytes);
    }

    proptest! {
        #[test]
        fn hex_roundtrip(bytes in proptest::collection::vec(any::<u8>(), 1..512)) {
            let hex = hex_encode(&bytes);
            prop_assert_eq!(hex.len(), bytes.len() * 2);
            prop_assert_eq!(hex_decode(&hex).unwrap(), bytes);
        }

        #[test]
        fn order_roundtrip(id in "[a-z0-9-]{1,16}", qty in any::<u32>(), note in proptest::option::of(".*"), tags in proptest::collection::vec(".*", 0..4)) {
            let order = Order { id, qty, note, tags };
            let enc = EntityCodec::serialize(&order).unwrap();
            let back: Order = EntityCodec::deserialize_encoding(&enc).unwrap().unwrap();
            prop_assert_eq!(back, order);
        }
    }
}
