// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Entity codecs.
//
// A codec turns an entity into an opaque byte payload and back. The store is
// generic over its codec, so the same entity type can be persisted as JSON,
// CBOR or protobuf without touching the store logic.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Serialization failures raised by a [`Codec`].
#[derive(Debug, Error)]
pub enum CodecError {
    /// The entity could not be encoded.
    #[error("{codec} encode failed: {reason}")]
    Encode {
        /// Name of the codec that failed.
        codec: &'static str,
        /// Underlying error message.
        reason: String,
    },

    /// The payload could not be decoded.
    #[error("{codec} decode failed: {reason}")]
    Decode {
        /// Name of the codec that failed.
        codec: &'static str,
        /// Underlying error message.
        reason: String,
    },
}

/// Converts entities of type `T` to and from bytes.
pub trait Codec<T>: Send + Sync {
    /// Encode `value` into a byte payload.
    fn encode(&self, value: &T) -> Result<Vec<u8>, CodecError>;

    /// Decode a byte payload into a value.
    fn decode(&self, bytes: &[u8]) -> Result<T, CodecError>;

    /// Short codec name, used in error messages and logs.
    fn name(&self) -> &'static str;
}

/// JSON via `serde_json`. The default codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl<T: Serialize + DeserializeOwned> Codec<T> for JsonCodec {
    fn encode(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(value).map_err(|e| CodecError::Encode {
            codec: "json",
            reason: e.to_string(),
        })
    }

    fn decode(&self, bytes: &[u8]) -> Result<T, CodecError> {
        serde_json::from_slice(bytes).map_err(|e| CodecError::Decode {
            codec: "json",
            reason: e.to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "json"
    }
}

/// CBOR via `ciborium`. Smaller payloads than JSON for the same serde types.
#[derive(Debug, Clone, Copy, Default)]
pub struct CborCodec;

impl<T: Serialize + DeserializeOwned> Codec<T> for CborCodec {
    fn encode(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        let mut bytes = Vec::new();
        ciborium::into_writer(value, &mut bytes).map_err(|e| CodecError::Encode {
            codec: "cbor",
            reason: e.to_string(),
        })?;
        Ok(bytes)
    }

    fn decode(&self, bytes: &[u8]) -> Result<T, CodecError> {
        ciborium::from_reader(bytes).map_err(|e| CodecError::Decode {
            codec: "cbor",
            reason: e.to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "cbor"
    }
}

/// Protobuf via `prost`, for entities generated from `.proto` definitions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProstCodec;

impl<T: prost::Message + Default> Codec<T> for ProstCodec {
    fn encode(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        Ok(value.encode_to_vec())
    }

    fn decode(&self, bytes: &[u8]) -> Result<T, CodecError> {
        T::decode(bytes).map_err(|e| CodecError::Decode {
            codec: "protobuf",
            reason: e.to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "protobuf"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Product {
        id: String,
        price_cents: u64,
        tags: Vec<String>,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    struct ProductProto {
        #[prost(string, tag = "1")]
        id: String,
        #[prost(uint64, tag = "2")]
        price_cents: u64,
    }

    fn product() -> Product {
        Product {
            id: "p-1".to_string(),
            price_cents: 1999,
            tags: vec!["new".to_string()],
        }
    }

    #[test]
    fn test_json_codec() {
        let bytes = Codec::<Product>::encode(&JsonCodec, &product()).unwrap();
        assert!(std::str::from_utf8(&bytes).unwrap().contains("\"p-1\""));
        let decoded: Product = JsonCodec.decode(&bytes).unwrap();
        assert_eq!(decoded, product());
    }

    #[test]
    fn test_cbor_codec() {
        let bytes = Codec::<Product>::encode(&CborCodec, &product()).unwrap();
        let decoded: Product = CborCodec.decode(&bytes).unwrap();
        assert_eq!(decoded, product());
    }

    #[test]
    fn test_prost_codec() {
        let value = ProductProto {
            id: "p-1".to_string(),
            price_cents: 1999,
        };
        let bytes = ProstCodec.encode(&value).unwrap();
        let decoded: ProductProto = ProstCodec.decode(&bytes).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn test_decode_errors_name_the_codec() {
        let err = Codec::<Product>::decode(&JsonCodec, b"not json").unwrap_err();
        assert!(matches!(err, CodecError::Decode { codec: "json", .. }));
        assert!(err.to_string().starts_with("json decode failed"));

        let err = Codec::<Product>::decode(&CborCodec, &[0xff, 0x00]).unwrap_err();
        assert!(matches!(err, CodecError::Decode { codec: "cbor", .. }));

        let err = Codec::<ProductProto>::decode(&ProstCodec, &[0xff]).unwrap_err();
        assert!(matches!(err, CodecError::Decode { codec: "protobuf", .. }));
    }

    #[test]
    fn test_codec_names() {
        assert_eq!(Codec::<Product>::name(&JsonCodec), "json");
        assert_eq!(Codec::<Product>::name(&CborCodec), "cbor");
        assert_eq!(Codec::<ProductProto>::name(&ProstCodec), "protobuf");
    }
}
