// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use schemars::JsonSchema;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

#[cfg(test)]
#[path = "unit_tests/base_types_tests.rs"]
mod base_types_tests;

pub const SUI_ADDRESS_LENGTH: usize = 20;

const HEX_PREFIX: &str = "0x";

pub type SequenceNumber = u64;

/// Parses a hex string of at most `SUI_ADDRESS_LENGTH` bytes, with or without the `0x`
/// prefix. Short inputs are left-padded with zeros, so `0x2` names the framework address.
fn parse_address_bytes(s: &str) -> Result<[u8; SUI_ADDRESS_LENGTH]> {
    let trimmed = s.trim().to_lowercase();
    let digits = trimmed.strip_prefix(HEX_PREFIX).unwrap_or(&trimmed);
    if digits.is_empty() || digits.len() > SUI_ADDRESS_LENGTH * 2 {
        return Err(Error::InvalidAddress(s.to_string()));
    }
    let padded = format!("{digits:0>width$}", width = SUI_ADDRESS_LENGTH * 2);
    let mut bytes = [0u8; SUI_ADDRESS_LENGTH];
    hex::decode_to_slice(padded, &mut bytes).map_err(|_| Error::InvalidAddress(s.to_string()))?;
    Ok(bytes)
}

/// True if `s` is a full-length hex address, optionally `0x` prefixed.
pub fn is_valid_sui_address(s: &str) -> bool {
    let digits = s.strip_prefix(HEX_PREFIX).unwrap_or(s);
    digits.len() == SUI_ADDRESS_LENGTH * 2 && digits.chars().all(|c| c.is_ascii_hexdigit())
}

macro_rules! address_type {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Hash, Default, JsonSchema)]
        pub struct $name(#[schemars(with = "String")] [u8; SUI_ADDRESS_LENGTH]);

        impl $name {
            pub const LENGTH: usize = SUI_ADDRESS_LENGTH;
            pub const ZERO: Self = Self([0u8; SUI_ADDRESS_LENGTH]);

            pub const fn new(bytes: [u8; SUI_ADDRESS_LENGTH]) -> Self {
                Self(bytes)
            }

            pub fn to_vec(&self) -> Vec<u8> {
                self.0.to_vec()
            }

            pub fn as_bytes(&self) -> &[u8; SUI_ADDRESS_LENGTH] {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                parse_address_bytes(s).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{HEX_PREFIX}{}", hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(self, f)
            }
        }

        impl From<[u8; SUI_ADDRESS_LENGTH]> for $name {
            fn from(bytes: [u8; SUI_ADDRESS_LENGTH]) -> Self {
                Self(bytes)
            }
        }

        // Hex strings for JSON, raw fixed-width bytes for BCS.
        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                if serializer.is_human_readable() {
                    serializer.serialize_str(&self.to_string())
                } else {
                    self.0.serialize(serializer)
                }
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                if deserializer.is_human_readable() {
                    let s = String::deserialize(deserializer)?;
                    Self::from_str(&s).map_err(D::Error::custom)
                } else {
                    <[u8; SUI_ADDRESS_LENGTH]>::deserialize(deserializer).map(Self)
                }
            }
        }
    };
}

address_type!(
    /// Identifier of an object, including packages.
    ObjectID
);

address_type!(SuiAddress);

impl ObjectID {
    /// Parses an object id the way user input is accepted for object arguments: the
    /// string must carry the `0x` prefix.
    pub fn from_hex_literal(literal: &str) -> Result<Self> {
        let s = literal.trim().to_lowercase();
        if !s.starts_with(HEX_PREFIX) {
            return Err(Error::InvalidAddress(literal.to_string()));
        }
        Self::from_str(&s)
    }
}

impl From<SuiAddress> for ObjectID {
    fn from(address: SuiAddress) -> Self {
        Self(address.0)
    }
}

impl From<ObjectID> for SuiAddress {
    fn from(id: ObjectID) -> Self {
        Self(id.0)
    }
}

/// Content digest of an object. Rendered as base64 in JSON.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Hash, Default, JsonSchema)]
pub struct ObjectDigest(#[schemars(with = "String")] Vec<u8>);

impl ObjectDigest {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn from_base64(s: &str) -> Result<Self> {
        BASE64
            .decode(s)
            .map(Self)
            .map_err(|e| Error::decode("ObjectDigest", e))
    }

    pub fn base64(&self) -> String {
        BASE64.encode(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for ObjectDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base64())
    }
}

impl fmt::Debug for ObjectDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "o#{}", self.base64())
    }
}

impl Serialize for ObjectDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.base64())
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for ObjectDigest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            Self::from_base64(&s).map_err(D::Error::custom)
        } else {
            Vec::<u8>::deserialize(deserializer).map(Self)
        }
    }
}

/// A pointer to one version of an object.
#[derive(Eq, PartialEq, Clone, Debug, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRef {
    pub object_id: ObjectID,
    pub version: SequenceNumber,
    pub digest: ObjectDigest,
}

impl ObjectRef {
    pub fn new(object_id: ObjectID, version: SequenceNumber, digest: ObjectDigest) -> Self {
        Self {
            object_id,
            version,
            digest,
        }
    }
}

/// 0x2, where the Sui framework modules live.
pub const SUI_FRAMEWORK_ADDRESS: SuiAddress = {
    let mut bytes = [0u8; SUI_ADDRESS_LENGTH];
    bytes[SUI_ADDRESS_LENGTH - 1] = 2;
    SuiAddress::new(bytes)
};
