// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! A name-keyed BCS schema registry.
//!
//! Every type that can be put on the wire is registered under a name, and values are
//! encoded from (and decoded into) their JSON shape by looking that name up. Composite
//! types refer to their components by name, so a `vector<T>` or a struct field only needs
//! `T` to be registered by the time a value is encoded, not when the composite is declared.
//!
//! Registration is append-only: registering a name again with the same shape is a no-op,
//! registering it with a different shape fails, so bytes produced earlier always decode the
//! same way.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use num_bigint::BigUint;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Number, Value as JsonValue};
use tracing::trace;

use crate::error::{Error, Result};

#[cfg(test)]
#[path = "unit_tests/registry_tests.rs"]
mod registry_tests;

const HEX_PREFIX: &str = "0x";

/// Largest length prefix BCS accepts.
const MAX_SEQUENCE_LENGTH: u64 = (1 << 31) - 1;

/// Deepest nesting of vectors, structs and enums a value may have.
pub const MAX_CONTAINER_DEPTH: usize = 500;

static UNIT_PAYLOAD: JsonValue = JsonValue::Null;

/// Encoding rule for one registered type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSchema {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    /// UTF-8 text, length prefixed.
    String,
    /// Fixed number of bytes, hex in JSON.
    Address(usize),
    /// Length prefixed bytes, base64 in JSON.
    Base64Bytes,
    /// Length prefixed sequence of the named element type.
    Vector(String),
    /// `(field, type)` pairs, encoded in declaration order.
    Struct(Vec<(String, String)>),
    /// `(variant, payload type)` pairs; the variant index is the position in this list.
    Enum(Vec<(String, Option<String>)>),
}

pub struct BcsRegistry {
    types: RwLock<BTreeMap<String, TypeSchema>>,
}

impl Default for BcsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BcsRegistry {
    /// A registry holding only the built-in types: `bool`, `u8` to `u256`, `string`,
    /// `utf8string` and the 20 byte `address`.
    pub fn new() -> Self {
        let builtins = [
            ("bool", TypeSchema::Bool),
            ("u8", TypeSchema::U8),
            ("u16", TypeSchema::U16),
            ("u32", TypeSchema::U32),
            ("u64", TypeSchema::U64),
            ("u128", TypeSchema::U128),
            ("u256", TypeSchema::U256),
            ("string", TypeSchema::String),
            ("utf8string", TypeSchema::String),
            ("address", TypeSchema::Address(crate::base_types::SUI_ADDRESS_LENGTH)),
        ];
        Self {
            types: RwLock::new(
                builtins
                    .into_iter()
                    .map(|(name, schema)| (name.to_string(), schema))
                    .collect(),
            ),
        }
    }

    /// Registers `schema` under `name`. Idempotent for an identical shape, an error for a
    /// different one.
    pub fn register_type(&self, name: &str, schema: TypeSchema) -> Result<&Self> {
        match self.types.write().entry(name.to_string()) {
            Entry::Occupied(existing) if existing.get() == &schema => {}
            Entry::Occupied(_) => {
                return Err(Error::ConflictingRegistration {
                    name: name.to_string(),
                })
            }
            Entry::Vacant(slot) => {
                trace!(type_name = name, ?schema, "registering bcs type");
                slot.insert(schema);
            }
        }
        Ok(self)
    }

    pub fn register_vector_type(&self, name: &str, element: &str) -> Result<&Self> {
        self.register_type(name, TypeSchema::Vector(element.to_string()))
    }

    pub fn register_address_type(&self, name: &str, length: usize) -> Result<&Self> {
        self.register_type(name, TypeSchema::Address(length))
    }

    pub fn register_struct_type(&self, name: &str, fields: &[(&str, &str)]) -> Result<&Self> {
        let fields = fields
            .iter()
            .map(|(field, type_)| (field.to_string(), type_.to_string()))
            .collect();
        self.register_type(name, TypeSchema::Struct(fields))
    }

    pub fn register_enum_type(
        &self,
        name: &str,
        variants: &[(&str, Option<&str>)],
    ) -> Result<&Self> {
        let variants = variants
            .iter()
            .map(|(variant, payload)| (variant.to_string(), payload.map(str::to_string)))
            .collect();
        self.register_type(name, TypeSchema::Enum(variants))
    }

    pub fn has_type(&self, name: &str) -> bool {
        self.types.read().contains_key(name)
    }

    /// Encodes the JSON shape of a value as the registered type `type_name`.
    pub fn ser(&self, type_name: &str, value: &JsonValue) -> Result<Vec<u8>> {
        let types = self.types.read();
        let mut out = Vec::new();
        encode(&types, type_name, value, &mut out, 0)?;
        Ok(out)
    }

    /// Decodes `bytes` as `type_name`. All of the input must be consumed.
    pub fn de(&self, type_name: &str, bytes: &[u8]) -> Result<JsonValue> {
        let types = self.types.read();
        let mut reader = BcsReader { bytes };
        let value = decode(&types, type_name, &mut reader, 0)?;
        if !reader.bytes.is_empty() {
            return Err(Error::decode(
                type_name,
                format!("{} trailing bytes", reader.bytes.len()),
            ));
        }
        Ok(value)
    }

    /// Encodes a typed value through its JSON representation.
    pub fn ser_value<T: Serialize>(&self, type_name: &str, value: &T) -> Result<Vec<u8>> {
        self.ser(type_name, &serde_json::to_value(value)?)
    }

    pub fn de_value<T: DeserializeOwned>(&self, type_name: &str, bytes: &[u8]) -> Result<T> {
        Ok(serde_json::from_value(self.de(type_name, bytes)?)?)
    }
}

fn lookup<'a>(types: &'a BTreeMap<String, TypeSchema>, name: &str) -> Result<&'a TypeSchema> {
    types
        .get(name)
        .ok_or_else(|| Error::UnknownType(name.to_string()))
}

fn write_length(out: &mut Vec<u8>, type_name: &str, len: usize) -> Result<()> {
    if len as u64 > MAX_SEQUENCE_LENGTH {
        return Err(Error::encode(type_name, format!("length {len} exceeds the limit")));
    }
    leb128::write::unsigned(out, len as u64).map_err(|e| Error::encode(type_name, e))?;
    Ok(())
}

/// Reads an unsigned integer from a JSON number, a decimal string or a `0x` hex string.
pub(crate) fn unsigned_value(value: &JsonValue) -> Option<BigUint> {
    match value {
        JsonValue::Number(n) => n.as_u64().map(BigUint::from),
        JsonValue::String(s) => {
            let s = s.trim();
            match s.strip_prefix(HEX_PREFIX) {
                Some(digits) => BigUint::parse_bytes(digits.as_bytes(), 16),
                None => BigUint::parse_bytes(s.as_bytes(), 10),
            }
        }
        _ => None,
    }
}

fn address_bytes(type_name: &str, value: &JsonValue, length: usize) -> Result<Vec<u8>> {
    let JsonValue::String(s) = value else {
        return Err(Error::type_mismatch("address", value));
    };
    let lowered = s.trim().to_lowercase();
    let digits = lowered.strip_prefix(HEX_PREFIX).unwrap_or(&lowered);
    if digits.is_empty() || digits.len() > length * 2 {
        return Err(Error::InvalidAddress(s.clone()));
    }
    let padded = format!("{digits:0>width$}", width = length * 2);
    hex::decode(padded).map_err(|e| Error::encode(type_name, e))
}

fn encode(
    types: &BTreeMap<String, TypeSchema>,
    type_name: &str,
    value: &JsonValue,
    out: &mut Vec<u8>,
    depth: usize,
) -> Result<()> {
    if depth > MAX_CONTAINER_DEPTH {
        return Err(Error::encode(type_name, "exceeds max depth"));
    }
    match lookup(types, type_name)? {
        TypeSchema::U8 => write_uint(out, type_name, value, 1)?,
        TypeSchema::U16 => write_uint(out, type_name, value, 2)?,
        TypeSchema::U32 => write_uint(out, type_name, value, 4)?,
        TypeSchema::U64 => write_uint(out, type_name, value, 8)?,
        TypeSchema::U128 => write_uint(out, type_name, value, 16)?,
        TypeSchema::U256 => write_uint(out, type_name, value, 32)?,
        TypeSchema::Bool => match value {
            JsonValue::Bool(b) => out.push(u8::from(*b)),
            _ => return Err(Error::type_mismatch("boolean", value)),
        },
        TypeSchema::String => match value {
            JsonValue::String(s) => {
                write_length(out, type_name, s.len())?;
                out.extend_from_slice(s.as_bytes());
            }
            _ => return Err(Error::type_mismatch("string", value)),
        },
        TypeSchema::Address(length) => {
            out.extend_from_slice(&address_bytes(type_name, value, *length)?);
        }
        TypeSchema::Base64Bytes => match value {
            JsonValue::String(s) => {
                let bytes = BASE64.decode(s).map_err(|e| Error::encode(type_name, e))?;
                write_length(out, type_name, bytes.len())?;
                out.extend_from_slice(&bytes);
            }
            _ => return Err(Error::type_mismatch("base64 string", value)),
        },
        TypeSchema::Vector(element) => match value {
            JsonValue::Array(items) => {
                write_length(out, type_name, items.len())?;
                for item in items {
                    encode(types, element, item, out, depth + 1)?;
                }
            }
            _ => return Err(Error::type_mismatch("array", value)),
        },
        TypeSchema::Struct(fields) => {
            let JsonValue::Object(map) = value else {
                return Err(Error::type_mismatch(format!("struct {type_name}"), value));
            };
            for (field, field_type) in fields {
                let field_value = map
                    .get(field)
                    .ok_or_else(|| Error::encode(type_name, format!("missing field `{field}`")))?;
                encode(types, field_type, field_value, out, depth + 1)?;
            }
        }
        TypeSchema::Enum(variants) => {
            // Unit variants may be given as a bare string, as serde renders them.
            let mut entries = value.as_object().into_iter().flatten();
            let (variant, payload) = match (value, entries.next(), entries.next()) {
                (JsonValue::String(name), _, _) => (name.as_str(), &UNIT_PAYLOAD),
                (_, Some((name, payload)), None) => (name.as_str(), payload),
                _ => return Err(Error::type_mismatch(format!("enum {type_name}"), value)),
            };
            let index = variants
                .iter()
                .position(|(name, _)| name == variant)
                .ok_or_else(|| Error::encode(type_name, format!("unknown variant `{variant}`")))?;
            write_length(out, type_name, index)?;
            match &variants[index].1 {
                Some(payload_type) => encode(types, payload_type, payload, out, depth + 1)?,
                None if payload.is_null() => {}
                None => {
                    return Err(Error::encode(
                        type_name,
                        format!("variant `{variant}` carries no value"),
                    ))
                }
            }
        }
    }
    Ok(())
}

fn write_uint(out: &mut Vec<u8>, type_name: &str, value: &JsonValue, width: usize) -> Result<()> {
    let n = unsigned_value(value).ok_or_else(|| Error::type_mismatch("number", value))?;
    if n.bits() > (width * 8) as u64 {
        return Err(Error::encode(type_name, format!("{value} is out of range")));
    }
    let mut bytes = n.to_bytes_le();
    bytes.resize(width, 0);
    out.extend_from_slice(&bytes);
    Ok(())
}

struct BcsReader<'a> {
    bytes: &'a [u8],
}

impl<'a> BcsReader<'a> {
    fn read_bytes(&mut self, type_name: &str, n: usize) -> Result<&'a [u8]> {
        if self.bytes.len() < n {
            return Err(Error::decode(type_name, "unexpected end of input"));
        }
        let (head, tail) = self.bytes.split_at(n);
        self.bytes = tail;
        Ok(head)
    }

    /// Reads a ULEB128 length. Only the shortest encoding of a value is accepted.
    fn read_length(&mut self, type_name: &str) -> Result<usize> {
        let before = self.bytes.len();
        let len = leb128::read::unsigned(&mut self.bytes).map_err(|e| Error::decode(type_name, e))?;
        let canonical = leb128::write::unsigned(&mut std::io::sink(), len)
            .map_err(|e| Error::decode(type_name, e))?;
        if before - self.bytes.len() != canonical {
            return Err(Error::decode(type_name, "non-canonical uleb128 length"));
        }
        if len > MAX_SEQUENCE_LENGTH {
            return Err(Error::decode(type_name, format!("length {len} exceeds the limit")));
        }
        Ok(len as usize)
    }
}

fn decode(
    types: &BTreeMap<String, TypeSchema>,
    type_name: &str,
    reader: &mut BcsReader<'_>,
    depth: usize,
) -> Result<JsonValue> {
    if depth > MAX_CONTAINER_DEPTH {
        return Err(Error::decode(type_name, "exceeds max depth"));
    }
    Ok(match lookup(types, type_name)? {
        TypeSchema::U8 => read_uint(reader, type_name, 1)?,
        TypeSchema::U16 => read_uint(reader, type_name, 2)?,
        TypeSchema::U32 => read_uint(reader, type_name, 4)?,
        TypeSchema::U64 => read_uint(reader, type_name, 8)?,
        TypeSchema::U128 => read_uint(reader, type_name, 16)?,
        TypeSchema::U256 => read_uint(reader, type_name, 32)?,
        TypeSchema::Bool => match reader.read_bytes(type_name, 1)?[0] {
            0 => JsonValue::Bool(false),
            1 => JsonValue::Bool(true),
            other => return Err(Error::decode(type_name, format!("invalid bool byte {other}"))),
        },
        TypeSchema::String => {
            let len = reader.read_length(type_name)?;
            let bytes = reader.read_bytes(type_name, len)?;
            let s = std::str::from_utf8(bytes).map_err(|e| Error::decode(type_name, e))?;
            JsonValue::String(s.to_string())
        }
        TypeSchema::Address(length) => {
            let bytes = reader.read_bytes(type_name, *length)?;
            JsonValue::String(format!("{HEX_PREFIX}{}", hex::encode(bytes)))
        }
        TypeSchema::Base64Bytes => {
            let len = reader.read_length(type_name)?;
            JsonValue::String(BASE64.encode(reader.read_bytes(type_name, len)?))
        }
        TypeSchema::Vector(element) => {
            let len = reader.read_length(type_name)?;
            let mut items = Vec::with_capacity(len.min(reader.bytes.len()));
            for _ in 0..len {
                items.push(decode(types, element, reader, depth + 1)?);
            }
            JsonValue::Array(items)
        }
        TypeSchema::Struct(fields) => {
            let mut map = Map::new();
            for (field, field_type) in fields {
                map.insert(field.clone(), decode(types, field_type, reader, depth + 1)?);
            }
            JsonValue::Object(map)
        }
        TypeSchema::Enum(variants) => {
            let index = reader.read_length(type_name)?;
            let (variant, payload) = variants
                .get(index)
                .ok_or_else(|| Error::decode(type_name, format!("unknown variant index {index}")))?;
            match payload {
                Some(payload_type) => {
                    let mut map = Map::new();
                    map.insert(variant.clone(), decode(types, payload_type, reader, depth + 1)?);
                    JsonValue::Object(map)
                }
                None => JsonValue::String(variant.clone()),
            }
        }
    })
}

fn read_uint(reader: &mut BcsReader<'_>, type_name: &str, width: usize) -> Result<JsonValue> {
    let n = BigUint::from_bytes_le(reader.read_bytes(type_name, width)?);
    // Up to u64 fits a JSON number, wider integers are rendered as decimal strings.
    Ok(match u64::try_from(&n) {
        Ok(small) if width <= 8 => JsonValue::Number(Number::from(small)),
        _ => JsonValue::String(n.to_string()),
    })
}
