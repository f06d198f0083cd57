// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Maps the declared type of a pure Move call parameter to the registry type its argument
//! is encoded with.

use serde_json::Value as JsonValue;

use crate::base_types::is_valid_sui_address;
use crate::error::{Error, Result};
use crate::normalized::SuiMoveNormalizedType;
use crate::registry::{unsigned_value, BcsRegistry};

#[cfg(test)]
#[path = "unit_tests/resolver_tests.rs"]
mod resolver_tests;

/// The registry type name a pure argument of type `normalized_type` is encoded with.
///
/// When `arg` is given it is checked against the declared type. It is omitted when
/// decoding, and for the elements of an empty vector, in which case no validation happens.
/// `vector<u8>` resolves to `string` when the argument is a string or absent. Vector
/// instantiations are registered on first use.
pub fn pure_serialization_type(
    registry: &BcsRegistry,
    normalized_type: &SuiMoveNormalizedType,
    arg: Option<&JsonValue>,
) -> Result<String> {
    resolve(registry, normalized_type, arg, true)
}

/// Like [`pure_serialization_type`] without an argument, but keeps `vector<u8>` as raw
/// bytes. Used to decode byte vectors that are not valid UTF-8.
pub(crate) fn byte_vector_serialization_type(
    registry: &BcsRegistry,
    normalized_type: &SuiMoveNormalizedType,
) -> Result<String> {
    resolve(registry, normalized_type, None, false)
}

fn resolve(
    registry: &BcsRegistry,
    normalized_type: &SuiMoveNormalizedType,
    arg: Option<&JsonValue>,
    bytes_as_string: bool,
) -> Result<String> {
    match normalized_type {
        SuiMoveNormalizedType::Bool => {
            check_arg_val(arg, "boolean", JsonValue::is_boolean)?;
            Ok("bool".to_string())
        }
        SuiMoveNormalizedType::U8
        | SuiMoveNormalizedType::U16
        | SuiMoveNormalizedType::U32
        | SuiMoveNormalizedType::U64
        | SuiMoveNormalizedType::U128
        | SuiMoveNormalizedType::U256 => {
            check_arg_val(arg, "number", |v| unsigned_value(v).is_some())?;
            Ok(normalized_type.to_string())
        }
        SuiMoveNormalizedType::Address => {
            check_arg_val(arg, "valid SUI address", |v| {
                v.as_str().is_some_and(is_valid_sui_address)
            })?;
            Ok("address".to_string())
        }
        SuiMoveNormalizedType::Vector(inner) => {
            if bytes_as_string
                && **inner == SuiMoveNormalizedType::U8
                && matches!(arg, None | Some(JsonValue::String(_)))
            {
                return Ok("string".to_string());
            }
            let first = match arg {
                None => None,
                Some(JsonValue::Array(items)) => items.first(),
                Some(other) => return Err(Error::type_mismatch("array", other)),
            };
            let inner_type = resolve(registry, inner, first, bytes_as_string)?;
            let vector_type = format!("vector<{inner_type}>");
            registry.register_vector_type(&vector_type, &inner_type)?;
            Ok(vector_type)
        }
        SuiMoveNormalizedType::Signer
        | SuiMoveNormalizedType::Struct { .. }
        | SuiMoveNormalizedType::TypeParameter(_)
        | SuiMoveNormalizedType::Reference(_)
        | SuiMoveNormalizedType::MutableReference(_) => {
            Err(Error::UnsupportedType(normalized_type.to_string()))
        }
    }
}

fn check_arg_val(
    arg: Option<&JsonValue>,
    expected: &str,
    check: impl Fn(&JsonValue) -> bool,
) -> Result<()> {
    match arg {
        Some(value) if !check(value) => Err(Error::type_mismatch(expected, value)),
        _ => Ok(()),
    }
}
