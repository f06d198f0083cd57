// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::base_types::ObjectID;
use crate::json::SuiJsonValueError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Move call argument serialization error: expect {expected} arguments, received {received} arguments")]
    ArgumentCountMismatch { expected: usize, received: usize },

    #[error("Move call argument serialization error: unknown pure normalized type {0}")]
    UnsupportedType(String),

    #[error("Expect {value} to be {expected}, received {}", json_kind(.value))]
    TypeMismatch { expected: String, value: JsonValue },

    #[error("Move call argument serialization error: expect the argument at position {idx} to be {expected}, got {value}")]
    MalformedObjectArgument {
        idx: usize,
        expected: &'static str,
        value: JsonValue,
    },

    #[error("Shared object {0} does not report the version it was shared at")]
    MissingInitialSharedVersion(ObjectID),

    #[error("Invalid address or object id {0:?}")]
    InvalidAddress(String),

    #[error("Invalid RPC API version {0:?}, expected major.minor.patch")]
    InvalidRpcApiVersion(String),

    #[error("Type {0} is not registered")]
    UnknownType(String),

    #[error("Type {name} is already registered with a different shape")]
    ConflictingRegistration { name: String },

    #[error("Unable to encode value as {type_name}: {reason}")]
    Encode { type_name: String, reason: String },

    #[error("Unable to decode bytes as {type_name}: {reason}")]
    Decode { type_name: String, reason: String },

    #[error(transparent)]
    InvalidJsonValue(#[from] SuiJsonValueError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Failures of the data reader are surfaced as they are.
    #[error(transparent)]
    DataReader(#[from] anyhow::Error),
}

impl Error {
    pub(crate) fn type_mismatch(expected: impl Into<String>, value: &JsonValue) -> Self {
        Error::TypeMismatch {
            expected: expected.into(),
            value: value.clone(),
        }
    }

    pub(crate) fn encode(type_name: &str, reason: impl ToString) -> Self {
        Error::Encode {
            type_name: type_name.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn decode(type_name: &str, reason: impl ToString) -> Self {
        Error::Decode {
            type_name: type_name.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Name of the JSON kind of `value`, used in mismatch messages.
pub(crate) fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
