// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::collections::VecDeque;
use std::fmt::{self, Debug, Formatter};

use schemars::JsonSchema;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value as JsonValue};

use crate::base_types::ObjectID;

#[cfg(test)]
#[path = "unit_tests/json_tests.rs"]
mod json_tests;

/// A list of error categories encountered when validating argument values.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum SuiJsonValueErrorKind {
    /// JSON value must be of specific types.
    ValueTypeNotAllowed,

    /// JSON arrays must be homogeneous.
    ArrayNotHomogeneous,
}

#[derive(Debug)]
pub struct SuiJsonValueError {
    kind: SuiJsonValueErrorKind,
    val: JsonValue,
}

impl SuiJsonValueError {
    pub fn new(val: &JsonValue, kind: SuiJsonValueErrorKind) -> Self {
        Self {
            kind,
            val: val.clone(),
        }
    }

    pub fn kind(&self) -> SuiJsonValueErrorKind {
        self.kind
    }
}

impl std::error::Error for SuiJsonValueError {}

impl fmt::Display for SuiJsonValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let err_str = match self.kind {
            SuiJsonValueErrorKind::ValueTypeNotAllowed => {
                format!("JSON value type {} not allowed.", self.val)
            }
            SuiJsonValueErrorKind::ArrayNotHomogeneous => {
                format!("Array not homogeneous. Mismatched value: {}.", self.val)
            }
        };
        write!(f, "{err_str}")
    }
}

/// A loosely typed Move call argument, as supplied by a caller.
///
/// Accepted shapes are booleans, unsigned integers, strings and arrays whose elements all
/// share one shape at every nesting level. Integers too wide for a JSON number are passed
/// as decimal strings.
#[derive(Eq, PartialEq, Clone, Serialize, JsonSchema)]
pub struct SuiJsonValue(JsonValue);

impl SuiJsonValue {
    pub fn new(json_value: JsonValue) -> Result<SuiJsonValue, SuiJsonValueError> {
        match &json_value {
            // No checks needed for Bool and String
            JsonValue::Bool(_) | JsonValue::String(_) => (),
            JsonValue::Number(n) => {
                if !n.is_u64() {
                    return Err(SuiJsonValueError::new(
                        &json_value,
                        SuiJsonValueErrorKind::ValueTypeNotAllowed,
                    ));
                }
            }
            JsonValue::Array(_) => check_valid_homogeneous(&json_value)?,
            JsonValue::Null | JsonValue::Object(_) => {
                return Err(SuiJsonValueError::new(
                    &json_value,
                    SuiJsonValueErrorKind::ValueTypeNotAllowed,
                ))
            }
        };
        Ok(Self(json_value))
    }

    pub fn from_object_id(id: ObjectID) -> SuiJsonValue {
        Self(JsonValue::String(id.to_string()))
    }

    pub fn to_json_value(&self) -> JsonValue {
        self.0.clone()
    }

    pub fn as_json_value(&self) -> &JsonValue {
        &self.0
    }
}

impl TryFrom<JsonValue> for SuiJsonValue {
    type Error = SuiJsonValueError;

    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for SuiJsonValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = JsonValue::deserialize(deserializer)?;
        Self::new(value).map_err(D::Error::custom)
    }
}

impl Debug for SuiJsonValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SuiJsonValue {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, anyhow::Error> {
        // Wrap input with json! if serde_json fails, the failure usually cause by missing quote escapes.
        let value = serde_json::from_str(s).or_else(|_| serde_json::from_value(json!(s)))?;
        Ok(SuiJsonValue::new(value)?)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Hash)]
enum ValidJsonType {
    Bool,
    Number,
    String,
    Array,
    // Matches any type
    Any,
}

/// Check via BFS
/// The invariant is that all types at a given level must be the same or be empty, and all must be valid
pub fn check_valid_homogeneous(val: &JsonValue) -> Result<(), SuiJsonValueError> {
    let mut deq: VecDeque<&JsonValue> = VecDeque::new();
    deq.push_back(val);
    check_valid_homogeneous_rec(&mut deq)
}

fn check_valid_homogeneous_rec(curr_q: &mut VecDeque<&JsonValue>) -> Result<(), SuiJsonValueError> {
    if curr_q.is_empty() {
        return Ok(());
    }
    // Queue for the next level
    let mut next_q = VecDeque::new();
    // The types at this level must be the same
    let mut level_type = ValidJsonType::Any;

    while let Some(v) = curr_q.pop_front() {
        let curr = match v {
            JsonValue::Bool(_) => ValidJsonType::Bool,
            JsonValue::Number(x) if x.is_u64() => ValidJsonType::Number,
            JsonValue::String(_) => ValidJsonType::String,
            JsonValue::Array(w) => {
                w.iter().for_each(|t| next_q.push_back(t));
                ValidJsonType::Array
            }
            _ => {
                return Err(SuiJsonValueError::new(
                    v,
                    SuiJsonValueErrorKind::ValueTypeNotAllowed,
                ))
            }
        };

        if level_type == ValidJsonType::Any {
            level_type = curr;
        } else if level_type != curr {
            return Err(SuiJsonValueError::new(
                v,
                SuiJsonValueErrorKind::ArrayNotHomogeneous,
            ));
        }
    }
    check_valid_homogeneous_rec(&mut next_q)
}
