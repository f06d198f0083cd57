// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::base_types::{SuiAddress, SUI_FRAMEWORK_ADDRESS};

#[cfg(test)]
#[path = "unit_tests/normalized_tests.rs"]
mod normalized_tests;

pub const TX_CONTEXT_MODULE_NAME: &str = "tx_context";
pub const TX_CONTEXT_STRUCT_NAME: &str = "TxContext";

pub type SuiMoveTypeParameterIndex = u16;

/// A parameter type as declared by a Move function, in the shape fullnodes return it.
#[derive(Serialize, Deserialize, Debug, JsonSchema, Clone, PartialEq, Eq)]
pub enum SuiMoveNormalizedType {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    Address,
    Signer,
    Struct {
        #[serde(flatten)]
        inner: Box<SuiMoveNormalizedStructType>,
    },
    Vector(Box<SuiMoveNormalizedType>),
    TypeParameter(SuiMoveTypeParameterIndex),
    Reference(Box<SuiMoveNormalizedType>),
    MutableReference(Box<SuiMoveNormalizedType>),
}

#[derive(Serialize, Deserialize, Debug, JsonSchema, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SuiMoveNormalizedStructType {
    pub address: String,
    pub module: String,
    pub name: String,
    #[serde(default)]
    pub type_arguments: Vec<SuiMoveNormalizedType>,
}

#[derive(Serialize, Deserialize, Debug, JsonSchema, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SuiMoveNormalizedFunction {
    pub is_entry: bool,
    pub parameters: Vec<SuiMoveNormalizedType>,
    #[serde(default)]
    pub return_: Vec<SuiMoveNormalizedType>,
}

impl SuiMoveNormalizedType {
    pub fn new_struct(
        address: String,
        module: String,
        name: String,
        type_arguments: Vec<SuiMoveNormalizedType>,
    ) -> Self {
        SuiMoveNormalizedType::Struct {
            inner: Box::new(SuiMoveNormalizedStructType {
                address,
                module,
                name,
                type_arguments,
            }),
        }
    }

    /// The struct this type names, looking through one level of reference.
    pub fn extract_struct_tag(&self) -> Option<&SuiMoveNormalizedStructType> {
        match self {
            SuiMoveNormalizedType::Struct { inner } => Some(inner),
            SuiMoveNormalizedType::Reference(inner)
            | SuiMoveNormalizedType::MutableReference(inner) => match inner.as_ref() {
                SuiMoveNormalizedType::Struct { inner } => Some(inner),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn extract_mutable_reference(&self) -> Option<&SuiMoveNormalizedType> {
        match self {
            SuiMoveNormalizedType::MutableReference(inner) => Some(inner),
            _ => None,
        }
    }

    /// The struct of a `vector<S>` parameter.
    pub fn extract_vector_struct(&self) -> Option<&SuiMoveNormalizedStructType> {
        match self {
            SuiMoveNormalizedType::Vector(inner) => match inner.as_ref() {
                SuiMoveNormalizedType::Struct { inner } => Some(inner),
                _ => None,
            },
            _ => None,
        }
    }

    /// Whether this is `&mut 0x2::tx_context::TxContext`, the context entry functions may
    /// take as their last parameter without the caller supplying it.
    pub fn is_tx_context(&self) -> bool {
        let Some(SuiMoveNormalizedType::Struct { inner }) = self.extract_mutable_reference()
        else {
            return false;
        };
        inner.module == TX_CONTEXT_MODULE_NAME
            && inner.name == TX_CONTEXT_STRUCT_NAME
            && SuiAddress::from_str(&inner.address).is_ok_and(|a| a == SUI_FRAMEWORK_ADDRESS)
    }
}

/// The parameters a caller has to supply: all declared parameters except a trailing
/// transaction context.
pub fn user_parameters(parameters: &[SuiMoveNormalizedType]) -> &[SuiMoveNormalizedType] {
    match parameters.split_last() {
        Some((last, rest)) if last.is_tx_context() => rest,
        _ => parameters,
    }
}

impl fmt::Display for SuiMoveNormalizedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuiMoveNormalizedType::Bool => write!(f, "bool"),
            SuiMoveNormalizedType::U8 => write!(f, "u8"),
            SuiMoveNormalizedType::U16 => write!(f, "u16"),
            SuiMoveNormalizedType::U32 => write!(f, "u32"),
            SuiMoveNormalizedType::U64 => write!(f, "u64"),
            SuiMoveNormalizedType::U128 => write!(f, "u128"),
            SuiMoveNormalizedType::U256 => write!(f, "u256"),
            SuiMoveNormalizedType::Address => write!(f, "address"),
            SuiMoveNormalizedType::Signer => write!(f, "signer"),
            SuiMoveNormalizedType::Struct { inner } => {
                write!(f, "{}::{}::{}", inner.address, inner.module, inner.name)?;
                if !inner.type_arguments.is_empty() {
                    write!(f, "<{}>", inner.type_arguments.iter().join(", "))?;
                }
                Ok(())
            }
            SuiMoveNormalizedType::Vector(inner) => write!(f, "vector<{inner}>"),
            SuiMoveNormalizedType::TypeParameter(idx) => write!(f, "T{idx}"),
            SuiMoveNormalizedType::Reference(inner) => write!(f, "&{inner}"),
            SuiMoveNormalizedType::MutableReference(inner) => write!(f, "&mut {inner}"),
        }
    }
}
