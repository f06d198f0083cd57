// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Marshalling of Move call arguments into their BCS wire form.
//!
//! A [`CallArgSerializer`] fetches the signature of the called function from a
//! [`DataReader`], pairs every loosely typed JSON argument with its declared parameter and
//! turns it into a [`CallArg`]: struct parameters become object references, vectors of
//! structs become vectors of object references and everything else is encoded in place
//! through a [`BcsRegistry`]. The same registry decodes arguments back for display.

pub mod base_types;
pub mod call_args;
pub mod config;
mod error;
pub mod json;
pub mod normalized;
pub mod object_resolver;
pub mod registry;
pub mod resolver;
pub mod sui_schema;
pub mod transaction;

#[cfg(test)]
#[path = "unit_tests/utils.rs"]
mod test_utils;

pub use call_args::CallArgSerializer;
pub use config::CallArgSerializerConfig;
pub use error::{Error, Result};
pub use json::SuiJsonValue;
pub use object_resolver::{DataReader, RpcApiVersion, SharedObjectApi, SuiObjectInfo};
pub use registry::BcsRegistry;
pub use transaction::{extract_object_ids, CallArg, MoveCallTransaction, MoveCallTx, ObjectArg};
