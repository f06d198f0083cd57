// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::base_types::{ObjectDigest, ObjectID, ObjectRef, SequenceNumber, SuiAddress};
use crate::error::{Error, Result};
use crate::normalized::SuiMoveNormalizedFunction;
use crate::sui_schema;
use crate::transaction::{ObjectArg, SharedObjectRef};

#[cfg(test)]
#[path = "unit_tests/object_resolver_tests.rs"]
mod object_resolver_tests;

/// Fullnode queries the argument serializer depends on.
#[async_trait]
pub trait DataReader: Send + Sync {
    async fn get_normalized_move_function(
        &self,
        package: ObjectID,
        module: &str,
        function: &str,
    ) -> Result<SuiMoveNormalizedFunction, anyhow::Error>;

    async fn get_object(&self, object_id: ObjectID) -> Result<SuiObjectInfo, anyhow::Error>;

    /// `None` when the fullnode does not report a version.
    async fn get_rpc_api_version(&self) -> Result<Option<RpcApiVersion>, anyhow::Error>;
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Owner {
    AddressOwner(SuiAddress),
    ObjectOwner(SuiAddress),
    Shared {
        /// Missing on fullnodes that predate initial shared versions.
        #[serde(default)]
        initial_shared_version: Option<SequenceNumber>,
    },
    Immutable,
}

impl Owner {
    pub fn is_shared(&self) -> bool {
        matches!(self, Owner::Shared { .. })
    }
}

/// The metadata of one object needed to refer to it from a transaction.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuiObjectInfo {
    pub object_id: ObjectID,
    pub version: SequenceNumber,
    pub digest: ObjectDigest,
    pub owner: Owner,
}

impl SuiObjectInfo {
    pub fn object_ref(&self) -> ObjectRef {
        ObjectRef::new(self.object_id, self.version, self.digest.clone())
    }
}

#[derive(
    Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Copy, Hash, SerializeDisplay, DeserializeFromStr,
)]
pub struct RpcApiVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl RpcApiVersion {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

/// The first version whose fullnodes expect shared objects with their initial shared
/// version.
pub const INITIAL_SHARED_VERSION_RPC_API: RpcApiVersion = RpcApiVersion::new(0, 12, 0);

impl FromStr for RpcApiVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.trim().split('.').map(u64::from_str);
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(Ok(major)), Some(Ok(minor)), Some(Ok(patch)), None) => {
                Ok(Self::new(major, minor, patch))
            }
            _ => Err(Error::InvalidRpcApiVersion(s.to_string())),
        }
    }
}

impl fmt::Display for RpcApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// How shared objects are referred to, which depends on the fullnode being talked to.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum SharedObjectApi {
    /// Shared objects are referred to by id only.
    Deprecated,
    /// Shared objects carry the version they were shared at.
    InitialVersion,
}

impl SharedObjectApi {
    /// Fullnodes below `threshold` get the deprecated form. An unknown version is assumed to
    /// be current.
    pub fn from_rpc_api_version(version: Option<RpcApiVersion>, threshold: RpcApiVersion) -> Self {
        match version {
            Some(version) if version < threshold => SharedObjectApi::Deprecated,
            _ => SharedObjectApi::InitialVersion,
        }
    }

    pub fn object_arg(&self, object: &SuiObjectInfo) -> Result<ObjectArg> {
        Ok(match (self, object.owner) {
            (SharedObjectApi::Deprecated, Owner::Shared { .. }) => {
                ObjectArg::SharedDeprecated(object.object_id)
            }
            (SharedObjectApi::InitialVersion, Owner::Shared { initial_shared_version }) => {
                let initial_shared_version = initial_shared_version
                    .ok_or(Error::MissingInitialSharedVersion(object.object_id))?;
                ObjectArg::Shared(SharedObjectRef {
                    object_id: object.object_id,
                    initial_shared_version,
                })
            }
            (_, Owner::AddressOwner(_) | Owner::ObjectOwner(_) | Owner::Immutable) => {
                ObjectArg::ImmOrOwned(object.object_ref())
            }
        })
    }

    pub fn call_arg_type(&self) -> &'static str {
        match self {
            SharedObjectApi::Deprecated => sui_schema::CALL_ARG_DEPRECATED,
            SharedObjectApi::InitialVersion => sui_schema::CALL_ARG,
        }
    }

    pub fn move_call_type(&self) -> &'static str {
        match self {
            SharedObjectApi::Deprecated => sui_schema::MOVE_CALL_TX_DEPRECATED,
            SharedObjectApi::InitialVersion => sui_schema::MOVE_CALL_TX,
        }
    }

    pub fn transaction_data_type(&self) -> &'static str {
        match self {
            SharedObjectApi::Deprecated => sui_schema::TRANSACTION_DATA_DEPRECATED,
            SharedObjectApi::InitialVersion => sui_schema::TRANSACTION_DATA,
        }
    }
}
