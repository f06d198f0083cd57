// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::base_types::{ObjectDigest, ObjectID, SequenceNumber, SuiAddress, SUI_ADDRESS_LENGTH};
use crate::json::SuiJsonValue;
use crate::normalized::{SuiMoveNormalizedFunction, SuiMoveNormalizedType};
use crate::object_resolver::{DataReader, Owner, RpcApiVersion, SuiObjectInfo};
use crate::transaction::MoveCallTransaction;
use crate::CallArgSerializer;

pub const MODULE: &str = "example";

/// A fullnode in memory. Lookups of unknown functions or objects fail.
#[derive(Default)]
pub struct InMemoryDataReader {
    functions: BTreeMap<(ObjectID, String, String), SuiMoveNormalizedFunction>,
    objects: BTreeMap<ObjectID, SuiObjectInfo>,
    delays: BTreeMap<ObjectID, Duration>,
    rpc_api_version: Option<RpcApiVersion>,
    object_lookups: Arc<AtomicUsize>,
}

impl InMemoryDataReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_function(
        mut self,
        package: ObjectID,
        function: &str,
        parameters: Vec<SuiMoveNormalizedType>,
    ) -> Self {
        self.functions.insert(
            (package, MODULE.to_string(), function.to_string()),
            SuiMoveNormalizedFunction {
                is_entry: true,
                parameters,
                return_: vec![],
            },
        );
        self
    }

    pub fn with_object(mut self, object: SuiObjectInfo) -> Self {
        self.objects.insert(object.object_id, object);
        self
    }

    /// Delays every lookup of `id` by `delay`.
    pub fn with_delay(mut self, id: ObjectID, delay: Duration) -> Self {
        self.delays.insert(id, delay);
        self
    }

    pub fn with_rpc_api_version(mut self, version: &str) -> Self {
        self.rpc_api_version = Some(version.parse().unwrap());
        self
    }

    /// Counts the object lookups made through this reader.
    pub fn object_lookups(&self) -> Arc<AtomicUsize> {
        self.object_lookups.clone()
    }
}

#[async_trait]
impl DataReader for InMemoryDataReader {
    async fn get_normalized_move_function(
        &self,
        package: ObjectID,
        module: &str,
        function: &str,
    ) -> Result<SuiMoveNormalizedFunction, anyhow::Error> {
        self.functions
            .get(&(package, module.to_string(), function.to_string()))
            .cloned()
            .ok_or_else(|| anyhow!("function {package}::{module}::{function} not found"))
    }

    async fn get_object(&self, object_id: ObjectID) -> Result<SuiObjectInfo, anyhow::Error> {
        self.object_lookups.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(&object_id) {
            tokio::time::sleep(*delay).await;
        }
        self.objects
            .get(&object_id)
            .cloned()
            .ok_or_else(|| anyhow!("object {object_id} not found"))
    }

    async fn get_rpc_api_version(&self) -> Result<Option<RpcApiVersion>, anyhow::Error> {
        Ok(self.rpc_api_version)
    }
}

pub fn serializer(reader: InMemoryDataReader) -> CallArgSerializer {
    CallArgSerializer::new(Arc::new(reader)).unwrap()
}

pub fn object_id(n: u8) -> ObjectID {
    let mut bytes = [0u8; SUI_ADDRESS_LENGTH];
    bytes[0] = 0xab;
    bytes[SUI_ADDRESS_LENGTH - 1] = n;
    ObjectID::new(bytes)
}

pub fn package_id() -> ObjectID {
    object_id(0xee)
}

pub fn digest(n: u8) -> ObjectDigest {
    ObjectDigest::new(vec![n; 32])
}

pub fn owned_object(id: ObjectID, version: SequenceNumber) -> SuiObjectInfo {
    SuiObjectInfo {
        object_id: id,
        version,
        digest: digest(version as u8),
        owner: Owner::AddressOwner(SuiAddress::from(object_id(0x01))),
    }
}

pub fn shared_object(id: ObjectID, initial_shared_version: Option<SequenceNumber>) -> SuiObjectInfo {
    SuiObjectInfo {
        object_id: id,
        version: 9,
        digest: digest(9),
        owner: Owner::Shared {
            initial_shared_version,
        },
    }
}

pub fn package_object() -> SuiObjectInfo {
    SuiObjectInfo {
        object_id: package_id(),
        version: 1,
        digest: digest(1),
        owner: Owner::Immutable,
    }
}

pub fn struct_type(address: &str, module: &str, name: &str) -> SuiMoveNormalizedType {
    SuiMoveNormalizedType::new_struct(
        address.to_string(),
        module.to_string(),
        name.to_string(),
        vec![],
    )
}

pub fn coin_type() -> SuiMoveNormalizedType {
    SuiMoveNormalizedType::new_struct(
        "0x2".to_string(),
        "coin".to_string(),
        "Coin".to_string(),
        vec![struct_type("0x2", "sui", "SUI")],
    )
}

pub fn tx_context_type() -> SuiMoveNormalizedType {
    SuiMoveNormalizedType::MutableReference(Box::new(struct_type(
        "0x2",
        "tx_context",
        "TxContext",
    )))
}

pub fn move_call(function: &str, args: Vec<JsonValue>) -> MoveCallTransaction {
    MoveCallTransaction {
        package_object_id: package_id(),
        module: MODULE.to_string(),
        function: function.to_string(),
        type_arguments: vec![],
        arguments: args
            .into_iter()
            .map(|arg| SuiJsonValue::new(arg).unwrap())
            .collect(),
    }
}
