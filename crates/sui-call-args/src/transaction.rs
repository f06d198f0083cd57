// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::base_types::{ObjectID, ObjectRef, SequenceNumber, SuiAddress};
use crate::error::Result;
use crate::json::SuiJsonValue;
use crate::object_resolver::SharedObjectApi;
use crate::registry::BcsRegistry;

#[cfg(test)]
#[path = "unit_tests/transaction_tests.rs"]
mod transaction_tests;

/// A reference to a shared object.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SharedObjectRef {
    pub object_id: ObjectID,
    /// The version the object was shared at.
    pub initial_shared_version: SequenceNumber,
}

#[derive(Eq, PartialEq, Debug, Clone, Hash, Serialize, Deserialize, JsonSchema)]
pub enum ObjectArg {
    // A Move object, either immutable, or owned mutable.
    ImmOrOwned(ObjectRef),
    // A Move object that's shared and mutable.
    Shared(SharedObjectRef),
    // A shared object, as referred to by fullnodes that predate initial shared versions.
    #[serde(rename = "Shared_Deprecated")]
    SharedDeprecated(ObjectID),
}

impl ObjectArg {
    pub fn id(&self) -> ObjectID {
        match self {
            ObjectArg::ImmOrOwned(object_ref) => object_ref.object_id,
            ObjectArg::Shared(shared) => shared.object_id,
            ObjectArg::SharedDeprecated(id) => *id,
        }
    }
}

/// One argument of a Move call, as put on the wire.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Serialize, Deserialize, JsonSchema)]
pub enum CallArg {
    // contains no structs or objects
    Pure(Vec<u8>),
    // an object
    Object(ObjectArg),
    // a vector of objects
    ObjVec(Vec<ObjectArg>),
}

impl CallArg {
    /// BCS bytes of this argument, in the layout `api` selects.
    pub fn to_bytes(&self, registry: &BcsRegistry, api: SharedObjectApi) -> Result<Vec<u8>> {
        registry.ser_value(api.call_arg_type(), self)
    }

    pub fn from_bytes(registry: &BcsRegistry, api: SharedObjectApi, bytes: &[u8]) -> Result<Self> {
        registry.de_value(api.call_arg_type(), bytes)
    }

    /// Ids of the objects this argument refers to, in order.
    pub fn object_ids(&self) -> Vec<ObjectID> {
        match self {
            CallArg::Pure(_) => vec![],
            CallArg::Object(arg) => vec![arg.id()],
            CallArg::ObjVec(args) => args.iter().map(ObjectArg::id).collect(),
        }
    }
}

/// Every object id referenced by `args`, in argument order. `Pure` arguments contribute
/// nothing.
pub fn extract_object_ids(args: &[CallArg]) -> Vec<ObjectID> {
    args.iter().flat_map(CallArg::object_ids).collect()
}

#[derive(Eq, PartialEq, Debug, Clone, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StructTag {
    pub address: SuiAddress,
    pub module: String,
    pub name: String,
    pub type_params: Vec<TypeTag>,
}

#[derive(Eq, PartialEq, Debug, Clone, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    Address,
    Signer,
    Vector(Box<TypeTag>),
    Struct(Box<StructTag>),
}

/// A Move call as the caller describes it: the arguments are still loosely typed JSON.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoveCallTransaction {
    pub package_object_id: ObjectID,
    pub module: String,
    pub function: String,
    #[serde(default)]
    pub type_arguments: Vec<TypeTag>,
    pub arguments: Vec<SuiJsonValue>,
}

/// A Move call with its arguments resolved to their wire form.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoveCallTx {
    pub package: ObjectRef,
    pub module: String,
    pub function: String,
    pub type_arguments: Vec<TypeTag>,
    pub arguments: Vec<CallArg>,
}

impl MoveCallTx {
    pub fn to_bytes(&self, registry: &BcsRegistry, api: SharedObjectApi) -> Result<Vec<u8>> {
        registry.ser_value(api.move_call_type(), self)
    }

    pub fn from_bytes(registry: &BcsRegistry, api: SharedObjectApi, bytes: &[u8]) -> Result<Self> {
        registry.de_value(api.move_call_type(), bytes)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TransferObjectTx {
    pub recipient: SuiAddress,
    pub object_ref: ObjectRef,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PublishTx {
    pub modules: Vec<Vec<u8>>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TransferSuiTx {
    pub recipient: SuiAddress,
    #[serde(with = "move_option")]
    #[schemars(with = "Option<u64>")]
    pub amount: Option<u64>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PayTx {
    pub coins: Vec<ObjectRef>,
    pub recipients: Vec<SuiAddress>,
    pub amounts: Vec<u64>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PaySuiTx {
    pub coins: Vec<ObjectRef>,
    pub recipients: Vec<SuiAddress>,
    pub amounts: Vec<u64>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PayAllSuiTx {
    pub coins: Vec<ObjectRef>,
    pub recipient: SuiAddress,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub enum SingleTransactionKind {
    TransferObject(TransferObjectTx),
    Publish(PublishTx),
    Call(MoveCallTx),
    TransferSui(TransferSuiTx),
    Pay(PayTx),
    PaySui(PaySuiTx),
    PayAllSui(PayAllSuiTx),
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub enum TransactionKind {
    Single(SingleTransactionKind),
    Batch(Vec<SingleTransactionKind>),
}

/// The data a sender signs. Field order follows the wire layout.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionData {
    pub kind: TransactionKind,
    pub sender: SuiAddress,
    pub gas_payment: ObjectRef,
    pub gas_price: u64,
    pub gas_budget: u64,
}

impl TransactionData {
    pub fn new(
        kind: TransactionKind,
        sender: SuiAddress,
        gas_payment: ObjectRef,
        gas_budget: u64,
        gas_price: u64,
    ) -> Self {
        TransactionData {
            kind,
            sender,
            gas_payment,
            gas_price,
            gas_budget,
        }
    }

    pub fn new_move_call(
        sender: SuiAddress,
        call: MoveCallTx,
        gas_payment: ObjectRef,
        gas_budget: u64,
        gas_price: u64,
    ) -> Self {
        Self::new(
            TransactionKind::Single(SingleTransactionKind::Call(call)),
            sender,
            gas_payment,
            gas_budget,
            gas_price,
        )
    }

    /// BCS bytes of this transaction, in the layout `api` selects.
    pub fn to_bytes(&self, registry: &BcsRegistry, api: SharedObjectApi) -> Result<Vec<u8>> {
        registry.ser_value(api.transaction_data_type(), self)
    }

    pub fn from_bytes(registry: &BcsRegistry, api: SharedObjectApi, bytes: &[u8]) -> Result<Self> {
        registry.de_value(api.transaction_data_type(), bytes)
    }
}

/// Move's `Option<T>` is an enum on the wire, so it is rendered as `"None"` or
/// `{"Some": value}` instead of serde's bare `null`.
mod move_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    enum MoveOption<T> {
        None,
        Some(T),
    }

    pub fn serialize<S, T>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        match value {
            Some(v) => MoveOption::Some(v),
            None => MoveOption::None,
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Ok(match MoveOption::<T>::deserialize(deserializer)? {
            MoveOption::Some(v) => Some(v),
            MoveOption::None => None,
        })
    }
}
