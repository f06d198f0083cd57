// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use futures::future::try_join_all;
use futures::{stream, StreamExt, TryFutureExt, TryStreamExt};
use serde_json::Value as JsonValue;
use tracing::{debug, instrument, trace};

use crate::base_types::ObjectID;
use crate::config::CallArgSerializerConfig;
use crate::error::{Error, Result};
use crate::json::SuiJsonValue;
use crate::normalized::{user_parameters, SuiMoveNormalizedType};
use crate::object_resolver::{DataReader, SharedObjectApi};
use crate::registry::BcsRegistry;
use crate::resolver::{byte_vector_serialization_type, pure_serialization_type};
use crate::sui_schema::sui_registry;
use crate::transaction::{self, CallArg, MoveCallTransaction, MoveCallTx, ObjectArg};

#[cfg(test)]
#[path = "unit_tests/call_args_tests.rs"]
mod call_args_tests;

const OBJECT_ID_STRING: &str = "an object id string";
const OBJECT_ID_ARRAY: &str = "an array of object id strings";

/// Turns loosely typed Move call arguments into their wire form, and back.
#[derive(Clone)]
pub struct CallArgSerializer {
    reader: Arc<dyn DataReader>,
    registry: Arc<BcsRegistry>,
    config: CallArgSerializerConfig,
}

/// What an argument becomes once it has been checked against its parameter, before any
/// object is looked up.
enum ArgPlan {
    Pure(Vec<u8>),
    Object(ObjectID),
    ObjVec(Vec<ObjectID>),
}

impl CallArgSerializer {
    /// A serializer with its own registry of the Sui types and the default configuration.
    pub fn new(reader: Arc<dyn DataReader>) -> Result<Self> {
        Ok(Self::with_config(
            reader,
            Arc::new(sui_registry()?),
            CallArgSerializerConfig::default(),
        ))
    }

    /// `registry` must have the Sui types registered, see [`crate::sui_schema`].
    pub fn with_config(
        reader: Arc<dyn DataReader>,
        registry: Arc<BcsRegistry>,
        config: CallArgSerializerConfig,
    ) -> Self {
        Self {
            reader,
            registry,
            config,
        }
    }

    pub fn registry(&self) -> &Arc<BcsRegistry> {
        &self.registry
    }

    /// Asks the fullnode for its RPC API version and picks how shared objects are referred to.
    pub async fn shared_object_api(&self) -> Result<SharedObjectApi> {
        let version = self.reader.get_rpc_api_version().await?;
        let api = SharedObjectApi::from_rpc_api_version(
            version,
            self.config.shared_object_api_threshold(),
        );
        debug!(?version, ?api, "selected shared object api");
        Ok(api)
    }

    async fn function_parameters(
        &self,
        package: ObjectID,
        module: &str,
        function: &str,
    ) -> Result<Vec<SuiMoveNormalizedType>> {
        let function = self
            .reader
            .get_normalized_move_function(package, module, function)
            .await?;
        Ok(function.parameters)
    }

    /// Resolves the arguments of `txn` against the signature of the function it calls.
    #[instrument(level = "debug", skip_all, fields(package = %txn.package_object_id, module = %txn.module, function = %txn.function))]
    pub async fn serialize_move_call_arguments(
        &self,
        txn: &MoveCallTransaction,
    ) -> Result<Vec<CallArg>> {
        let parameters = self
            .function_parameters(txn.package_object_id, &txn.module, &txn.function)
            .await?;
        let api = self.shared_object_api().await?;
        self.marshal_arguments(&parameters, &txn.arguments, api)
            .await
    }

    /// Pairs `args` with the declared `parameters` and builds one [`CallArg`] per argument.
    ///
    /// A trailing `&mut TxContext` parameter is not matched against an argument. Every
    /// argument is checked before any object is looked up, lookups then run concurrently and
    /// the result keeps the argument order. The first failure aborts the whole call.
    pub async fn marshal_arguments(
        &self,
        parameters: &[SuiMoveNormalizedType],
        args: &[SuiJsonValue],
        api: SharedObjectApi,
    ) -> Result<Vec<CallArg>> {
        let parameters = user_parameters(parameters);
        if parameters.len() != args.len() {
            return Err(Error::ArgumentCountMismatch {
                expected: parameters.len(),
                received: args.len(),
            });
        }

        let plans = parameters
            .iter()
            .zip(args)
            .enumerate()
            .map(|(idx, (param, arg))| self.plan_call_arg(idx, param, arg.as_json_value()))
            .collect::<Result<Vec<_>>>()?;
        debug!(arguments = plans.len(), "checked call arguments");

        stream::iter(plans)
            .map(|plan| self.resolve_plan(plan, api))
            .buffered(self.config.max_concurrent_object_requests())
            .try_collect()
            .await
    }

    fn plan_call_arg(
        &self,
        idx: usize,
        param: &SuiMoveNormalizedType,
        arg: &JsonValue,
    ) -> Result<ArgPlan> {
        if param.extract_struct_tag().is_some() {
            let id = parse_object_id(arg)
                .ok_or_else(|| malformed_object_argument(idx, OBJECT_ID_STRING, arg))?;
            return Ok(ArgPlan::Object(id));
        }

        if param.extract_vector_struct().is_some() {
            let ids = arg
                .as_array()
                .and_then(|items| items.iter().map(parse_object_id).collect::<Option<Vec<_>>>())
                .ok_or_else(|| malformed_object_argument(idx, OBJECT_ID_ARRAY, arg))?;
            return Ok(ArgPlan::ObjVec(ids));
        }

        let type_name = pure_serialization_type(&self.registry, param, Some(arg))?;
        Ok(ArgPlan::Pure(self.registry.ser(&type_name, arg)?))
    }

    async fn resolve_plan(&self, plan: ArgPlan, api: SharedObjectApi) -> Result<CallArg> {
        Ok(match plan {
            ArgPlan::Pure(bytes) => CallArg::Pure(bytes),
            ArgPlan::Object(id) => CallArg::Object(self.resolve_object_arg(id, api).await?),
            ArgPlan::ObjVec(ids) => CallArg::ObjVec(
                try_join_all(ids.into_iter().map(|id| self.resolve_object_arg(id, api))).await?,
            ),
        })
    }

    async fn resolve_object_arg(&self, id: ObjectID, api: SharedObjectApi) -> Result<ObjectArg> {
        let object = self.reader.get_object(id).await?;
        let arg = api.object_arg(&object)?;
        trace!(object_id = %id, shared = object.owner.is_shared(), "resolved object argument");
        Ok(arg)
    }

    /// The [`ObjectArg`] referring to object `id` on the fullnode this serializer talks to.
    pub async fn new_object_arg(&self, id: ObjectID) -> Result<ObjectArg> {
        let api = self.shared_object_api().await?;
        self.resolve_object_arg(id, api).await
    }

    /// Ids of every object the arguments of `txn` refer to, in argument order.
    pub async fn extract_object_ids(&self, txn: &MoveCallTransaction) -> Result<Vec<ObjectID>> {
        let args = self.serialize_move_call_arguments(txn).await?;
        Ok(transaction::extract_object_ids(&args))
    }

    /// A complete call: the package reference and the resolved arguments.
    #[instrument(level = "debug", skip_all, fields(package = %txn.package_object_id, module = %txn.module, function = %txn.function))]
    pub async fn new_move_call_tx(&self, txn: &MoveCallTransaction) -> Result<MoveCallTx> {
        let (package, arguments) = futures::try_join!(
            self.reader
                .get_object(txn.package_object_id)
                .map_err(Error::from),
            self.serialize_move_call_arguments(txn),
        )?;
        Ok(MoveCallTx {
            package: package.object_ref(),
            module: txn.module.clone(),
            function: txn.function.clone(),
            type_arguments: txn.type_arguments.clone(),
            arguments,
        })
    }

    /// Recovers the JSON arguments of a call built by this serializer.
    pub async fn deserialize_call_args(&self, call: &MoveCallTx) -> Result<Vec<SuiJsonValue>> {
        let parameters = self
            .function_parameters(call.package.object_id, &call.module, &call.function)
            .await?;
        self.unmarshal_arguments(&parameters, &call.arguments)
    }

    /// The inverse of [`Self::marshal_arguments`]. Objects come back as their ids.
    ///
    /// Byte vectors decode to a string when they hold UTF-8 and to an array of numbers
    /// otherwise.
    pub fn unmarshal_arguments(
        &self,
        parameters: &[SuiMoveNormalizedType],
        args: &[CallArg],
    ) -> Result<Vec<SuiJsonValue>> {
        let parameters = user_parameters(parameters);
        if parameters.len() != args.len() {
            return Err(Error::ArgumentCountMismatch {
                expected: parameters.len(),
                received: args.len(),
            });
        }
        parameters
            .iter()
            .zip(args)
            .map(|(param, arg)| match arg {
                CallArg::Object(object) => Ok(SuiJsonValue::from_object_id(object.id())),
                CallArg::ObjVec(objects) => Ok(SuiJsonValue::new(JsonValue::Array(
                    objects
                        .iter()
                        .map(|object| SuiJsonValue::from_object_id(object.id()).to_json_value())
                        .collect(),
                ))?),
                CallArg::Pure(bytes) => Ok(SuiJsonValue::new(self.decode_pure(param, bytes)?)?),
            })
            .collect()
    }

    fn decode_pure(&self, param: &SuiMoveNormalizedType, bytes: &[u8]) -> Result<JsonValue> {
        let type_name = pure_serialization_type(&self.registry, param, None)?;
        let err = match self.registry.de(&type_name, bytes) {
            Err(err @ Error::Decode { .. }) => err,
            result => return result,
        };
        let raw_type = byte_vector_serialization_type(&self.registry, param)?;
        if raw_type == type_name {
            return Err(err);
        }
        debug!(%type_name, %raw_type, "argument is not UTF-8, decoding as bytes");
        self.registry.de(&raw_type, bytes)
    }
}

fn parse_object_id(value: &JsonValue) -> Option<ObjectID> {
    value
        .as_str()
        .and_then(|s| ObjectID::from_hex_literal(s).ok())
}

fn malformed_object_argument(idx: usize, expected: &'static str, value: &JsonValue) -> Error {
    Error::MalformedObjectArgument {
        idx,
        expected,
        value: value.clone(),
    }
}
