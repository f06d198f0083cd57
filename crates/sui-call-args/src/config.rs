// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::object_resolver::{RpcApiVersion, INITIAL_SHARED_VERSION_RPC_API};

#[cfg(test)]
#[path = "unit_tests/config_tests.rs"]
mod config_tests;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CallArgSerializerConfig {
    /// Fullnodes reporting an RPC API version below this one are sent shared objects in the
    /// deprecated form, by id only.
    ///
    /// Defaults to `0.12.0` if not specified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_object_api_threshold: Option<RpcApiVersion>,

    /// Maximum number of arguments of one call whose objects are looked up at the same time.
    /// The elements of an object vector are looked up together.
    ///
    /// Defaults to `64` if not specified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_concurrent_object_requests: Option<usize>,
}

impl CallArgSerializerConfig {
    pub fn shared_object_api_threshold(&self) -> RpcApiVersion {
        self.shared_object_api_threshold
            .unwrap_or(INITIAL_SHARED_VERSION_RPC_API)
    }

    pub fn max_concurrent_object_requests(&self) -> usize {
        // Zero would never make progress.
        self.max_concurrent_object_requests.unwrap_or(64).max(1)
    }
}
