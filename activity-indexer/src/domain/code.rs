// This file is part of activity-indexer.
// Copyright (C) 2025 The activity-indexer authors
// SPDX-License-Identifier: Apache-2.0
// Licensed under the Apache License, Version 2.0 (the "License");
// You may not use this file except in compliance with the License.
// You may obtain a copy of the License at
// http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use indexer_common::domain::ChainIdentity;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;

/// A stored contract decoder (ABI), keyed by the hash of the code it
/// describes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeRecord {
    pub code_hash: String,
    pub abi: serde_json::Value,
    pub when_created: u64,
}

/// Boundary to the contract code store collaborator: a keyed lookup of
/// decoders, partitioned by chain identity and deduplicated by code hash.
///
/// Several contract accounts can share one code hash (and thus one decoder);
/// [CodeStore::register_contract] records that association so callers can
/// resolve a decoder directly from an address.
#[trait_variant::make(Send)]
pub trait CodeStore
where
    Self: Clone + Send + Sync + 'static,
{
    type Error: StdError + Send + Sync + 'static;

    /// Store a decoder; an existing entry for the same code hash is
    /// replaced.
    async fn save_code(
        &self,
        identity: &ChainIdentity,
        code: CodeRecord,
    ) -> Result<(), Self::Error>;

    /// Associate a contract account with a stored code hash.
    async fn register_contract(
        &self,
        identity: &ChainIdentity,
        address: &str,
        code_hash: &str,
    ) -> Result<(), Self::Error>;

    async fn get_by_code_hash(
        &self,
        identity: &ChainIdentity,
        code_hash: &str,
    ) -> Result<Option<CodeRecord>, Self::Error>;

    async fn get_by_contract(
        &self,
        identity: &ChainIdentity,
        address: &str,
    ) -> Result<Option<CodeRecord>, Self::Error>;
}
