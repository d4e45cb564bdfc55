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

use indexer_common::domain::{ByteVec, ContractAddress, ExtrinsicHash};
use serde::{Deserialize, Serialize};

/// One contract-related transaction within a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// The target (call) or created (instantiation) contract account. Empty
    /// only transiently during classification, never in a finalized record.
    pub contract_address: ContractAddress,

    /// Raw call or constructor argument bytes.
    pub payload: ByteVec,

    pub hash: ExtrinsicHash,

    /// Position within the block. Binds this transaction to the events it
    /// emitted and keeps the cached order stable.
    pub index: u32,

    pub kind: TransactionKind,
}

/// The variant of a contract transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    /// A call of an existing contract.
    Call,

    /// A deployment of a new contract instance, with or without inline code.
    Instantiate,
}
