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

use crate::domain::TransactionRecord;
use indexer_common::domain::BlockHash;
use serde::{Deserialize, Serialize};

/// One chain block carrying contract-related transactions, ordered by
/// extrinsic position.
///
/// A block without any qualifying transactions is never cached or persisted;
/// [crate::domain::classify_block] elides such blocks before they reach the
/// cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRecord {
    pub hash: BlockHash,
    pub height: u32,
    pub transactions: Vec<TransactionRecord>,
}

/// Hash and height of a block header, as delivered by a header subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
    pub hash: BlockHash,
    pub height: u32,
}

impl From<&BlockRecord> for BlockInfo {
    fn from(block: &BlockRecord) -> Self {
        Self {
            hash: block.hash,
            height: block.height,
        }
    }
}
