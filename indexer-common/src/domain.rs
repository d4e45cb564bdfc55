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

mod bytes;

pub use bytes::*;

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// Hash of a block.
pub type BlockHash = ByteArray<32>;

/// Hash of an extrinsic.
pub type ExtrinsicHash = ByteArray<32>;

/// 0x-hex rendering of a contract account.
pub type ContractAddress = String;

/// Identity of one chain deployment: the hex-encoded genesis hash.
///
/// All persisted state is partitioned by this key. Two deployments, or two
/// resets of the same development chain, never share an entry; entries for
/// abandoned identities are simply left unread.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, From, Into, Serialize, Deserialize)]
pub struct ChainIdentity(String);

impl ChainIdentity {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ChainIdentity {
    fn from(identity: &str) -> Self {
        Self(identity.to_owned())
    }
}
