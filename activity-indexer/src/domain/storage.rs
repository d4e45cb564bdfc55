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

use crate::domain::BlockRecord;
use indexer_common::domain::ChainIdentity;
use std::error::Error as StdError;

/// Persistence abstraction for the per-identity block history.
///
/// Entries are keyed by [ChainIdentity]; a write for one identity never
/// touches another's entry. Concurrent writers to the same identity are not
/// supported and must be prevented by the embedding application.
#[trait_variant::make(Send)]
pub trait Storage
where
    Self: Clone + Send + Sync + 'static,
{
    type Error: StdError + Send + Sync + 'static;

    /// Load the stored history for the given identity. Unknown identities
    /// yield an empty sequence; implementations degrade corrupt entries to
    /// empty instead of failing.
    async fn load(&self, identity: &ChainIdentity) -> Result<Vec<BlockRecord>, Self::Error>;

    /// Replace the stored history for the given identity with a single keyed
    /// write.
    async fn save(
        &self,
        identity: &ChainIdentity,
        blocks: &[BlockRecord],
    ) -> Result<(), Self::Error>;
}
