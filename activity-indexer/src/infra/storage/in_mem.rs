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

use crate::domain::{BlockRecord, storage::Storage};
use indexer_common::domain::ChainIdentity;
use parking_lot::RwLock;
use std::{collections::HashMap, convert::Infallible, sync::Arc};

/// In-memory implementation of [Storage] for tests and for deployments
/// without durable persistence.
#[derive(Debug, Clone, Default)]
pub struct InMemStorage {
    entries: Arc<RwLock<HashMap<ChainIdentity, Vec<BlockRecord>>>>,
}

impl Storage for InMemStorage {
    type Error = Infallible;

    async fn load(&self, identity: &ChainIdentity) -> Result<Vec<BlockRecord>, Self::Error> {
        let blocks = self.entries.read().get(identity).cloned().unwrap_or_default();
        Ok(blocks)
    }

    async fn save(
        &self,
        identity: &ChainIdentity,
        blocks: &[BlockRecord],
    ) -> Result<(), Self::Error> {
        self.entries.write().insert(identity.clone(), blocks.to_vec());
        Ok(())
    }
}
