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

use crate::domain::{BlockInfo, FetchedBlock};
use futures::Stream;
use indexer_common::domain::ChainIdentity;
use std::error::Error as StdError;

/// Chain connection abstraction: everything the indexer consumes from a node.
#[trait_variant::make(Send)]
pub trait Node
where
    Self: Clone + Send + Sync + 'static,
{
    type Error: StdError + Send + Sync + 'static;

    /// The genesis hash distinguishing this chain deployment from any other.
    fn chain_identity(&self) -> ChainIdentity;

    /// Height of the current chain head.
    async fn current_height(&self) -> Result<u32, Self::Error>;

    /// Fetch one block body together with its event log. No internal
    /// retries; a failure is the caller's to handle.
    async fn fetch_block(&self, height: u32) -> Result<FetchedBlock, Self::Error>;

    /// A stream of new headers in height order, one per finalized block,
    /// living as long as the connection.
    async fn new_headers(
        &self,
    ) -> Result<impl Stream<Item = Result<BlockInfo, Self::Error>> + Send, Self::Error>;
}
