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

mod metrics;

use crate::{
    application::metrics::Metrics,
    domain::{BlockRecord, Node, Storage, classify_block, merge_blocks},
};
use anyhow::Context;
use fastrace::trace;
use futures::{StreamExt, future::ready, stream};
use indexer_common::error::StdErrorExt;
use itertools::Itertools;
use log::{debug, info, warn};
use serde::Deserialize;
use std::{num::NonZeroUsize, pin::pin, sync::Arc};
use tokio::sync::watch;

/// Height the backfill scan starts from on full-replay chains; the genesis
/// block itself cannot carry contract transactions.
const SCAN_START: u32 = 1;

/// Configuration for one [LiveTracker] instance.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Config {
    /// Whether the chain supports full historical replay from genesis. This
    /// is an explicit capability input; it is never inferred from the node's
    /// self-reported name.
    pub full_replay: bool,

    /// Fan-out bound for the backfill scan.
    #[serde(default = "scan_parallelism_default")]
    pub scan_parallelism: NonZeroUsize,
}

/// Tracks contract activity for one chain connection: reconstructs the
/// history once, then follows new headers, keeping the in-memory cache and
/// the persisted entry for the chain's identity current.
///
/// Exactly one instance owns the cache of a given chain connection. Consumers
/// get read-only snapshots through [LiveTracker::subscribe]; the instance is
/// torn down by aborting [LiveTracker::run] together with the connection.
pub struct LiveTracker<N, S> {
    config: Config,
    node: N,
    storage: S,
    blocks: watch::Sender<Arc<Vec<BlockRecord>>>,
}

/// Read-only view of a tracked history: the current snapshot plus a change
/// signal whenever the cache is replaced.
#[derive(Debug, Clone)]
pub struct BlocksView {
    receiver: watch::Receiver<Arc<Vec<BlockRecord>>>,
}

impl BlocksView {
    /// The current snapshot, in ascending height order.
    pub fn current_blocks(&self) -> Arc<Vec<BlockRecord>> {
        self.receiver.borrow().clone()
    }

    /// Wait until the cache is replaced and return the new snapshot, or
    /// `None` once the tracker is gone.
    pub async fn changed(&mut self) -> Option<Arc<Vec<BlockRecord>>> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }
}

impl<N, S> LiveTracker<N, S>
where
    N: Node,
    S: Storage,
{
    pub fn new(config: Config, node: N, storage: S) -> Self {
        let (blocks, _) = watch::channel(Arc::new(Vec::new()));

        Self {
            config,
            node,
            storage,
            blocks,
        }
    }

    pub fn subscribe(&self) -> BlocksView {
        BlocksView {
            receiver: self.blocks.subscribe(),
        }
    }

    /// Backfill the history, then track new headers until the subscription
    /// ends with the chain connection.
    pub async fn run(self) -> anyhow::Result<()> {
        let Self {
            config,
            node,
            storage,
            blocks,
        } = self;

        let identity = node.chain_identity();
        info!(identity:%, full_replay = config.full_replay; "backfilling");

        // Full replay from genesis where the chain supports it, the last
        // persisted snapshot otherwise: completeness traded for load time.
        let initial = if config.full_replay {
            let scanned = scan_range(&node, SCAN_START, config.scan_parallelism)
                .await
                .context("scan chain history")?;

            if let Err(error) = storage.save(&identity, &scanned).await {
                warn!(error = error.as_chain(), identity:%; "cannot persist scanned history");
            }

            scanned
        } else {
            match storage.load(&identity).await {
                Ok(blocks) => blocks,

                // Fail open: a broken store costs durability, not liveness.
                Err(error) => {
                    warn!(
                        error = error.as_chain(),
                        identity:%;
                        "cannot load persisted history, starting empty"
                    );
                    Vec::new()
                }
            }
        };

        let metrics = Metrics::new(&initial);
        info!(identity:%, blocks = initial.len(); "backfill complete, tracking new headers");

        let mut cache = Arc::new(initial);
        blocks.send_replace(cache.clone());

        // Headers arrive one at a time and are processed to completion
        // before the next one; the cache has a single writer.
        let headers = node
            .new_headers()
            .await
            .context("subscribe to new headers")?;
        let mut headers = pin!(headers);

        while let Some(header) = headers.next().await {
            let header = match header {
                Ok(header) => header,

                Err(error) => {
                    warn!(error = error.as_chain(); "header subscription error");
                    continue;
                }
            };

            debug!(height = header.height, hash:% = header.hash; "new header");

            let fetched = match node.fetch_block(header.height).await {
                Ok(fetched) => fetched,

                // Availability over completeness: skip, do not retry.
                Err(error) => {
                    warn!(
                        error = error.as_chain(),
                        height = header.height;
                        "cannot fetch block, skipping"
                    );
                    metrics.fetch_failed();
                    continue;
                }
            };

            // Blocks without contract activity cause neither cache churn nor
            // storage writes.
            let Some(record) = classify_block(&fetched) else {
                continue;
            };

            info!(
                height = record.height,
                transactions = record.transactions.len();
                "contract activity"
            );

            cache = Arc::new(merge_blocks(cache.as_ref().clone(), vec![record]));
            metrics.update(&cache);
            blocks.send_replace(cache.clone());

            if let Err(error) = storage.save(&identity, &cache).await {
                // The in-memory cache stays correct; only durability across
                // a restart is lost.
                warn!(error = error.as_chain(), identity:%; "cannot persist history");
            }
        }

        info!(identity:%; "header subscription ended");

        Ok(())
    }
}

/// Scan `[start_height, current]` for contract activity: one
/// fetch-and-classify per height, fanned out concurrently, results in
/// ascending height order.
///
/// Best-effort backfill: an individual failure drops that block from the
/// batch without retry and without failing the scan.
#[trace]
pub async fn scan_range<N>(
    node: &N,
    start_height: u32,
    parallelism: NonZeroUsize,
) -> Result<Vec<BlockRecord>, N::Error>
where
    N: Node,
{
    let current_height = node.current_height().await?;
    if current_height <= start_height {
        debug!(current_height, start_height; "nothing to scan");
        return Ok(Vec::new());
    }

    let records = stream::iter(start_height..=current_height)
        .map(|height| fetch_and_classify(node, height))
        .buffer_unordered(parallelism.get())
        .filter_map(ready)
        .collect::<Vec<_>>()
        .await;

    Ok(records
        .into_iter()
        .sorted_by_key(|block| block.height)
        .collect())
}

async fn fetch_and_classify<N>(node: &N, height: u32) -> Option<BlockRecord>
where
    N: Node,
{
    match node.fetch_block(height).await {
        Ok(fetched) => classify_block(&fetched),

        Err(error) => {
            debug!(error = error.as_chain(), height; "dropping block from scan");
            None
        }
    }
}

fn scan_parallelism_default() -> NonZeroUsize {
    std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN)
}
