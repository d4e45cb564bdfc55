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

use crate::domain::{BlockRecord, TransactionKind};
use metrics::{Counter, Gauge, counter, gauge};

pub struct Metrics {
    cache_height: Gauge,
    cached_blocks: Gauge,
    cached_calls: Gauge,
    cached_instantiations: Gauge,
    fetch_failures: Counter,
}

impl Metrics {
    pub fn new(initial: &[BlockRecord]) -> Self {
        let metrics = Self {
            cache_height: gauge!("indexer_cache_height"),
            cached_blocks: gauge!("indexer_cached_blocks"),
            cached_calls: gauge!("indexer_cached_calls"),
            cached_instantiations: gauge!("indexer_cached_instantiations"),
            fetch_failures: counter!("indexer_fetch_failures"),
        };

        metrics.update(initial);
        metrics
    }

    /// Recompute the cache gauges. Totals can shrink when a merge replaces a
    /// suffix, hence gauges rather than counters.
    pub fn update(&self, blocks: &[BlockRecord]) {
        let cache_height = blocks.last().map(|block| block.height).unwrap_or_default();
        self.cache_height.set(cache_height as f64);

        self.cached_blocks.set(blocks.len() as f64);
        self.cached_calls
            .set(count_kind(blocks, TransactionKind::Call));
        self.cached_instantiations
            .set(count_kind(blocks, TransactionKind::Instantiate));
    }

    pub fn fetch_failed(&self) {
        self.fetch_failures.increment(1);
    }
}

fn count_kind(blocks: &[BlockRecord], kind: TransactionKind) -> f64 {
    blocks
        .iter()
        .flat_map(|block| &block.transactions)
        .filter(|transaction| transaction.kind == kind)
        .count() as f64
}
