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

/// Merge a batch of freshly scanned blocks into an existing height-ordered
/// cache by suffix replacement: the prefix of `old` strictly below the first
/// incoming height is kept, everything from there on is replaced by `new`.
///
/// The incoming batch is authoritative for its height range, so overlap is
/// resolved in its favor; re-fetches and reorged tails resolve
/// deterministically to the latest scan. Batches are never interleaved.
///
/// Precondition (not checked): `new` is strictly ascending by height and free
/// of empty blocks, as produced by a scan or a single classified block.
pub fn merge_blocks(old: Vec<BlockRecord>, new: Vec<BlockRecord>) -> Vec<BlockRecord> {
    let Some(first_new) = new.first() else {
        return old;
    };

    let suffix_start = old
        .iter()
        .position(|block| block.height >= first_new.height)
        .unwrap_or(old.len());

    let mut merged = old;
    merged.truncate(suffix_start);
    merged.extend(new);
    merged
}

#[cfg(test)]
mod tests {
    use crate::domain::{BlockRecord, cache::merge_blocks};
    use indexer_common::domain::ByteArray;

    fn block(height: u32) -> BlockRecord {
        BlockRecord {
            hash: ByteArray([height as u8; 32]),
            height,
            transactions: vec![],
        }
    }

    fn blocks(heights: &[u32]) -> Vec<BlockRecord> {
        heights.iter().copied().map(block).collect()
    }

    fn heights(blocks: &[BlockRecord]) -> Vec<u32> {
        blocks.iter().map(|block| block.height).collect()
    }

    #[test]
    fn test_merge_empty_batch_is_identity() {
        let old = blocks(&[1, 2, 3]);
        assert_eq!(merge_blocks(old.clone(), vec![]), old);

        assert_eq!(merge_blocks(vec![], vec![]), vec![]);
    }

    #[test]
    fn test_merge_into_empty_cache() {
        let new = blocks(&[4, 5]);
        assert_eq!(merge_blocks(vec![], new.clone()), new);
    }

    #[test]
    fn test_merge_disjoint_is_concatenation() {
        let merged = merge_blocks(blocks(&[1, 2, 3]), blocks(&[4, 6]));
        assert_eq!(heights(&merged), vec![1, 2, 3, 4, 6]);
    }

    #[test]
    fn test_merge_replaces_overlapping_suffix() {
        let merged = merge_blocks(blocks(&[1, 2, 3, 4, 5]), blocks(&[4, 5, 6]));
        assert_eq!(heights(&merged), vec![1, 2, 3, 4, 5, 6]);

        // The overlapping tail comes from the incoming batch.
        let merged = merge_blocks(blocks(&[1, 3, 5, 7]), blocks(&[4, 6]));
        assert_eq!(heights(&merged), vec![1, 3, 4, 6]);
    }

    #[test]
    fn test_merge_replaces_everything_on_full_overlap() {
        let merged = merge_blocks(blocks(&[3, 4, 5]), blocks(&[1, 2]));
        assert_eq!(heights(&merged), vec![1, 2]);
    }

    #[test]
    fn test_merge_overlap_prefers_incoming_content() {
        let mut stale = block(5);
        stale.hash = ByteArray([0xff; 32]);

        let merged = merge_blocks(vec![block(4), stale], blocks(&[5]));
        assert_eq!(heights(&merged), vec![4, 5]);
        assert_eq!(merged[1].hash, ByteArray([5; 32]));
    }
}
