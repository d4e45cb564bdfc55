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

use crate::domain::{BlockRecord, TransactionKind, TransactionRecord};
use indexer_common::domain::{BlockHash, ByteVec, ExtrinsicHash};

/// Pallet and call/event names of the contracts pallet, as they appear in the
/// chain metadata.
const CONTRACTS_PALLET: &str = "Contracts";
const CALL: &str = "call";
const INSTANTIATE: &str = "instantiate";
const INSTANTIATE_WITH_CODE: &str = "instantiate_with_code";
const INSTANTIATED: &str = "Instantiated";

/// Position of the created contract account in the `Instantiated` event data,
/// after the deployer account.
const INSTANTIATED_CONTRACT_FIELD: usize = 1;

/// A decoded extrinsic as delivered by the node adapter: pallet and call
/// names plus rendered arguments.
///
/// The node adapter yields one entry per extrinsic of the block, in block
/// order and without gaps, so that an extrinsic's position equals the phase
/// of the events it emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawExtrinsic {
    pub hash: ExtrinsicHash,
    pub section: String,
    pub method: String,
    pub args: Vec<String>,
    pub payload: ByteVec,
}

/// A chain event, reduced to what classification needs. `phase` is the
/// position of the extrinsic that emitted the event, if any. Events are
/// consumed during classification and never retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub section: String,
    pub method: String,
    pub phase: Option<u32>,
    pub data: Vec<String>,
}

/// The raw material for one block: body plus event log, as fetched from the
/// node in one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedBlock {
    pub hash: BlockHash,
    pub height: u32,
    pub extrinsics: Vec<RawExtrinsic>,
    pub events: Vec<EventRecord>,
}

/// Classify one extrinsic as a contract call or instantiation, resolving the
/// contract account involved; everything else yields `None`.
///
/// A call names its target directly in its first argument. An instantiation
/// does not: the created account only shows up in the `Instantiated` event
/// whose phase equals this extrinsic's position in the block. That positional
/// index-to-phase correlation is a chain protocol contract; events must never
/// be matched by content.
///
/// An instantiation without a matching event (e.g. reverted) still yields a
/// record, but with an empty address; [classify_block] filters those out
/// before a [BlockRecord] is formed.
pub fn classify(
    extrinsic: &RawExtrinsic,
    index: u32,
    events: &[EventRecord],
) -> Option<TransactionRecord> {
    if extrinsic.section != CONTRACTS_PALLET {
        return None;
    }

    let (kind, contract_address) = match extrinsic.method.as_str() {
        CALL => (TransactionKind::Call, extrinsic.args.first().cloned()?),

        INSTANTIATE | INSTANTIATE_WITH_CODE => {
            let contract_address = events
                .iter()
                .find(|event| {
                    event.section == CONTRACTS_PALLET
                        && event.method == INSTANTIATED
                        && event.phase == Some(index)
                })
                .and_then(|event| event.data.get(INSTANTIATED_CONTRACT_FIELD).cloned())
                .unwrap_or_default();

            (TransactionKind::Instantiate, contract_address)
        }

        _ => return None,
    };

    Some(TransactionRecord {
        contract_address,
        payload: extrinsic.payload.clone(),
        hash: extrinsic.hash,
        index,
        kind,
    })
}

/// Assemble the [BlockRecord] for a fetched block, or `None` if the block
/// carries no qualifying transactions (empty blocks are pure noise and are
/// never cached or persisted).
pub fn classify_block(block: &FetchedBlock) -> Option<BlockRecord> {
    let transactions = block
        .extrinsics
        .iter()
        .enumerate()
        .filter_map(|(index, extrinsic)| classify(extrinsic, index as u32, &block.events))
        .filter(|transaction| !transaction.contract_address.is_empty())
        .collect::<Vec<_>>();

    (!transactions.is_empty()).then(|| BlockRecord {
        hash: block.hash,
        height: block.height,
        transactions,
    })
}

#[cfg(test)]
mod tests {
    use crate::domain::{
        TransactionKind,
        classify::{EventRecord, FetchedBlock, RawExtrinsic, classify, classify_block},
    };
    use assert_matches::assert_matches;
    use indexer_common::domain::{ByteArray, ByteVec};

    fn call_extrinsic(contract: &str) -> RawExtrinsic {
        RawExtrinsic {
            hash: ByteArray([1; 32]),
            section: "Contracts".to_string(),
            method: "call".to_string(),
            args: vec![
                contract.to_string(),
                "0".to_string(),
                "500000000".to_string(),
                "0xdeadbeef".to_string(),
            ],
            payload: ByteVec::from(vec![0xde, 0xad, 0xbe, 0xef]),
        }
    }

    fn instantiate_extrinsic() -> RawExtrinsic {
        RawExtrinsic {
            hash: ByteArray([2; 32]),
            section: "Contracts".to_string(),
            method: "instantiate".to_string(),
            args: vec![
                "0".to_string(),
                "500000000".to_string(),
                "0x11".to_string(),
                "0xc0de".to_string(),
                "0x00".to_string(),
            ],
            payload: ByteVec::from(vec![0xc0, 0xde]),
        }
    }

    fn instantiated_event(phase: u32, contract: &str) -> EventRecord {
        EventRecord {
            section: "Contracts".to_string(),
            method: "Instantiated".to_string(),
            phase: Some(phase),
            data: vec!["0xdeployer".to_string(), contract.to_string()],
        }
    }

    #[test]
    fn test_classify_call() {
        let transaction = classify(&call_extrinsic("0xaa"), 1, &[]);

        assert_matches!(
            transaction,
            Some(transaction) if transaction.contract_address == "0xaa"
                && transaction.kind == TransactionKind::Call
                && transaction.index == 1
                && transaction.payload == ByteVec::from(vec![0xde, 0xad, 0xbe, 0xef])
        );
    }

    #[test]
    fn test_classify_instantiate() {
        let events = vec![
            // An event of another extrinsic must not be picked up.
            instantiated_event(0, "0xother"),
            instantiated_event(2, "0xbb"),
        ];

        let transaction = classify(&instantiate_extrinsic(), 2, &events);

        assert_matches!(
            transaction,
            Some(transaction) if transaction.contract_address == "0xbb"
                && transaction.kind == TransactionKind::Instantiate
        );
    }

    #[test]
    fn test_classify_instantiate_without_event() {
        // A reverted instantiation emits no Instantiated event; the record
        // surfaces with an empty address and is dropped by classify_block.
        let transaction = classify(&instantiate_extrinsic(), 0, &[]);

        assert_matches!(
            transaction,
            Some(transaction) if transaction.contract_address.is_empty()
        );
    }

    #[test]
    fn test_classify_correlates_by_phase_not_order() {
        // Event order in the log must not matter, only the phase.
        let events = vec![
            instantiated_event(5, "0xlater"),
            instantiated_event(1, "0xbb"),
        ];

        let transaction = classify(&instantiate_extrinsic(), 1, &events);

        assert_matches!(
            transaction,
            Some(transaction) if transaction.contract_address == "0xbb"
        );
    }

    #[test]
    fn test_classify_other_extrinsics() {
        let extrinsic = RawExtrinsic {
            section: "Timestamp".to_string(),
            method: "set".to_string(),
            ..Default::default()
        };
        assert_eq!(classify(&extrinsic, 0, &[]), None);

        let extrinsic = RawExtrinsic {
            section: "Contracts".to_string(),
            method: "upload_code".to_string(),
            ..Default::default()
        };
        assert_eq!(classify(&extrinsic, 0, &[]), None);
    }

    #[test]
    fn test_classify_block() {
        let block = FetchedBlock {
            hash: ByteArray([7; 32]),
            height: 42,
            extrinsics: vec![
                RawExtrinsic {
                    section: "Timestamp".to_string(),
                    method: "set".to_string(),
                    ..Default::default()
                },
                call_extrinsic("0xaa"),
                instantiate_extrinsic(),
            ],
            events: vec![instantiated_event(2, "0xbb")],
        };

        let record = classify_block(&block).expect("block has qualifying transactions");

        assert_eq!(record.height, 42);
        assert_eq!(record.transactions.len(), 2);
        assert_eq!(record.transactions[0].contract_address, "0xaa");
        assert_eq!(record.transactions[0].index, 1);
        assert_eq!(record.transactions[1].contract_address, "0xbb");
        assert_eq!(record.transactions[1].index, 2);
    }

    #[test]
    fn test_classify_block_empty() {
        let block = FetchedBlock {
            hash: ByteArray([7; 32]),
            height: 42,
            extrinsics: vec![RawExtrinsic {
                section: "Timestamp".to_string(),
                method: "set".to_string(),
                ..Default::default()
            }],
            events: vec![],
        };

        assert_eq!(classify_block(&block), None);
    }

    #[test]
    fn test_classify_block_drops_unmatched_instantiation() {
        let block = FetchedBlock {
            hash: ByteArray([7; 32]),
            height: 42,
            extrinsics: vec![instantiate_extrinsic(), call_extrinsic("0xaa")],
            events: vec![],
        };

        let record = classify_block(&block).expect("the call still qualifies");

        assert_eq!(record.transactions.len(), 1);
        assert_eq!(record.transactions[0].contract_address, "0xaa");
    }
}
