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

use crate::domain::{BlockInfo, EventRecord, FetchedBlock, Node, RawExtrinsic};
use fastrace::trace;
use futures::{Stream, StreamExt, TryStreamExt};
use indexer_common::{
    domain::{BlockHash, ByteVec, ChainIdentity},
    error::{BoxError, StdErrorExt},
};
use log::warn;
use serde::Deserialize;
use std::{future::ready, time::Duration};
use subxt::{
    OnlineClient, SubstrateConfig,
    backend::{
        legacy::LegacyRpcMethods,
        rpc::reconnecting_rpc_client::{ExponentialBackoff, RpcClient},
    },
    events::Phase,
    ext::{
        scale_value::{Composite, Primitive, Value, ValueDef},
        subxt_rpcs,
    },
    utils::H256,
};
use thiserror::Error;

type SubxtBlock = subxt::blocks::Block<SubstrateConfig, OnlineClient<SubstrateConfig>>;
type SubxtExtrinsic = subxt::blocks::ExtrinsicDetails<SubstrateConfig, OnlineClient<SubstrateConfig>>;
type SubxtEvent = subxt::events::EventDetails<SubstrateConfig>;

/// Position of the `data` argument in the contracts pallet's call and
/// constructor extrinsics.
const PAYLOAD_ARG: usize = 3;

/// A [Node] implementation based on subxt.
#[derive(Clone)]
pub struct SubxtNode {
    online_client: OnlineClient<SubstrateConfig>,
    rpc_client: RpcClient,
}

impl SubxtNode {
    /// Create a new [SubxtNode] with the given [Config], connecting with a
    /// reconnecting RPC client.
    pub async fn new(config: Config) -> Result<Self, Error> {
        let Config {
            url,
            reconnect_max_delay,
            reconnect_max_attempts,
        } = config;

        let retry_policy = ExponentialBackoff::from_millis(10)
            .max_delay(reconnect_max_delay)
            .take(reconnect_max_attempts);
        let rpc_client = RpcClient::builder()
            .retry_policy(retry_policy)
            .build(&url)
            .await
            .map_err(|error| Error::RpcClient(error.into()))?;

        let online_client =
            OnlineClient::<SubstrateConfig>::from_rpc_client(rpc_client.clone()).await?;

        Ok(Self {
            online_client,
            rpc_client,
        })
    }

    #[trace]
    async fn block_at(&self, hash: H256) -> Result<SubxtBlock, SubxtNodeError> {
        let block = self.online_client.blocks().at(hash).await.map_err(Box::new)?;
        Ok(block)
    }
}

impl Node for SubxtNode {
    type Error = SubxtNodeError;

    fn chain_identity(&self) -> ChainIdentity {
        let genesis_hash = self.online_client.genesis_hash();
        ChainIdentity::from(const_hex::encode_prefixed(genesis_hash.0))
    }

    async fn current_height(&self) -> Result<u32, Self::Error> {
        let block = self
            .online_client
            .blocks()
            .at_latest()
            .await
            .map_err(Box::new)?;

        Ok(block.number())
    }

    async fn fetch_block(&self, height: u32) -> Result<FetchedBlock, Self::Error> {
        let legacy_rpc = LegacyRpcMethods::<SubstrateConfig>::new(self.rpc_client.to_owned().into());
        let hash = legacy_rpc
            .chain_get_block_hash(Some(height.into()))
            .await?
            .ok_or(SubxtNodeError::BlockNotFound(height))?;

        let block = self.block_at(hash).await?;

        let extrinsics = block.extrinsics().await.map_err(Box::new)?;
        let extrinsics = extrinsics
            .iter()
            .map(|extrinsic| make_extrinsic(&extrinsic))
            .collect::<Vec<_>>();

        let events = block.events().await.map_err(Box::new)?;
        let events = events
            .iter()
            .filter_map(|event| match event {
                Ok(event) => Some(make_event(&event)),

                // A single undecodable event record does not fail the block.
                Err(error) => {
                    warn!(error = error.as_chain(), height; "skipping undecodable event");
                    None
                }
            })
            .collect::<Vec<_>>();

        Ok(FetchedBlock {
            hash: BlockHash::from(block.hash().0),
            height: block.number(),
            extrinsics,
            events,
        })
    }

    async fn new_headers(
        &self,
    ) -> Result<impl Stream<Item = Result<BlockInfo, Self::Error>> + Send, Self::Error> {
        let mut last_height = None;

        let headers = self
            .online_client
            .blocks()
            .subscribe_finalized()
            .await
            .map_err(Box::new)?
            .filter(move |block| {
                // Drop duplicates delivered after a reconnect as well as the
                // disconnection pseudo-errors the reconnecting client emits.
                let pass = match block {
                    Ok(block) => {
                        let height = block.number();

                        if Some(height) <= last_height {
                            warn!(height; "dropping duplicate header, possibly after reconnect");
                            false
                        } else {
                            last_height = Some(height);
                            true
                        }
                    }

                    Err(subxt::Error::Rpc(subxt::error::RpcError::ClientError(
                        subxt_rpcs::Error::DisconnectedWillReconnect(_),
                    ))) => {
                        warn!("node disconnected, reconnecting");
                        false
                    }

                    Err(_) => true,
                };

                ready(pass)
            })
            .map_ok(|block| BlockInfo {
                hash: BlockHash::from(block.hash().0),
                height: block.number(),
            })
            .map_err(|error| Box::new(error).into());

        Ok(headers)
    }
}

/// Config for the node connection.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub url: String,

    #[serde(with = "humantime_serde", default = "reconnect_max_delay_default")]
    pub reconnect_max_delay: Duration,

    #[serde(default = "reconnect_max_attempts_default")]
    pub reconnect_max_attempts: usize,
}

/// Error possibly returned by [SubxtNode::new].
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot create reconnecting subxt RPC client")]
    RpcClient(#[source] BoxError),

    #[error("cannot create subxt online client")]
    OnlineClient(#[from] subxt::Error),
}

/// Error possibly returned by [Node] operations of [SubxtNode].
#[derive(Debug, Error)]
pub enum SubxtNodeError {
    #[error(transparent)]
    Subxt(#[from] Box<subxt::Error>),

    #[error(transparent)]
    Rpc(#[from] subxt_rpcs::Error),

    #[error("block at height {0} not found")]
    BlockNotFound(u32),
}

/// Decode one extrinsic into the rendered domain form.
///
/// Positional integrity matters here: every extrinsic of the block yields
/// exactly one entry, even when its fields cannot be decoded, so that event
/// phases keep lining up with extrinsic positions.
fn make_extrinsic(extrinsic: &SubxtExtrinsic) -> RawExtrinsic {
    let (section, method) = match extrinsic.extrinsic_metadata() {
        Ok(meta) => (meta.pallet.name().to_owned(), meta.variant.name.to_owned()),

        Err(error) => {
            warn!(
                error = error.as_chain(),
                index = extrinsic.index();
                "cannot decode extrinsic metadata"
            );
            (String::new(), String::new())
        }
    };

    let values = match extrinsic.field_values() {
        Ok(fields) => fields.into_values().collect::<Vec<_>>(),

        Err(error) => {
            warn!(
                error = error.as_chain(),
                index = extrinsic.index();
                "cannot decode extrinsic fields"
            );
            Vec::new()
        }
    };

    let payload = values
        .get(PAYLOAD_ARG)
        .and_then(value_bytes)
        .map(ByteVec::from)
        .unwrap_or_default();
    let args = values.iter().map(render_value).collect();

    RawExtrinsic {
        hash: extrinsic.hash().0.into(),
        section,
        method,
        args,
        payload,
    }
}

fn make_event(event: &SubxtEvent) -> EventRecord {
    let phase = match event.phase() {
        Phase::ApplyExtrinsic(index) => Some(index),
        _ => None,
    };

    let data = match event.field_values() {
        Ok(fields) => fields.into_values().map(|value| render_value(&value)).collect(),

        Err(error) => {
            warn!(error = error.as_chain(); "cannot decode event fields");
            Vec::new()
        }
    };

    EventRecord {
        section: event.pallet_name().to_owned(),
        method: event.variant_name().to_owned(),
        phase,
        data,
    }
}

/// Render a decoded field into its canonical string form: byte sequences and
/// accounts as 0x-hex, newtype wrappers and one-armed variants (e.g.
/// `MultiAddress::Id`) unwrapped to their inner value, primitives via
/// `Display`.
///
/// Extrinsic arguments and event data run through the same rendering, which
/// is what makes address correlation between the two possible.
fn render_value(value: &Value<u32>) -> String {
    match &value.value {
        ValueDef::Composite(composite) => {
            if let Some(bytes) = composite_bytes(composite) {
                return const_hex::encode_prefixed(bytes);
            }

            match composite.values().collect::<Vec<_>>().as_slice() {
                [inner] => render_value(inner),
                _ => value.to_string(),
            }
        }

        ValueDef::Variant(variant) => {
            match variant.values.values().collect::<Vec<_>>().as_slice() {
                [] => variant.name.to_owned(),
                [inner] => render_value(inner),
                _ => value.to_string(),
            }
        }

        ValueDef::Primitive(primitive) => match primitive {
            Primitive::Bool(b) => b.to_string(),
            Primitive::Char(c) => c.to_string(),
            Primitive::String(s) => s.to_owned(),
            Primitive::U128(n) => n.to_string(),
            Primitive::I128(n) => n.to_string(),
            _ => value.to_string(),
        },

        ValueDef::BitSequence(_) => value.to_string(),
    }
}

/// A composite whose fields are all `u8` primitives is a byte sequence:
/// `Vec<u8>`, `[u8; N]`, `AccountId32` and friends.
fn composite_bytes(composite: &Composite<u32>) -> Option<Vec<u8>> {
    if composite.len() == 0 {
        return None;
    }

    composite
        .values()
        .map(|value| match &value.value {
            ValueDef::Primitive(Primitive::U128(n)) if *n <= u8::MAX as u128 => Some(*n as u8),
            _ => None,
        })
        .collect()
}

/// The raw bytes of a byte-sequence field, unwrapping newtype wrappers like
/// `BoundedVec`.
fn value_bytes(value: &Value<u32>) -> Option<Vec<u8>> {
    match &value.value {
        ValueDef::Composite(composite) => composite_bytes(composite).or_else(|| {
            match composite.values().collect::<Vec<_>>().as_slice() {
                [inner] => value_bytes(inner),
                _ => None,
            }
        }),

        _ => None,
    }
}

fn reconnect_max_delay_default() -> Duration {
    Duration::from_secs(30)
}

fn reconnect_max_attempts_default() -> usize {
    usize::MAX
}

#[cfg(test)]
mod tests {
    use crate::infra::node::{composite_bytes, render_value, value_bytes};
    use subxt::ext::scale_value::{Composite, Primitive, Value, ValueDef, Variant};

    fn u8_value(byte: u8) -> Value<u32> {
        Value {
            value: ValueDef::Primitive(Primitive::U128(byte as u128)),
            context: 0,
        }
    }

    fn bytes_value(bytes: &[u8]) -> Value<u32> {
        Value {
            value: ValueDef::Composite(Composite::unnamed(
                bytes.iter().map(|byte| u8_value(*byte)),
            )),
            context: 0,
        }
    }

    #[test]
    fn test_render_byte_sequence() {
        let value = bytes_value(&[0xaa, 0xbb]);
        assert_eq!(render_value(&value), "0xaabb");
    }

    #[test]
    fn test_render_newtype_unwrapping() {
        // AccountId32 decodes as a one-field composite around the bytes;
        // MultiAddress::Id as a one-armed variant around that.
        let account = Value {
            value: ValueDef::Composite(Composite::unnamed([bytes_value(&[0x01, 0x02])])),
            context: 0,
        };
        assert_eq!(render_value(&account), "0x0102");

        let address = Value {
            value: ValueDef::Variant(Variant {
                name: "Id".to_string(),
                values: Composite::unnamed([account]),
            }),
            context: 0,
        };
        assert_eq!(render_value(&address), "0x0102");
    }

    #[test]
    fn test_render_primitives() {
        let value = Value {
            value: ValueDef::Primitive(Primitive::U128(42)),
            context: 0,
        };
        assert_eq!(render_value(&value), "42");

        let value = Value::<u32> {
            value: ValueDef::Variant(Variant {
                name: "None".to_string(),
                values: Composite::unnamed([]),
            }),
            context: 0,
        };
        assert_eq!(render_value(&value), "None");
    }

    #[test]
    fn test_value_bytes() {
        let value = bytes_value(&[0xc0, 0xde]);
        assert_eq!(value_bytes(&value), Some(vec![0xc0, 0xde]));

        // One level of newtype wrapping is unwrapped.
        let wrapped = Value {
            value: ValueDef::Composite(Composite::unnamed([bytes_value(&[0xc0, 0xde])])),
            context: 0,
        };
        assert_eq!(value_bytes(&wrapped), Some(vec![0xc0, 0xde]));
    }

    #[test]
    fn test_composite_bytes_rejects_non_bytes() {
        let composite = Composite::<u32>::unnamed([Value {
            value: ValueDef::Primitive(Primitive::U128(1_000)),
            context: 0,
        }]);
        assert_eq!(composite_bytes(&composite), None);

        assert_eq!(composite_bytes(&Composite::<u32>::unnamed([])), None);
    }
}
