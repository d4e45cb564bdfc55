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

use crate::domain::code::{CodeRecord, CodeStore};
use indexer_common::domain::ChainIdentity;
use parking_lot::RwLock;
use std::{collections::HashMap, convert::Infallible, sync::Arc};

type Key = (ChainIdentity, String);

/// In-memory implementation of [CodeStore]: decoders keyed by chain identity
/// and code hash, contract accounts resolved through a second keyed map.
#[derive(Debug, Clone, Default)]
pub struct InMemCodeStore {
    codes: Arc<RwLock<HashMap<Key, CodeRecord>>>,
    contracts: Arc<RwLock<HashMap<Key, String>>>,
}

impl CodeStore for InMemCodeStore {
    type Error = Infallible;

    async fn save_code(
        &self,
        identity: &ChainIdentity,
        code: CodeRecord,
    ) -> Result<(), Self::Error> {
        self.codes
            .write()
            .insert((identity.clone(), code.code_hash.clone()), code);
        Ok(())
    }

    async fn register_contract(
        &self,
        identity: &ChainIdentity,
        address: &str,
        code_hash: &str,
    ) -> Result<(), Self::Error> {
        self.contracts
            .write()
            .insert((identity.clone(), address.to_owned()), code_hash.to_owned());
        Ok(())
    }

    async fn get_by_code_hash(
        &self,
        identity: &ChainIdentity,
        code_hash: &str,
    ) -> Result<Option<CodeRecord>, Self::Error> {
        let code = self
            .codes
            .read()
            .get(&(identity.clone(), code_hash.to_owned()))
            .cloned();
        Ok(code)
    }

    async fn get_by_contract(
        &self,
        identity: &ChainIdentity,
        address: &str,
    ) -> Result<Option<CodeRecord>, Self::Error> {
        let code_hash = self
            .contracts
            .read()
            .get(&(identity.clone(), address.to_owned()))
            .cloned();

        match code_hash {
            Some(code_hash) => self.get_by_code_hash(identity, &code_hash).await,
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        domain::code::{CodeRecord, CodeStore},
        infra::code_store::in_mem::InMemCodeStore,
    };
    use indexer_common::domain::ChainIdentity;
    use serde_json::json;

    fn code(code_hash: &str, when_created: u64) -> CodeRecord {
        CodeRecord {
            code_hash: code_hash.to_string(),
            abi: json!({ "spec": { "messages": [] } }),
            when_created,
        }
    }

    #[tokio::test]
    async fn test_lookup_by_code_hash() {
        let store = InMemCodeStore::default();
        let identity = ChainIdentity::from("0x01");

        store.save_code(&identity, code("0xc0de", 1)).await.unwrap();

        let found = store.get_by_code_hash(&identity, "0xc0de").await.unwrap();
        assert_eq!(found, Some(code("0xc0de", 1)));

        let found = store.get_by_code_hash(&identity, "0xffff").await.unwrap();
        assert_eq!(found, None);
    }

    #[tokio::test]
    async fn test_lookup_by_contract() {
        let store = InMemCodeStore::default();
        let identity = ChainIdentity::from("0x01");

        store.save_code(&identity, code("0xc0de", 1)).await.unwrap();
        store
            .register_contract(&identity, "0xaa", "0xc0de")
            .await
            .unwrap();

        let found = store.get_by_contract(&identity, "0xaa").await.unwrap();
        assert_eq!(found, Some(code("0xc0de", 1)));

        let found = store.get_by_contract(&identity, "0xbb").await.unwrap();
        assert_eq!(found, None);
    }

    #[tokio::test]
    async fn test_dedup_by_code_hash() {
        let store = InMemCodeStore::default();
        let identity = ChainIdentity::from("0x01");

        store.save_code(&identity, code("0xc0de", 1)).await.unwrap();
        store.save_code(&identity, code("0xc0de", 2)).await.unwrap();

        // Last write wins; there is exactly one entry per code hash.
        let found = store.get_by_code_hash(&identity, "0xc0de").await.unwrap();
        assert_eq!(found, Some(code("0xc0de", 2)));
    }

    #[tokio::test]
    async fn test_identity_partitioning() {
        let store = InMemCodeStore::default();

        store
            .save_code(&ChainIdentity::from("0x01"), code("0xc0de", 1))
            .await
            .unwrap();

        let found = store
            .get_by_code_hash(&ChainIdentity::from("0x02"), "0xc0de")
            .await
            .unwrap();
        assert_eq!(found, None);
    }
}
