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
use indexer_common::{domain::ChainIdentity, infra::pool::sqlite::SqlitePool};
use indoc::indoc;
use log::warn;
use thiserror::Error;

/// Sqlite based implementation of [Storage]: one row per chain identity
/// holding the full JSON-encoded history.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Create a new [SqliteStorage], creating the backing table if missing.
    pub async fn new(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        let query = indoc! {"
            CREATE TABLE IF NOT EXISTS contract_activity (
                chain_id TEXT PRIMARY KEY,
                blocks TEXT NOT NULL
            )
        "};

        sqlx::query(query).execute(&*pool).await?;

        Ok(Self { pool })
    }
}

/// Error possibly returned by [Storage] operations of [SqliteStorage].
#[derive(Debug, Error)]
pub enum SqliteStorageError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error("cannot encode blocks as JSON")]
    Encode(#[from] serde_json::Error),
}

impl Storage for SqliteStorage {
    type Error = SqliteStorageError;

    async fn load(&self, identity: &ChainIdentity) -> Result<Vec<BlockRecord>, Self::Error> {
        let query = indoc! {"
            SELECT blocks
            FROM contract_activity
            WHERE chain_id = $1
        "};

        let row = sqlx::query_as::<_, (String,)>(query)
            .bind(identity.as_str())
            .fetch_optional(&*self.pool)
            .await?;

        let blocks = row
            .map(|(blocks,)| match serde_json::from_str(&blocks) {
                Ok(blocks) => blocks,

                // A corrupt entry degrades to an empty history, not a crash.
                Err(error) => {
                    warn!(
                        error:%,
                        identity:%;
                        "cannot decode persisted history, starting empty"
                    );
                    Vec::new()
                }
            })
            .unwrap_or_default();

        Ok(blocks)
    }

    async fn save(
        &self,
        identity: &ChainIdentity,
        blocks: &[BlockRecord],
    ) -> Result<(), Self::Error> {
        let query = indoc! {"
            INSERT INTO contract_activity (chain_id, blocks)
            VALUES ($1, $2)
            ON CONFLICT (chain_id) DO UPDATE SET blocks = excluded.blocks
        "};

        let blocks = serde_json::to_string(blocks)?;

        sqlx::query(query)
            .bind(identity.as_str())
            .bind(blocks)
            .execute(&*self.pool)
            .await?;

        Ok(())
    }
}
