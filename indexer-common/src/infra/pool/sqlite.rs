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

use log::debug;
use serde::Deserialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::ops::Deref;
use thiserror::Error;

/// New type for `sqlx::SqlitePool`.
///
/// The pool is limited to a single connection: there is exactly one writer
/// per database, matching the single tracker instance per chain connection.
/// To use as `&sqlx::SqlitePool`, use its `Deref` implementation: `&*pool`.
#[derive(Debug, Clone)]
pub struct SqlitePool(sqlx::SqlitePool);

impl SqlitePool {
    /// Try to create a new [SqlitePool] with the given config, creating the
    /// database file if missing.
    pub async fn new(config: Config) -> Result<Self, Error> {
        let connect_options = config
            .url
            .parse::<SqliteConnectOptions>()
            .map_err(Error::ParseUrl)?
            .create_if_missing(true);

        let inner = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(connect_options)
            .await?;

        let pool = SqlitePool(inner);
        debug!(pool:?; "created pool");

        Ok(pool)
    }
}

impl Deref for SqlitePool {
    type Target = sqlx::SqlitePool;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Error possibly returned by [SqlitePool::new].
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot parse sqlite connection URL")]
    ParseUrl(#[source] sqlx::Error),

    #[error("cannot create sqlite connection pool")]
    CreatePool(#[from] sqlx::Error),
}

/// Configuration for [SqlitePool].
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::infra::pool::sqlite::{Config, SqlitePool};

    #[tokio::test]
    async fn test_pool() {
        let pool = SqlitePool::new(Config::default()).await;
        assert!(pool.is_ok());
        let pool = pool.unwrap();

        let result = sqlx::query("CREATE TABLE test (id INTEGER PRIMARY KEY)")
            .execute(&*pool)
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_pool_invalid_url() {
        let pool = SqlitePool::new(Config {
            url: "not a url ::".to_string(),
        })
        .await;
        assert!(pool.is_err());
    }
}
