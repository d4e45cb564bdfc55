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

#[tokio::main]
async fn main() {
    use indexer_common::telemetry;
    use log::error;
    use std::panic;

    // Initialize logging.
    telemetry::init_logging();

    // Replace the default panic hook with one that uses structured logging at ERROR level.
    panic::set_hook(Box::new(|panic| error!(panic:%; "process panicked")));

    // Run and log any error.
    if let Err(error) = run().await {
        let backtrace = error.backtrace();
        let error = format!("{error:#}");
        error!(error, backtrace:%; "process exited with ERROR")
    }
}

async fn run() -> anyhow::Result<()> {
    use activity_indexer::{
        application::LiveTracker,
        config::{Config, InfraConfig},
        infra::{node::SubxtNode, storage::sqlite::SqliteStorage},
    };
    use anyhow::Context;
    use indexer_common::{config::ConfigExt, infra::pool, telemetry};
    use log::info;

    // Load configuration.
    let Config {
        application_config,
        infra_config,
        telemetry_config:
            telemetry::Config {
                tracing_config,
                metrics_config,
            },
    } = Config::load().context("load configuration")?;

    // Initialize tracing and metrics.
    telemetry::init_tracing(tracing_config);
    telemetry::init_metrics(metrics_config);

    info!(application_config:?, infra_config:?; "starting");

    let InfraConfig {
        node_config,
        storage_config,
    } = infra_config;

    let node = SubxtNode::new(node_config)
        .await
        .context("create SubxtNode")?;

    let pool = pool::sqlite::SqlitePool::new(storage_config)
        .await
        .context("create DB pool for Sqlite")?;
    let storage = SqliteStorage::new(pool)
        .await
        .context("create SqliteStorage")?;

    let tracker = LiveTracker::new(application_config, node, storage);
    tracker.run().await.context("run live tracker")?;

    info!("activity-indexer terminated");

    Ok(())
}
