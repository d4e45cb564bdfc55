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

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::Deserialize;
use std::env;

const CONFIG_FILE: &str = "CONFIG_FILE";
const ENV_PREFIX: &str = "APP__";

/// Extension methods for "configuration structs" which can be deserialized.
pub trait ConfigExt
where
    Self: for<'de> Deserialize<'de>,
{
    /// Load the configuration from the file at the value of the `CONFIG_FILE`
    /// environment variable, falling back to `config.yaml`, overlaid with
    /// environment variables prefixed with `"APP__"` and nested via `"__"`,
    /// e.g. `APP__INFRA__NODE__URL`.
    fn load() -> Result<Self, Box<figment::Error>> {
        let config_file = env::var(CONFIG_FILE).unwrap_or_else(|_| "config.yaml".to_string());

        let config = Figment::new()
            .merge(Yaml::file_exact(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        Ok(config)
    }
}

impl<T> ConfigExt for T where T: for<'de> Deserialize<'de> {}

#[cfg(test)]
mod tests {
    use crate::config::{CONFIG_FILE, ConfigExt};
    use assert_matches::assert_matches;
    use serde::Deserialize;
    use std::{env, fs};

    #[derive(Debug, Deserialize)]
    struct Config {
        node: NodeConfig,
    }

    #[derive(Debug, Deserialize)]
    struct NodeConfig {
        url: String,

        #[serde(default)]
        reconnect_max_attempts: usize,
    }

    #[test]
    fn test_load() {
        let config_file = env::temp_dir().join("indexer-common-config-test.yaml");
        fs::write(&config_file, "node:\n  url: ws://localhost:9944\n")
            .expect("config file can be written");

        unsafe {
            env::set_var(CONFIG_FILE, &config_file);
            env::set_var("APP__NODE__RECONNECT_MAX_ATTEMPTS", "3");
        }

        // The URL comes from the file, the attempts from the env overlay.
        let config = Config::load();
        assert_matches!(
            config,
            Ok(Config { node: NodeConfig { url, reconnect_max_attempts } })
                if url == "ws://localhost:9944" && reconnect_max_attempts == 3
        );

        unsafe {
            env::set_var(CONFIG_FILE, "nonexistent.yaml");
        }
        let config = Config::load();
        assert!(config.is_err());
    }
}
