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

use std::error::Error as StdError;

/// Alias for `async` and `anyhow` friendly dynamic error
/// `Box<dyn std::error::Error + Send + Sync + 'static>`.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Extension methods for types implementing `std::error::Error`.
pub trait StdErrorExt
where
    Self: StdError,
{
    /// Format this error and all its recursive sources as a single colon
    /// separated string, suitable as a log record field:
    ///
    /// `warn!(error = error.as_chain(); "cannot fetch block");`
    fn as_chain(&self) -> String {
        let mut chain = self.to_string();

        let mut source = self.source();
        while let Some(error) = source {
            chain.push_str(": ");
            chain.push_str(&error.to_string());
            source = error.source();
        }

        chain
    }
}

impl<T> StdErrorExt for T where T: StdError {}

#[cfg(test)]
mod tests {
    use crate::error::StdErrorExt;
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("outer")]
    struct OuterError(#[source] InnerError);

    #[derive(Debug, Error)]
    #[error("inner")]
    struct InnerError;

    #[test]
    fn test_as_chain() {
        assert_eq!(InnerError.as_chain(), "inner");
        assert_eq!(OuterError(InnerError).as_chain(), "outer: inner");
    }
}
