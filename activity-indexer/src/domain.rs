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

pub mod code;
pub mod node;
pub mod storage;

mod block;
mod cache;
mod classify;
mod transaction;

pub use block::*;
pub use cache::*;
pub use classify::*;
pub use code::{CodeRecord, CodeStore};
pub use node::Node;
pub use storage::Storage;
pub use transaction::*;
