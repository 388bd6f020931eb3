// Copyright 2020 The Jujutsu Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! An in-memory, persistent editing engine for a linear stack of commits.
//!
//! [`state::CommitStackState`] is loaded once from a host repository's
//! [`wire::ExportStack`] and materializes every modified file into a set of
//! shared, append-only [`file_stack::FileStack`]s. The [`edits`] operators
//! (fold, drop, reorder) consume one state by value and return a new one,
//! sharing whatever subtrees they did not touch. [`export::calculate_import_stack`]
//! diffs the edited state back against the stack it was loaded from and
//! produces the smallest [`wire::ImportStack`] that reconciles the host.

pub mod ancestry;
pub mod bottom_files;
pub mod commit_state;
pub mod config;
pub mod dep_map;
pub mod dual_index;
pub mod edits;
pub mod error;
pub mod export;
pub mod file_state;
pub mod file_stack;
pub mod repo_path;
pub mod rev;
pub mod stack_builder;
pub mod state;
#[cfg(feature = "testing")]
pub mod testutils;
pub mod wire;

pub use config::Config;
pub use error::Error;
pub use error::Result;
pub use export::ExportOptions;
pub use rev::Rev;
pub use state::CommitStackState;
