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

//! [`CommitState`]: one commit's metadata and modified files.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::file_state::FileState;
use crate::repo_path::RepoPathBuf;
use crate::rev::Rev;

/// Stable identifier for a commit within the stack, preserved across
/// rebuilds so external observers (e.g. a UI) can track identity across
/// edits. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct Key(String);

impl Key {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        assert!(!value.is_empty(), "commit key must not be empty");
        Key(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How much of a commit is frozen against edits.
///
/// Any value other than `None` is treated conservatively as non-foldable
/// and non-droppable; the distinction between `Content` and `Diff` is kept
/// for fidelity with the host repository but does not relax either check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ImmutableKind {
    /// The commit and its ancestors are entirely frozen: no edit may alter
    /// its attributes or position.
    Hash,
    /// Only the file contents are frozen.
    Content,
    /// Only the diff (relative to parent) is frozen.
    Diff,
    /// Fully editable.
    None,
}

impl ImmutableKind {
    pub const fn is_none(self) -> bool {
        matches!(self, ImmutableKind::None)
    }
}

/// Unix seconds + timezone offset in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Timestamp {
    pub unix_seconds: i64,
    pub tz_offset_minutes: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CommitState {
    /// Position in the stack; must equal the commit's index.
    pub rev: Rev,
    /// Original hashes this commit descends from, tracked for export.
    pub original_nodes: BTreeSet<Arc<str>>,
    pub key: Key,
    pub author: String,
    pub date: Timestamp,
    pub text: String,
    pub immutable_kind: ImmutableKind,
    /// Length at most 1; merge commits are rejected.
    pub parents: Vec<Rev>,
    /// Only *modified* files at this commit (not inherited content).
    pub files: IndexMap<RepoPathBuf, FileState>,
}

impl CommitState {
    pub fn parent(&self) -> Option<Rev> {
        self.parents.first().copied()
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn is_editable(&self) -> bool {
        self.immutable_kind.is_none()
    }
}
