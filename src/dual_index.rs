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

//! The dual index: two maps, `commit_to_file` and `file_to_commit`, that
//! must always be rebuilt together and remain exact inverses.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::InvariantError;
use crate::repo_path::RepoPathBuf;
use crate::rev::FileIdx;
use crate::rev::Rev;

/// `(rev, path)` — the commit-side half of the dual index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommitIdx {
    pub rev: Rev,
    pub path: Arc<RepoPathBuf>,
}

impl CommitIdx {
    pub fn new(rev: Rev, path: impl Into<Arc<RepoPathBuf>>) -> Self {
        CommitIdx {
            rev,
            path: path.into(),
        }
    }
}

/// The bijection between `(rev, path)` and `(fileStackIndex, fileRev)`.
///
/// Never mutated in place: every rebuild (stack builder, drop, reorder)
/// produces a fresh [`DualIndex`] rather than patching the old one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DualIndex {
    commit_to_file: HashMap<CommitIdx, FileIdx>,
    file_to_commit: HashMap<FileIdx, CommitIdx>,
}

impl DualIndex {
    pub fn insert(&mut self, commit_idx: CommitIdx, file_idx: FileIdx) {
        self.file_to_commit.insert(file_idx, commit_idx.clone());
        self.commit_to_file.insert(commit_idx, file_idx);
    }

    pub fn file_for_commit(&self, rev: Rev, path: &RepoPathBuf) -> Option<FileIdx> {
        self.commit_to_file
            .get(&CommitIdx::new(rev, Arc::new(path.clone())))
            .copied()
    }

    pub fn commit_for_file(&self, idx: FileIdx) -> Option<&CommitIdx> {
        self.file_to_commit.get(&idx)
    }

    pub fn len(&self) -> usize {
        self.commit_to_file.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commit_to_file.is_empty()
    }

    /// Checks that the two maps are exact inverses of each other.
    pub fn check_invariant(&self) -> Result<(), InvariantError> {
        if self.commit_to_file.len() != self.file_to_commit.len() {
            return Err(InvariantError::DualIndexMismatch(format!(
                "commitToFile has {} entries, fileToCommit has {}",
                self.commit_to_file.len(),
                self.file_to_commit.len()
            )));
        }
        for (commit_idx, file_idx) in &self.commit_to_file {
            match self.file_to_commit.get(file_idx) {
                Some(back) if back == commit_idx => {}
                _ => {
                    return Err(InvariantError::DualIndexMismatch(format!(
                        "{commit_idx:?} -> {file_idx} has no matching reverse entry"
                    )));
                }
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for CommitIdx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.rev, self.path)
    }
}
