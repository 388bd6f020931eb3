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

//! Bottom-files derivation: the immutable snapshot of every path's content
//! just below the stack.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::StructuralRejectionError;
use crate::file_state::FileState;
use crate::repo_path::RepoPathBuf;
use crate::rev::Rev;
use crate::wire::ExportStack;

/// Snapshot of every path ever referenced in the stack, as seen just below
/// rev 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BottomFiles(pub Arc<IndexMap<RepoPathBuf, FileState>>);

impl BottomFiles {
    pub fn get(&self, path: &RepoPathBuf) -> Option<&FileState> {
        self.0.get(path)
    }

    pub fn contains(&self, path: &RepoPathBuf) -> bool {
        self.0.contains_key(path)
    }
}

/// Derives [`BottomFiles`] from an `ExportStack`.
///
/// Iterates commits in export order. For each, merges `relevant_files`
/// entries into the result only if the path is absent so far (earlier
/// commits are lower in the stack and win). Then, for every path in
/// `files` still missing, inserts [`FileState::absent`] (the file is
/// introduced later; there is nothing below the stack).
pub fn derive_bottom_files(export: &ExportStack) -> Result<BottomFiles, StructuralRejectionError> {
    reject_multiple_roots(export)?;

    let mut bottom: IndexMap<RepoPathBuf, FileState> = IndexMap::new();
    for commit in export {
        for (path, file) in &commit.relevant_files {
            bottom
                .entry(path.clone())
                .or_insert_with(|| FileState::from_export(file));
        }
        for path in commit.files.keys() {
            bottom.entry(path.clone()).or_insert_with(FileState::absent);
        }
    }
    Ok(BottomFiles(Arc::new(bottom)))
}

/// Only rev 0 may be parentless; every other commit must chain to a
/// predecessor, and rev 0 itself must not have one.
fn reject_multiple_roots(export: &ExportStack) -> Result<(), StructuralRejectionError> {
    for (i, commit) in export.iter().enumerate() {
        let rev = Rev::from(i);
        if i == 0 {
            if !commit.parents.is_empty() {
                return Err(StructuralRejectionError::RootHasParents(rev));
            }
        } else if commit.parents.is_empty() {
            return Err(StructuralRejectionError::NonRootWithoutParents(rev));
        }
        if commit.parents.len() > 1 {
            return Err(StructuralRejectionError::MergeCommit(rev));
        }
    }
    Ok(())
}
