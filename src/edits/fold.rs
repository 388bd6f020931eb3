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

//! Fold-down: merge a commit into its sole parent, then drop it.

use tracing::instrument;

use crate::commit_state::CommitState;
use crate::edits::drop;
use crate::error::EditError;
use crate::error::Error;
use crate::file_state::FileState;
use crate::repo_path::RepoPathBuf;
use crate::rev::Rev;
use crate::state::CommitStackState;

/// A commit is foldable into its parent if both are editable, the commit is
/// not the root, and the parent has no other child (a conservative check:
/// the content-mergeability of a wider fold is not analyzed).
pub fn can_fold_down(state: &CommitStackState, rev: Rev) -> bool {
    if rev.as_index().is_none_or(|i| i == 0) {
        return false;
    }
    let Some(commit) = state.commit(rev) else {
        return false;
    };
    if !commit.is_editable() {
        return false;
    }
    let Some(parent_rev) = commit.parent() else {
        return false;
    };
    let Some(parent) = state.commit(parent_rev) else {
        return false;
    };
    if !parent.is_editable() {
        return false;
    }
    let child_count = (0..state.rev_count())
        .map(Rev::from)
        .filter(|&r| state.commit(r).and_then(CommitState::parent) == Some(parent_rev))
        .count();
    child_count == 1
}

#[instrument(level = "debug", skip(state), fields(rev = rev.as_i64()))]
pub fn fold_down(state: &CommitStackState, rev: Rev) -> Result<CommitStackState, Error> {
    if !can_fold_down(state, rev) {
        return Err(EditError::CannotFoldDown(rev).into());
    }
    let commit = state.commit(rev).unwrap().clone();
    let parent_rev = commit.parent().unwrap();
    let parent = state.commit(parent_rev).unwrap().clone();
    let grandparent_rev = parent.parent();

    let mut merged_files = parent.files.clone();
    for (path, child_file) in &commit.files {
        let reconciled = reconcile_copy_from(state, &parent, grandparent_rev, path, child_file);
        let pre_parent = content_one_below(state, grandparent_rev, path);
        if reconciled == pre_parent {
            merged_files.shift_remove(path);
        } else {
            merged_files.insert(path.clone(), reconciled);
        }
    }

    let mut merged = parent;
    merged.files = merged_files;
    merged.text = if state.config().is_meaningful_message(&commit.text) {
        format!("{}\n\n{}", merged.text, commit.text)
    } else {
        merged.text
    };
    merged.original_nodes.extend(commit.original_nodes.iter().cloned());
    merged.date = commit.date;

    let mut commits = state.commits().to_vec();
    commits[parent_rev.as_index().unwrap()] = merged;
    Ok(drop::remove_commit_and_rebuild(state, commits, rev))
}

/// Re-expresses a child file's `copy_from` relative to the grandparent:
/// when the parent itself copied the source path, the chain is followed
/// one link further back; otherwise the source path is kept as-is (the
/// source's content at the parent and grandparent coincide unless the
/// parent freshly created it there, in which case the reference is kept
/// pointing at the source path rather than invented).
fn reconcile_copy_from(
    state: &CommitStackState,
    parent: &CommitState,
    grandparent_rev: Option<Rev>,
    _path: &RepoPathBuf,
    child_file: &FileState,
) -> FileState {
    let Some(source) = &child_file.copy_from else {
        return child_file.clone();
    };
    let resolved_source = match parent.files.get(source) {
        Some(parent_file) => parent_file.copy_from.clone().unwrap_or_else(|| source.clone()),
        None => source.clone(),
    };
    let source_is_absent = content_one_below(state, grandparent_rev, &resolved_source).is_absent();
    FileState {
        copy_from: if source_is_absent { None } else { Some(resolved_source) },
        ..child_file.clone()
    }
}

fn content_one_below(state: &CommitStackState, rev: Option<Rev>, path: &RepoPathBuf) -> FileState {
    match rev {
        Some(r) => state.get_file(r, path).unwrap_or_else(|_| FileState::absent()),
        None => state
            .bottom_files()
            .get(path)
            .cloned()
            .unwrap_or_else(FileState::absent),
    }
}
