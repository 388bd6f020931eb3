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

//! The stack builder: derives file stacks and the dual index from a commit
//! list plus its bottom files.
//!
//! Processing order within a commit determines which of two touching edits
//! gets to continue an existing file stack versus start a fresh one. Within
//! one commit, files are grouped into three classes and visited alphabetical
//! by path within each class, in this order:
//!
//! 1. rename targets — `copy_from` is set and the source path is itself
//!    marked absent in the same commit
//! 2. plain modifications — no `copy_from`
//! 3. copy targets — `copy_from` is set but the source survives
//!
//! An absent entry whose path is some other entry's `copy_from` in the same
//! commit (the source half of a rename) is skipped entirely: the rename
//! target already continues the content history through `copy_from`, so
//! processing the vacated path too would fork an identical continuation off
//! the same parent revision. Every other absent entry (plain deletions) is
//! processed normally, with empty text standing in for "no content".
//!
//! Binary files never participate in a file stack; their content lives
//! inline in [`crate::file_state::FileData::Binary`] and is carried through
//! untouched.

use std::collections::BTreeMap;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::instrument;

use crate::ancestry::log_file;
use crate::bottom_files::BottomFiles;
use crate::commit_state::CommitState;
use crate::dual_index::CommitIdx;
use crate::dual_index::DualIndex;
use crate::error::InvariantError;
use crate::file_state::FileData;
use crate::file_state::FileState;
use crate::file_stack::FileStack;
use crate::repo_path::RepoPathBuf;
use crate::rev::FileIdx;
use crate::rev::FileRev;
use crate::rev::FileStackIndex;
use crate::rev::Rev;

/// Output of the stack builder: the file-stack arena plus the dual index
/// tying `(rev, path)` pairs to positions within it.
#[derive(Debug, Clone, Default)]
pub struct BuiltFileStacks {
    pub file_stacks: Vec<FileStack>,
    pub dual_index: DualIndex,
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Class {
    Rename,
    Modify,
    Copy,
}

/// Builds file stacks and the dual index for the whole commit list, in
/// order from rev 0 upward.
#[instrument(level = "debug", skip_all, fields(commits = commits.len()))]
pub fn build(
    commits: &[CommitState],
    bottom_files: &BottomFiles,
) -> Result<BuiltFileStacks, InvariantError> {
    let mut built = BuiltFileStacks::default();
    for commit in commits {
        let ordered = order_commit_files(commit);
        for (path, file) in ordered {
            process_entry(commits, bottom_files, &mut built, commit.rev, path, file)?;
        }
    }
    Ok(built)
}

/// Orders one commit's modified files per the class/alphabetical rule
/// above, skipping rename-source absences.
fn order_commit_files(commit: &CommitState) -> Vec<(&RepoPathBuf, &FileState)> {
    let rename_sources: std::collections::HashSet<&RepoPathBuf> = commit
        .files
        .values()
        .filter_map(|f| f.copy_from.as_ref())
        .collect();

    let mut entries: Vec<(Class, &RepoPathBuf, &FileState)> = Vec::new();
    for (path, file) in &commit.files {
        if matches!(file.data, FileData::Binary(_)) {
            continue;
        }
        if file.is_absent() && rename_sources.contains(path) {
            continue;
        }
        let class = match &file.copy_from {
            Some(from) => {
                let source_absent_here = commit.files.get(from).is_some_and(FileState::is_absent);
                if source_absent_here {
                    Class::Rename
                } else {
                    Class::Copy
                }
            }
            None => Class::Modify,
        };
        entries.push((class, path, file));
    }
    entries.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
    entries.into_iter().map(|(_, path, file)| (path, file)).collect()
}

fn stack_text(file: &FileState) -> Option<Arc<str>> {
    match &file.data {
        FileData::Text(s) => Some(s.clone()),
        FileData::Binary(_) => None,
        FileData::Lazy(_) => {
            unreachable!("stack builder runs on freshly ingested commits; no Lazy data yet")
        }
    }
}

fn bottom_text(bottom_files: &BottomFiles, path: &RepoPathBuf) -> Option<Arc<str>> {
    bottom_files.get(path).and_then(stack_text)
}

/// Walks ancestors of `rev` for `path` (following renames), returning the
/// nearest modification and its text, or the bottom-files entry if none.
fn locate_parent(
    commits: &[CommitState],
    bottom_files: &BottomFiles,
    rev: Rev,
    path: &RepoPathBuf,
) -> (Rev, RepoPathBuf, Option<Arc<str>>) {
    let idx = rev.as_index().expect("rev is a real commit, not BOTTOM");
    let parent_rev = match commits[idx].parent() {
        Some(p) => p,
        None => return (Rev::BOTTOM, path.clone(), bottom_text(bottom_files, path)),
    };
    match log_file(commits, parent_rev, path, true).next() {
        Some((found_rev, found_path)) => {
            let found_idx = found_rev.as_index().unwrap();
            let file = &commits[found_idx].files[&found_path];
            (found_rev, found_path, stack_text(file))
        }
        None => (Rev::BOTTOM, path.clone(), bottom_text(bottom_files, path)),
    }
}

#[allow(clippy::too_many_arguments)]
fn process_entry(
    commits: &[CommitState],
    bottom_files: &BottomFiles,
    built: &mut BuiltFileStacks,
    rev: Rev,
    path: &RepoPathBuf,
    file: &FileState,
) -> Result<(), InvariantError> {
    let content = stack_text(file).ok_or_else(|| InvariantError::PathNotTracked {
        path: path.clone(),
    })?;
    let lookup_path = file.copy_from.clone().unwrap_or_else(|| path.clone());
    let (prev_rev, prev_path, prev_content) =
        locate_parent(commits, bottom_files, rev, &lookup_path);

    if let Some(existing) = built.dual_index.file_for_commit(prev_rev, &prev_path) {
        let stack = &built.file_stacks[existing.stack.0];
        if existing.rev.0 + 1 == stack.rev_length() {
            let new_rev = FileRev(stack.rev_length());
            built.file_stacks[existing.stack.0] =
                FileStack::new(stack_revisions(stack).chain(std::iter::once(content)));
            built
                .dual_index
                .insert(CommitIdx::new(rev, path.clone()), FileIdx::new(existing.stack, new_rev));
            return Ok(());
        }
    }

    let stack_index = FileStackIndex(built.file_stacks.len());
    match prev_content {
        Some(parent_text) => {
            built
                .file_stacks
                .push(FileStack::new([parent_text, content]));
            built
                .dual_index
                .insert(CommitIdx::new(prev_rev, prev_path), FileIdx::new(stack_index, FileRev(0)));
            built
                .dual_index
                .insert(CommitIdx::new(rev, path.clone()), FileIdx::new(stack_index, FileRev(1)));
        }
        None => {
            built.file_stacks.push(FileStack::new([content]));
            built
                .dual_index
                .insert(CommitIdx::new(rev, path.clone()), FileIdx::new(stack_index, FileRev(0)));
        }
    }
    Ok(())
}

fn stack_revisions(stack: &FileStack) -> impl Iterator<Item = Arc<str>> + '_ {
    stack.revs().map(|r| Arc::from(stack.get_rev(r)))
}

/// Renumbers a commit list's revs and parent links to match a new order,
/// used after a reorder or drop before rebuilding file stacks. `commits` is
/// given in its *old* rev order; `new_order` lists the old revs in their
/// new positions (e.g. `[0, 2, 1]` swaps the last two commits).
pub fn renumber(commits: &[CommitState], new_order: &[Rev]) -> Vec<CommitState> {
    let key_at_old_rev: BTreeMap<Rev, crate::commit_state::Key> = commits
        .iter()
        .map(|c| (c.rev, c.key.clone()))
        .collect();
    let new_rev_of_key: BTreeMap<crate::commit_state::Key, Rev> = new_order
        .iter()
        .enumerate()
        .map(|(new_idx, &old_rev)| (key_at_old_rev[&old_rev].clone(), Rev::from(new_idx)))
        .collect();

    new_order
        .iter()
        .map(|&old_rev| {
            let mut commit = commits[old_rev.as_index().unwrap()].clone();
            commit.rev = new_rev_of_key[&commit.key];
            commit.parents = commit
                .parents
                .iter()
                .map(|p| {
                    key_at_old_rev
                        .get(p)
                        .and_then(|k| new_rev_of_key.get(k))
                        .copied()
                        .expect("parent of a kept commit must also be kept (legality predicate ensures this)")
                })
                .collect();
            commit
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::*;
    use crate::commit_state::ImmutableKind;
    use crate::commit_state::Key;
    use crate::commit_state::Timestamp;
    use crate::wire::ExportFile;

    fn ts() -> Timestamp {
        Timestamp {
            unix_seconds: 0,
            tz_offset_minutes: 0,
        }
    }

    fn commit(rev: i64, parent: Option<i64>, files: Vec<(&str, FileState)>) -> CommitState {
        CommitState {
            rev: Rev::new(rev),
            original_nodes: Default::default(),
            key: Key::new(format!("k{rev}")),
            author: "a".into(),
            date: ts(),
            text: String::new(),
            immutable_kind: ImmutableKind::None,
            parents: parent.into_iter().map(Rev::new).collect(),
            files: files.into_iter().map(|(p, f)| (p.into(), f)).collect(),
        }
    }

    fn empty_bottom() -> BottomFiles {
        BottomFiles(Arc::new(IndexMap::new()))
    }

    #[test]
    fn linear_add_then_modify_builds_single_stack() {
        let commits = vec![
            commit(0, None, vec![("x.txt", FileState::text("hello"))]),
            commit(1, Some(0), vec![("x.txt", FileState::text("hello world"))]),
        ];
        let built = build(&commits, &empty_bottom()).unwrap();
        assert_eq!(built.file_stacks.len(), 1);
        assert_eq!(built.file_stacks[0].rev_length(), 2);
        assert_eq!(built.file_stacks[0].get_rev(FileRev(0)), "hello");
        assert_eq!(built.file_stacks[0].get_rev(FileRev(1)), "hello world");
    }

    #[test]
    fn rename_continues_the_original_stack() {
        let commits = vec![
            commit(0, None, vec![("x.txt", FileState::text("33"))]),
            commit(
                1,
                Some(0),
                vec![
                    ("x.txt", FileState::absent()),
                    ("y.txt", FileState::text("33").with_copy_from("x.txt")),
                ],
            ),
        ];
        let built = build(&commits, &empty_bottom()).unwrap();
        assert_eq!(built.file_stacks.len(), 1, "rename must not fork a new stack");
        assert_eq!(built.file_stacks[0].rev_length(), 2);
        let idx = built
            .dual_index
            .file_for_commit(Rev::new(1), &"y.txt".into())
            .unwrap();
        assert_eq!(idx.rev, FileRev(1));
    }

    #[test]
    fn unrelated_binary_file_never_gets_a_stack() {
        let commits = vec![commit(0, None, vec![("x.bin", FileState::binary(vec![0, 1, 2]))])];
        let built = build(&commits, &empty_bottom()).unwrap();
        assert!(built.file_stacks.is_empty());
    }

    #[test]
    fn export_bottom_file_seeds_new_stack() {
        let mut bottom = IndexMap::new();
        bottom.insert("x.txt".into(), FileState::from_export(&ExportFile::utf8("base")));
        let commits = vec![commit(0, None, vec![("x.txt", FileState::text("base+1"))])];
        let built = build(&commits, &BottomFiles(Arc::new(bottom))).unwrap();
        assert_eq!(built.file_stacks[0].rev_length(), 2);
        assert_eq!(built.file_stacks[0].get_rev(FileRev(0)), "base");
    }
}
