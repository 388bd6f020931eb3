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

//! Drop: remove one commit from the stack, relinking its child to its
//! parent and rebuilding file stacks from scratch.

use tracing::instrument;

use crate::commit_state::CommitState;
use crate::error::EditError;
use crate::error::Error;
use crate::rev::Rev;
use crate::stack_builder;
use crate::state::CommitStackState;

/// A commit is droppable if it is editable and no later commit's content
/// depends on it.
pub fn can_drop(state: &CommitStackState, rev: Rev) -> bool {
    let Some(commit) = state.commit(rev) else {
        return false;
    };
    if !commit.is_editable() {
        return false;
    }
    let dep_map = state.calculate_dep_map();
    !(0..state.rev_count())
        .map(Rev::from)
        .filter(|&r| r > rev)
        .any(|r| dep_map.get(&r).is_some_and(|deps| deps.contains(&rev)))
}

#[instrument(level = "debug", skip(state), fields(rev = rev.as_i64()))]
pub fn drop(state: &CommitStackState, rev: Rev) -> Result<CommitStackState, Error> {
    if !can_drop(state, rev) {
        return Err(EditError::CannotDrop(rev).into());
    }
    let commits = state.commits().to_vec();
    Ok(remove_commit_and_rebuild(state, commits, rev))
}

/// Removes `rev` from `commits` (given in old-rev order, otherwise
/// unmodified from `state`'s own commit list except for whatever the caller
/// already patched — e.g. fold's merged parent), relinks any commit whose
/// parent was `rev` to `rev`'s own parent, and rebuilds file stacks.
pub(crate) fn remove_commit_and_rebuild(
    state: &CommitStackState,
    mut commits: Vec<CommitState>,
    rev: Rev,
) -> CommitStackState {
    let dropped_parent = commits[rev.as_index().unwrap()].parent();
    for commit in &mut commits {
        if commit.parent() == Some(rev) {
            commit.parents = dropped_parent.into_iter().collect();
        }
    }
    let new_order: Vec<Rev> = (0..commits.len())
        .map(Rev::from)
        .filter(|&r| r != rev)
        .collect();
    let renumbered = stack_builder::renumber(&commits, &new_order);
    let built = stack_builder::build(&renumbered, state.bottom_files()).expect(
        "dropping a commit from an already-valid state cannot produce an untracked path",
    );
    CommitStackState::assemble(renumbered, state.bottom_files().clone(), built, *state.config())
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::*;
    use crate::commit_state::Timestamp;
    use crate::config::Config;
    use crate::wire::ExportCommit;
    use crate::wire::ExportFile;
    use crate::wire::ExportStack;

    fn ts() -> Timestamp {
        Timestamp {
            unix_seconds: 0,
            tz_offset_minutes: 0,
        }
    }

    fn export_commit(node: &str, parents: Vec<&str>, files: Vec<(&str, Option<ExportFile>)>) -> ExportCommit {
        ExportCommit {
            node: node.to_owned(),
            immutable: false,
            requested: true,
            author: "author".to_owned(),
            date: ts(),
            text: format!("commit {node}"),
            parents: parents.into_iter().map(str::to_owned).collect(),
            relevant_files: IndexMap::new(),
            files: files.into_iter().map(|(p, f)| (p.into(), f)).collect(),
        }
    }

    fn drop_middle_scenario() -> ExportStack {
        vec![
            export_commit("A", vec![], vec![("z.txt", Some(ExportFile::utf8("22")))]),
            export_commit("B", vec!["A"], vec![("z.txt", Some(ExportFile::utf8("33")))]),
        ]
    }

    #[test]
    fn drop_middle_keeps_descendants_content() {
        let export = drop_middle_scenario();
        let state = CommitStackState::from_export(&export, Config::default()).unwrap();
        assert!(can_drop(&state, Rev::new(0)));
        let dropped = drop(&state, Rev::new(0)).unwrap();
        assert_eq!(dropped.rev_count(), 1);
        assert_eq!(
            dropped.get_file(Rev::new(0), &"z.txt".into()).unwrap().data.as_text(),
            Some("33")
        );
    }

    #[test]
    fn rename_source_cannot_be_dropped() {
        let export = vec![
            export_commit("A", vec![], vec![("x.txt", Some(ExportFile::utf8("33")))]),
            export_commit(
                "B",
                vec!["A"],
                vec![
                    ("x.txt", None),
                    ("y.txt", Some(ExportFile::utf8("33").with_copy_from("x.txt"))),
                ],
            ),
        ];
        let state = CommitStackState::from_export(&export, Config::default()).unwrap();
        assert!(!can_drop(&state, Rev::new(0)));
    }
}
