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

//! Per-commit dependency analysis: which earlier revs a commit's content
//! requires to stay meaningful, combining two sources:
//!
//! - content dependencies: a file stack's own line-provenance map
//!   ([`crate::file_stack::FileStack::calculate_dep_map`]), translated from
//!   file revs back to commit revs via the dual index;
//! - structural dependencies: a rename or copy depends on the commit that
//!   last touched its source path, even when no line survived the rename
//!   (an empty file renamed still depends on the add that created it).
//!
//! The result anchors the legality predicates behind fold, drop, and
//! reorder: a commit can only move past (or absorb) another commit it does
//! not depend on.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use tracing::instrument;

use crate::ancestry::log_file;
use crate::commit_state::CommitState;
use crate::dual_index::DualIndex;
use crate::file_stack::FileStack;
use crate::rev::FileRev;
use crate::rev::Rev;

/// `dep_map[rev]` is the set of revs `rev`'s content logically requires.
pub type DepMap = BTreeMap<Rev, BTreeSet<Rev>>;

#[instrument(level = "debug", skip_all, fields(commits = commits.len()))]
pub fn calculate_dep_map(
    commits: &[CommitState],
    file_stacks: &[FileStack],
    dual_index: &DualIndex,
) -> DepMap {
    let mut deps: DepMap = commits.iter().map(|c| (c.rev, BTreeSet::new())).collect();

    for (stack_idx, stack) in file_stacks.iter().enumerate() {
        let stack_idx = crate::rev::FileStackIndex(stack_idx);
        for (file_rev, file_deps) in stack.calculate_dep_map() {
            let Some(consumer) =
                dual_index.commit_for_file(crate::rev::FileIdx::new(stack_idx, file_rev))
            else {
                continue;
            };
            for dep_file_rev in file_deps {
                if let Some(producer) =
                    dual_index.commit_for_file(crate::rev::FileIdx::new(stack_idx, dep_file_rev))
                {
                    if producer.rev != consumer.rev {
                        deps.entry(consumer.rev).or_default().insert(producer.rev);
                    }
                }
            }
        }
    }

    for commit in commits {
        for (path, file) in &commit.files {
            let Some(parent_rev) = commit.parent() else {
                continue;
            };
            let lookup_path = file.copy_from.clone().unwrap_or_else(|| path.clone());
            let Some((found_rev, found_path)) =
                log_file(commits, parent_rev, &lookup_path, true).next()
            else {
                continue;
            };
            let found_idx = found_rev.as_index().unwrap();
            let parent_file = &commits[found_idx].files[&found_path];
            let absence_differs = parent_file.is_absent() != file.is_absent();
            let path_differs = found_path != *path;
            if absence_differs || path_differs {
                deps.entry(commit.rev).or_default().insert(found_rev);
            }
        }
    }

    deps
}
