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

//! Reorder: permute the commit sequence, then rebuild file stacks from
//! scratch so that file-stack positions match the new commit positions.

use std::collections::BTreeMap;

use tracing::instrument;

use crate::commit_state::CommitState;
use crate::commit_state::ImmutableKind;
use crate::error::EditError;
use crate::error::Error;
use crate::rev::Rev;
use crate::stack_builder;
use crate::state::CommitStackState;

fn is_stack_linear(commits: &[CommitState]) -> bool {
    commits.iter().enumerate().all(|(i, c)| {
        if i == 0 {
            c.is_root()
        } else {
            c.parent() == Some(Rev::from(i - 1))
        }
    })
}

fn is_permutation(order: &[Rev], n: usize) -> bool {
    if order.len() != n {
        return false;
    }
    let mut seen = vec![false; n];
    for &rev in order {
        match rev.as_index() {
            Some(i) if i < n && !seen[i] => seen[i] = true,
            _ => return false,
        }
    }
    true
}

/// `order[i]` is the old rev that should occupy new position `i`.
pub fn can_reorder(state: &CommitStackState, order: &[Rev]) -> bool {
    if !is_stack_linear(state.commits()) {
        return false;
    }
    if !is_permutation(order, state.rev_count()) {
        return false;
    }
    let new_pos: BTreeMap<Rev, usize> = order.iter().enumerate().map(|(i, &r)| (r, i)).collect();
    for (old_index, commit) in state.commits().iter().enumerate() {
        let old_rev = Rev::from(old_index);
        if matches!(commit.immutable_kind, ImmutableKind::Hash) && new_pos[&old_rev] != old_index {
            return false;
        }
    }
    let dep_map = state.calculate_dep_map();
    for (&rev, deps) in &dep_map {
        let Some(&rev_pos) = new_pos.get(&rev) else {
            continue;
        };
        for dep in deps {
            let Some(&dep_pos) = new_pos.get(dep) else {
                continue;
            };
            if dep_pos >= rev_pos {
                return false;
            }
        }
    }
    true
}

#[instrument(level = "debug", skip(state))]
pub fn reorder(state: &CommitStackState, order: &[Rev]) -> Result<CommitStackState, Error> {
    if !can_reorder(state, order) {
        return Err(EditError::CannotReorder(format!("{order:?} is not a legal permutation")).into());
    }
    let commits = state.commits().to_vec();
    let renumbered = stack_builder::renumber(&commits, order);
    let built = stack_builder::build(&renumbered, state.bottom_files())
        .expect("reordering an already-valid state cannot produce an untracked path");
    Ok(CommitStackState::assemble(
        renumbered,
        state.bottom_files().clone(),
        built,
        *state.config(),
    ))
}

fn swap_with_next(n: usize, rev: Rev) -> Option<Vec<Rev>> {
    let i = rev.as_index()?;
    if i + 1 >= n {
        return None;
    }
    let mut order: Vec<Rev> = (0..n).map(Rev::from).collect();
    order.swap(i, i + 1);
    Some(order)
}

/// Whether `rev` may move one position earlier in the stack.
pub fn can_move_up(state: &CommitStackState, rev: Rev) -> bool {
    rev.as_index()
        .filter(|&i| i > 0)
        .and_then(|i| swap_with_next(state.rev_count(), Rev::from(i - 1)))
        .is_some_and(|order| can_reorder(state, &order))
}

/// Whether `rev` may move one position later in the stack.
pub fn can_move_down(state: &CommitStackState, rev: Rev) -> bool {
    swap_with_next(state.rev_count(), rev).is_some_and(|order| can_reorder(state, &order))
}

/// Maps a distinct integer sequence onto `0..n-1`, preserving relative
/// order (e.g. `[0, 100, 50] -> [0, 2, 1]`).
pub fn compact_sequence(values: &[i64]) -> Vec<usize> {
    let mut sorted: Vec<i64> = values.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    values
        .iter()
        .map(|v| sorted.binary_search(v).unwrap())
        .collect()
}
