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

//! Minimal-change export: diffs the current state against the stack it was
//! originally loaded from and emits the smallest `ImportStack` that
//! reconciles the host repository.

use std::collections::BTreeSet;

use tracing::instrument;

use crate::config::Config;
use crate::error::Error;
use crate::state::CommitStackState;
use crate::wire::ExportStack;
use crate::wire::ImportAction;
use crate::wire::ImportCommit;
use crate::wire::ImportStack;

/// Caller-supplied working-copy pointer request.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Original hash the caller wants the working copy to point at, if any.
    pub goto: Option<String>,
    /// When set, emit `reset` instead of `goto` (leaves files dirty).
    pub preserve_dirty_files: bool,
}

#[instrument(level = "debug", skip_all)]
pub fn calculate_import_stack(
    state: &CommitStackState,
    original_export: &ExportStack,
    options: &ExportOptions,
) -> Result<ImportStack, Error> {
    let materialized = state.use_file_content();
    let baseline = CommitStackState::from_export(original_export, *state.config())?.use_file_content();

    let overlap = materialized.rev_count().min(baseline.rev_count());
    let first_changed = (0..overlap)
        .find(|&i| {
            materialized.commits()[i] != baseline.commits()[i]
        })
        .unwrap_or(overlap);

    let mut actions: ImportStack = Vec::new();
    for rev in first_changed..materialized.rev_count() {
        let commit = &materialized.commits()[rev];
        let mark = format!(":r{rev}");
        let parents = commit
            .parents
            .iter()
            .map(|&p| parent_reference(&baseline, first_changed, p))
            .collect();
        let files = commit
            .files
            .iter()
            .map(|(path, file)| {
                let export = (!file.is_absent()).then(|| file.to_export());
                (path.clone(), export)
            })
            .collect();
        actions.push(ImportAction::Commit(ImportCommit {
            mark,
            author: commit.author.clone(),
            date: commit.date,
            text: commit.text.clone(),
            parents,
            predecessors: commit.original_nodes.iter().map(|s| s.to_string()).collect(),
            files,
        }));
    }

    if let Some(goto_hash) = &options.goto {
        if let Some(action) = resolve_goto(
            &materialized,
            original_export,
            first_changed,
            goto_hash,
            options.preserve_dirty_files,
        ) {
            actions.push(action);
        }
    }

    if let Some(hide) = orphaned_nodes(&materialized, original_export) {
        actions.push(hide);
    }

    Ok(actions)
}

fn parent_reference(baseline: &CommitStackState, first_changed: usize, parent_rev: crate::rev::Rev) -> String {
    let idx = parent_rev.as_index().unwrap();
    if idx < first_changed {
        baseline.commits()[idx].key.as_str().to_owned()
    } else {
        format!(":r{idx}")
    }
}

fn resolve_goto(
    materialized: &CommitStackState,
    original_export: &ExportStack,
    first_changed: usize,
    goto_hash: &str,
    preserve_dirty_files: bool,
) -> Option<ImportAction> {
    let original_top_hash = original_export.last().map(|c| c.node.as_str());
    let sticky = original_top_hash == Some(goto_hash);

    let target_rev = if sticky {
        Some(materialized.rev_count().saturating_sub(1))
    } else {
        materialized
            .commits()
            .iter()
            .position(|c| c.original_nodes.iter().any(|n| &**n == goto_hash))
    }?;

    if !(sticky || target_rev >= first_changed) {
        return None;
    }
    let mark = format!(":r{target_rev}");
    Some(if preserve_dirty_files {
        ImportAction::Reset { mark }
    } else {
        ImportAction::Goto { mark }
    })
}

fn orphaned_nodes(materialized: &CommitStackState, original_export: &ExportStack) -> Option<ImportAction> {
    let current_nodes: BTreeSet<&str> = materialized
        .commits()
        .iter()
        .flat_map(|c| c.original_nodes.iter().map(|s| s.as_ref()))
        .collect();
    let orphaned: Vec<String> = original_export
        .iter()
        .filter(|ec| ec.requested && !ec.immutable)
        .filter(|ec| !current_nodes.contains(ec.node.as_str()))
        .map(|ec| ec.node.clone())
        .collect();
    (!orphaned.is_empty()).then_some(ImportAction::Hide { nodes: orphaned })
}
