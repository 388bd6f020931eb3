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

//! A fluent builder for small commit stacks, gated behind the `testing`
//! feature so downstream integration tests can assemble scenarios without
//! hand-writing an `ExportStack`.

use indexmap::IndexMap;

use crate::commit_state::Timestamp;
use crate::repo_path::RepoPathBuf;
use crate::wire::ExportCommit;
use crate::wire::ExportFile;
use crate::wire::ExportStack;

/// Builds an `ExportStack` one commit at a time, chaining each new commit
/// onto the previous one as its sole parent.
#[derive(Debug, Default)]
pub struct StackBuilder {
    commits: Vec<ExportCommit>,
}

impl StackBuilder {
    pub fn new() -> Self {
        StackBuilder::default()
    }

    /// Appends a commit named `node`, parented on the current top of stack.
    pub fn commit(mut self, node: &str) -> CommitBuilder {
        let parents = self
            .commits
            .last()
            .map(|c| vec![c.node.clone()])
            .unwrap_or_default();
        CommitBuilder {
            stack: {
                self.commits.push(ExportCommit {
                    node: node.to_owned(),
                    immutable: false,
                    requested: true,
                    author: "test".to_owned(),
                    date: Timestamp {
                        unix_seconds: 0,
                        tz_offset_minutes: 0,
                    },
                    text: format!("commit {node}"),
                    parents,
                    relevant_files: IndexMap::new(),
                    files: IndexMap::new(),
                });
                self
            },
        }
    }

    pub fn build(self) -> ExportStack {
        self.commits
    }
}

/// Fluent handle onto the commit just appended by [`StackBuilder::commit`].
pub struct CommitBuilder {
    stack: StackBuilder,
}

impl CommitBuilder {
    pub fn text(mut self, text: &str) -> Self {
        self.last_mut().text = text.to_owned();
        self
    }

    pub fn author(mut self, author: &str) -> Self {
        self.last_mut().author = author.to_owned();
        self
    }

    pub fn file(mut self, path: &str, content: &str) -> Self {
        self.last_mut()
            .files
            .insert(RepoPathBuf::from(path), Some(ExportFile::utf8(content)));
        self
    }

    pub fn rename(mut self, from: &str, to: &str, content: &str) -> Self {
        let last = self.last_mut();
        last.files.insert(RepoPathBuf::from(from), None);
        last.files.insert(
            RepoPathBuf::from(to),
            Some(ExportFile::utf8(content).with_copy_from(from)),
        );
        self
    }

    pub fn delete(mut self, path: &str) -> Self {
        self.last_mut().files.insert(RepoPathBuf::from(path), None);
        self
    }

    pub fn immutable(mut self) -> Self {
        self.last_mut().immutable = true;
        self
    }

    fn last_mut(&mut self) -> &mut ExportCommit {
        self.stack.commits.last_mut().expect("a commit was just pushed")
    }

    /// Continues the fluent chain with another commit.
    pub fn commit(self, node: &str) -> CommitBuilder {
        self.stack.commit(node)
    }

    pub fn build(self) -> ExportStack {
        self.stack.build()
    }
}
