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

//! External interfaces: the shapes exchanged with the host repository. The
//! wire *encoding* to the host (e.g. over a process boundary) is out of
//! scope; these types exist so the shape is concrete and testable, and
//! derive `serde` the way jj-lib's own `op_store.rs` wire types do.

use indexmap::IndexMap;

use crate::commit_state::Timestamp;
use crate::repo_path::RepoPathBuf;

/// One path's content as seen by the host repository.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExportFile {
    #[serde(flatten)]
    pub payload: ExportPayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copy_from: Option<RepoPathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<String>,
}

/// Either inline UTF-8 `data`, or an opaque `dataBase85`-encoded blob. The
/// base85 codec itself is not implemented; the payload is kept as an
/// opaque string.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExportPayload {
    Data(String),
    DataBase85(String),
}

impl ExportFile {
    pub fn utf8(data: impl Into<String>) -> Self {
        ExportFile {
            payload: ExportPayload::Data(data.into()),
            copy_from: None,
            flags: None,
        }
    }

    pub fn binary_base85(data: impl Into<String>) -> Self {
        ExportFile {
            payload: ExportPayload::DataBase85(data.into()),
            copy_from: None,
            flags: None,
        }
    }

    pub fn with_copy_from(mut self, from: impl Into<RepoPathBuf>) -> Self {
        self.copy_from = Some(from.into());
        self
    }
}

/// One commit as exported by the host repository.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExportCommit {
    pub node: String,
    pub immutable: bool,
    pub requested: bool,
    pub author: String,
    pub date: Timestamp,
    pub text: String,
    /// At most one parent hash; more than one is rejected (merge commits
    /// are not supported).
    pub parents: Vec<String>,
    pub relevant_files: IndexMap<RepoPathBuf, ExportFile>,
    /// `None` means the path was deleted at this commit.
    pub files: IndexMap<RepoPathBuf, Option<ExportFile>>,
}

/// The full host-exported stack, in stack order (index 0 is the root).
pub type ExportStack = Vec<ExportCommit>;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ImportCommit {
    /// Synthetic identifier `:r<rev>` for changed commits, or the original
    /// hash for unchanged parents.
    pub mark: String,
    pub author: String,
    pub date: Timestamp,
    pub text: String,
    /// Marks or original hashes.
    pub parents: Vec<String>,
    pub predecessors: Vec<String>,
    pub files: IndexMap<RepoPathBuf, Option<ExportFile>>,
}

/// One action submitted to the host repository.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportAction {
    Commit(ImportCommit),
    Goto { mark: String },
    Reset { mark: String },
    Hide { nodes: Vec<String> },
}

/// The full set of actions to realize the edits.
pub type ImportStack = Vec<ImportAction>;
