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

//! Error taxonomy. Per-subsystem enums compose into [`Error`], mirroring
//! jj-lib's pattern of small error enums aggregated by callers (e.g.
//! `evolution.rs::WalkPredecessorsError`).

use crate::repo_path::RepoPathBuf;
use crate::rev::Rev;

/// The input `ExportStack` does not have the shape this engine requires.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum StructuralRejectionError {
    #[error("root commit (rev 0) has a parent; the root must have none")]
    RootHasParents(Rev),
    #[error("commit at rev {0} has no parents but is not the root")]
    NonRootWithoutParents(Rev),
    #[error("commit at rev {0} is a merge commit (more than one parent); merges are not supported")]
    MergeCommit(Rev),
    #[error("duplicate commit hash {0:?}")]
    DuplicateHash(String),
    #[error("parent hash {0:?} does not appear earlier in the stack")]
    UnknownParent(String),
}

/// An operation would violate one of the engine's structural invariants.
/// These indicate a bug in the engine or in a caller that bypassed a
/// legality predicate; they are always treated as programmer error.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum InvariantError {
    #[error("path {path:?} is not tracked by the stack (missing from BottomFiles)")]
    PathNotTracked { path: RepoPathBuf },
    #[error("parent rev {parent} is not smaller than child rev {child}")]
    ParentNotBeforeChild { parent: Rev, child: Rev },
    #[error("rev {rev} does not match its position in the stack")]
    RevPositionMismatch { rev: Rev },
    #[error("commitToFile and fileToCommit disagree for {0}")]
    DualIndexMismatch(String),
}

/// A caller invoked an edit operator whose legality predicate returns false.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum EditError {
    #[error("cannot fold rev {0} into its parent")]
    CannotFoldDown(Rev),
    #[error("cannot drop rev {0}")]
    CannotDrop(Rev),
    #[error("cannot reorder: {0}")]
    CannotReorder(String),
    #[error("rev {0} is frozen (immutableKind = hash) and cannot be edited")]
    Immutable(Rev),
}

/// Requested UTF-8 materialization of a non-UTF-8 (binary) file.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
#[error("path {path:?} at rev {rev} is a binary file and has no UTF-8 content")]
pub struct DecodeError {
    pub path: RepoPathBuf,
    pub rev: Rev,
}

/// Crate-wide error type.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum Error {
    #[error(transparent)]
    Structural(#[from] StructuralRejectionError),
    #[error(transparent)]
    Invariant(#[from] InvariantError),
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

pub type Result<T> = std::result::Result<T, Error>;
