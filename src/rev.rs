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

//! Small integer newtypes used throughout the engine.
//!
//! [`Rev`] is signed so that `-1` (the "bottom of stack" sentinel) is
//! representable; all other position types are plain `usize` wrappers.

use std::fmt;

/// Position of a commit in the stack, or the sentinel [`Rev::BOTTOM`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rev(i64);

impl Rev {
    /// Sentinel meaning "before any commit in the stack".
    pub const BOTTOM: Self = Rev(-1);
    /// The root commit's position.
    pub const ROOT: Self = Rev(0);

    pub const fn new(value: i64) -> Self {
        Rev(value)
    }

    pub const fn as_i64(self) -> i64 {
        self.0
    }

    /// Index into a `Vec` of commits, or `None` for [`Rev::BOTTOM`].
    pub fn as_index(self) -> Option<usize> {
        (self.0 >= 0).then_some(self.0 as usize)
    }

    pub const fn is_bottom(self) -> bool {
        self.0 < 0
    }

    pub fn next(self) -> Self {
        Rev(self.0 + 1)
    }

    pub fn prev(self) -> Self {
        Rev(self.0 - 1)
    }
}

impl From<usize> for Rev {
    fn from(value: usize) -> Self {
        Rev(value as i64)
    }
}

impl fmt::Display for Rev {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index of a [`crate::file_stack::FileStack`] within
/// [`crate::state::CommitStackState`]'s file-stack arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct FileStackIndex(pub usize);

impl fmt::Display for FileStackIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Revision within a single [`crate::file_stack::FileStack`]. Rev `0` is the
/// pre-stack (or prior-commit) content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct FileRev(pub usize);

impl fmt::Display for FileRev {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// `(fileStackIndex, fileRev)` — one half of the dual index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct FileIdx {
    pub stack: FileStackIndex,
    pub rev: FileRev,
}

impl FileIdx {
    pub const fn new(stack: FileStackIndex, rev: FileRev) -> Self {
        FileIdx { stack, rev }
    }
}

impl fmt::Display for FileIdx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.stack, self.rev)
    }
}
