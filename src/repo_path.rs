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

//! A slash-separated, repository-relative path.
//!
//! Scaled down from jj-lib's `repo_path.rs`: that module models paths as a
//! tree of validated components (for working-copy/filesystem safety); this
//! engine never touches a filesystem, so a single normalized `String` with
//! value semantics is enough to satisfy this engine's path equality and
//! ordering needs.

use std::borrow::Borrow;
use std::fmt;

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct RepoPathBuf(String);

impl RepoPathBuf {
    pub fn new(value: impl Into<String>) -> Self {
        RepoPathBuf(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RepoPathBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for RepoPathBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<&str> for RepoPathBuf {
    fn from(value: &str) -> Self {
        RepoPathBuf(value.to_owned())
    }
}

impl From<String> for RepoPathBuf {
    fn from(value: String) -> Self {
        RepoPathBuf(value)
    }
}

impl Borrow<str> for RepoPathBuf {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_lexicographic() {
        let mut paths: Vec<RepoPathBuf> = vec!["y.txt".into(), "a.txt".into(), "b/c.txt".into()];
        paths.sort();
        assert_eq!(
            paths,
            vec![
                RepoPathBuf::from("a.txt"),
                RepoPathBuf::from("b/c.txt"),
                RepoPathBuf::from("y.txt"),
            ]
        );
    }
}
