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

//! `log` and `logFile` ancestor walks.

use crate::commit_state::CommitState;
use crate::repo_path::RepoPathBuf;
use crate::rev::Rev;

/// Depth-first ancestor enumeration starting at `start`, inclusive. Since
/// merge commits are rejected, every commit has at most one parent, so this
/// degenerates to a straight-line walk; each parent is required to have a
/// strictly smaller rev.
pub fn log(commits: &[CommitState], start: Rev) -> impl Iterator<Item = Rev> + '_ {
    std::iter::successors(Some(start), move |&rev| {
        let idx = rev.as_index()?;
        commits.get(idx)?.parent()
    })
}

/// Filters [`log`] to revs that modify `path`. When `follow_renames` is
/// set, once a visited modification carries `copy_from`, subsequent
/// ancestors are matched against the prior path instead. Yields the rev
/// together with the path it was found under, so callers following renames
/// can recover what the file used to be called.
pub fn log_file<'a>(
    commits: &'a [CommitState],
    start: Rev,
    path: &RepoPathBuf,
    follow_renames: bool,
) -> impl Iterator<Item = (Rev, RepoPathBuf)> + 'a {
    LogFile {
        commits,
        cur: Some(start),
        path: path.clone(),
        follow_renames,
    }
}

struct LogFile<'a> {
    commits: &'a [CommitState],
    cur: Option<Rev>,
    path: RepoPathBuf,
    follow_renames: bool,
}

impl Iterator for LogFile<'_> {
    type Item = (Rev, RepoPathBuf);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(rev) = self.cur {
            let idx = rev.as_index()?;
            let commit = self.commits.get(idx)?;
            self.cur = commit.parent();
            if let Some(file) = commit.files.get(&self.path) {
                let found_path = self.path.clone();
                if self.follow_renames {
                    if let Some(from) = &file.copy_from {
                        self.path = from.clone();
                    }
                }
                return Some((rev, found_path));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::*;
    use crate::commit_state::ImmutableKind;
    use crate::commit_state::Key;
    use crate::commit_state::Timestamp;
    use crate::file_state::FileState;

    fn commit(rev: i64, parent: Option<i64>) -> CommitState {
        CommitState {
            rev: Rev::new(rev),
            original_nodes: Default::default(),
            key: Key::new(format!("k{rev}")),
            author: "a".into(),
            date: Timestamp {
                unix_seconds: 0,
                tz_offset_minutes: 0,
            },
            text: String::new(),
            immutable_kind: ImmutableKind::None,
            parents: parent.into_iter().map(Rev::new).collect(),
            files: IndexMap::new(),
        }
    }

    #[test]
    fn log_walks_straight_line_chain() {
        let commits = vec![commit(0, None), commit(1, Some(0)), commit(2, Some(1))];
        let revs: Vec<_> = log(&commits, Rev::new(2)).collect();
        assert_eq!(revs, vec![Rev::new(2), Rev::new(1), Rev::new(0)]);
    }

    #[test]
    fn log_file_follows_renames() {
        let mut a = commit(0, None);
        a.files.insert("x.txt".into(), FileState::text("1"));
        let mut b = commit(1, Some(0));
        b.files
            .insert("y.txt".into(), FileState::text("1").with_copy_from("x.txt"));
        let commits = vec![a, b];
        let revs: Vec<_> = log_file(&commits, Rev::new(1), &"y.txt".into(), true)
            .map(|(rev, _)| rev)
            .collect();
        assert_eq!(revs, vec![Rev::new(1), Rev::new(0)]);
    }

    #[test]
    fn log_file_without_follow_renames_stops_at_rename_boundary() {
        let mut a = commit(0, None);
        a.files.insert("x.txt".into(), FileState::text("1"));
        let mut b = commit(1, Some(0));
        b.files
            .insert("y.txt".into(), FileState::text("1").with_copy_from("x.txt"));
        let commits = vec![a, b];
        let revs: Vec<_> = log_file(&commits, Rev::new(1), &"y.txt".into(), false)
            .map(|(rev, _)| rev)
            .collect();
        assert_eq!(revs, vec![Rev::new(1)]);
    }
}
