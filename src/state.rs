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

//! [`CommitStackState`]: the immutable, persistent snapshot the whole engine
//! revolves around. Constructed once from an `ExportStack`; every edit
//! operator takes one state by value and returns a new one, sharing
//! whatever subtrees it did not touch.

use std::collections::BTreeSet;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::Mutex;

use clru::CLruCache;
use tracing::instrument;

use crate::ancestry::log;
use crate::ancestry::log_file;
use crate::bottom_files::derive_bottom_files;
use crate::bottom_files::BottomFiles;
use crate::commit_state::CommitState;
use crate::commit_state::ImmutableKind;
use crate::commit_state::Key;
use crate::config::Config;
use crate::dep_map;
use crate::dep_map::DepMap;
use crate::dual_index::DualIndex;
use crate::error::Error;
use crate::error::InvariantError;
use crate::error::StructuralRejectionError;
use crate::file_state::FileData;
use crate::file_state::FileState;
use crate::file_stack::FileStack;
use crate::repo_path::RepoPathBuf;
use crate::rev::FileIdx;
use crate::rev::FileStackIndex;
use crate::rev::Rev;
use crate::stack_builder;
use crate::wire::ExportStack;

/// The whole engine's state at one point in its edit history.
#[derive(Clone)]
pub struct CommitStackState {
    commits: Arc<Vec<CommitState>>,
    bottom_files: BottomFiles,
    file_stacks: Arc<Vec<FileStack>>,
    dual_index: Arc<DualIndex>,
    config: Config,
    dep_map_cache: Arc<Mutex<CLruCache<usize, DepMap>>>,
}

impl CommitStackState {
    /// Parses an `ExportStack` into bottom files + commit list, then derives
    /// file stacks and the dual index from scratch.
    #[instrument(level = "debug", skip_all)]
    pub fn from_export(export: &ExportStack, config: Config) -> Result<Self, Error> {
        let bottom_files = derive_bottom_files(export)?;
        let commits = ingest_commits(export)?;
        let built = stack_builder::build(&commits, &bottom_files)?;
        Ok(Self::assemble(commits, bottom_files, built, config))
    }

    /// Assembles a state from already-built parts, used by edit operators
    /// after they rebuild file stacks.
    pub(crate) fn assemble(
        commits: Vec<CommitState>,
        bottom_files: BottomFiles,
        built: stack_builder::BuiltFileStacks,
        config: Config,
    ) -> Self {
        let capacity = NonZeroUsize::new(config.dep_map_cache_capacity.max(1)).unwrap();
        CommitStackState {
            commits: Arc::new(commits),
            bottom_files,
            file_stacks: Arc::new(built.file_stacks),
            dual_index: Arc::new(built.dual_index),
            config,
            dep_map_cache: Arc::new(Mutex::new(CLruCache::new(capacity))),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn rev_count(&self) -> usize {
        self.commits.len()
    }

    pub fn commits(&self) -> &[CommitState] {
        &self.commits
    }

    pub fn commit(&self, rev: Rev) -> Option<&CommitState> {
        rev.as_index().and_then(|i| self.commits.get(i))
    }

    pub fn bottom_files(&self) -> &BottomFiles {
        &self.bottom_files
    }

    pub fn file_stacks(&self) -> &[FileStack] {
        &self.file_stacks
    }

    pub fn dual_index(&self) -> &DualIndex {
        &self.dual_index
    }

    pub fn log(&self, start: Rev) -> impl Iterator<Item = Rev> + '_ {
        log(&self.commits, start)
    }

    pub fn log_file<'a>(
        &'a self,
        start: Rev,
        path: &RepoPathBuf,
        follow_renames: bool,
    ) -> impl Iterator<Item = (Rev, RepoPathBuf)> + 'a {
        log_file(&self.commits, start, path, follow_renames)
    }

    /// Returns the content a path has at `rev`, walking ancestors for the
    /// nearest modification (commits record modifications only, not
    /// inherited content).
    pub fn get_file(&self, rev: Rev, path: &RepoPathBuf) -> Result<FileState, Error> {
        if !self.bottom_files.contains(path) {
            return Err(InvariantError::PathNotTracked { path: path.clone() }.into());
        }
        match log_file(&self.commits, rev, path, false).next() {
            Some((found_rev, found_path)) => {
                let idx = found_rev.as_index().unwrap();
                Ok(self.resolve(&self.commits[idx].files[&found_path]))
            }
            None => Ok(self
                .bottom_files
                .get(path)
                .cloned()
                .unwrap_or_else(FileState::absent)),
        }
    }

    fn resolve(&self, file: &FileState) -> FileState {
        match file.data {
            FileData::Lazy(idx) => {
                let text = self.file_stacks[idx.stack.0].get_rev(idx.rev).to_owned();
                FileState {
                    data: FileData::Text(Arc::from(text)),
                    ..file.clone()
                }
            }
            _ => file.clone(),
        }
    }

    /// Replaces every modified UTF-8 file's inline text with a lazy
    /// reference into its file stack.
    pub fn use_file_stack(&self) -> Self {
        let mut commits = (*self.commits).clone();
        for commit in &mut commits {
            let rev = commit.rev;
            for (path, file) in commit.files.iter_mut() {
                if matches!(file.data, FileData::Text(_)) {
                    if let Some(idx) = self.dual_index.file_for_commit(rev, path) {
                        file.data = FileData::Lazy(idx);
                    }
                }
            }
        }
        CommitStackState {
            commits: Arc::new(commits),
            ..self.clone()
        }
    }

    /// Materializes every lazy reference back into inline text.
    pub fn use_file_content(&self) -> Self {
        let mut commits = (*self.commits).clone();
        for commit in &mut commits {
            for file in commit.files.values_mut() {
                *file = self.resolve(file);
            }
        }
        CommitStackState {
            commits: Arc::new(commits),
            ..self.clone()
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn calculate_dep_map(&self) -> DepMap {
        let key = Arc::as_ptr(&self.commits) as usize;
        if let Some(cached) = self.dep_map_cache.lock().unwrap().get(&key) {
            return cached.clone();
        }
        let computed = dep_map::calculate_dep_map(&self.commits, &self.file_stacks, &self.dual_index);
        self.dep_map_cache.lock().unwrap().put(key, computed.clone());
        computed
    }

    /// Renders every file stack as `{fileRev}:{owner}/{path}({content})`,
    /// one line per stack, for debugging and snapshot tests. The seed
    /// revision below rev 0 omits its content (it has none of its own: it
    /// is whatever bottom-files held).
    pub fn describe_file_stacks(&self) -> String {
        let mut lines = Vec::new();
        for (stack_index, stack) in self.file_stacks.iter().enumerate() {
            let stack_index = FileStackIndex(stack_index);
            let mut parts = Vec::new();
            for file_rev in stack.revs() {
                if let Some(idx) = self.dual_index.commit_for_file(FileIdx::new(stack_index, file_rev)) {
                    if idx.rev.is_bottom() {
                        parts.push(format!("{}:./{}", file_rev, idx.path));
                    } else {
                        parts.push(format!(
                            "{}:{}/{}({})",
                            file_rev,
                            idx.rev,
                            idx.path,
                            stack.get_rev(file_rev)
                        ));
                    }
                }
            }
            lines.push(parts.join(" "));
        }
        lines.join("\n")
    }
}

fn ingest_commits(export: &ExportStack) -> Result<Vec<CommitState>, StructuralRejectionError> {
    let mut rev_of_hash: HashMap<String, Rev> = HashMap::new();
    let mut commits = Vec::with_capacity(export.len());
    for (i, export_commit) in export.iter().enumerate() {
        if rev_of_hash.contains_key(&export_commit.node) {
            return Err(StructuralRejectionError::DuplicateHash(export_commit.node.clone()));
        }
        let rev = Rev::from(i);
        let parents = export_commit
            .parents
            .iter()
            .map(|hash| {
                rev_of_hash
                    .get(hash)
                    .copied()
                    .ok_or_else(|| StructuralRejectionError::UnknownParent(hash.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let immutable_kind = if export_commit.immutable || !export_commit.requested {
            ImmutableKind::Hash
        } else {
            ImmutableKind::None
        };
        let files = export_commit
            .files
            .iter()
            .map(|(path, maybe_file)| {
                let state = match maybe_file {
                    Some(export_file) => FileState::from_export(export_file),
                    None => FileState::absent(),
                };
                (path.clone(), state)
            })
            .collect();
        commits.push(CommitState {
            rev,
            original_nodes: BTreeSet::from([Arc::from(export_commit.node.as_str())]),
            key: Key::new(export_commit.node.clone()),
            author: export_commit.author.clone(),
            date: export_commit.date,
            text: export_commit.text.clone(),
            immutable_kind,
            parents,
            files,
        });
        rev_of_hash.insert(export_commit.node.clone(), rev);
    }
    Ok(commits)
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::*;
    use crate::commit_state::Timestamp;
    use crate::wire::ExportCommit;
    use crate::wire::ExportFile;

    fn ts() -> Timestamp {
        Timestamp {
            unix_seconds: 0,
            tz_offset_minutes: 0,
        }
    }

    fn export_commit(
        node: &str,
        parents: Vec<&str>,
        files: Vec<(&str, Option<ExportFile>)>,
    ) -> ExportCommit {
        ExportCommit {
            node: node.to_owned(),
            immutable: false,
            requested: true,
            author: "author".to_owned(),
            date: ts(),
            text: format!("commit {node}"),
            parents: parents.into_iter().map(str::to_owned).collect(),
            relevant_files: IndexMap::new(),
            files: files
                .into_iter()
                .map(|(p, f)| (RepoPathBuf::from(p), f))
                .collect(),
        }
    }

    #[test]
    fn scenario_linear_add_then_modify_describes_one_stack() {
        let export = vec![
            export_commit("A", vec![], vec![("x.txt", Some(ExportFile::utf8("hello")))]),
            export_commit(
                "B",
                vec!["A"],
                vec![("x.txt", Some(ExportFile::utf8("hello world")))],
            ),
        ];
        let state = CommitStackState::from_export(&export, Config::default()).unwrap();
        assert_eq!(
            state.describe_file_stacks(),
            "0:./x.txt 1:0/x.txt(hello) 2:1/x.txt(hello world)"
        );
        assert_eq!(
            state
                .get_file(Rev::new(1), &"x.txt".into())
                .unwrap()
                .data
                .as_text(),
            Some("hello world")
        );
    }

    #[test]
    fn scenario_rename_continues_stack_and_creates_dependency() {
        let export = vec![
            export_commit("A", vec![], vec![("x.txt", Some(ExportFile::utf8("33")))]),
            export_commit(
                "B",
                vec!["A"],
                vec![
                    ("x.txt", None),
                    (
                        "y.txt",
                        Some(ExportFile::utf8("33").with_copy_from("x.txt")),
                    ),
                ],
            ),
        ];
        let state = CommitStackState::from_export(&export, Config::default()).unwrap();
        assert_eq!(state.file_stacks().len(), 1);
        let deps = state.calculate_dep_map();
        assert!(deps[&Rev::new(1)].contains(&Rev::new(0)));
        assert_eq!(
            state.get_file(Rev::new(1), &"y.txt".into()).unwrap().data.as_text(),
            Some("33")
        );
    }

    #[test]
    fn use_file_stack_then_use_file_content_round_trips() {
        let export = vec![export_commit(
            "A",
            vec![],
            vec![("x.txt", Some(ExportFile::utf8("hello")))],
        )];
        let state = CommitStackState::from_export(&export, Config::default()).unwrap();
        let round_tripped = state.use_file_stack().use_file_content();
        for commit in round_tripped.commits() {
            for file in commit.files.values() {
                assert!(matches!(file.data, FileData::Text(_)));
            }
        }
        assert_eq!(
            round_tripped.get_file(Rev::new(0), &"x.txt".into()).unwrap(),
            state.get_file(Rev::new(0), &"x.txt".into()).unwrap()
        );
    }

    #[test]
    fn duplicate_hash_is_rejected() {
        let export = vec![
            export_commit("A", vec![], vec![]),
            export_commit("A", vec!["A"], vec![]),
        ];
        assert!(matches!(
            CommitStackState::from_export(&export, Config::default()),
            Err(Error::Structural(StructuralRejectionError::DuplicateHash(_)))
        ));
    }

    #[test]
    fn unknown_parent_is_rejected() {
        let export = vec![export_commit("A", vec!["ghost"], vec![])];
        assert!(matches!(
            CommitStackState::from_export(&export, Config::default()),
            Err(Error::Structural(StructuralRejectionError::UnknownParent(_)))
        ));
    }
}
