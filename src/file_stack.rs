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

//! [`FileStack`]: the linear history of one path's UTF-8 content, addressed
//! by the operations the rest of the engine needs from it (append a
//! revision, edit one in place, remap revs after a rebuild, and derive a
//! line-provenance dependency map).

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;

use similar::ChangeTag;
use similar::TextDiff;

use crate::rev::FileRev;

/// An ordered sequence of UTF-8 text revisions for a single path.
///
/// Revisions are `Arc<str>` so that an edit which only touches one
/// revision shares the rest structurally with the previous snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStack {
    revisions: Vec<Arc<str>>,
}

impl FileStack {
    /// Constructs a file stack from its revisions, in order.
    pub fn new(revisions: impl IntoIterator<Item = Arc<str>>) -> Self {
        FileStack {
            revisions: revisions.into_iter().collect(),
        }
    }

    pub fn rev_length(&self) -> usize {
        self.revisions.len()
    }

    pub fn get_rev(&self, rev: FileRev) -> &str {
        &self.revisions[rev.0]
    }

    pub fn revs(&self) -> impl Iterator<Item = FileRev> {
        (0..self.revisions.len()).map(FileRev)
    }

    /// Replaces `rev`'s content in place. Downstream revisions are stored
    /// as independent snapshots, so no reflow is needed beyond replacing
    /// the one slot.
    pub fn edit_text(&self, rev: FileRev, text: impl Into<Arc<str>>, immutable: bool) -> FileStack {
        assert!(!immutable, "editing an immutable revision is a caller bug");
        let mut revisions = self.revisions.clone();
        revisions[rev.0] = text.into();
        FileStack { revisions }
    }

    /// Relabels revs according to `map`; revs absent from `map` are
    /// dropped. Returns a new file stack with positions compacted to
    /// `0..map.len()` order.
    pub fn remap_revs(&self, map: &BTreeMap<FileRev, FileRev>) -> FileStack {
        let mut entries: Vec<(FileRev, Arc<str>)> = map
            .iter()
            .filter_map(|(&old, &new)| self.revisions.get(old.0).cloned().map(|text| (new, text)))
            .collect();
        entries.sort_by_key(|(new, _)| new.0);
        FileStack {
            revisions: entries.into_iter().map(|(_, text)| text).collect(),
        }
    }

    /// Per-rev set of prerequisite revs, derived from line provenance: a
    /// revision depends on every earlier revision that
    /// contributed a line still present in it. A revision that rewrites
    /// every line has an empty dependency set — it is independent of its
    /// predecessor's content, even though it is still stored right after it
    /// in this stack.
    pub fn calculate_dep_map(&self) -> BTreeMap<FileRev, BTreeSet<FileRev>> {
        let mut result = BTreeMap::new();
        if self.revisions.is_empty() {
            return result;
        }
        let mut provenance: Vec<FileRev> = vec![FileRev(0); self.revisions[0].lines().count()];
        for r in 1..self.revisions.len() {
            let prev_text = &self.revisions[r - 1];
            let cur_text = &self.revisions[r];
            let diff = TextDiff::from_lines(prev_text.as_ref(), cur_text.as_ref());
            let mut new_provenance = Vec::new();
            let mut deps = BTreeSet::new();
            let mut prev_line_idx = 0usize;
            for change in diff.iter_all_changes() {
                match change.tag() {
                    ChangeTag::Equal => {
                        let provenance_rev = provenance
                            .get(prev_line_idx)
                            .copied()
                            .unwrap_or(FileRev(r - 1));
                        if provenance_rev.0 != r {
                            deps.insert(provenance_rev);
                        }
                        new_provenance.push(provenance_rev);
                        prev_line_idx += 1;
                    }
                    ChangeTag::Delete => {
                        prev_line_idx += 1;
                    }
                    ChangeTag::Insert => {
                        new_provenance.push(FileRev(r));
                    }
                }
            }
            result.insert(FileRev(r), deps);
            provenance = new_provenance;
        }
        result
    }
}
