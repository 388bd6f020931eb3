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

//! [`FileState`]: one path's content at one commit.

use std::sync::Arc;

use crate::repo_path::RepoPathBuf;
use crate::rev::FileIdx;
use crate::wire::ExportFile;
use crate::wire::ExportPayload;

/// Special flag value meaning "does not exist at this revision".
pub const ABSENT_FLAG: &str = "a";

/// The payload of a [`FileState`]: either inline content, or a lazy
/// reference into a file stack.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FileData {
    /// UTF-8 text, inline.
    Text(Arc<str>),
    /// Opaque binary payload; never participates in a file stack.
    Binary(Arc<[u8]>),
    /// A reference into a file stack: materialize by reading that stack.
    Lazy(FileIdx),
}

impl FileData {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FileData::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self, FileData::Lazy(_))
    }
}

/// One path's content, copy marker, and flags at a given revision.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FileState {
    pub data: FileData,
    pub copy_from: Option<RepoPathBuf>,
    /// Short flag string; `ABSENT_FLAG` means the file does not exist.
    pub flags: String,
}

impl FileState {
    pub fn text(content: impl Into<Arc<str>>) -> Self {
        FileState {
            data: FileData::Text(content.into()),
            copy_from: None,
            flags: String::new(),
        }
    }

    pub fn binary(content: impl Into<Arc<[u8]>>) -> Self {
        FileState {
            data: FileData::Binary(content.into()),
            copy_from: None,
            flags: String::new(),
        }
    }

    pub fn lazy(idx: FileIdx) -> Self {
        FileState {
            data: FileData::Lazy(idx),
            copy_from: None,
            flags: String::new(),
        }
    }

    pub fn absent() -> Self {
        FileState {
            data: FileData::Text(Arc::from("")),
            copy_from: None,
            flags: ABSENT_FLAG.to_owned(),
        }
    }

    pub fn is_absent(&self) -> bool {
        self.flags == ABSENT_FLAG
    }

    pub fn with_copy_from(mut self, from: impl Into<RepoPathBuf>) -> Self {
        self.copy_from = Some(from.into());
        self
    }

    /// Whether this state is renamed/copied and the source is gone (a
    /// rename, as opposed to a copy where the source survives). This method
    /// only reports the marker; whether the source is *actually* absent in
    /// the relevant commit is determined by the caller.
    pub fn has_copy_from(&self) -> bool {
        self.copy_from.is_some()
    }

    /// Converts a host-provided [`ExportFile`] into a [`FileState`].
    pub fn from_export(file: &ExportFile) -> Self {
        let data = match &file.payload {
            ExportPayload::Data(s) => FileData::Text(Arc::from(s.as_str())),
            ExportPayload::DataBase85(b) => {
                // Base85 decoding is out of scope; the payload is carried
                // through opaquely as its raw bytes.
                FileData::Binary(Arc::from(b.as_bytes()))
            }
        };
        FileState {
            data,
            copy_from: file.copy_from.clone(),
            flags: file.flags.clone().unwrap_or_default(),
        }
    }

    /// Converts this [`FileState`] back into the wire [`ExportFile`] shape
    /// for export. Lazy references must be materialized via
    /// `useFileContent` first; calling this on a lazy state panics.
    pub fn to_export(&self) -> ExportFile {
        let payload = match &self.data {
            FileData::Text(s) => ExportPayload::Data(s.to_string()),
            FileData::Binary(b) => {
                ExportPayload::DataBase85(String::from_utf8_lossy(b).into_owned())
            }
            FileData::Lazy(_) => panic!("to_export called on a lazy FileState; materialize first"),
        };
        ExportFile {
            payload,
            copy_from: self.copy_from.clone(),
            flags: (!self.flags.is_empty()).then(|| self.flags.clone()),
        }
    }
}
