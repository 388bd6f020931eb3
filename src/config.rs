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

//! Ambient tunables for the engine, in the spirit of `lib/src/user_config.rs`:
//! a small settings struct rather than scattered magic numbers.

/// Tunable heuristics for the commit-stack engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// A folded-in message is considered "meaningful" (and thus kept
    /// alongside the parent's, rather than discarded) if it contains
    /// whitespace or is longer than this many characters.
    pub fold_message_min_len: usize,
    /// Capacity of the bounded LRU caches backing the memoized dependency
    /// map and fold/drop/reorder legality predicates.
    pub dep_map_cache_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            fold_message_min_len: 20,
            dep_map_cache_capacity: 256,
        }
    }
}

impl Config {
    /// A message is "meaningful" per the fold-merge rule above.
    pub fn is_meaningful_message(&self, text: &str) -> bool {
        text.chars().any(char::is_whitespace) || text.chars().count() > self.fold_message_min_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_message_without_whitespace_is_not_meaningful() {
        let config = Config::default();
        assert!(!config.is_meaningful_message("fixup"));
    }

    #[test]
    fn message_with_whitespace_is_meaningful_regardless_of_length() {
        let config = Config::default();
        assert!(config.is_meaningful_message("a b"));
    }

    #[test]
    fn long_message_is_meaningful() {
        let config = Config::default();
        assert!(config.is_meaningful_message("x".repeat(21).as_str()));
    }
}
