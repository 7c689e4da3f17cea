//! Entry filtering against the configured name sets and glob patterns.

use crate::glob::glob_match;

/// The three matchers composed as `only` ∧ `include` ∧ ¬`exclude`.
///
/// An entry survives only if every enabled matcher admits it. Filtered-out
/// entries are counted as skipped and consume no further quota.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FilterSet<'a> {
    only: &'a [String],
    include: &'a [String],
    exclude: &'a [String],
}

impl<'a> FilterSet<'a> {
    pub(crate) fn new(only: &'a [String], include: &'a [String], exclude: &'a [String]) -> Self {
        Self {
            only,
            include,
            exclude,
        }
    }

    /// Returns `true` if the entry named `name` should be processed.
    pub(crate) fn admits(&self, name: &str) -> bool {
        if !self.only.is_empty() && !self.only.iter().any(|n| n == name) {
            return false;
        }
        if !self.include.is_empty() && !self.include.iter().any(|p| glob_match(p, name)) {
            return false;
        }
        if self.exclude.iter().any(|p| glob_match(p, name)) {
            return false;
        }
        true
    }
}
