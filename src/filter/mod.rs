//! Table filter.
//!
//! Decides, per table name, whether a table enters the document. Matching is
//! exact and case-sensitive:
//!
//! ```text
//! include phase:  any include set non-empty?
//!                   yes → name ∈ names ∨ ∃prefix ∨ ∃suffix, else reject
//!                   no  → admit
//! exclude phase:  name ∈ names ∨ ∃prefix ∨ ∃suffix → reject
//! ```
//!
//! Exclusion always runs after inclusion, so a name matched by both is
//! rejected.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// The six pattern sets that drive table selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterSpec {
    pub include_names: Vec<String>,
    pub include_prefixes: Vec<String>,
    pub include_suffixes: Vec<String>,
    pub exclude_names: Vec<String>,
    pub exclude_prefixes: Vec<String>,
    pub exclude_suffixes: Vec<String>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_names.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn include_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_prefixes.extend(prefixes.into_iter().map(Into::into));
        self
    }

    pub fn include_suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_suffixes.extend(suffixes.into_iter().map(Into::into));
        self
    }

    pub fn exclude_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_names.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn exclude_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_prefixes.extend(prefixes.into_iter().map(Into::into));
        self
    }

    pub fn exclude_suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_suffixes.extend(suffixes.into_iter().map(Into::into));
        self
    }

    /// Layer `overrides` on top of this spec. Include sets and exclude sets
    /// are replaced as groups: when `overrides` names any include pattern,
    /// all three include sets come from it, and likewise for excludes.
    pub fn overridden_by(mut self, overrides: FilterSpec) -> Self {
        let has_includes = [
            &overrides.include_names,
            &overrides.include_prefixes,
            &overrides.include_suffixes,
        ]
        .iter()
        .any(|set| set.iter().any(|p| !p.is_empty()));
        let has_excludes = [
            &overrides.exclude_names,
            &overrides.exclude_prefixes,
            &overrides.exclude_suffixes,
        ]
        .iter()
        .any(|set| set.iter().any(|p| !p.is_empty()));

        if has_includes {
            self.include_names = overrides.include_names;
            self.include_prefixes = overrides.include_prefixes;
            self.include_suffixes = overrides.include_suffixes;
        }
        if has_excludes {
            self.exclude_names = overrides.exclude_names;
            self.exclude_prefixes = overrides.exclude_prefixes;
            self.exclude_suffixes = overrides.exclude_suffixes;
        }
        self
    }

    /// True when no set holds a non-empty pattern.
    pub fn is_empty(&self) -> bool {
        [
            &self.include_names,
            &self.include_prefixes,
            &self.include_suffixes,
            &self.exclude_names,
            &self.exclude_prefixes,
            &self.exclude_suffixes,
        ]
        .iter()
        .all(|set| set.iter().all(String::is_empty))
    }
}

/// Compiled form of one group of patterns (names, prefixes, suffixes).
#[derive(Debug, Clone, Default)]
struct PatternGroup {
    names: BTreeSet<String>,
    prefixes: BTreeSet<String>,
    suffixes: BTreeSet<String>,
}

impl PatternGroup {
    fn new(names: &[String], prefixes: &[String], suffixes: &[String]) -> Self {
        fn collect(patterns: &[String]) -> BTreeSet<String> {
            patterns.iter().filter(|p| !p.is_empty()).cloned().collect()
        }

        Self {
            names: collect(names),
            prefixes: collect(prefixes),
            suffixes: collect(suffixes),
        }
    }

    fn is_empty(&self) -> bool {
        self.names.is_empty() && self.prefixes.is_empty() && self.suffixes.is_empty()
    }

    fn matches(&self, table: &str) -> bool {
        self.names.contains(table)
            || self.prefixes.iter().any(|p| table.starts_with(p.as_str()))
            || self.suffixes.iter().any(|s| table.ends_with(s.as_str()))
    }
}

/// The filter evaluator. Empty patterns are dropped on construction.
#[derive(Debug, Clone, Default)]
pub struct TableFilter {
    include: PatternGroup,
    exclude: PatternGroup,
}

impl TableFilter {
    pub fn new(spec: &FilterSpec) -> Self {
        Self {
            include: PatternGroup::new(
                &spec.include_names,
                &spec.include_prefixes,
                &spec.include_suffixes,
            ),
            exclude: PatternGroup::new(
                &spec.exclude_names,
                &spec.exclude_prefixes,
                &spec.exclude_suffixes,
            ),
        }
    }

    /// Whether `table` is documented.
    pub fn admits(&self, table: &str) -> bool {
        let included = self.include.is_empty() || self.include.matches(table);
        included && !self.exclude.matches(table)
    }
}

impl From<&FilterSpec> for TableFilter {
    fn from(spec: &FilterSpec) -> Self {
        Self::new(spec)
    }
}
