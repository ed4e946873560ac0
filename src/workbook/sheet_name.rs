//! Sheet names that Excel accepts.
//!
//! A name is at most 31 characters, contains none of `\ / ? * [ ] :`, and
//! neither starts nor ends with an apostrophe. Names are unique within a
//! workbook, compared case-insensitively.

use std::collections::HashSet;

use tracing::warn;

use super::{RenderError, RenderResult};

pub const MAX_SHEET_NAME_CHARS: usize = 31;

/// Upper bound on `_n` suffixes tried before giving up on a name.
const MAX_DISAMBIGUATOR: usize = 9_999;

/// Names Excel keeps for itself, whatever the workbook holds.
const EXCEL_RESERVED: [&str; 1] = ["History"];

const FORBIDDEN: [char; 7] = ['\\', '/', '?', '*', '[', ']', ':'];

/// Truncate to 31 characters, then replace forbidden characters with `_`.
///
/// Idempotent for any input: the result already satisfies every rule.
pub fn safe_sheet_name(raw: &str) -> String {
    let mut name: String = raw
        .chars()
        .take(MAX_SHEET_NAME_CHARS)
        .map(|c| if FORBIDDEN.contains(&c) { '_' } else { c })
        .collect();

    if name.is_empty() {
        return "_".to_string();
    }
    if name.starts_with('\'') {
        name.replace_range(..1, "_");
    }
    if name.ends_with('\'') {
        let last = name.len() - 1;
        name.replace_range(last.., "_");
    }
    name
}

/// Hands out unique sheet names.
#[derive(Debug)]
pub struct SheetNameRegistry {
    taken: HashSet<String>,
}

impl Default for SheetNameRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SheetNameRegistry {
    /// Registry that only holds Excel's own reserved names.
    pub fn new() -> Self {
        Self {
            taken: EXCEL_RESERVED.iter().map(|name| fold(name)).collect(),
        }
    }

    /// Registry with the given names already in use.
    pub fn with_reserved<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut registry = Self::new();
        for name in names {
            registry.taken.insert(fold(name));
        }
        registry
    }

    /// Safe, unique sheet name for a table.
    ///
    /// On collision the safe name is shortened so that a `_2`, `_3`, ...
    /// suffix still fits in 31 characters.
    pub fn assign(&mut self, raw: &str) -> RenderResult<String> {
        let base = safe_sheet_name(raw);
        if self.taken.insert(fold(&base)) {
            return Ok(base);
        }

        for n in 2..=MAX_DISAMBIGUATOR {
            let suffix = format!("_{n}");
            let keep = MAX_SHEET_NAME_CHARS - suffix.len();
            let candidate: String = base.chars().take(keep).chain(suffix.chars()).collect();

            if self.taken.insert(fold(&candidate)) {
                warn!(table = raw, sheet = %candidate, "sheet name collision, disambiguated");
                return Ok(candidate);
            }
        }

        Err(RenderError::SheetNameExhausted {
            table: raw.to_string(),
        })
    }
}

fn fold(name: &str) -> String {
    name.to_lowercase()
}
