//! Per-language accumulation of file, line and import statistics.
//!
//! Every file is credited to one language label chosen by the caller. In the
//! pipeline that label is the owning repository's declared primary language,
//! so a repository's Markdown or shell scripts count towards its main language.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

lazy_static! {
    static ref IMPORT_PATTERN: Regex =
        Regex::new(r"^\s*(?:import\s+[A-Za-z_]|from\s+[A-Za-z_.][\w.]*\s+import\b)")
            .expect("import pattern is valid");
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").expect("whitespace pattern is valid");
}

/// Running totals for one language
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageStats {
    /// Files attributed to the language
    pub file_count: u64,
    /// Sum of the line counts of those files
    pub total_lines: u64,
    /// Largest line count of a single file
    pub max_lines: u64,
    /// Normalized import statement -> occurrences
    pub import_counts: BTreeMap<String, u64>,
}

/// What one file contributes, measured without keeping its content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileCounts {
    /// Line count of the file
    pub lines: u64,
    /// Normalized import statements, one entry per matching line
    pub imports: Vec<String>,
}

impl FileCounts {
    /// Measures one file's content
    pub fn measure(content: &str) -> Self {
        Self {
            lines: count_lines(content),
            imports: extract_imports(content).collect(),
        }
    }
}

impl LanguageStats {
    fn record(&mut self, counts: FileCounts) {
        self.file_count += 1;
        self.total_lines += counts.lines;
        self.max_lines = self.max_lines.max(counts.lines);
        for import in counts.imports {
            *self.import_counts.entry(import).or_insert(0) += 1;
        }
    }

    /// Most frequent imports, ties broken alphabetically
    pub fn top_imports(&self, limit: usize) -> Vec<(&str, u64)> {
        let mut imports: Vec<(&str, u64)> = self.import_counts
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        imports.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        imports.truncate(limit);
        imports
    }
}

/// Accumulated statistics for one run
///
/// A language appears in [`languages`](Self::languages) only once at least one
/// file has been recorded for it. Declared byte counts are kept apart so that
/// recording them never creates a language without files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageAccumulator {
    languages: BTreeMap<String, LanguageStats>,
    declared_bytes: BTreeMap<String, u64>,
}

impl UsageAccumulator {
    /// Creates an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Credits one file's content to `language`
    pub fn record_file(&mut self, language: &str, content: &str) {
        self.record_counts(language, FileCounts::measure(content));
    }

    /// Credits one already measured file to `language`
    pub fn record_counts(&mut self, language: &str, counts: FileCounts) {
        self.languages
            .entry(language.to_string())
            .or_default()
            .record(counts);
    }

    /// Adds declared bytes reported by the API for `language`
    pub fn record_bytes(&mut self, language: &str, bytes: u64) {
        *self.declared_bytes.entry(language.to_string()).or_insert(0) += bytes;
    }

    /// Per-language file statistics
    pub fn languages(&self) -> &BTreeMap<String, LanguageStats> {
        &self.languages
    }

    /// Per-language declared bytes
    pub fn declared_bytes(&self) -> &BTreeMap<String, u64> {
        &self.declared_bytes
    }

    /// Statistics for one language, if any file was credited to it
    pub fn get(&self, language: &str) -> Option<&LanguageStats> {
        self.languages.get(language)
    }

    /// True when no file has been recorded
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// Number of files recorded across all languages
    pub fn total_files(&self) -> u64 {
        self.languages.values().map(|s| s.file_count).sum()
    }

    /// Number of lines recorded across all languages
    pub fn total_lines(&self) -> u64 {
        self.languages.values().map(|s| s.total_lines).sum()
    }
}

/// Number of lines in `content`
///
/// Each `\n` terminates a line and a trailing unterminated segment counts as
/// one more; empty content has zero lines.
pub fn count_lines(content: &str) -> u64 {
    content.lines().count() as u64
}

/// Lines that look like import statements, normalized
///
/// Matches `import <identifier>...` and `from <module> import ...` after
/// optional indentation. This is a textual heuristic shared by all languages.
pub fn extract_imports(content: &str) -> impl Iterator<Item = String> + '_ {
    content
        .lines()
        .filter(|line| IMPORT_PATTERN.is_match(line))
        .map(normalize_import)
}

/// Trims and collapses internal whitespace runs to a single space
pub fn normalize_import(line: &str) -> String {
    WHITESPACE_RUN.replace_all(line.trim(), " ").into_owned()
}
