//! Path exclusion rules.
//!
//! Decides which changed files are out of analysis scope. Patterns come
//! from two sources with no precedence between them: the configured
//! pattern list and the repository ignore file. A path is excluded when
//! any pattern from either source matches.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

/// Compiled exclusion rules.
#[derive(Debug)]
pub struct ExcludeRules {
    set: GlobSet,
    /// Number of patterns that compiled successfully.
    accepted: usize,
}

impl ExcludeRules {
    /// Compile a pattern list into one rule set.
    ///
    /// Malformed patterns are dropped with a stderr warning; they never
    /// abort the run and never match anything. Duplicates are harmless
    /// (union semantics).
    pub fn compile(patterns: &[String]) -> Self {
        let mut builder = GlobSetBuilder::new();
        let mut accepted = 0;

        for raw in patterns {
            let pattern = raw.trim();
            if pattern.is_empty() || pattern.starts_with('#') {
                continue;
            }

            for expanded in expand_pattern(pattern) {
                // literal_separator keeps `*` within one path segment;
                // only `**` crosses directories.
                match GlobBuilder::new(&expanded).literal_separator(true).build() {
                    Ok(glob) => {
                        builder.add(glob);
                        accepted += 1;
                    }
                    Err(e) => {
                        eprintln!("Warning: ignoring invalid pattern {pattern:?}: {e}");
                    }
                }
            }
        }

        let set = builder.build().unwrap_or_else(|e| {
            // GlobSetBuilder only fails on globs it already accepted, so
            // this is unreachable in practice; an empty set keeps the
            // failure non-fatal regardless.
            eprintln!("Warning: failed to build pattern set: {e}");
            GlobSet::empty()
        });

        Self { set, accepted }
    }

    /// Merge configured patterns with the contents of the ignore file.
    pub fn from_sources(configured: &[String], ignore_file: Option<&str>) -> Self {
        let mut patterns: Vec<String> = configured.to_vec();
        if let Some(contents) = ignore_file {
            patterns.extend(parse_ignore_file(contents));
        }
        Self::compile(&patterns)
    }

    /// Whether `path` is excluded from analysis.
    pub fn is_excluded(&self, path: &str) -> bool {
        self.set.is_match(path)
    }

    /// Number of active patterns.
    pub fn len(&self) -> usize {
        self.accepted
    }

    pub fn is_empty(&self) -> bool {
        self.accepted == 0
    }
}

/// Expand the directory-suffix shorthand: `docs/` matches the directory
/// and everything beneath it.
fn expand_pattern(pattern: &str) -> Vec<String> {
    match pattern.strip_suffix('/') {
        Some(dir) if !dir.is_empty() => {
            vec![dir.to_string(), format!("{dir}/**")]
        }
        _ => vec![pattern.to_string()],
    }
}

/// Split a comma- or newline-separated configuration value into patterns.
pub fn parse_pattern_list(value: &str) -> Vec<String> {
    value
        .split(|c| c == ',' || c == '\n')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Extract patterns from ignore-file contents: one per line, `#` comments
/// and blank lines skipped.
fn parse_ignore_file(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
