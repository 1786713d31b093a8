use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};

/// Name of the conventional ignore file looked up at the repository root.
pub const DEFAULT_IGNORE_FILE: &str = ".critiqignore";

/// A compiled set of glob patterns excluding paths from scanning.
///
/// Patterns are matched against root-relative, forward-slash paths.
/// `*` and `?` stay within one path segment, `**` crosses segments, and
/// bracket classes work as in shell globs. Matching is case-sensitive and
/// anchored to the full relative path. There is no negation syntax.
pub struct IgnoreRules {
    patterns: Vec<String>,
    set: GlobSet,
}

impl IgnoreRules {
    /// Create an empty rule set that matches nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
            set: GlobSet::empty(),
        }
    }

    /// Parse a newline-delimited pattern list.
    ///
    /// Each line is trimmed of surrounding whitespace and backslashes are
    /// normalized to forward slashes so Windows-style patterns keep working.
    /// Blank lines are dropped. A line that does not compile as a glob is
    /// skipped with a warning rather than failing the whole set.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut patterns = Vec::new();
        let mut builder = GlobSetBuilder::new();

        for line in text.lines() {
            let pattern = line.trim().replace('\\', "/");
            if pattern.is_empty() {
                continue;
            }

            match GlobBuilder::new(&pattern).literal_separator(true).build() {
                Ok(glob) => {
                    builder.add(glob);
                    patterns.push(pattern);
                }
                Err(e) => {
                    tracing::warn!("Skipping invalid ignore pattern '{}': {}", pattern, e);
                }
            }
        }

        match builder.build() {
            Ok(set) => Self { patterns, set },
            Err(e) => {
                tracing::warn!("Failed to compile ignore patterns: {}", e);
                Self::empty()
            }
        }
    }

    /// Load rules from a pattern file.
    ///
    /// A missing or unreadable file yields the empty set; ignore filtering
    /// is optional and never fatal.
    pub async fn load(path: &Path) -> Self {
        match tokio::fs::read_to_string(path).await {
            Ok(text) => Self::parse(&text),
            Err(e) => {
                tracing::debug!("No ignore rules loaded from {}: {}", path.display(), e);
                Self::empty()
            }
        }
    }

    /// Resolve and load the ignore source for a scan.
    ///
    /// Resolution order: explicit path, then `.critiqignore` at the
    /// repository root, then the user-level fallback under the config
    /// directory, then the empty set.
    pub async fn resolve(root: &Path, explicit: Option<&Path>) -> Self {
        if let Some(path) = explicit {
            return Self::load(path).await;
        }

        let conventional = root.join(DEFAULT_IGNORE_FILE);
        if conventional.exists() {
            return Self::load(&conventional).await;
        }

        if let Some(fallback) = user_ignore_path() {
            if fallback.exists() {
                return Self::load(&fallback).await;
            }
        }

        Self::empty()
    }

    /// Test a root-relative path against the rule set.
    ///
    /// The path is normalized to forward-slash form before matching; any
    /// single pattern matching suffices to exclude it.
    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        let normalized = path.replace('\\', "/");
        self.set.is_match(normalized.as_str())
    }

    /// The normalized pattern strings in this set.
    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }
}

/// User-level ignore file shipped alongside the tool's configuration.
fn user_ignore_path() -> Option<PathBuf> {
    dirs::config_dir().map(|config_dir| config_dir.join("critiq").join("ignore"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_drops_blank_lines() {
        let rules = IgnoreRules::parse("  *.log  \n\n   \nnode_modules\n");
        assert_eq!(rules.len(), 2);
        assert_eq!(rules.patterns(), &["*.log", "node_modules"]);
    }

    #[test]
    fn test_parse_normalizes_backslashes() {
        let rules = IgnoreRules::parse("build\\output\\*.o\n");
        assert_eq!(rules.patterns(), &["build/output/*.o"]);
        assert!(rules.is_match("build/output/main.o"));
    }

    #[test]
    fn test_star_stays_within_segment() {
        let rules = IgnoreRules::parse("*.log\n");
        assert!(rules.is_match("debug.log"));
        assert!(!rules.is_match("logs/debug.log"));
    }

    #[test]
    fn test_double_star_crosses_segments() {
        let rules = IgnoreRules::parse("**/*.log\n");
        assert!(rules.is_match("logs/debug.log"));
        assert!(rules.is_match("a/b/c/debug.log"));
    }

    #[test]
    fn test_question_mark_matches_one_character() {
        let rules = IgnoreRules::parse("file?.txt\n");
        assert!(rules.is_match("file1.txt"));
        assert!(rules.is_match("fileA.txt"));
        assert!(!rules.is_match("file12.txt"));
        assert!(!rules.is_match("file/a.txt"));
    }

    #[test]
    fn test_bracket_classes() {
        let rules = IgnoreRules::parse("file[0-9].txt\n");
        assert!(rules.is_match("file3.txt"));
        assert!(!rules.is_match("fileA.txt"));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let rules = IgnoreRules::parse("README.md\n");
        assert!(rules.is_match("README.md"));
        assert!(!rules.is_match("readme.md"));
    }

    #[test]
    fn test_matching_is_anchored_not_substring() {
        let rules = IgnoreRules::parse("target\n");
        assert!(rules.is_match("target"));
        assert!(!rules.is_match("src/target"));
        assert!(!rules.is_match("targets"));
    }

    #[test]
    fn test_any_pattern_suffices() {
        let rules = IgnoreRules::parse("*.tmp\n*.bak\n");
        assert!(rules.is_match("scratch.tmp"));
        assert!(rules.is_match("old.bak"));
        assert!(!rules.is_match("keep.txt"));
    }

    #[test]
    fn test_invalid_pattern_is_skipped() {
        let rules = IgnoreRules::parse("[unclosed\n*.log\n");
        assert_eq!(rules.len(), 1);
        assert!(rules.is_match("debug.log"));
    }

    #[test]
    fn test_empty_set_matches_nothing() {
        let rules = IgnoreRules::empty();
        assert!(rules.is_empty());
        assert!(!rules.is_match("anything"));
        assert!(!rules.is_match(""));
    }

    #[tokio::test]
    async fn test_load_missing_file_yields_empty_set() {
        let rules = IgnoreRules::load(Path::new("/nonexistent/.critiqignore")).await;
        assert!(rules.is_empty());
    }

    #[tokio::test]
    async fn test_resolve_prefers_explicit_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let explicit = dir.path().join("custom-ignore");
        tokio::fs::write(&explicit, "*.rs\n")
            .await
            .expect("write ignore file");
        tokio::fs::write(dir.path().join(DEFAULT_IGNORE_FILE), "*.md\n")
            .await
            .expect("write conventional file");

        let rules = IgnoreRules::resolve(dir.path(), Some(explicit.as_path())).await;
        assert!(rules.is_match("main.rs"));
        assert!(!rules.is_match("README.md"));
    }

    #[tokio::test]
    async fn test_resolve_falls_back_to_conventional_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        tokio::fs::write(dir.path().join(DEFAULT_IGNORE_FILE), "*.md\n")
            .await
            .expect("write conventional file");

        let rules = IgnoreRules::resolve(dir.path(), None).await;
        assert!(rules.is_match("README.md"));
    }
}
