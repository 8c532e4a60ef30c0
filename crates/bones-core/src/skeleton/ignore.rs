//! Ignore rules for skeleton enumeration

use crate::config::IGNORE_FILE;
use crate::error::{Error, Result};
use regex::Regex;
use std::io;
use std::path::Path;

/// Patterns that are always ignored: VCS metadata and editor leftovers
const DEFAULT_PATTERNS: &[&str] = &[
    r"(^|/)\.git$",
    r"(^|/)\.svn$",
    r"(^|/)\.hg$",
    r"(^|/)CVS$",
    r"~$",
    r"\.bak$",
    r"\.tmp$",
];

/// Ordered set of ignore patterns, immutable once loaded
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    patterns: Vec<Regex>,
}

impl IgnoreRules {
    /// Built-in rules only (VCS metadata, backups, and the ignore file itself)
    pub fn defaults() -> Self {
        let mut rules = Self {
            patterns: Vec::new(),
        };
        for pattern in DEFAULT_PATTERNS {
            rules.push(pattern);
        }
        rules.push(&format!("(^|/){}$", regex::escape(IGNORE_FILE)));
        rules
    }

    /// Load `<source_root>/.bnsignore` plus `extra` patterns on top of the defaults.
    /// A missing ignore file is not an error.
    pub fn load(source_root: &Path, extra: &[String]) -> Result<Self> {
        let mut rules = Self::defaults();
        let ignore_path = source_root.join(IGNORE_FILE);

        match std::fs::read_to_string(&ignore_path) {
            Ok(content) => rules.extend_from_lines(&content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(Error::io("read ignore file", &ignore_path, e)),
        }

        for pattern in extra {
            rules.push(pattern);
        }

        tracing::debug!(
            "Loaded {} ignore patterns for {}",
            rules.len(),
            source_root.display()
        );
        Ok(rules)
    }

    /// Add one pattern per line, skipping blanks and `#` comments
    fn extend_from_lines(&mut self, content: &str) {
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            self.push(line);
        }
    }

    /// Compile a pattern; anything that is not a valid regex is matched literally
    fn push(&mut self, pattern: &str) {
        let regex = Regex::new(pattern).or_else(|_| Regex::new(&regex::escape(pattern)));
        match regex {
            Ok(regex) => self.patterns.push(regex),
            Err(e) => tracing::warn!("Skipping ignore pattern '{}': {}", pattern, e),
        }
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// True if the relative path or any `/`-delimited prefix of it matches a
    /// pattern. Nested entries only match patterns that allow a leading `/`.
    pub fn should_ignore(&self, relative_path: &str) -> bool {
        let segments: Vec<&str> = relative_path.split('/').filter(|s| !s.is_empty()).collect();

        for end in 1..=segments.len() {
            if self.matches(&segments[..end].join("/")) {
                return true;
            }
        }

        false
    }

    fn matches(&self, candidate: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(candidate))
    }
}

impl Default for IgnoreRules {
    fn default() -> Self {
        Self::defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_ignore_vcs_metadata() {
        let rules = IgnoreRules::defaults();
        assert!(rules.should_ignore(".git"));
        assert!(rules.should_ignore(".git/config"));
        assert!(rules.should_ignore("lib/.svn/entries"));
        assert!(rules.should_ignore("CVS/Root"));
        assert!(rules.should_ignore(".bnsignore"));
        assert!(rules.should_ignore("README.md~"));
        assert!(rules.should_ignore("notes.bak"));
        assert!(rules.should_ignore("vendor/plugin/.hg/store"));
        assert!(rules.should_ignore("templates/.bnsignore"));
    }

    #[test]
    fn test_defaults_keep_regular_files() {
        let rules = IgnoreRules::defaults();
        assert!(!rules.should_ignore(".gitignore"));
        assert!(!rules.should_ignore("Rakefile.bns"));
        assert!(!rules.should_ignore("NAME/NAME.rb.bns"));
        assert!(!rules.should_ignore("lib/git_helper.rb"));
    }

    #[test]
    fn test_load_from_ignore_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(IGNORE_FILE),
            "# generated files\n\n^pkg$\ncoverage\n\\.log$\n",
        )
        .unwrap();

        let rules = IgnoreRules::load(dir.path(), &[]).unwrap();
        assert!(rules.should_ignore("pkg/bones-1.0.gem"));
        assert!(!rules.should_ignore("lib/pkg.rb"));
        assert!(!rules.should_ignore("lib/pkg/loader.rb"));
        assert!(rules.should_ignore("coverage/index.html"));
        assert!(rules.should_ignore("test/coverage_helper.rb"));
        assert!(rules.should_ignore("log/test.log"));
        assert!(!rules.should_ignore("README.md"));
    }

    #[test]
    fn test_missing_ignore_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let rules = IgnoreRules::load(dir.path(), &[]).unwrap();
        assert_eq!(rules.len(), IgnoreRules::defaults().len());
    }

    #[test]
    fn test_extra_patterns() {
        let dir = tempfile::tempdir().unwrap();
        let rules = IgnoreRules::load(dir.path(), &["^doc/".to_string()]).unwrap();
        assert!(rules.should_ignore("doc/index.html"));
        assert!(!rules.should_ignore("docs/index.html"));
    }

    #[test]
    fn test_invalid_regex_is_literal() {
        let dir = tempfile::tempdir().unwrap();
        let rules = IgnoreRules::load(dir.path(), &["[draft".to_string()]).unwrap();
        assert!(rules.should_ignore("notes/[draft].md"));
        assert!(!rules.should_ignore("notes/draft.md"));
    }
}
