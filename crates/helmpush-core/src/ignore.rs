//! `.helmignore` support
//!
//! Patterns follow the Helm rules: one glob per line, `#` starts a comment,
//! a leading `!` negates, a trailing `/` restricts the rule to directories.
//! Patterns without a `/` match the base name, others the relative path.
//! Later rules take precedence over earlier ones.

use glob::{MatchOptions, Pattern};
use std::path::Path;

use crate::error::{CoreError, Result};

/// Name of the ignore file at the chart root
pub const HELMIGNORE: &str = ".helmignore";

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

#[derive(Debug, Clone)]
struct Rule {
    pattern: Pattern,
    negate: bool,
    dir_only: bool,
    base_name: bool,
}

impl Rule {
    fn matches(&self, rel_path: &str, is_dir: bool) -> bool {
        if self.dir_only && !is_dir {
            return false;
        }
        let candidate = if self.base_name {
            rel_path.rsplit('/').next().unwrap_or(rel_path)
        } else {
            rel_path
        };
        self.pattern.matches_with(candidate, MATCH_OPTIONS)
    }
}

/// Parsed set of ignore rules
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    rules: Vec<Rule>,
}

impl IgnoreRules {
    /// Load `.helmignore` from a chart root, or no rules if the file is absent
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(HELMIGNORE);
        if !path.is_file() {
            return Ok(Self::default());
        }
        Self::parse(&std::fs::read_to_string(path)?)
    }

    /// Parse ignore rules from file content
    pub fn parse(content: &str) -> Result<Self> {
        let mut rules = Vec::new();

        for line in content.lines() {
            let mut line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let negate = line.starts_with('!');
            if negate {
                line = &line[1..];
            }

            let dir_only = line.ends_with('/') && line.len() > 1;
            let line = line.trim_end_matches('/');
            let line = line.trim_start_matches("./");

            let pattern = Pattern::new(line).map_err(|e| CoreError::IgnorePattern {
                pattern: line.to_string(),
                message: e.to_string(),
            })?;

            rules.push(Rule {
                pattern,
                negate,
                dir_only,
                base_name: !line.contains('/'),
            });
        }

        Ok(Self { rules })
    }

    /// Check whether a path relative to the chart root is excluded
    pub fn ignored(&self, rel_path: &str, is_dir: bool) -> bool {
        let mut ignored = false;
        for rule in &self.rules {
            if rule.matches(rel_path, is_dir) {
                ignored = !rule.negate;
            }
        }
        ignored
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comments_and_blank_lines() {
        let rules = IgnoreRules::parse("# comment\n\n   \n").unwrap();
        assert!(rules.is_empty());
    }

    #[test]
    fn test_base_name_match() {
        let rules = IgnoreRules::parse("*.swp\n.git/\n").unwrap();
        assert!(rules.ignored("templates/deployment.yaml.swp", false));
        assert!(rules.ignored(".git", true));
        assert!(!rules.ignored(".git", false));
        assert!(!rules.ignored("templates/deployment.yaml", false));
    }

    #[test]
    fn test_path_match() {
        let rules = IgnoreRules::parse("templates/*.bak").unwrap();
        assert!(rules.ignored("templates/a.bak", false));
        assert!(!rules.ignored("a.bak", false));
        assert!(!rules.ignored("templates/nested/a.bak", false));
    }

    #[test]
    fn test_negation() {
        let rules = IgnoreRules::parse("*.txt\n!NOTES.txt\n").unwrap();
        assert!(rules.ignored("README.txt", false));
        assert!(!rules.ignored("templates/NOTES.txt", false));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = IgnoreRules::parse("[abc").unwrap_err();
        assert!(matches!(err, CoreError::IgnorePattern { .. }));
    }
}
