//! Default excludes
//!
//! Version-control metadata and editor droppings that a scan skips unless
//! told otherwise. The patterns are relative to the scan's base directory and
//! only apply strictly below it.

/// Built-in default exclude patterns
pub const BUILTIN_DEFAULT_EXCLUDES: &[&str] = &[
    // editor backups and lock files
    "**/*~",
    "**/#*#",
    "**/.#*",
    "**/%*%",
    "**/._*",
    // CVS
    "**/CVS",
    "**/CVS/**",
    "**/.cvsignore",
    // Subversion
    "**/.svn",
    "**/.svn/**",
    "**/_svn",
    "**/_svn/**",
    // Git
    "**/.git",
    "**/.git/**",
    "**/.gitattributes",
    "**/.gitignore",
    "**/.gitmodules",
    // Mercurial
    "**/.hg",
    "**/.hg/**",
    "**/.hgignore",
    "**/.hgsub",
    "**/.hgsubstate",
    "**/.hgtags",
    // Bazaar
    "**/.bzr",
    "**/.bzr/**",
    "**/.bzrignore",
    // SCCS
    "**/SCCS",
    "**/SCCS/**",
    // Visual SourceSafe
    "**/vssver.scc",
    "**/vssver2.scc",
    "**/_vti_cnf/**",
    // macOS
    "**/.DS_Store",
];

/// A replaceable table of default exclude patterns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultExcludes {
    patterns: Vec<String>,
}

impl Default for DefaultExcludes {
    fn default() -> Self {
        Self::builtin()
    }
}

impl DefaultExcludes {
    /// The built-in table
    pub fn builtin() -> Self {
        DefaultExcludes {
            patterns: BUILTIN_DEFAULT_EXCLUDES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }

    /// An empty table
    pub fn none() -> Self {
        DefaultExcludes {
            patterns: Vec::new(),
        }
    }

    /// Add a pattern; returns false if it was already present
    pub fn add(&mut self, pattern: impl Into<String>) -> bool {
        let pattern = pattern.into();
        if self.patterns.contains(&pattern) {
            return false;
        }
        self.patterns.push(pattern);
        true
    }

    /// Remove a pattern; returns false if it was not present
    pub fn remove(&mut self, pattern: &str) -> bool {
        let before = self.patterns.len();
        self.patterns.retain(|p| p != pattern);
        self.patterns.len() != before
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_covers_vcs_directories() {
        let defaults = DefaultExcludes::builtin();
        for dir in ["CVS", ".svn", "_svn", ".git", ".hg", ".bzr", "SCCS"] {
            let subtree = format!("**/{}/**", dir);
            assert!(defaults.patterns().contains(&subtree), "{dir}");
        }
    }

    #[test]
    fn test_add_and_remove() {
        let mut defaults = DefaultExcludes::none();
        assert!(defaults.is_empty());
        assert!(defaults.add("**/target/**"));
        assert!(!defaults.add("**/target/**"));
        assert!(defaults.remove("**/target/**"));
        assert!(!defaults.remove("**/target/**"));
    }
}
