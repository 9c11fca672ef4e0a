//! Directory scanning
//!
//! A path is selected iff it matches at least one include and no exclude,
//! user-given or default. Pattern order never matters.

use crate::error::{ScanError, ScanResult};
use crate::fileset::defaults::DefaultExcludes;
use crate::fileset::pattern::{normalize_path, path_components, Pattern};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// A scan request: a base directory plus include and exclude patterns
#[derive(Debug, Clone)]
pub struct FileSet {
    base_dir: PathBuf,
    includes: Vec<String>,
    excludes: Vec<String>,
    default_excludes: Option<DefaultExcludes>,
    case_sensitive: bool,
}

/// Paths selected by a scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScannedPaths {
    pub files: BTreeSet<PathBuf>,
    pub directories: BTreeSet<PathBuf>,
}

impl ScannedPaths {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.directories.is_empty()
    }

    /// Files relative to `base`; files outside it keep their full path
    pub fn relative_files(&self, base: &Path) -> Vec<PathBuf> {
        self.files
            .iter()
            .map(|f| f.strip_prefix(base).map(Path::to_path_buf).unwrap_or_else(|_| f.clone()))
            .collect()
    }
}

impl FileSet {
    /// Create an empty file set rooted at `base_dir`, with the built-in
    /// default excludes and case-sensitive matching
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        FileSet {
            base_dir: base_dir.into(),
            includes: Vec::new(),
            excludes: Vec::new(),
            default_excludes: Some(DefaultExcludes::builtin()),
            case_sensitive: true,
        }
    }

    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.includes.push(pattern.into());
        self
    }

    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.excludes.push(pattern.into());
        self
    }

    pub fn includes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.includes.extend(patterns.into_iter().map(Into::into));
        self
    }

    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excludes.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Replace the default exclude table
    pub fn default_excludes(mut self, defaults: DefaultExcludes) -> Self {
        self.default_excludes = Some(defaults);
        self
    }

    /// Turn default excludes off
    pub fn without_default_excludes(mut self) -> Self {
        self.default_excludes = None;
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn include_patterns(&self) -> &[String] {
        &self.includes
    }

    pub fn exclude_patterns(&self) -> &[String] {
        &self.excludes
    }

    /// Scan the filesystem
    pub fn scan(&self) -> ScanResult<ScannedPaths> {
        let base_dir = absolute(&self.base_dir)?;
        if !base_dir.is_dir() {
            return Err(ScanError::MissingBaseDirectory(base_dir));
        }

        let scanner = Scanner::new(self, &base_dir)?;
        let mut result = ScannedPaths::default();
        for root in scanner.roots(&base_dir) {
            scanner.walk(&root, &mut result)?;
        }

        debug!(
            base_dir = %base_dir.display(),
            files = result.files.len(),
            directories = result.directories.len(),
            "Scan finished"
        );
        Ok(result)
    }
}

/// Compiled patterns for one scan
struct Scanner {
    includes: Vec<Pattern>,
    excludes: Vec<Pattern>,
    case_sensitive: bool,
}

impl Scanner {
    fn new(fileset: &FileSet, base_dir: &Path) -> ScanResult<Self> {
        let compile = |patterns: &[String]| {
            patterns
                .iter()
                .map(|p| Pattern::new(p, base_dir, fileset.case_sensitive))
                .collect::<ScanResult<Vec<Pattern>>>()
        };

        let includes = compile(&fileset.includes)?;
        let mut excludes = compile(&fileset.excludes)?;

        // default excludes are rooted at the base, so they can only match
        // below it
        if let Some(defaults) = &fileset.default_excludes {
            excludes.extend(compile(defaults.patterns())?);
        }

        Ok(Scanner {
            includes,
            excludes,
            case_sensitive: fileset.case_sensitive,
        })
    }

    /// Distinct walk roots, dropping any root nested in another
    fn roots(&self, base_dir: &Path) -> Vec<PathBuf> {
        let candidates: BTreeSet<PathBuf> = self
            .includes
            .iter()
            .map(|p| {
                let root = p.root();
                // a literal prefix may differ in case from what is on disk
                if !self.case_sensitive && !root.exists() && root.starts_with(base_dir) {
                    base_dir.to_path_buf()
                } else {
                    root.to_path_buf()
                }
            })
            .collect();

        let mut roots: Vec<PathBuf> = Vec::new();
        for candidate in candidates {
            if !roots.iter().any(|r| candidate.starts_with(r)) {
                roots.push(candidate);
            }
        }
        roots
    }

    fn walk(&self, root: &Path, result: &mut ScannedPaths) -> ScanResult<()> {
        if !root.exists() {
            trace!(root = %root.display(), "Include root does not exist");
            return Ok(());
        }

        let mut entries = WalkDir::new(root).follow_links(false).into_iter();
        while let Some(entry) = entries.next() {
            let entry = entry.map_err(|source| ScanError::Walk {
                path: source
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf()),
                source,
            })?;

            let components = path_components(entry.path(), self.case_sensitive);
            let is_dir = entry.file_type().is_dir();

            if self.is_selected(&components) {
                let path = entry.path().to_path_buf();
                if is_dir {
                    result.directories.insert(path);
                } else {
                    result.files.insert(path);
                }
            }

            if is_dir && !self.should_descend(&components) {
                trace!(dir = %entry.path().display(), "Pruned");
                entries.skip_current_dir();
            }
        }

        Ok(())
    }

    fn is_selected(&self, components: &[String]) -> bool {
        self.includes.iter().any(|p| p.matches(components))
            && !self.excludes.iter().any(|p| p.matches(components))
    }

    fn should_descend(&self, components: &[String]) -> bool {
        self.includes.iter().any(|p| p.could_match_below(components))
            && !self.excludes.iter().any(|p| p.covers_subtree(components))
    }
}

fn absolute(path: &Path) -> ScanResult<PathBuf> {
    if path.is_absolute() {
        Ok(normalize_path(path))
    } else {
        Ok(normalize_path(&std::env::current_dir()?.join(path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "").unwrap();
    }

    fn names(paths: &BTreeSet<PathBuf>, base: &Path) -> Vec<String> {
        paths
            .iter()
            .map(|p| {
                p.strip_prefix(base)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn test_question_mark_matches_at_most_one_character() {
        let temp = TempDir::new().unwrap();
        for f in ["Foo.txt", "Foo1.txt", "Foo22.txt", "sub/Foo3.txt"] {
            touch(temp.path(), f);
        }

        let result = FileSet::new(temp.path()).include("Foo?.txt").scan().unwrap();
        assert_eq!(names(&result.files, temp.path()), vec!["Foo.txt", "Foo1.txt"]);
    }

    #[test]
    fn test_question_mark_in_nested_folder() {
        let temp = TempDir::new().unwrap();
        for f in [
            "folder2/Foo.txt",
            "folder2/Foo1.txt",
            "folder2/Foo2.txt",
            "folder2/Foo3",
            "folder2/Foo4.bar",
        ] {
            touch(temp.path(), f);
        }

        let result = FileSet::new(temp.path())
            .include("folder2/Foo?.txt")
            .scan()
            .unwrap();
        assert_eq!(
            names(&result.files, temp.path()),
            vec!["folder2/Foo.txt", "folder2/Foo1.txt", "folder2/Foo2.txt"]
        );
    }

    #[test]
    fn test_exclude_wins_regardless_of_order() {
        let temp = TempDir::new().unwrap();
        for f in ["a/XYZ.txt", "a/b/XYZabc", "a/keep.txt", "keep2.txt"] {
            touch(temp.path(), f);
        }

        let result = FileSet::new(temp.path())
            .exclude("**/XYZ*")
            .include("**")
            .scan()
            .unwrap();
        assert_eq!(
            names(&result.files, temp.path()),
            vec!["a/keep.txt", "keep2.txt"]
        );
    }

    #[test]
    fn test_any_depth_includes_base_and_directories() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "x/y/z.txt");

        let result = FileSet::new(temp.path()).include("**").scan().unwrap();
        assert_eq!(names(&result.directories, temp.path()), vec!["", "x", "x/y"]);
        assert_eq!(names(&result.files, temp.path()), vec!["x/y/z.txt"]);
    }

    #[test]
    fn test_directories_match_without_contents() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "src/lib/a.rs");
        touch(temp.path(), "src/bin/b.rs");

        let result = FileSet::new(temp.path()).include("src/*").scan().unwrap();
        assert_eq!(
            names(&result.directories, temp.path()),
            vec!["src/bin", "src/lib"]
        );
        assert!(result.files.is_empty());
    }

    #[test]
    fn test_default_excludes_apply_below_base() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "main.c");
        touch(temp.path(), ".git/config");
        touch(temp.path(), "lib/.svn/entries");
        touch(temp.path(), "lib/util.c");
        touch(temp.path(), "notes.txt~");

        let result = FileSet::new(temp.path()).include("**/*").scan().unwrap();
        assert_eq!(
            names(&result.files, temp.path()),
            vec!["lib/util.c", "main.c"]
        );
        assert_eq!(names(&result.directories, temp.path()), vec!["lib"]);
    }

    #[test]
    fn test_base_inside_default_excluded_directory() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), ".git/config");
        touch(temp.path(), ".git/hooks/pre-commit");
        touch(temp.path(), ".git/hooks/.svn/junk");

        let base = temp.path().join(".git");
        let result = FileSet::new(&base).include("**").scan().unwrap();
        assert_eq!(
            names(&result.files, &base),
            vec!["config", "hooks/pre-commit"]
        );
        assert!(result.directories.contains(&base));
    }

    #[test]
    fn test_default_excludes_can_be_disabled() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), ".git/config");

        let result = FileSet::new(temp.path())
            .include("**/config")
            .without_default_excludes()
            .scan()
            .unwrap();
        assert_eq!(names(&result.files, temp.path()), vec![".git/config"]);
    }

    #[test]
    fn test_rooted_pattern_outside_base() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "base/in.txt");
        touch(temp.path(), "other/out.txt");

        let base = temp.path().join("base");
        let outside = format!("{}/other/*.txt", temp.path().display());
        let result = FileSet::new(&base)
            .include("*.txt")
            .include(outside)
            .scan()
            .unwrap();

        assert!(result.files.contains(&base.join("in.txt")));
        assert!(result.files.contains(&temp.path().join("other/out.txt")));
        assert_eq!(result.files.len(), 2);
    }

    #[test]
    fn test_parent_relative_pattern() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "base/in.txt");
        touch(temp.path(), "sibling/s.txt");

        let result = FileSet::new(temp.path().join("base"))
            .include("../sibling/*.txt")
            .scan()
            .unwrap();
        assert_eq!(names(&result.files, temp.path()), vec!["sibling/s.txt"]);
    }

    #[test]
    fn test_case_insensitive_matching() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "Src/Main.RS");

        let sensitive = FileSet::new(temp.path()).include("src/*.rs").scan().unwrap();
        assert!(sensitive.files.is_empty());

        let insensitive = FileSet::new(temp.path())
            .include("src/*.rs")
            .case_sensitive(false)
            .scan()
            .unwrap();
        assert_eq!(names(&insensitive.files, temp.path()), vec!["Src/Main.RS"]);
    }

    #[test]
    fn test_missing_include_root_contributes_nothing() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "a.txt");

        let result = FileSet::new(temp.path())
            .include("missing/**")
            .include("*.txt")
            .scan()
            .unwrap();
        assert_eq!(names(&result.files, temp.path()), vec!["a.txt"]);
    }

    #[test]
    fn test_missing_base_directory() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");
        assert!(matches!(
            FileSet::new(&missing).include("**").scan(),
            Err(ScanError::MissingBaseDirectory(path)) if path == missing
        ));
    }

    #[test]
    fn test_trailing_separator_selects_subtree() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "out/a.o");
        touch(temp.path(), "out/deep/b.o");
        touch(temp.path(), "src/a.c");

        let result = FileSet::new(temp.path()).include("out/").scan().unwrap();
        assert_eq!(
            names(&result.files, temp.path()),
            vec!["out/a.o", "out/deep/b.o"]
        );
    }
}
