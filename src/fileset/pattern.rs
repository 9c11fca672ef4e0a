//! Include/exclude patterns
//!
//! A pattern is split into a literal prefix, which doubles as the directory
//! a scan starts from, and the remaining segments. `*` and `?` match within
//! one path segment; `**` matches zero or more whole segments.

use crate::error::{ScanError, ScanResult};
use regex::Regex;
use std::path::{Component, Path, PathBuf};

/// One segment of a pattern, after the literal prefix
#[derive(Debug, Clone)]
pub enum Segment {
    /// `**`
    AnyDepth,
    Literal(String),
    Wildcard(Regex),
}

impl Segment {
    fn parse(text: &str, pattern: &str) -> ScanResult<Segment> {
        if text == "**" {
            return Ok(Segment::AnyDepth);
        }
        if !is_wildcard(text) {
            return Ok(Segment::Literal(text.to_string()));
        }

        let mut source = String::from("(?s)^");
        let mut literal = String::new();
        for c in text.chars() {
            match c {
                '*' | '?' => {
                    source.push_str(&regex::escape(&literal));
                    literal.clear();
                    // `?` matches at most one character
                    source.push_str(if c == '*' { ".*" } else { ".?" });
                }
                _ => literal.push(c),
            }
        }
        source.push_str(&regex::escape(&literal));
        source.push('$');

        Regex::new(&source)
            .map(Segment::Wildcard)
            .map_err(|e| ScanError::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })
    }

    fn matches(&self, name: &str) -> bool {
        match self {
            Segment::AnyDepth => true,
            Segment::Literal(literal) => literal == name,
            Segment::Wildcard(regex) => regex.is_match(name),
        }
    }
}

fn is_wildcard(segment: &str) -> bool {
    segment.contains(['*', '?'])
}

/// A compiled include or exclude pattern
#[derive(Debug, Clone)]
pub struct Pattern {
    text: String,
    /// Literal leading components, in matching case
    prefix: Vec<String>,
    /// The literal prefix as a path, in original case
    root: PathBuf,
    segments: Vec<Segment>,
}

impl Pattern {
    /// Compile `text`, rooting relative patterns at `base_dir`.
    ///
    /// When `case_sensitive` is false, literals are folded to lowercase and
    /// candidates must be folded the same way (see [`path_components`]).
    pub fn new(text: &str, base_dir: &Path, case_sensitive: bool) -> ScanResult<Pattern> {
        let mut normalized = text.replace('\\', "/");
        if normalized.ends_with('/') {
            normalized.push_str("**");
        }

        let full = if Path::new(&normalized).is_absolute() {
            normalized
        } else {
            let base = base_dir.to_string_lossy().replace('\\', "/");
            format!("{}/{}", base.trim_end_matches('/'), normalized)
        };

        let parts = normalize_parts(&full);
        let literal_len = parts.iter().take_while(|p| !is_wildcard(p)).count();

        let root_parts = &parts[..literal_len];
        let root = if root_parts.len() == 1 && root_parts[0].is_empty() {
            PathBuf::from("/")
        } else {
            PathBuf::from(root_parts.join("/"))
        };

        let fold = |s: &str| {
            if case_sensitive {
                s.to_string()
            } else {
                s.to_lowercase()
            }
        };

        let prefix = root_parts.iter().map(|p| fold(p)).collect();
        let segments = parts[literal_len..]
            .iter()
            .map(|p| Segment::parse(&fold(p), text))
            .collect::<ScanResult<Vec<Segment>>>()?;

        Ok(Pattern {
            text: text.to_string(),
            prefix,
            root,
            segments,
        })
    }

    /// The pattern as written
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Directory a scan for this pattern starts from
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check if the path with these components matches the whole pattern
    pub fn matches(&self, components: &[String]) -> bool {
        match self.strip_prefix(components) {
            Some(rest) => match_segments(&self.segments, rest),
            None => false,
        }
    }

    /// Check if some path strictly below the directory `components` could
    /// still match
    pub fn could_match_below(&self, components: &[String]) -> bool {
        if components.len() < self.prefix.len() {
            return components.iter().zip(&self.prefix).all(|(c, p)| c == p);
        }
        match self.strip_prefix(components) {
            Some(rest) => could_extend(&self.segments, rest),
            None => false,
        }
    }

    /// Check if the directory `components` and everything below it match
    pub fn covers_subtree(&self, components: &[String]) -> bool {
        matches!(self.segments.last(), Some(Segment::AnyDepth)) && self.matches(components)
    }

    fn strip_prefix<'c>(&self, components: &'c [String]) -> Option<&'c [String]> {
        if components.len() < self.prefix.len() {
            return None;
        }
        let (head, rest) = components.split_at(self.prefix.len());
        if head == self.prefix.as_slice() {
            Some(rest)
        } else {
            None
        }
    }
}

fn match_segments(segments: &[Segment], components: &[String]) -> bool {
    match segments.split_first() {
        None => components.is_empty(),
        Some((Segment::AnyDepth, rest)) => {
            (0..=components.len()).any(|skip| match_segments(rest, &components[skip..]))
        }
        Some((segment, rest)) => match components.split_first() {
            Some((name, remaining)) => segment.matches(name) && match_segments(rest, remaining),
            None => false,
        },
    }
}

fn could_extend(segments: &[Segment], components: &[String]) -> bool {
    match segments.split_first() {
        None => false,
        Some((Segment::AnyDepth, _)) => true,
        Some((segment, rest)) => match components.split_first() {
            Some((name, remaining)) => segment.matches(name) && could_extend(rest, remaining),
            None => true,
        },
    }
}

/// Split a `/`-separated path, dropping `.` and resolving `..` lexically.
/// An absolute path keeps a leading empty component.
fn normalize_parts(path: &str) -> Vec<String> {
    let mut parts: Vec<String> = Vec::new();
    for (i, part) in path.split('/').enumerate() {
        match part {
            "" if i == 0 => parts.push(String::new()),
            "" | "." => {}
            ".." => match parts.last() {
                Some(last) if !last.is_empty() && last != ".." && last != "**" => {
                    parts.pop();
                }
                Some(last) if last.is_empty() => {}
                _ => parts.push(part.to_string()),
            },
            _ => parts.push(part.to_string()),
        }
    }
    parts
}

/// Components of a path in the form patterns match against
pub fn path_components(path: &Path, case_sensitive: bool) -> Vec<String> {
    let text = path.to_string_lossy().replace('\\', "/");
    let text = if case_sensitive {
        text
    } else {
        text.to_lowercase()
    };
    normalize_parts(&text)
}

/// Resolve `.` and `..` lexically, without touching the filesystem
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    if normalized.as_os_str().is_empty() {
        normalized.push(".");
    }
    normalized
}
