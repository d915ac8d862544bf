//! Parallel, deterministic Go file discovery with directory pruning.
//!
//! Arguments follow the `go` tool's package patterns:
//! - `dir`: the `.go` files directly inside `dir`
//! - `dir/...`: every package below `dir`, recursively
//! - `file.go`: exactly that file
//!
//! Recursive walks prune `vendor/`, `testdata/`, VCS and hidden
//! directories before descending, the same set `go` ignores.

use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Directories never descended into.
const EXCLUDED_DIRS: &[&str] = &["vendor", "testdata", ".git", "node_modules"];

/// Suffix marking a recursive pattern.
const RECURSIVE_SUFFIX: &str = "...";

/// Options shared by all pattern expansions.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Include `_test.go` files from directories and walks.
    pub include_tests: bool,
    /// Extra directory names to prune.
    pub exclude_dirs: Vec<String>,
}

/// One parsed package pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackagePattern {
    Dir(PathBuf),
    Recursive(PathBuf),
    File(PathBuf),
}

/// Drop `.` components; a path made only of them becomes `.`.
fn normalize(path: &Path) -> PathBuf {
    let cleaned: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    if cleaned.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        cleaned
    }
}

impl PackagePattern {
    /// Parse `pattern`, resolving relative paths against `base`.
    pub fn parse(base: &Path, pattern: &str) -> Self {
        let resolve = |p: &str| normalize(&base.join(p));
        if let Some(prefix) = pattern.strip_suffix(RECURSIVE_SUFFIX) {
            let prefix = prefix.trim_end_matches(['/', '\\']);
            return Self::Recursive(resolve(prefix));
        }
        let path = resolve(pattern);
        if pattern.ends_with(".go") && !path.is_dir() {
            Self::File(path)
        } else {
            Self::Dir(path)
        }
    }
}

/// Checks if a directory entry should be pruned.
///
/// The walk root itself is never pruned, so `./...` and `.hidden/...`
/// still work when named explicitly.
#[inline]
fn is_excluded_dir(entry: &walkdir::DirEntry, excludes: &HashSet<&str>) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry.file_name().to_str().is_some_and(|name| {
            excludes.contains(name) || name.starts_with('.') || name.starts_with('_')
        })
}

/// Whether `path` names a Go source file the scan should keep.
#[inline]
fn is_go_source(path: &Path, include_tests: bool) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.ends_with(".go")
        && !name.starts_with('.')
        && !name.starts_with('_')
        && (include_tests || !name.ends_with("_test.go"))
}

/// Gathers all Go files below `root` using parallel iteration.
///
/// Performance characteristics:
/// - Pruned subtrees are skipped before any of their entries are read
/// - Remaining entries are filtered across available cores
/// - Output is sorted, so results do not depend on thread timing
pub fn gather_go_files(root: &Path, options: &ScanOptions) -> Result<Vec<PathBuf>> {
    let excludes: HashSet<&str> = EXCLUDED_DIRS
        .iter()
        .copied()
        .chain(options.exclude_dirs.iter().map(String::as_str))
        .collect();

    let mut files = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !is_excluded_dir(e, &excludes))
        .par_bridge()
        .filter_map(|entry| match entry {
            Ok(e) => {
                let path = e.path();
                if e.file_type().is_file() && is_go_source(path, options.include_tests) {
                    Some(Ok(path.to_path_buf()))
                } else {
                    None
                }
            }
            Err(e) => Some(Err(e.into())),
        })
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("Failed to gather .go files from {}", root.display()))?;

    files.sort();
    Ok(files)
}

/// Go files directly inside `dir`, sorted.
pub fn gather_dir_files(dir: &Path, options: &ScanOptions) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to read directory {}", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to read directory {}", dir.display()))?;
        let path = entry.path();
        if path.is_file() && is_go_source(&path, options.include_tests) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Expand one pattern into the files it names.
pub fn expand_pattern(pattern: &PackagePattern, options: &ScanOptions) -> Result<Vec<PathBuf>> {
    match pattern {
        PackagePattern::File(path) => {
            if !path.is_file() {
                bail!("no such file: {}", path.display());
            }
            Ok(vec![path.clone()])
        }
        PackagePattern::Dir(dir) => {
            if !dir.is_dir() {
                bail!("no such directory: {}", dir.display());
            }
            gather_dir_files(dir, options)
        }
        PackagePattern::Recursive(dir) => {
            if !dir.is_dir() {
                bail!("no such directory: {}", dir.display());
            }
            gather_go_files(dir, options)
        }
    }
}

/// Expand several patterns relative to `base`.
///
/// Files named by more than one pattern appear once, at their first
/// position.
pub fn expand_patterns<S: AsRef<str>>(
    base: &Path,
    patterns: &[S],
    options: &ScanOptions,
) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();
    for raw in patterns {
        let pattern = PackagePattern::parse(base, raw.as_ref());
        for file in expand_pattern(&pattern, options)
            .with_context(|| format!("Invalid package pattern '{}'", raw.as_ref()))?
        {
            let file = normalize(&file);
            if seen.insert(file.clone()) {
                files.push(file);
            }
        }
    }
    Ok(files)
}
