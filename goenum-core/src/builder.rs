//! Builder pattern API for enum extraction.
//!
//! Provides a fluent interface for scanning Go packages:
//!
//! ```rust,ignore
//! use goenum_core::prelude::*;
//!
//! let result = Goenum::new("/path/to/module")
//!     .patterns(["./..."])
//!     .types(["Color:int".parse()?])
//!     .carry_policy(CarryPolicy::Clear)
//!     .analyze()?;
//!
//! print_plain(&result.files, false);
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::enums::{
    CarryPolicy, EnumExtractor, EnumTypeRegistry, EnumTypeSpec, ExtractConfig, FileEnums,
};
use crate::error::GoenumError;
use crate::module::group_packages;
use crate::scan::{expand_patterns, ScanOptions};
use crate::source::load::{load_files, LoadResult};

/// Pattern used when none is given: every package below the root.
pub const DEFAULT_PATTERN: &str = "./...";

/// Builder for configuring an extraction run.
#[derive(Debug, Clone)]
pub struct Goenum {
    /// Base directory patterns are resolved against
    root: PathBuf,

    /// Package patterns (`dir`, `dir/...`, `file.go`)
    patterns: Vec<String>,

    /// Extraction settings
    config: ExtractConfig,

    /// Whether to scan `_test.go` files
    include_tests: bool,

    /// Custom excluded directories
    excluded_dirs: Vec<String>,

    /// Extract from the files that loaded even when others failed
    keep_going: bool,
}

impl Goenum {
    /// Create a new builder rooted at the given path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            patterns: Vec::new(),
            config: ExtractConfig::default(),
            include_tests: false,
            excluded_dirs: Vec::new(),
            keep_going: false,
        }
    }

    /// Add package patterns. Defaults to `./...` when none are added.
    pub fn patterns(mut self, patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.patterns.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Add enum types to collect.
    pub fn types(mut self, types: impl IntoIterator<Item = EnumTypeSpec>) -> Self {
        self.config.types.extend(types);
        self
    }

    /// Replace all extraction settings at once.
    pub fn with_config(mut self, config: ExtractConfig) -> Self {
        self.config = config;
        self
    }

    pub fn carry_policy(mut self, policy: CarryPolicy) -> Self {
        self.config.carry_policy = policy;
        self
    }

    /// Register basic-typed named types found in each file.
    pub fn discover(mut self, enabled: bool) -> Self {
        self.config.discover = enabled;
        self
    }

    pub fn discover_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.discover_pattern = Some(pattern.into());
        self
    }

    /// Include `_test.go` files.
    pub fn include_tests(mut self, enabled: bool) -> Self {
        self.include_tests = enabled;
        self
    }

    /// Add directories to exclude from scanning.
    pub fn exclude_dirs(mut self, dirs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.excluded_dirs.extend(dirs.into_iter().map(Into::into));
        self
    }

    /// Continue with the loadable files when some fail.
    pub fn keep_going(mut self, enabled: bool) -> Self {
        self.keep_going = enabled;
        self
    }

    /// Run the scan and return results.
    ///
    /// Per-file failures are collected in [`ScanResult::failures`]. Unless
    /// `keep_going` is set, any failure while loading stops the run before
    /// extraction, leaving `files` empty.
    pub fn analyze(&self) -> Result<ScanResult> {
        let extractor = EnumExtractor::new(self.config.clone())
            .context("Invalid extraction settings")?;

        // 1. Expand package patterns
        let options = ScanOptions {
            include_tests: self.include_tests,
            exclude_dirs: self.excluded_dirs.clone(),
        };
        let paths = if self.patterns.is_empty() {
            expand_patterns(&self.root, &[DEFAULT_PATTERN], &options)
        } else {
            expand_patterns(&self.root, &self.patterns, &options)
        }
        .context("Failed to gather .go files")?;
        info!(files = paths.len(), root = %self.root.display(), "scanning");

        // 2. Load (lex, parse, resolve) in parallel
        let mut loaded = Vec::with_capacity(paths.len());
        let mut failures = Vec::new();
        for result in load_files(&paths) {
            match result {
                LoadResult::Loaded(file) => loaded.push(file),
                LoadResult::Failed(path, error) => failures.push(FileFailure { path, error }),
            }
        }

        if !failures.is_empty() && !self.keep_going {
            warn!(failed = failures.len(), "load failed, skipping extraction");
            return Ok(ScanResult {
                root: self.root.clone(),
                files: Vec::new(),
                failures,
            });
        }

        // 3. Extract per file; each file gets its own registry
        let extracted: Vec<_> = loaded
            .par_iter()
            .map(|file| extractor.extract(file).map_err(|e| (file.path.clone(), e)))
            .collect();

        let mut files = Vec::with_capacity(extracted.len());
        for result in extracted {
            match result {
                Ok(enums) => files.push(enums),
                Err((path, error)) => {
                    warn!(file = %path.display(), error = %error, "extraction failed");
                    failures.push(FileFailure { path, error });
                }
            }
        }
        debug!(files = files.len(), failures = failures.len(), "scan complete");

        Ok(ScanResult {
            root: self.root.clone(),
            files,
            failures,
        })
    }
}

/// A file that could not be loaded or extracted.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: GoenumError,
}

/// Result of a scan.
#[derive(Debug)]
pub struct ScanResult {
    /// Root path that was scanned
    pub root: PathBuf,

    /// Per-file results in path order
    pub files: Vec<FileEnums>,

    /// Files that failed to load or extract
    pub failures: Vec<FileFailure>,
}

impl ScanResult {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Total members across all files.
    pub fn member_count(&self) -> usize {
        self.files.iter().map(|f| f.enums.member_count()).sum()
    }

    /// Combine the files of each package into one result per directory.
    ///
    /// Members accumulate in file-name order; the result's `path` is the
    /// package directory.
    pub fn merge_packages(&self) -> Result<Vec<FileEnums>> {
        let paths: Vec<PathBuf> = self.files.iter().map(|f| f.path.clone()).collect();
        let by_path: HashMap<&Path, &FileEnums> =
            self.files.iter().map(|f| (f.path.as_path(), f)).collect();

        let packages = group_packages(&paths).context("Failed to group files into packages")?;
        let mut merged = Vec::with_capacity(packages.len());
        for package in packages {
            let mut enums = EnumTypeRegistry::new();
            let mut name = String::new();
            for file in package.files.iter().filter_map(|p| by_path.get(p.as_path())) {
                if name.is_empty() {
                    name = file.package.clone();
                }
                enums.absorb(file.enums.clone());
            }
            merged.push(FileEnums {
                path: package.dir,
                package: package.import_path.unwrap_or(name),
                enums,
            });
        }
        Ok(merged)
    }
}
