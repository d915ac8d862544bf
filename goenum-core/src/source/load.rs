//! File loading: read → lex → parse → resolve.
//!
//! Performance characteristics:
//! - Parallel loading via Rayon, one independent pipeline per file
//! - Results keep the caller's input order for deterministic reports

use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::ast::GoFile;
use super::lexer::tokenize;
use super::parser::parse_file;
use super::resolve::resolve_file;
use crate::error::{GoenumError, GoenumResult, IoResultExt};

/// Maximum file size to load (10 MB).
const MAX_FILE_SIZE: u64 = 10_000_000;

/// Outcome of loading a single file.
#[derive(Debug)]
pub enum LoadResult {
    /// Parsed file with its resolved scope
    Loaded(GoFile),
    /// Load failed; the error carries file and position
    Failed(PathBuf, GoenumError),
}

impl LoadResult {
    pub fn path(&self) -> &Path {
        match self {
            Self::Loaded(file) => &file.path,
            Self::Failed(path, _) => path,
        }
    }
}

/// Parse and resolve Go source text.
pub fn parse_source(path: &Path, source: &str) -> GoenumResult<GoFile> {
    let tokens = tokenize(path, source)?;
    let mut file = parse_file(path, tokens)?;
    resolve_file(&mut file);
    Ok(file)
}

/// Read, parse and resolve one Go file.
pub fn load_file(path: &Path) -> GoenumResult<GoFile> {
    let meta = fs::metadata(path).with_path(path)?;
    if meta.len() > MAX_FILE_SIZE {
        return Err(GoenumError::parse(
            path,
            format!("file exceeds {} byte limit ({} bytes)", MAX_FILE_SIZE, meta.len()),
        ));
    }
    let source = fs::read_to_string(path).with_path(path)?;
    parse_source(path, &source)
}

/// Load many files in parallel, preserving input order.
pub fn load_files(paths: &[PathBuf]) -> Vec<LoadResult> {
    paths
        .par_iter()
        .map(|path| match load_file(path) {
            Ok(file) => {
                debug!(file = %path.display(), decls = file.decls.len(), "loaded");
                LoadResult::Loaded(file)
            }
            Err(e) => {
                warn!(file = %path.display(), error = %e, "failed to load");
                LoadResult::Failed(path.clone(), e)
            }
        })
        .collect()
}
