//! Go module and package layout.
//!
//! A package is the set of files in one directory. Its import path is the
//! `module` directive of the nearest enclosing `go.mod` joined with the
//! directory's path relative to that file.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Walk up from `path` to the directory holding the nearest `go.mod`.
pub fn find_module_root(path: &Path) -> Option<PathBuf> {
    let start = if path.is_file() { path.parent()? } else { path };
    start
        .ancestors()
        .find(|dir| dir.join("go.mod").is_file())
        .map(Path::to_path_buf)
}

/// Read the `module` directive from a `go.mod` file.
pub fn read_module_path(go_mod: &Path) -> Result<Option<String>> {
    let content = fs::read_to_string(go_mod)
        .with_context(|| format!("Failed to read {}", go_mod.display()))?;
    Ok(parse_module_directive(&content))
}

fn parse_module_directive(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let line = line.split("//").next().unwrap_or("").trim();
        let rest = line.strip_prefix("module")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let path = rest.trim().trim_matches('"').trim_matches('`');
        (!path.is_empty()).then(|| path.to_string())
    })
}

/// Files of one directory, with the package's import path when known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoPackage {
    pub dir: PathBuf,
    pub import_path: Option<String>,
    pub files: Vec<PathBuf>,
}

/// Group files by directory, in directory order.
pub fn group_packages(files: &[PathBuf]) -> Result<Vec<GoPackage>> {
    let mut by_dir: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
    for file in files {
        let dir = match file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        by_dir.entry(dir).or_default().push(file.clone());
    }

    let mut modules: BTreeMap<PathBuf, Option<String>> = BTreeMap::new();
    let mut packages = Vec::with_capacity(by_dir.len());
    for (dir, files) in by_dir {
        let import_path = match find_module_root(&dir) {
            Some(root) => {
                let module = match modules.get(&root) {
                    Some(m) => m.clone(),
                    None => {
                        let m = read_module_path(&root.join("go.mod"))?;
                        modules.insert(root.clone(), m.clone());
                        m
                    }
                };
                module.map(|m| join_import_path(&m, &root, &dir))
            }
            None => None,
        };
        packages.push(GoPackage {
            dir,
            import_path,
            files,
        });
    }
    Ok(packages)
}

fn join_import_path(module: &str, root: &Path, dir: &Path) -> String {
    let rel = dir.strip_prefix(root).unwrap_or(Path::new(""));
    let segments: Vec<String> = rel
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if segments.is_empty() {
        module.to_string()
    } else {
        format!("{}/{}", module, segments.join("/"))
    }
}
