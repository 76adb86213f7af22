use anyhow::{Result, bail};
use ignore::WalkBuilder;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::warn;

const PYTHON_EXTENSIONS: &[&str] = &["py", "pyi"];

#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    pub no_ignore: bool,
}

impl ScanOptions {
    pub fn new(no_ignore: bool) -> Self {
        Self { no_ignore }
    }
}

/// Expands the command-line inputs into the list of files to read.
///
/// Files are kept as given, whatever their extension. Directories are
/// walked for Python sources. A missing input is an error.
pub fn collect_inputs(inputs: &[PathBuf], options: ScanOptions) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            files.extend(scan_dir(input, options));
        } else if input.exists() {
            files.push(input.clone());
        } else {
            bail!("input not found: {}", input.display());
        }
    }
    Ok(files)
}

pub fn scan_dir(root: &Path, options: ScanOptions) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut builder = WalkBuilder::new(root);
    if options.no_ignore {
        builder
            .ignore(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .parents(false);
    } else {
        builder
            .ignore(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .parents(true)
            .require_git(false);
    }
    let walker = builder
        .hidden(false)
        .filter_entry(|entry| !is_ignored_entry(entry))
        .build();

    for entry in walker {
        let entry = match entry {
            Ok(value) => value,
            Err(err) => {
                warn!("walk error: {err}");
                continue;
            }
        };
        if !entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
            continue;
        }
        if is_python_source(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    files
}

pub fn is_python_source(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| PYTHON_EXTENSIONS.contains(&ext))
}

const SKIPPED_DIRS: &[&str] = &[
    ".git",
    "__pycache__",
    "site-packages",
    "dist-packages",
    ".tox",
    ".nox",
];

// Installed packages are not the project's own imports.
fn is_ignored_entry(entry: &ignore::DirEntry) -> bool {
    let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
    if !is_dir {
        return false;
    }
    let skipped = entry
        .file_name()
        .to_str()
        .is_some_and(|name| SKIPPED_DIRS.contains(&name));
    skipped || entry.path().join("pyvenv.cfg").is_file()
}
