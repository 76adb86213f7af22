use crate::util;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Outcome of looking up a module name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The module's defining file.
    Found(PathBuf),
    NotFound,
    /// Not a dotted sequence of identifiers (relative names included).
    InvalidName,
    /// A namespace package: a directory without `__init__.py`.
    NoOrigin,
    /// Probing the filesystem failed.
    Failed(String),
}

/// Maps a module name to the file that defines it.
pub trait ModuleResolver {
    fn resolve(&self, name: &str) -> Resolution;
}

impl<F> ModuleResolver for F
where
    F: Fn(&str) -> Resolution,
{
    fn resolve(&self, name: &str) -> Resolution {
        self(name)
    }
}

/// Resolves modules against an ordered list of search roots, the way the
/// interpreter walks its import path.
#[derive(Debug, Clone)]
pub struct SearchPathResolver {
    roots: Vec<PathBuf>,
}

enum Probe {
    Module(PathBuf),
    Namespace,
}

impl SearchPathResolver {
    /// `project_root` is searched after every entry of `search_path`.
    pub fn new(search_path: Vec<PathBuf>, project_root: &Path) -> Self {
        let mut roots = search_path;
        roots.push(project_root.to_path_buf());
        Self { roots }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

impl ModuleResolver for SearchPathResolver {
    fn resolve(&self, name: &str) -> Resolution {
        let Some(parts) = split_module_name(name) else {
            return Resolution::InvalidName;
        };
        let mut namespace = false;
        for root in &self.roots {
            match probe(root, &parts) {
                Ok(Some(Probe::Module(path))) => return Resolution::Found(path),
                Ok(Some(Probe::Namespace)) => namespace = true,
                Ok(None) => {}
                Err(err) => {
                    return Resolution::Failed(format!("{}: {err}", root.display()));
                }
            }
        }
        if namespace {
            Resolution::NoOrigin
        } else {
            Resolution::NotFound
        }
    }
}

fn split_module_name(name: &str) -> Option<Vec<&str>> {
    let parts: Vec<&str> = name.split('.').collect();
    if parts.iter().all(|part| is_identifier(part)) {
        Some(parts)
    } else {
        None
    }
}

fn is_identifier(part: &str) -> bool {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|ch| ch == '_' || ch.is_alphanumeric())
}

fn probe(root: &Path, parts: &[&str]) -> io::Result<Option<Probe>> {
    let Some((last, parents)) = parts.split_last() else {
        return Ok(None);
    };
    let mut dir = root.to_path_buf();
    for parent in parents {
        dir.push(parent);
    }
    if !dir.is_dir() {
        return Ok(None);
    }

    let package = dir.join(last);
    let package_init = package.join("__init__.py");
    if package_init.is_file() {
        return Ok(Some(Probe::Module(package_init)));
    }
    if let Some(native) = native_extension(&dir, last)? {
        return Ok(Some(Probe::Module(native)));
    }
    let module_file = dir.join(format!("{last}.py"));
    if module_file.is_file() {
        return Ok(Some(Probe::Module(module_file)));
    }
    if package.is_dir() {
        return Ok(Some(Probe::Namespace));
    }
    Ok(None)
}

// Matches `name.so`, `name.pyd` and tagged builds such as
// `name.cpython-311-x86_64-linux-gnu.so`.
fn native_extension(dir: &Path, name: &str) -> io::Result<Option<PathBuf>> {
    let prefix = format!("{name}.");
    let mut matches = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };
        if file_name.starts_with(&prefix)
            && (file_name.ends_with(".so") || file_name.ends_with(".pyd"))
            && entry.path().is_file()
        {
            matches.push(entry.path());
        }
    }
    matches.sort();
    Ok(matches.into_iter().next())
}

/// Decides whether a module lives inside the project.
pub struct Classifier<R> {
    resolver: R,
    project_root: PathBuf,
}

impl<R: ModuleResolver> Classifier<R> {
    pub fn new(resolver: R, project_root: &Path) -> Self {
        Self {
            resolver,
            project_root: util::canonical_or_self(project_root),
        }
    }

    /// True only when the module resolves to a file nested under the
    /// project root. Every failure to resolve counts as not local.
    pub fn is_local(&self, module: &str) -> bool {
        match self.resolver.resolve(module) {
            Resolution::Found(path) => {
                let path = util::canonical_or_self(&path);
                debug!("{module}: {}", path.display());
                util::is_nested_under(&self.project_root, &path)
            }
            Resolution::NotFound => {
                debug!("module not found: {module}");
                false
            }
            Resolution::InvalidName => {
                debug!("invalid module name: {module}");
                false
            }
            Resolution::NoOrigin => {
                debug!("no origin file for {module}");
                false
            }
            Resolution::Failed(reason) => {
                debug!("resolving {module} failed: {reason}");
                false
            }
        }
    }
}
