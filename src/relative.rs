use std::path::Path;

/// Dotted module name of a file relative to the project root.
pub fn module_name_from_rel_path(rel_path: &str) -> String {
    let path = Path::new(rel_path);
    let mut parts: Vec<String> = path
        .components()
        .filter_map(|comp| comp.as_os_str().to_str().map(|s| s.to_string()))
        .filter(|part| part != "." && part != "..")
        .collect();
    if parts.is_empty() {
        return "__init__".to_string();
    }
    let file = parts.pop().unwrap_or_default();
    let stem = Path::new(&file)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(&file)
        .to_string();
    if stem != "__init__" {
        parts.push(stem);
    }
    if parts.is_empty() {
        "__init__".to_string()
    } else {
        parts.join(".")
    }
}

/// The package a file's relative imports are anchored to.
///
/// Files that live outside the project root have no package, so their
/// single-dot imports resolve as top-level names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportAnchor {
    package: Vec<String>,
}

impl ImportAnchor {
    pub fn for_file(project_root: &Path, file: &Path) -> Self {
        let Ok(rel) = crate::util::normalize_rel_path(project_root, file) else {
            return Self::default();
        };
        let is_init = file.file_name().and_then(|s| s.to_str()) == Some("__init__.py");
        let module = module_name_from_rel_path(&rel);
        Self {
            package: base_package_parts(&module, is_init),
        }
    }

    pub fn package(&self) -> &[String] {
        &self.package
    }

    /// Rewrites a relative name (`.mod`, `..pkg.mod`, `..`) into an absolute
    /// one. Absolute names pass through. Returns `None` when the name
    /// climbs past the top-level package or names nothing.
    pub fn absolutize(&self, candidate: &str) -> Option<String> {
        let trimmed = candidate.trim();
        if trimmed.is_empty() {
            return None;
        }
        if !trimmed.starts_with('.') {
            return Some(trimmed.to_string());
        }
        let dot_count = trimmed.chars().take_while(|ch| *ch == '.').count();
        let rest = &trimmed[dot_count..];
        let up = dot_count.saturating_sub(1);
        if up > 0 && up >= self.package.len() {
            return None;
        }
        let mut parts = self.package.clone();
        parts.truncate(parts.len() - up);
        parts.extend(
            rest.split('.')
                .filter(|part| !part.is_empty())
                .map(str::to_string),
        );
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("."))
        }
    }
}

fn base_package_parts(file_module: &str, is_init: bool) -> Vec<String> {
    let parts: Vec<&str> = file_module
        .split('.')
        .filter(|part| !part.is_empty() && *part != "__init__")
        .collect();
    let keep = if is_init {
        parts.len()
    } else {
        parts.len().saturating_sub(1)
    };
    parts[..keep].iter().map(|part| part.to_string()).collect()
}
