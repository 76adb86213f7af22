use std::collections::BTreeSet;
use thiserror::Error;
use tracing::debug;
use tree_sitter::{Node, Parser};

/// How much of a dotted module name is reported.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Granularity {
    /// The name as written, e.g. `celery.task`.
    #[default]
    Full,
    /// Only the first component, e.g. `celery`.
    Base,
}

impl Granularity {
    pub fn from_base_only(base_only: bool) -> Self {
        if base_only { Self::Base } else { Self::Full }
    }

    /// Truncates `name` according to the granularity. Leading dots of a
    /// relative name are kept: `.pkg.sub` becomes `.pkg`.
    pub fn apply(self, name: &str) -> String {
        match self {
            Self::Full => name.to_string(),
            Self::Base => {
                let rest = name.trim_start_matches('.');
                let prefix = &name[..name.len() - rest.len()];
                let head = rest.split('.').next().unwrap_or_default();
                format!("{prefix}{head}")
            }
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("load python grammar: {0}")]
    Language(String),
    #[error("parser returned no syntax tree")]
    NoTree,
    #[error("syntax error at line {line}, column {column}")]
    Syntax { line: usize, column: usize },
}

pub struct ImportExtractor {
    parser: Parser,
}

impl ImportExtractor {
    pub fn new() -> Result<Self, ExtractError> {
        let mut parser = Parser::new();
        let language = tree_sitter_python::LANGUAGE;
        parser
            .set_language(&language.into())
            .map_err(|err| ExtractError::Language(err.to_string()))?;
        Ok(Self { parser })
    }

    /// Collects every module named by an `import` or `from ... import`
    /// statement anywhere in `source`.
    pub fn extract(
        &mut self,
        source: &str,
        granularity: Granularity,
    ) -> Result<BTreeSet<String>, ExtractError> {
        let tree = self.parser.parse(source, None).ok_or(ExtractError::NoTree)?;
        let root = tree.root_node();
        if root.has_error() {
            let (line, column) = first_error_position(root);
            return Err(ExtractError::Syntax { line, column });
        }
        let mut modules = BTreeSet::new();
        walk_node(root, source, granularity, &mut modules);
        Ok(modules)
    }

    /// Same as [`ImportExtractor::extract`] but an unparseable source
    /// yields an empty set.
    pub fn imported_modules(&mut self, source: &str, granularity: Granularity) -> BTreeSet<String> {
        match self.extract(source, granularity) {
            Ok(modules) => modules,
            Err(err) => {
                debug!("skipping imports: {err}");
                BTreeSet::new()
            }
        }
    }
}

pub fn extract_imports(
    source: &str,
    granularity: Granularity,
) -> Result<BTreeSet<String>, ExtractError> {
    ImportExtractor::new()?.extract(source, granularity)
}

pub fn imported_modules(source: &str, granularity: Granularity) -> BTreeSet<String> {
    match ImportExtractor::new() {
        Ok(mut extractor) => extractor.imported_modules(source, granularity),
        Err(err) => {
            debug!("skipping imports: {err}");
            BTreeSet::new()
        }
    }
}

fn walk_node(node: Node<'_>, source: &str, granularity: Granularity, out: &mut BTreeSet<String>) {
    match node.kind() {
        "import_statement" => {
            let mut cursor = node.walk();
            for target in node.children_by_field_name("name", &mut cursor) {
                let name_node = if target.kind() == "aliased_import" {
                    target.child_by_field_name("name")
                } else {
                    Some(target)
                };
                if let Some(name_node) = name_node {
                    insert(out, &dotted_text(name_node, source), granularity);
                }
            }
            return;
        }
        "import_from_statement" => {
            if let Some(module) = node.child_by_field_name("module_name") {
                insert(out, &dotted_text(module, source), granularity);
            }
            return;
        }
        "future_import_statement" => {
            insert(out, "__future__", granularity);
            return;
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        walk_node(child, source, granularity, out);
    }
}

fn insert(out: &mut BTreeSet<String>, name: &str, granularity: Granularity) {
    if name.is_empty() {
        return;
    }
    out.insert(granularity.apply(name));
}

// `from . mod import x` and `import a . b` are legal, so whitespace inside
// the node is dropped.
fn dotted_text(node: Node<'_>, source: &str) -> String {
    source
        .get(node.start_byte()..node.end_byte())
        .unwrap_or("")
        .chars()
        .filter(|ch| !ch.is_whitespace() && *ch != '\\')
        .collect()
}

fn first_error_position(node: Node<'_>) -> (usize, usize) {
    if node.is_error() || node.is_missing() {
        let pos = node.start_position();
        return (pos.row + 1, pos.column + 1);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() {
            return first_error_position(child);
        }
    }
    let pos = node.start_position();
    (pos.row + 1, pos.column + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(set: &BTreeSet<String>) -> Vec<&str> {
        set.iter().map(String::as_str).collect()
    }

    #[test]
    fn base_granularity_keeps_relative_prefix() {
        assert_eq!(Granularity::Base.apply("a.b.c"), "a");
        assert_eq!(Granularity::Base.apply(".pkg.sub"), ".pkg");
        assert_eq!(Granularity::Base.apply(".."), "..");
        assert_eq!(Granularity::Full.apply("a.b.c"), "a.b.c");
    }

    #[test]
    fn aliased_and_multiple_targets() {
        let source = "import os, sys as system\nimport xml.etree.ElementTree as ET\n";
        let modules = extract_imports(source, Granularity::Full).unwrap();
        assert_eq!(names(&modules), vec!["os", "sys", "xml.etree.ElementTree"]);
    }

    #[test]
    fn nested_imports_are_found() {
        let source = r#"
def load():
    import yaml
    try:
        from ujson import loads
    except ImportError:
        from json import loads
    return loads

class Worker:
    if True:
        import celery.task
"#;
        let modules = extract_imports(source, Granularity::Full).unwrap();
        assert_eq!(names(&modules), vec!["celery.task", "json", "ujson", "yaml"]);
    }

    #[test]
    fn relative_and_future_imports() {
        let source = "from __future__ import annotations\nfrom .mylocal import helper\nfrom .. import sibling\nfrom . sub import x\n";
        let modules = extract_imports(source, Granularity::Full).unwrap();
        assert_eq!(names(&modules), vec!["..", ".mylocal", ".sub", "__future__"]);
    }

    #[test]
    fn syntax_error_reports_position() {
        let err = extract_imports("import os\ndef broken(:\n", Granularity::Full).unwrap_err();
        assert!(matches!(err, ExtractError::Syntax { line, .. } if line >= 1));
        assert!(imported_modules("import os\ndef broken(:\n", Granularity::Full).is_empty());
    }
}
