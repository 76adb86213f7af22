use find_imports::extract::Granularity;
use find_imports::report::{Options, OutputFormat, collect_imports, find_external_imports};
use find_imports::resolve::SearchPathResolver;
use find_imports::stdlib::PythonVersion;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

fn names(report: &find_imports::report::Report) -> Vec<&str> {
    report.modules.iter().map(String::as_str).collect()
}

struct Project {
    root: TempDir,
    site: TempDir,
}

impl Project {
    fn new(main: &str) -> Self {
        let root = TempDir::new().unwrap();
        let site = TempDir::new().unwrap();
        write_file(&root.path().join("main.py"), main);
        write_file(&root.path().join("mylocal.py"), "def helper(): pass\n");
        write_file(&site.path().join("requests/__init__.py"), "");
        write_file(&site.path().join("requests/api.py"), "");
        Self { root, site }
    }

    fn options(&self) -> Options {
        Options::new(vec![self.main()], self.root.path().to_path_buf())
    }

    fn main(&self) -> PathBuf {
        self.root.path().join("main.py")
    }

    fn resolver(&self) -> SearchPathResolver {
        SearchPathResolver::new(vec![self.site.path().to_path_buf()], self.root.path())
    }
}

const MAIN: &str = "import os\nimport requests\nfrom .mylocal import helper\n";

#[test]
fn reports_only_external_modules_by_default() {
    let project = Project::new(MAIN);
    let report = find_external_imports(&project.options(), project.resolver()).unwrap();
    assert_eq!(names(&report), vec!["requests"]);
}

#[test]
fn local_flag_includes_local_modules() {
    let project = Project::new(MAIN);
    let mut options = project.options();
    options.include_local = true;
    let report = find_external_imports(&options, project.resolver()).unwrap();
    assert_eq!(names(&report), vec!["mylocal", "requests"]);
}

#[test]
fn stdlib_flag_includes_standard_library() {
    let project = Project::new(MAIN);
    let mut options = project.options();
    options.include_stdlib = true;
    let report = find_external_imports(&options, project.resolver()).unwrap();
    assert_eq!(names(&report), vec!["os", "requests"]);
}

#[test]
fn base_only_collapses_submodules() {
    let project = Project::new("import requests.api\nimport os.path\n");
    let mut options = project.options();
    let full = find_external_imports(&options, project.resolver()).unwrap();
    assert_eq!(names(&full), vec!["requests.api"]);

    options.granularity = Granularity::Base;
    let base = find_external_imports(&options, project.resolver()).unwrap();
    assert_eq!(names(&base), vec!["requests"]);
}

#[test]
fn stdlib_version_selects_table() {
    let project = Project::new("import urllib2\nimport typing\n");
    let mut options = project.options();
    options.stdlib_version = PythonVersion::new(2, 7);
    let py2 = find_external_imports(&options, project.resolver()).unwrap();
    assert_eq!(names(&py2), vec!["typing"]);

    options.stdlib_version = PythonVersion::new(3, 5);
    let py3 = find_external_imports(&options, project.resolver()).unwrap();
    assert_eq!(names(&py3), vec!["urllib2"]);
}

#[test]
fn unparseable_file_does_not_abort_others() {
    let project = Project::new(MAIN);
    let broken = project.root.path().join("broken.py");
    write_file(&broken, "import flask\ndef oops(:\n");
    let other = project.root.path().join("other.py");
    write_file(&other, "import celery.task\n");

    let mut options = project.options();
    options.inputs.push(broken);
    options.inputs.push(other);
    let report = find_external_imports(&options, project.resolver()).unwrap();
    assert_eq!(names(&report), vec!["celery.task", "requests"]);
}

#[test]
fn missing_input_fails_the_run() {
    let project = Project::new(MAIN);
    let mut options = project.options();
    options.inputs.push(project.root.path().join("nope.py"));
    assert!(find_external_imports(&options, project.resolver()).is_err());
}

#[test]
fn directories_are_walked_and_relative_imports_anchored() {
    let project = Project::new(MAIN);
    let pkg = project.root.path().join("pkg");
    write_file(&pkg.join("__init__.py"), "from .core import run\n");
    write_file(&pkg.join("core.py"), "from . import helpers\nfrom ..outside import x\nimport yaml\n");
    write_file(&pkg.join("helpers.py"), "");

    let files = vec![pkg.join("__init__.py"), pkg.join("core.py")];
    let imports = collect_imports(&files, Granularity::Full, project.root.path()).unwrap();
    let expected: BTreeSet<String> = ["pkg", "pkg.core", "yaml"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(imports.modules, expected);
    let relative: BTreeSet<String> = ["pkg", "pkg.core"].into_iter().map(String::from).collect();
    assert_eq!(imports.relative, relative);

    let mut options = project.options();
    options.inputs = vec![project.root.path().to_path_buf()];
    let report = find_external_imports(&options, project.resolver()).unwrap();
    assert_eq!(names(&report), vec!["requests", "yaml"]);
}

#[test]
fn relative_imports_stay_local_without_package_init() {
    let project = Project::new(MAIN);
    write_file(
        &project.root.path().join("pkg/mod.py"),
        "from . import x\nfrom .missing import y\n",
    );

    let mut options = project.options();
    options.inputs = vec![project.root.path().to_path_buf()];
    let report = find_external_imports(&options, project.resolver()).unwrap();
    assert_eq!(names(&report), vec!["requests"]);

    options.include_local = true;
    let report = find_external_imports(&options, project.resolver()).unwrap();
    assert_eq!(names(&report), vec!["mylocal", "pkg", "pkg.missing", "requests"]);
}

#[test]
fn json_output_is_sorted_array() {
    let project = Project::new("import zlib_ng\nimport attr\n");
    let report = find_external_imports(&project.options(), project.resolver()).unwrap();
    let rendered = report.render(OutputFormat::Json).unwrap();
    let parsed: Vec<String> = serde_json::from_str(&rendered).unwrap();
    assert_eq!(parsed, vec!["attr", "zlib_ng"]);
}
