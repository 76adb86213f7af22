use crate::extract::{Granularity, ImportExtractor};
use crate::relative::ImportAnchor;
use crate::resolve::{Classifier, ModuleResolver};
use crate::scan::{self, ScanOptions};
use crate::stdlib::{DEFAULT_VERSION, PythonVersion, StdlibModules};
use crate::util;
use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(ValueEnum, Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Options {
    pub inputs: Vec<PathBuf>,
    pub include_stdlib: bool,
    pub include_local: bool,
    pub stdlib_version: PythonVersion,
    pub granularity: Granularity,
    pub scan: ScanOptions,
    /// Directory that decides what counts as a local module.
    pub project_root: PathBuf,
}

impl Options {
    pub fn new(inputs: Vec<PathBuf>, project_root: PathBuf) -> Self {
        Self {
            inputs,
            include_stdlib: false,
            include_local: false,
            stdlib_version: DEFAULT_VERSION,
            granularity: Granularity::Full,
            scan: ScanOptions::default(),
            project_root,
        }
    }
}

/// Modules that survived filtering, in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Report {
    pub modules: BTreeSet<String>,
}

impl Report {
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(self
                .modules
                .iter()
                .map(|module| format!("{module}\n"))
                .collect()),
            OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(self)?)),
        }
    }
}

/// Modules imported by a set of files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectedImports {
    pub modules: BTreeSet<String>,
    /// Names reached through a relative import. These always point inside
    /// the project, whatever the resolver says about them.
    pub relative: BTreeSet<String>,
}

/// Every module imported by the files, after relative names are anchored.
///
/// All inputs are read before anything is returned, so an unreadable file
/// fails the whole run.
pub fn collect_imports(
    files: &[PathBuf],
    granularity: Granularity,
    project_root: &Path,
) -> Result<CollectedImports> {
    let mut extractor = ImportExtractor::new().context("initialize python parser")?;
    let project_root = util::canonical_or_self(project_root);
    let mut collected = CollectedImports::default();
    for file in files {
        debug!("{}", file.display());
        let source = util::read_to_string(file)?;
        let anchor = ImportAnchor::for_file(&project_root, &util::canonical_or_self(file));
        for name in extractor.imported_modules(&source, granularity) {
            match anchor.absolutize(&name) {
                Some(absolute) => {
                    let absolute = granularity.apply(&absolute);
                    if name.starts_with('.') {
                        collected.relative.insert(absolute.clone());
                    }
                    collected.modules.insert(absolute);
                }
                None => debug!("dropping relative import {name} in {}", file.display()),
            }
        }
    }
    Ok(collected)
}

pub fn find_external_imports<R: ModuleResolver>(options: &Options, resolver: R) -> Result<Report> {
    let files = scan::collect_inputs(&options.inputs, options.scan)?;
    let collected = collect_imports(&files, options.granularity, &options.project_root)?;

    let stdlib = if options.include_stdlib {
        StdlibModules::empty()
    } else {
        StdlibModules::for_version(options.stdlib_version)
    };

    let classifier = Classifier::new(resolver, &options.project_root);
    let mut report = Report::default();
    for module in collected.modules {
        if stdlib.contains(&module) {
            continue;
        }
        if options.include_local {
            report.modules.insert(module);
            continue;
        }
        let local = if collected.relative.contains(&module) {
            debug!("{module}: relative import");
            true
        } else {
            debug!("looking up {module}");
            classifier.is_local(&module)
        };
        if !local {
            report.modules.insert(module);
        }
    }
    Ok(report)
}
