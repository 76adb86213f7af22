use crate::report::OutputFormat;
use crate::stdlib::PythonVersion;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "find-imports",
    version,
    about = "Find imports in files",
    after_help = r#"Examples:
  find-imports app.py
  find-imports src/ --baseonly
  find-imports app.py --local --stdlibversion 2.7
  find-imports . --format json
"#
)]
pub struct Args {
    /// Files to parse. Directories are searched for Python sources.
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<PathBuf>,
    /// Include modules from the standard library.
    #[arg(long)]
    pub stdlib: bool,
    /// Include local modules.
    #[arg(long)]
    pub local: bool,
    /// Python standard library version [default: 3.5, or FIND_IMPORTS_STDLIB_VERSION].
    #[arg(long = "stdlibversion", value_name = "VERSION")]
    pub stdlib_version: Option<PythonVersion>,
    /// Debug level logging.
    #[arg(long)]
    pub debug: bool,
    /// Only find base module (reports celery.task as celery).
    #[arg(long = "baseonly")]
    pub base_only: bool,
    /// Include files ignored by .gitignore when walking directories.
    #[arg(long)]
    pub no_ignore: bool,
    /// Output format: text|json.
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_flags() {
        let args = Args::try_parse_from([
            "find-imports",
            "a.py",
            "b.py",
            "--stdlib",
            "--local",
            "--stdlibversion",
            "2.7",
            "--baseonly",
            "--debug",
        ])
        .unwrap();
        assert_eq!(args.files, vec![PathBuf::from("a.py"), PathBuf::from("b.py")]);
        assert!(args.stdlib && args.local && args.base_only && args.debug);
        assert_eq!(args.stdlib_version, Some(PythonVersion::new(2, 7)));
        assert_eq!(args.format, OutputFormat::Text);
    }

    #[test]
    fn rejects_missing_files_and_unknown_versions() {
        assert!(Args::try_parse_from(["find-imports"]).is_err());
        assert!(Args::try_parse_from(["find-imports", "a.py", "--stdlibversion", "3.1"]).is_err());
    }
}
