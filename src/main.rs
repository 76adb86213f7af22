use anyhow::{Context, Result};
use clap::Parser;
use find_imports::config::Config;
use find_imports::extract::Granularity;
use find_imports::report::{self, Options};
use find_imports::resolve::SearchPathResolver;
use find_imports::{cli, scan};
use std::io::Write;
use tracing::Level;

fn init_logging(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = cli::Args::parse();
    init_logging(args.debug);

    let config = Config::get();
    let project_root = std::env::current_dir().context("resolve current directory")?;
    let mut options = Options::new(args.files, project_root.clone());
    options.include_stdlib = args.stdlib;
    options.include_local = args.local;
    options.stdlib_version = args.stdlib_version.unwrap_or(config.stdlib_version);
    options.granularity = Granularity::from_base_only(args.base_only);
    options.scan = scan::ScanOptions::new(args.no_ignore);

    let resolver = SearchPathResolver::new(config.search_path.clone(), &project_root);
    let report = report::find_external_imports(&options, resolver)?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(report.render(args.format)?.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
