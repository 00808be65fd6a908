mod outline;

use std::{
    fs,
    path::{Path, PathBuf},
};

use annoread_class_file::{
    ClassFile, ParseOptions, Retention, DEFAULT_MAX_NESTING_DEPTH, LATEST_MAJOR_VERSION,
};
use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{debug, error};

use crate::outline::Outline;

#[derive(Parser)]
#[command(name = "annoread")]
#[command(about = "Print the declaration annotations of compiled Java classes", long_about = None)]
#[command(version)]
struct Cli {
    /// `.class` files, class directories or JAR/ZIP archives
    #[arg(required = true)]
    paths: Vec<PathBuf>,
    /// Show CLASS retention annotations instead of RUNTIME ones
    #[arg(short, long)]
    invisible: bool,
    /// Only print this class (dotted name) from each directory or archive
    #[arg(short, long)]
    class: Option<String>,
    /// Include classes in sub-packages
    #[arg(short, long)]
    recursive: bool,
    /// Reject class files with a newer major version
    #[arg(long, default_value_t = LATEST_MAJOR_VERSION)]
    max_major_version: u16,
    /// How deep element values may nest
    #[arg(long, default_value_t = DEFAULT_MAX_NESTING_DEPTH)]
    max_nesting_depth: usize,
}

impl Cli {
    fn options(&self) -> ParseOptions {
        ParseOptions::new()
            .with_max_major_version(self.max_major_version)
            .with_max_nesting_depth(self.max_nesting_depth)
    }

    fn retention(&self) -> Retention {
        if self.invisible {
            Retention::SourceOnly
        } else {
            Retention::VisibleAtRuntime
        }
    }
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();

    let failures = dump_all(&cli);
    if failures > 0 {
        bail!("{} class file(s) could not be read", failures);
    }

    Ok(())
}

/// Prints every path in turn. A path that cannot be opened counts as one
/// failure and does not stop the others.
fn dump_all(cli: &Cli) -> usize {
    let mut failures = 0;
    for path in &cli.paths {
        failures += match dump_path(cli, path) {
            Ok(failures) => failures,
            Err(e) => {
                error!("{:#}", e);
                1
            }
        };
    }
    failures
}

/// Prints every selected class under `path`, returning how many failed. An
/// error means `path` itself could not be read or listed.
fn dump_path(cli: &Cli, path: &Path) -> Result<usize> {
    if path.extension().map_or(false, |ext| ext == "class") {
        let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        return Ok(dump_class(cli, &path.display().to_string(), &bytes) as usize);
    }

    let source = annoread_class_path::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let class_names = match &cli.class {
        Some(class_name) => vec![class_name.clone()],
        None => source
            .list(cli.recursive)
            .with_context(|| format!("Failed to list {}", path.display()))?,
    };
    debug!("{}: {} classes", path.display(), class_names.len());

    let mut failures = 0;
    for class_name in class_names {
        match source.read(&class_name) {
            Ok(bytes) => failures += dump_class(cli, &class_name, &bytes) as usize,
            Err(e) => {
                error!("{}: {}", class_name, e);
                failures += 1;
            }
        }
    }

    Ok(failures)
}

/// Returns `true` when the class file could not be parsed.
fn dump_class(cli: &Cli, label: &str, bytes: &[u8]) -> bool {
    match ClassFile::parse_with(bytes, &cli.options()) {
        Ok(class_file) => {
            println!("{}", Outline::new(&class_file, cli.retention()));
            false
        }
        Err(e) => {
            error!("{}: {}", label, e);
            true
        }
    }
}
