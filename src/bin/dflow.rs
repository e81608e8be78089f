//! dflow CLI - validate, merge and format workflow documents

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use dflow::project::{collect_file_paths, load_documents, load_model_with};
use dflow::{
    CollisionPolicy, Diagnostic, FormatOptions, Limits, MergeOptions, Merger, ModelBuilder,
    serialize_with,
};

#[derive(Parser)]
#[command(name = "dflow")]
#[command(about = "Validate, merge and format dflow workflow documents")]
#[command(version)]
struct Cli {
    /// Maximum size of one document in bytes
    #[arg(long, global = true, value_name = "BYTES")]
    max_bytes: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build each document and report every diagnostic
    Validate {
        /// Paths to .dflow files, or directories to search for them
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Merge documents in order into one canonical document
    Merge {
        /// Paths to .dflow files, earliest first
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Write the merged document here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// How to handle a vertex declared by more than one document
        #[arg(long, value_enum, default_value_t = Collision::LaterWins)]
        collision: Collision,

        #[command(flatten)]
        format: FormatArgs,
    },

    /// Print the canonical form of a document
    Fmt {
        /// Path to a .dflow file
        file: PathBuf,

        #[command(flatten)]
        format: FormatArgs,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Collision {
    LaterWins,
    DeepMerge,
    Reject,
}

impl From<Collision> for CollisionPolicy {
    fn from(value: Collision) -> Self {
        match value {
            Collision::LaterWins => CollisionPolicy::LaterWins,
            Collision::DeepMerge => CollisionPolicy::DeepMerge,
            Collision::Reject => CollisionPolicy::Reject,
        }
    }
}

#[derive(Args)]
struct FormatArgs {
    /// Spaces per indentation level
    #[arg(long, default_value_t = 4)]
    indent: usize,

    /// Indent with tabs instead of spaces
    #[arg(long)]
    tabs: bool,
}

impl From<&FormatArgs> for FormatOptions {
    fn from(args: &FormatArgs) -> Self {
        FormatOptions {
            tab_size: args.indent,
            insert_spaces: !args.tabs,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    let mut limits = Limits::default();
    if let Some(max) = cli.max_bytes {
        limits = limits.with_max_document_bytes(max);
    }

    let result = match cli.command {
        Commands::Validate { files } => validate(&files, limits),
        Commands::Merge {
            files,
            output,
            collision,
            format,
        } => {
            let options = MergeOptions::default()
                .with_collision(collision.into())
                .with_limits(limits)
                .with_format((&format).into());
            merge(&files, output.as_deref(), options)
        }
        Commands::Fmt { file, format } => fmt(&file, limits, &(&format).into()),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_warnings(warnings: &[Diagnostic]) {
    for warning in warnings {
        eprintln!("{}", warning);
    }
}

/// Replace each directory with the `.dflow` files below it.
fn expand_paths(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let found = collect_file_paths(path)?;
            if found.is_empty() {
                anyhow::bail!("no .dflow files found in {}", path.display());
            }
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

fn validate(paths: &[PathBuf], limits: Limits) -> Result<ExitCode> {
    let builder = ModelBuilder::with_limits(limits);
    let files = expand_paths(paths)?;
    let mut failed = 0usize;

    for file in &files {
        match load_model_with(file, &builder) {
            Ok(built) => {
                print_warnings(&built.warnings);
                println!("{}: Model validation success", file.display());
            }
            Err(e) => {
                eprintln!("{}", e);
                failed += 1;
            }
        }
    }

    if failed == 0 {
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!("{} of {} document(s) failed validation", failed, files.len());
        Ok(ExitCode::FAILURE)
    }
}

fn merge(files: &[PathBuf], output: Option<&Path>, options: MergeOptions) -> Result<ExitCode> {
    let texts = load_documents(files)?;
    let merged = Merger::new(options).merge(&texts).with_context(|| {
        let names: Vec<_> = files.iter().map(|f| f.display().to_string()).collect();
        format!("merging {}", names.join(", "))
    })?;
    print_warnings(&merged.warnings);

    match output {
        Some(path) => fs::write(path, &merged.text)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{}", merged.text),
    }
    Ok(ExitCode::SUCCESS)
}

fn fmt(file: &Path, limits: Limits, options: &FormatOptions) -> Result<ExitCode> {
    let built = load_model_with(file, &ModelBuilder::with_limits(limits))?;
    print_warnings(&built.warnings);
    print!("{}", serialize_with(&built.model, options));
    Ok(ExitCode::SUCCESS)
}
