mod commands;
mod reader;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "kubeschema",
    version,
    about = "Kubernetes resource schema generator: derive typed schemas and expand or flatten manifests"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive schemas for every resource in the generator configs and write them
    Generate {
        /// Config file or directory to scan (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Derive and report without writing any file
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the derived schema of one resource
    Inspect {
        /// Generator config file
        config: PathBuf,

        /// Resource name
        #[arg(long)]
        resource: String,

        /// Output format: human (default) or json
        #[arg(long, default_value = "human")]
        format: String,
    },

    /// Convert a typed value (snake_case JSON) into a manifest
    Expand {
        /// Generator config file
        config: PathBuf,

        /// Resource name
        #[arg(long)]
        resource: String,

        /// Typed value document
        value: PathBuf,
    },

    /// Convert a manifest (JSON or YAML) into a typed value
    Flatten {
        /// Generator config file
        config: PathBuf,

        /// Resource name
        #[arg(long)]
        resource: String,

        /// Manifest document
        manifest: PathBuf,

        /// Typed value the manifest was created from; its labels and annotations are kept
        #[arg(long = "config-value")]
        config_value: Option<PathBuf>,

        /// Regular expression for labels to drop
        #[arg(long)]
        ignore_label: Vec<String>,

        /// Regular expression for annotations to drop
        #[arg(long)]
        ignore_annotation: Vec<String>,
    },

    /// Lint derived schemas for naming and shape issues
    Lint {
        /// Config file or directory to scan (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format: human (default) or json
        #[arg(long, default_value = "human")]
        format: String,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Generate { path, dry_run } => commands::generate::run_generate(&path, dry_run),
        Commands::Inspect {
            config,
            resource,
            format,
        } => commands::inspect::run_inspect(&config, &resource, &format),
        Commands::Expand {
            config,
            resource,
            value,
        } => commands::expand::run_expand(&config, &resource, &value),
        Commands::Flatten {
            config,
            resource,
            manifest,
            config_value,
            ignore_label,
            ignore_annotation,
        } => commands::flatten::run_flatten(
            &config,
            &resource,
            &manifest,
            config_value.as_deref(),
            &ignore_label,
            &ignore_annotation,
        ),
        Commands::Lint { path, format } => commands::lint::run_lint(&path, &format),
    };

    match result {
        Ok(output) => {
            println!("{output}");
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
