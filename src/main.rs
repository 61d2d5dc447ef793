// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! QubitOS Dense CLI
//!
//! Command line access to the dense data layer: inspect the registered
//! layers and configuration, and run a partial trace on a matrix stored as
//! JSON.
//!
//! # Usage
//!
//! ```bash
//! # List registered layers and aliases
//! qubit-os-dense layers
//!
//! # Keep subsystem 0 of a two-qubit density matrix, on the device layer
//! qubit-os-dense ptrace --input rho.json --dims 2,2 --sel 0 --layer cupyd
//!
//! # Show effective configuration
//! qubit-os-dense config --config /path/to/config.yaml
//! ```

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use qubit_os_dense::config::{Config, LoggingConfig};
use qubit_os_dense::data::MatrixJson;
use qubit_os_dense::dispatch::{LayerId, LayerRegistry, Matrix};
use qubit_os_dense::error::DispatchError;
use qubit_os_dense::validation::Selection;
use qubit_os_dense::{Error, Result, VERSION};

/// QubitOS dense data layer
#[derive(Parser)]
#[command(name = "qubit-os-dense")]
#[command(author = "QubitOS Contributors")]
#[command(version = VERSION)]
#[command(about = "Dense matrices, partial trace and layer dispatch")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "QUBITOS_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered layers and aliases
    Layers,

    /// Show effective configuration
    Config,

    /// Validate configuration file
    Validate,

    /// Partial trace of a square matrix read from JSON
    Ptrace {
        /// JSON file holding the matrix
        #[arg(short, long)]
        input: PathBuf,

        /// Subsystem dimensions, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        dims: Vec<usize>,

        /// Subsystems to keep, comma separated (none gives the full trace)
        #[arg(long, value_delimiter = ',')]
        sel: Vec<usize>,

        /// Layer name or alias to compute on
        #[arg(short, long)]
        layer: Option<String>,
    },

    /// Trace of a square matrix read from JSON
    Trace {
        /// JSON file holding the matrix
        #[arg(short, long)]
        input: PathBuf,

        /// Layer name or alias to compute on
        #[arg(short, long)]
        layer: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    init_logging(&config.logging);
    debug!(version = VERSION, "Configuration loaded");

    match cli.command {
        Commands::Layers => {
            let registry = LayerRegistry::with_builtin_layers(&config)?;

            println!("Registered layers:");
            for id in registry.list() {
                let default_marker = if Some(id) == registry.default_layer() {
                    " (default)"
                } else {
                    ""
                };
                println!("  {}{}", id, default_marker);
            }

            println!("Aliases:");
            for (alias, id) in registry.list_aliases() {
                println!("  {} -> {}", alias, id);
            }
        }

        Commands::Config => {
            println!("{}", serde_yaml::to_string(&config)?);
        }

        Commands::Validate => match config.validate() {
            Ok(()) => {
                println!("Configuration is valid");
            }
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        },

        Commands::Ptrace {
            input,
            dims,
            sel,
            layer,
        } => {
            let registry = LayerRegistry::with_builtin_layers(&config)?;
            let target = registry.resolve_or_default(layer.as_deref())?;
            let matrix = read_matrix(&registry, &input, target)?;

            info!(
                layer = %target,
                shape = ?matrix.shape(),
                dims = ?dims,
                sel = ?sel,
                "Computing partial trace"
            );
            let reduced = registry.partial_trace(&matrix, &dims, &Selection::from(sel))?;
            print_matrix(&registry, &reduced)?;
        }

        Commands::Trace { input, layer } => {
            let registry = LayerRegistry::with_builtin_layers(&config)?;
            let target = registry.resolve_or_default(layer.as_deref())?;
            let matrix = read_matrix(&registry, &input, target)?;

            let tr = registry.trace(&matrix)?;
            println!("{}", serde_json::to_string(&[tr.re, tr.im])?);
        }
    }

    Ok(())
}

/// Initialize logging with tracing.
///
/// Logs go to stderr so command output on stdout stays machine readable.
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    if config.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

/// Read a JSON matrix and move it into `target`.
fn read_matrix(registry: &LayerRegistry, path: &Path, target: LayerId) -> Result<Matrix> {
    let content = std::fs::read_to_string(path)?;
    let parsed: MatrixJson = serde_json::from_str(&content)?;
    let dense = parsed.into_dense()?;
    registry.convert(&Matrix::Dense(dense), target)
}

/// Bring `m` back to the host and print it as JSON.
fn print_matrix(registry: &LayerRegistry, m: &Matrix) -> Result<()> {
    let json = match registry.convert(m, LayerId::Dense)? {
        Matrix::Dense(dense) => MatrixJson::from_dense(&dense),
        other => {
            return Err(Error::Dispatch(DispatchError::WrongLayer {
                expected: LayerId::Dense,
                actual: other.layer(),
            }))
        }
    };
    println!("{}", serde_json::to_string(&json)?);
    Ok(())
}
