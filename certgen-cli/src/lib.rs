//! Operator CLI for certgen certificate topologies
//!
//! The `certgen` binary loads a topology document, resolves it and reports on
//! the result. Every command resolves the whole document first, so any
//! command doubles as a validity check.
//!
//! ```bash
//! # Validate and summarise
//! certgen --config certs.yaml check
//!
//! # Show the issuer forest
//! certgen tree
//!
//! # Show the chain a leaf would be served with
//! certgen chain web
//!
//! # Dump the resolved model for other tooling
//! certgen show --format json
//! ```

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use topology_config::{load_config, Certificate, ConfigDocument};

/// Certificate topology inspection and validation
#[derive(Parser, Debug)]
#[command(name = "certgen")]
#[command(about = "Validate and inspect certificate topology documents")]
pub struct Cli {
    /// Topology document (YAML, or JSON with a .json extension)
    #[arg(short, long, env = "CERTGEN_CONFIG", default_value = "certgen.yaml", global = true)]
    pub config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Resolve the document and print a summary
    Check,
    /// Print the issuer forest, roots first
    Tree,
    /// Print the issuer chain of a certificate, leaf to root
    Chain {
        /// Certificate name
        name: String,
    },
    /// Dump the resolved model
    Show {
        #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
        format: OutputFormat,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Yaml,
    Json,
}

/// Load the configured document and render the output of `command`.
pub fn run(cli: &Cli) -> Result<String> {
    let topology = load_config(&cli.config)
        .with_context(|| format!("failed to load topology from {}", cli.config.display()))?;
    render(&topology, &cli.command)
}

pub fn render(topology: &ConfigDocument, command: &Command) -> Result<String> {
    match command {
        Command::Check => Ok(render_summary(topology)),
        Command::Tree => Ok(render_tree(topology)),
        Command::Chain { name } => render_chain(topology, name),
        Command::Show { format } => render_model(topology, *format),
    }
}

pub fn render_summary(topology: &ConfigDocument) -> String {
    let authorities = topology.iter().filter(|c| c.is_authority()).count();
    let roots = topology.roots().count();
    let dirs = topology.directories();
    let ext = topology.extensions();

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} certificates ({} authorities, {} roots)",
        topology.len(),
        authorities,
        roots
    );
    let _ = writeln!(out, "public directory:  {}", dirs.public.display());
    let _ = writeln!(out, "private directory: {}", dirs.private.display());
    let _ = writeln!(out, "certificate extension: {}", ext.certificate);
    let _ = writeln!(out, "key extension: {}", ext.key);
    out
}

pub fn render_tree(topology: &ConfigDocument) -> String {
    let mut out = String::new();
    for root in topology.roots() {
        write_branch(topology, root, 0, &mut out);
    }
    out
}

fn write_branch(topology: &ConfigDocument, cert: &Certificate, depth: usize, out: &mut String) {
    let _ = writeln!(
        out,
        "{}{} ({})",
        "  ".repeat(depth),
        cert.name(),
        cert.cert_type()
    );
    for child in topology.children(cert.id()) {
        write_branch(topology, child, depth + 1, out);
    }
}

pub fn render_chain(topology: &ConfigDocument, name: &str) -> Result<String> {
    let chain = topology.chain(name)?;
    let mut out = String::new();
    for cert in chain {
        let subject = cert.subject();
        let _ = writeln!(
            out,
            "{} ({}) O={} OU={} CN={}",
            cert.name(),
            cert.cert_type(),
            subject.organization,
            subject.organizational_unit,
            subject.common_name
        );
    }
    Ok(out)
}

pub fn render_model(topology: &ConfigDocument, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => {
            serde_yaml::to_string(topology).context("failed to encode topology as YAML")
        }
        OutputFormat::Json => {
            serde_json::to_string_pretty(topology).context("failed to encode topology as JSON")
        }
    }
}
