//! Clap derive structures for the `aruba-exporter` binary.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use aruba_config::DEFAULT_CONFIG_FILE;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// aruba-exporter -- Prometheus exporter for Aruba Central
#[derive(Debug, Parser)]
#[command(
    name = "aruba-exporter",
    version,
    about = "Export Aruba Central monitoring data as Prometheus metrics",
    long_about = "Polls the Aruba Central API gateway for access points, mobility \
        controllers, switches, and top clients on every scrape and serves the \
        result in the Prometheus text format.\n\n\
        Run `aruba-exporter login` once to mint the initial token pair; the \
        exporter refreshes and persists tokens on its own afterwards.",
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    /// Defaults to `serve`
    #[command(subcommand)]
    pub command: Option<Command>,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration file
    #[arg(
        long,
        short = 'c',
        env = "ARUBA_EXPORTER_CONFIG",
        default_value = DEFAULT_CONFIG_FILE,
        global = true
    )]
    pub config: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve metrics over HTTP (default)
    Serve(ServeArgs),

    /// Mint the first token pair with the user credentials in the config file
    Login,

    /// Run one scrape and print the exposition to stdout
    Scrape,

    /// List every metric family the exporter can emit
    Catalog,
}

#[derive(Debug, Default, Args)]
pub struct ServeArgs {
    /// Listen address, overriding `exporterConfig.exporterPort`
    #[arg(long, short = 'l')]
    pub listen: Option<SocketAddr>,
}
