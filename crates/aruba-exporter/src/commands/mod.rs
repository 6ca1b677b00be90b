//! Command dispatch: bridges CLI args to the collector and config file.

pub mod catalog;
pub mod login;
pub mod scrape;
pub mod serve;

use std::path::Path;
use std::sync::Arc;

use aruba_config::{ExporterFile, FileCredentialSink, load_config};
use aruba_core::Collector;

use crate::cli::{Command, GlobalOpts, ServeArgs};
use crate::error::ExporterError;

/// Dispatch a command; no subcommand means `serve`.
pub async fn dispatch(cmd: Option<Command>, global: &GlobalOpts) -> Result<(), ExporterError> {
    match cmd {
        None => serve::handle(ServeArgs::default(), global).await,
        Some(Command::Serve(args)) => serve::handle(args, global).await,
        Some(Command::Login) => login::handle(global).await,
        Some(Command::Scrape) => scrape::handle(global).await,
        Some(Command::Catalog) => {
            catalog::handle();
            Ok(())
        }
    }
}

/// Load the file and build a collector that persists refreshes back into it.
pub(crate) fn build_collector(path: &Path) -> Result<(ExporterFile, Collector), ExporterError> {
    let file = load_config(path)?;
    let config = file.to_collector_config()?;
    let credential = file.credential()?;
    let sink = Arc::new(FileCredentialSink::new(path));

    let collector = Collector::new(&config, credential, Some(sink))?;
    Ok((file, collector))
}
