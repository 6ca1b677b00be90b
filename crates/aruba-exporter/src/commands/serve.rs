//! `serve`: the long-running exporter.

use tokio::net::TcpListener;
use tracing::info;

use crate::cli::{GlobalOpts, ServeArgs};
use crate::error::ExporterError;
use crate::server;

pub async fn handle(args: ServeArgs, global: &GlobalOpts) -> Result<(), ExporterError> {
    let (file, collector) = super::build_collector(&global.config)?;

    let addr = match args.listen {
        Some(addr) => addr,
        None => file.listen_addr()?,
    };
    let metrics_path = file.metrics_path();

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ExporterError::Bind { addr, source })?;
    info!(%addr, path = %metrics_path, endpoint = %file.aruba_endpoint, "exporter listening");

    server::serve(
        listener,
        server::router(collector, &metrics_path),
        server::shutdown_signal(),
    )
    .await
    .map_err(ExporterError::Server)?;

    info!("exporter stopped");
    Ok(())
}
