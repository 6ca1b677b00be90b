//! `scrape`: one collection pass, exposition on stdout.

use tracing::warn;

use crate::cli::GlobalOpts;
use crate::error::ExporterError;
use crate::exposition;

pub async fn handle(global: &GlobalOpts) -> Result<(), ExporterError> {
    let (_file, collector) = super::build_collector(&global.config)?;

    let scrape = collector.scrape().await;
    for outcome in scrape.outcomes.iter().filter(|o| !o.is_success()) {
        warn!(endpoint = %outcome.endpoint, status = ?outcome.status, "endpoint failed");
    }

    print!("{}", exposition::render(&scrape)?);
    Ok(())
}
