use client::{InventoryApi, InventoryClient};
use config::{InventorySettings, ReportConfig};
use models::ReservationReport;

use crate::prelude::{
    AvailabilityError, ReservationFetcher, ResourceResolver, TimeWindow, assemble, write_report,
};

mod generate;
mod validate;

pub use generate::generate_availability;
pub use validate::validate_availability;

/// Resolves the configured filters, fetches their reservations inside `window`
/// and writes the document to the configured output file.
///
/// Nothing is written if any step fails.
pub fn generate_report<A: InventoryApi>(
    api: A,
    config: &ReportConfig,
    window: &TimeWindow,
) -> Result<ReservationReport, AvailabilityError> {
    let resources = ResourceResolver::new(&api).resolve(&config.family_model_list)?;
    tracing::info!(
        "Resolved {} resources from {} filters",
        resources.len(),
        config.family_model_list.len()
    );

    let report = ReservationFetcher::new(&api, config.skip_missing_resources)
        .fetch(&resources, window)?;

    let document = assemble(&report)?;
    write_report(&config.output_file, &document)?;

    Ok(report)
}

/// Opens the inventory session. A failure here ends the run.
pub(crate) fn connect(settings: &InventorySettings) -> Result<InventoryClient, AvailabilityError> {
    InventoryClient::connect(settings).map_err(|e| {
        let program = std::env::args()
            .next()
            .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());

        tracing::error!(
            "Critical error connecting to the inventory service: {program} attempting to start a session, server: {}: {e}",
            settings.server
        );

        AvailabilityError::Connection {
            server: settings.base_url(),
            source: e,
        }
    })
}
