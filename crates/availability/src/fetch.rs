use std::collections::HashSet;

use client::InventoryApi;
use models::{Reservation, ReservationRecord, ReservationReport, ReservationReportEntry};

use crate::prelude::{AvailabilityError, TimeWindow, to_iso8601};

/// Pulls reservations for a set of resources and shapes them into report entries.
pub struct ReservationFetcher<A> {
    api: A,
    skip_missing_resources: bool,
}

impl<A: InventoryApi> ReservationFetcher<A> {
    /// With `skip_missing_resources`, every resource is checked before the
    /// query and the ones the inventory no longer has are dropped with a warning.
    pub fn new(api: A, skip_missing_resources: bool) -> Self {
        Self {
            api,
            skip_missing_resources,
        }
    }

    /// Queries all `resource_ids` in one batch, across every domain.
    ///
    /// Returned records for resources that were not asked for are ignored.
    /// Entry order follows the service's answer.
    pub fn fetch(
        &self,
        resource_ids: &[String],
        window: &TimeWindow,
    ) -> Result<ReservationReport, AvailabilityError> {
        let existing;
        let resource_ids = if self.skip_missing_resources {
            existing = self.existing_resources(resource_ids);
            existing.as_slice()
        } else {
            resource_ids
        };

        if resource_ids.is_empty() {
            tracing::info!("No resources to query, skipping reservation lookup");
            return Ok(ReservationReport::new());
        }

        let start = window.start_wire();
        let end = window.end_wire();
        tracing::info!(
            "Fetching reservations for {} resources between {start} and {end} (GMT)",
            resource_ids.len()
        );

        let resources = self
            .api
            .get_reservations_in_range(resource_ids, &start, &end, true)
            .map_err(|e| AvailabilityError::ServiceQuery {
                context: format!("fetching reservations between {start} and {end}"),
                source: e,
            })?;

        let requested: HashSet<&str> = resource_ids.iter().map(String::as_str).collect();
        let mut report = ReservationReport::new();

        for resource in resources {
            if !requested.contains(resource.full_name.as_str()) {
                tracing::debug!("Ignoring unrequested resource {}", resource.full_name);
                continue;
            }

            let segments = resource
                .reservations
                .iter()
                .map(to_segment)
                .collect::<Result<Vec<_>, _>>()?;

            tracing::debug!("{}: {} reservations", resource.name, segments.len());
            report.push(ReservationReportEntry::new(resource.name, segments));
        }

        Ok(report)
    }

    fn existing_resources(&self, resource_ids: &[String]) -> Vec<String> {
        resource_ids
            .iter()
            .filter(|id| match self.api.check_resource_exists(id) {
                Ok(true) => true,
                Ok(false) => {
                    tracing::warn!("Resource {id} does not exist in the inventory, skipping");
                    false
                }
                Err(e) => {
                    tracing::warn!("Could not check resource {id}, skipping: {e}");
                    false
                }
            })
            .cloned()
            .collect()
    }
}

fn to_segment(record: &ReservationRecord) -> Result<Reservation, AvailabilityError> {
    Ok(Reservation {
        start: to_iso8601(&record.start_time)?,
        end: to_iso8601(&record.end_time)?,
        id: record.reservation_id.clone(),
        name: record.reservation_name.clone(),
        owner: record.owner.clone(),
    })
}
