use std::cell::RefCell;
use std::collections::HashSet;

use chrono::{DateTime, NaiveDateTime};
use client::{ClientError, InventoryApi};
use models::{ReservationRecord, ResourceInfo, ResourceReservations};
use proptest::prelude::*;

// This magic library called `ctor` somehow runs before any other step in the test binary
// we use it to install color_eyre for prettier panic messages (we can't do this in each test
// because they run in parallel)
#[ctor::ctor]
fn init() {
    let _ = color_eyre::install();
}

/// A call the pipeline made against [`FakeInventory`], in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FindResources {
        family: String,
        model: String,
    },
    CheckResourceExists(String),
    GetReservations {
        resource_names: Vec<String>,
        start: String,
        end: String,
        show_all_domains: bool,
    },
}

struct FakeResource {
    family: String,
    model: String,
    info: ResourceInfo,
    reservations: Vec<ReservationRecord>,
}

/// In-memory inventory service.
///
/// Resources are matched the way the real service matches them: an empty
/// family or model in a search acts as a wildcard. Reservation queries answer
/// in registration order with one record per requested resource.
#[derive(Default)]
pub struct FakeInventory {
    resources: Vec<FakeResource>,
    unrequested: Vec<ResourceReservations>,
    missing: HashSet<String>,
    failing_checks: HashSet<String>,
    fail_find: bool,
    fail_reservations: bool,
    calls: RefCell<Vec<Call>>,
}

impl FakeInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resource(mut self, family: &str, model: &str, name: &str) -> Self {
        self.resources.push(FakeResource {
            family: family.to_owned(),
            model: model.to_owned(),
            info: ResourceInfo::root(name),
            reservations: vec![],
        });
        self
    }

    /// Attaches a reservation to an already registered resource.
    ///
    /// # Panics
    /// If `name` was never registered with [`FakeInventory::with_resource`].
    pub fn with_reservation(mut self, name: &str, record: ReservationRecord) -> Self {
        let resource = self
            .resources
            .iter_mut()
            .find(|r| r.info.name == name)
            .unwrap_or_else(|| panic!("no fake resource named {name}"));
        resource.reservations.push(record);
        self
    }

    /// A record the service sends back even though nobody asked for it.
    pub fn with_unrequested_record(mut self, record: ResourceReservations) -> Self {
        self.unrequested.push(record);
        self
    }

    /// Search still finds `name`, but existence checks say it is gone.
    pub fn with_missing(mut self, name: &str) -> Self {
        self.missing.insert(name.to_owned());
        self
    }

    pub fn with_failing_check(mut self, name: &str) -> Self {
        self.failing_checks.insert(name.to_owned());
        self
    }

    pub fn failing_find(mut self) -> Self {
        self.fail_find = true;
        self
    }

    pub fn failing_reservations(mut self) -> Self {
        self.fail_reservations = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

fn service_error() -> ClientError {
    ClientError::HttpError {
        status: 500,
        body: "fake inventory failure".to_owned(),
    }
}

impl InventoryApi for FakeInventory {
    fn find_resources(&self, family: &str, model: &str) -> Result<Vec<ResourceInfo>, ClientError> {
        self.record(Call::FindResources {
            family: family.to_owned(),
            model: model.to_owned(),
        });

        if self.fail_find {
            return Err(service_error());
        }

        Ok(self
            .resources
            .iter()
            .filter(|r| family.is_empty() || r.family == family)
            .filter(|r| model.is_empty() || r.model == model)
            .map(|r| r.info.clone())
            .collect())
    }

    fn check_resource_exists(&self, name: &str) -> Result<bool, ClientError> {
        self.record(Call::CheckResourceExists(name.to_owned()));

        if self.failing_checks.contains(name) {
            return Err(service_error());
        }

        Ok(!self.missing.contains(name) && self.resources.iter().any(|r| r.info.name == name))
    }

    fn get_reservations_in_range(
        &self,
        resource_names: &[String],
        start: &str,
        end: &str,
        show_all_domains: bool,
    ) -> Result<Vec<ResourceReservations>, ClientError> {
        self.record(Call::GetReservations {
            resource_names: resource_names.to_vec(),
            start: start.to_owned(),
            end: end.to_owned(),
            show_all_domains,
        });

        if self.fail_reservations {
            return Err(service_error());
        }

        let requested = self
            .resources
            .iter()
            .filter(|r| resource_names.contains(&r.info.full_name))
            .map(|r| ResourceReservations {
                name: r.info.name.clone(),
                full_name: r.info.full_name.clone(),
                reservations: r.reservations.clone(),
            });

        Ok(requested.chain(self.unrequested.iter().cloned()).collect())
    }
}

/// A reservation record with service-format timestamps.
pub fn reservation_record(id: &str, owner: &str, start: &str, end: &str) -> ReservationRecord {
    ReservationRecord {
        reservation_id: id.to_owned(),
        reservation_name: format!("{id} reservation"),
        owner: owner.to_owned(),
        start_time: start.to_owned(),
        end_time: end.to_owned(),
    }
}

/// Generates a [`NaiveDateTime`] within a reasonable range.
pub fn naive_datetime_strategy() -> impl Strategy<Value = NaiveDateTime> {
    // from 1970-01-01 to 2100-01-01, minute granular like the service
    (0i64..4_102_444_800i64 / 60).prop_map(|minutes| {
        DateTime::from_timestamp(minutes * 60, 0)
            .map(|dt| dt.naive_utc())
            .unwrap_or_default()
    })
}

/// Generates service-format timestamps, `MM/DD/YYYY HH:MM` with optional `:SS`,
/// alongside the instant they encode.
pub fn service_timestamp_strategy() -> impl Strategy<Value = (String, NaiveDateTime, bool)> {
    (naive_datetime_strategy(), any::<bool>(), 0u32..60).prop_map(
        |(instant, with_seconds, seconds)| {
            if with_seconds {
                let instant = instant + chrono::TimeDelta::seconds(i64::from(seconds));
                (
                    instant.format("%m/%d/%Y %H:%M:%S").to_string(),
                    instant,
                    true,
                )
            } else {
                (instant.format("%m/%d/%Y %H:%M").to_string(), instant, false)
            }
        },
    )
}

/// Window offsets in seconds, up to ten years either side of now.
pub fn offset_strategy() -> impl Strategy<Value = i64> {
    const TEN_YEARS: i64 = 10 * 366 * 24 * 60 * 60;
    -TEN_YEARS..=TEN_YEARS
}
