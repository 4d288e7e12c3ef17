use serde::{Deserialize, Serialize};

/// A reservation as the inventory service reports it.
///
/// `start_time` and `end_time` use the service's `MM/DD/YYYY HH:MM[:SS]` form.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ReservationRecord {
    pub reservation_id: String,
    pub reservation_name: String,
    pub owner: String,
    pub start_time: String,
    pub end_time: String,
}

/// All reservations the service holds for one resource inside the queried range.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ResourceReservations {
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub reservations: Vec<ReservationRecord>,
}

/// One chart segment. Field order is the serialized key order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub start: String,
    pub end: String,
    pub id: String,
    pub name: String,
    pub owner: String,
}

/// One chart category: a resource and its reservations, latest end first.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ReservationReportEntry {
    pub category: String,
    pub segments: Vec<Reservation>,
}

impl ReservationReportEntry {
    /// Builds an entry, ordering `segments` by `end` descending.
    ///
    /// The sort is stable, so segments sharing an end time keep the order the
    /// service returned them in. `end` is ISO ordered, so comparing the strings
    /// compares the instants.
    pub fn new(category: impl Into<String>, mut segments: Vec<Reservation>) -> Self {
        segments.sort_by(|a, b| b.end.cmp(&a.end));

        Self {
            category: category.into(),
            segments,
        }
    }
}

/// The output document, serialized as a bare JSON array.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct ReservationReport {
    pub entries: Vec<ReservationReportEntry>,
}

impl ReservationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ReservationReportEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn segment_count(&self) -> usize {
        self.entries.iter().map(|e| e.segments.len()).sum()
    }
}

impl From<Vec<ReservationReportEntry>> for ReservationReport {
    fn from(entries: Vec<ReservationReportEntry>) -> Self {
        Self { entries }
    }
}
