//! Records exchanged with the inventory service and the report built from them.

mod reservation;
mod resource;

pub use reservation::{
    Reservation, ReservationRecord, ReservationReport, ReservationReportEntry,
    ResourceReservations,
};
pub use resource::ResourceInfo;
