#![allow(unused_imports)]

pub use crate::command::{generate_availability, generate_report, validate_availability};
pub use crate::error::AvailabilityError;
pub use crate::fetch::ReservationFetcher;
pub use crate::report::{assemble, print_summary, write_report};
pub use crate::resolve::ResourceResolver;
pub(crate) use crate::timestamp::to_iso8601;
pub use crate::window::{TimeWindow, WIRE_FORMAT, WindowCalculator, compute_window};
pub use crate::{AvailabilityCommand, Cli, match_and_print};
