#![doc = include_str!("../README.md")]

mod error;
mod session;

pub use error::ClientError;
pub use session::InventoryClient;

use models::{ResourceInfo, ResourceReservations};

/// The inventory service capabilities the report pipeline consumes.
pub trait InventoryApi {
    /// Resources matching `family` and `model`. An empty string matches any value.
    fn find_resources(&self, family: &str, model: &str) -> Result<Vec<ResourceInfo>, ClientError>;

    fn check_resource_exists(&self, name: &str) -> Result<bool, ClientError>;

    /// Reservations overlapping `[start, end]` for each named resource.
    ///
    /// `start` and `end` are in the service's `DD/MM/YYYY HH:MM` GMT form.
    fn get_reservations_in_range(
        &self,
        resource_names: &[String],
        start: &str,
        end: &str,
        show_all_domains: bool,
    ) -> Result<Vec<ResourceReservations>, ClientError>;
}

impl<T: InventoryApi + ?Sized> InventoryApi for &T {
    fn find_resources(&self, family: &str, model: &str) -> Result<Vec<ResourceInfo>, ClientError> {
        (**self).find_resources(family, model)
    }

    fn check_resource_exists(&self, name: &str) -> Result<bool, ClientError> {
        (**self).check_resource_exists(name)
    }

    fn get_reservations_in_range(
        &self,
        resource_names: &[String],
        start: &str,
        end: &str,
        show_all_domains: bool,
    ) -> Result<Vec<ResourceReservations>, ClientError> {
        (**self).get_reservations_in_range(resource_names, start, end, show_all_domains)
    }
}
