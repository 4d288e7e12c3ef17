use client::InventoryApi;
use config::ResourceFilter;
use itertools::Itertools;

use crate::prelude::AvailabilityError;

/// Expands family/model filters into resource names.
pub struct ResourceResolver<A> {
    api: A,
}

impl<A: InventoryApi> ResourceResolver<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// One search per filter, in filter order. A resource found by more than
    /// one filter is listed once, where it was first seen.
    pub fn resolve(&self, filters: &[ResourceFilter]) -> Result<Vec<String>, AvailabilityError> {
        let mut names = Vec::new();

        for filter in filters {
            let found = self
                .api
                .find_resources(&filter.family, &filter.model)
                .map_err(|e| AvailabilityError::ServiceQuery {
                    context: format!("searching for resources matching `{filter}`"),
                    source: e,
                })?;

            tracing::debug!("filter `{}` matched {} resources", filter, found.len());
            names.extend(found.into_iter().map(|resource| resource.name));
        }

        Ok(names.into_iter().unique().collect())
    }
}
