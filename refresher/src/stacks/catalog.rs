//! Stack catalog: listing and filtering

use tracing::{debug, info, warn};

use crate::errors::RefreshError;
use crate::http::stacks::StackApi;
use crate::models::stack::StackSummary;

/// Which stacks a run targets. Unset fields do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackFilter {
    /// Stack ID or name
    pub identifier: Option<String>,

    /// Owning endpoint
    pub endpoint_id: Option<i64>,

    /// Keep only running stacks
    pub only_active: bool,
}

impl StackFilter {
    /// Apply the filter to a listing, preserving listing order
    ///
    /// Endpoint and status are plain predicates. The identifier then selects
    /// a single stack from what remains: by ID when it parses as an integer,
    /// by exact name otherwise. A numeric identifier never matches a name.
    pub fn apply(&self, stacks: Vec<StackSummary>) -> Vec<StackSummary> {
        let mut candidates = stacks
            .into_iter()
            .filter(|s| self.endpoint_id.is_none_or(|id| s.endpoint_id == id))
            .filter(|s| !self.only_active || s.is_active());

        let identifier = match self.identifier.as_deref().map(str::trim) {
            Some(identifier) if !identifier.is_empty() => identifier,
            _ => return candidates.collect(),
        };

        let selected = match identifier.parse::<i64>() {
            Ok(id) => candidates.find(|s| s.id == id),
            Err(_) => candidates.find(|s| s.name == identifier),
        };
        selected.into_iter().collect()
    }
}

/// Resolves the set of stacks to refresh
pub struct StackCatalog<'a> {
    api: &'a dyn StackApi,
}

impl<'a> StackCatalog<'a> {
    pub fn new(api: &'a dyn StackApi) -> Self {
        Self { api }
    }

    /// List stacks matching the filter
    ///
    /// An empty result is not an error.
    pub async fn list(&self, filter: &StackFilter) -> Result<Vec<StackSummary>, RefreshError> {
        match filter.endpoint_id {
            Some(endpoint_id) => info!("Listing stacks on endpoint {}...", endpoint_id),
            None => info!("Listing stacks on all endpoints..."),
        }

        let listing = self.api.list_stacks(filter.endpoint_id).await?;
        debug!("Managing API returned {} stacks", listing.len());

        let stacks = filter.apply(listing.into_iter().map(StackSummary::from).collect());

        if stacks.is_empty() {
            match &filter.identifier {
                Some(identifier) => {
                    warn!("No stack named or with ID '{}' matches the filter", identifier)
                }
                None => info!("No stacks match the filter"),
            }
        } else {
            info!("Found {} stacks to refresh", stacks.len());
        }

        Ok(stacks)
    }
}
