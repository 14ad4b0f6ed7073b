//! Coordinate resolution for tank observations
//!
//! Decommissioned tanks frequently lack their recorded latitude and
//! longitude; the resolver backfills those from the ZIP centroid registry.
//! Observations that already carry valid coordinates pass through
//! unchanged. Records that cannot be resolved are dropped with a reason,
//! never silently zeroed.

use crate::app::models::{DropReason, TankObservation};
use crate::app::services::zip_registry::ZipRegistry;

#[cfg(test)]
mod tests;

/// Fills missing coordinates from the ZIP centroid registry
///
/// Holds a shared reference to the registry, which is loaded once at
/// pipeline start and read-only for the rest of the run.
pub struct CoordinateResolver<'a> {
    registry: &'a ZipRegistry,
}

impl<'a> CoordinateResolver<'a> {
    pub fn new(registry: &'a ZipRegistry) -> Self {
        Self { registry }
    }

    /// Resolve an observation's coordinates in place
    ///
    /// Pass-through when both coordinates are already present, finite, and
    /// in range. Otherwise the record's ZIP is looked up; a miss drops the
    /// record with [`DropReason::UnresolvableLocation`].
    pub fn resolve(
        &self,
        observation: &mut TankObservation,
    ) -> std::result::Result<(), DropReason> {
        if observation.has_valid_coordinates() {
            return Ok(());
        }

        match self.registry.lookup(&observation.zip) {
            Some((latitude, longitude)) => {
                observation.set_coordinates(latitude, longitude);
                Ok(())
            }
            None => Err(DropReason::UnresolvableLocation {
                zip: observation.zip.clone(),
            }),
        }
    }
}
