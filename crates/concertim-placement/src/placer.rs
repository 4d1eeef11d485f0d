//! Slot placer — first-fit search for a free span of rows.
//!
//! Racks are scanned in [`OccupancyMap`] order (the order Concertim listed
//! them). Within a rack, candidate start rows are tried from the top of the
//! rack downwards; the first span of `footprint` free rows wins. There is no
//! best-fit and no balancing across racks.

use concertim_core::Template;
use tracing::{debug, warn};

use crate::error::{PlacementError, PlacementResult};
use crate::occupancy::{OccupancyMap, Placement};

/// Rows a template occupies, derived from its size class.
pub fn footprint(template: &Template) -> PlacementResult<u32> {
    template
        .size_class()
        .map(|class| class.footprint())
        .ok_or_else(|| PlacementError::UnknownSizeClass(template.name.clone()))
}

/// First rack/row span that fits `footprint` rows, or `None` when every rack is full.
pub fn find_span(occupancy: &OccupancyMap, footprint: u32) -> Option<Placement> {
    occupancy.racks().find_map(|rack| {
        rack.first_fit_from_top(footprint).map(|start_u| Placement {
            rack_id: rack.rack_id.clone(),
            start_u,
            end_u: start_u + footprint - 1,
        })
    })
}

/// Find a slot for a device built from `template`.
///
/// `Ok(None)` means no rack has room; deciding whether to add a rack is
/// left to the caller.
pub fn find_slot(template: &Template, occupancy: &OccupancyMap) -> PlacementResult<Option<Placement>> {
    let footprint = footprint(template)?;

    match find_span(occupancy, footprint) {
        Some(placement) => {
            debug!(
                template = %template.id,
                rack = %placement.rack_id,
                start_u = placement.start_u,
                end_u = placement.end_u,
                "found slot"
            );
            Ok(Some(placement))
        }
        None => {
            warn!(
                template = %template.id,
                footprint,
                racks = occupancy.len(),
                "no free slot in any rack"
            );
            Ok(None)
        }
    }
}
