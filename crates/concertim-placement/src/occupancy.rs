//! Rack occupancy — which unit rows are taken in each rack.
//!
//! An [`OccupancyMap`] is a derived, in-memory view of the remote inventory.
//! It is built once per provisioning batch and updated locally as the batch
//! claims rows, so later devices in the same batch do not collide with
//! earlier ones. It is never persisted; Concertim stays the source of truth.

use std::collections::BTreeSet;

use concertim_core::{RackDetail, RackId};
use serde::Serialize;
use tracing::warn;

/// A contiguous span of rows in a rack, inclusive on both ends.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash)]
pub struct Placement {
    pub rack_id: RackId,
    pub start_u: u32,
    pub end_u: u32,
}

impl Placement {
    /// Rows covered; 0 for an inverted span.
    pub fn height(&self) -> u32 {
        if self.end_u < self.start_u {
            return 0;
        }
        (self.end_u - self.start_u).saturating_add(1)
    }
}

/// Occupied rows of a single rack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RackOccupancy {
    pub rack_id: RackId,
    pub u_height: u32,
    occupied: BTreeSet<u32>,
}

impl RackOccupancy {
    /// An empty rack of the given height.
    pub fn new(rack_id: impl Into<RackId>, u_height: u32) -> Self {
        Self {
            rack_id: rack_id.into(),
            u_height,
            occupied: BTreeSet::new(),
        }
    }

    /// Derive occupancy from a rack document: the union of every device's
    /// `[start_u, end_u]` span, clamped to `1..=u_height`.
    pub fn from_rack(rack: &RackDetail) -> Self {
        let mut occupancy = Self::new(rack.id.clone(), rack.u_height);
        for device in &rack.devices {
            let location = &device.location;
            if location.start_u < 1
                || location.end_u > rack.u_height
                || location.start_u > location.end_u
            {
                warn!(
                    rack = %rack.id,
                    device = %device.id,
                    start_u = location.start_u,
                    end_u = location.end_u,
                    u_height = rack.u_height,
                    "device span outside rack, clamping"
                );
            }
            occupancy.claim(location.start_u, location.end_u);
        }
        occupancy
    }

    /// Builder-style helper to mark rows as taken.
    pub fn with_occupied(mut self, rows: impl IntoIterator<Item = u32>) -> Self {
        self.occupied.extend(rows);
        self
    }

    pub fn occupied(&self) -> &BTreeSet<u32> {
        &self.occupied
    }

    pub fn is_free(&self, row: u32) -> bool {
        !self.occupied.contains(&row)
    }

    /// Whether every row in `[start_u, end_u]` is free and inside the rack.
    pub fn is_span_free(&self, start_u: u32, end_u: u32) -> bool {
        start_u >= 1
            && start_u <= end_u
            && end_u <= self.u_height
            && self.occupied.range(start_u..=end_u).next().is_none()
    }

    /// Number of rows not yet taken.
    pub fn free_rows(&self) -> u32 {
        let taken = self
            .occupied
            .iter()
            .filter(|&&row| row >= 1 && row <= self.u_height)
            .count() as u32;
        self.u_height.saturating_sub(taken)
    }

    /// Mark `[start_u, end_u]` as taken. Rows outside the rack are ignored.
    pub fn claim(&mut self, start_u: u32, end_u: u32) {
        let start_u = start_u.max(1);
        let end_u = end_u.min(self.u_height);
        if start_u <= end_u {
            self.occupied.extend(start_u..=end_u);
        }
    }

    /// First start row, scanning from the top of the rack downwards, at
    /// which `footprint` contiguous rows are free.
    pub fn first_fit_from_top(&self, footprint: u32) -> Option<u32> {
        if footprint == 0 || footprint > self.u_height {
            return None;
        }
        let highest_start = self.u_height - footprint + 1;
        (1..=highest_start)
            .rev()
            .find(|&start| self.is_span_free(start, start + footprint - 1))
    }
}

/// Occupancy of every rack, in the order racks were listed by Concertim.
///
/// Iteration order is the rack scan order used by the slot placer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccupancyMap {
    racks: Vec<RackOccupancy>,
}

impl OccupancyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from rack documents, keeping their order.
    pub fn from_racks<'a>(racks: impl IntoIterator<Item = &'a RackDetail>) -> Self {
        let mut map = Self::new();
        for rack in racks {
            map.insert(RackOccupancy::from_rack(rack));
        }
        map
    }

    /// Add a rack at the end of the scan order. A rack already present is
    /// replaced in place and keeps its position.
    pub fn insert(&mut self, rack: RackOccupancy) {
        match self.racks.iter_mut().find(|r| r.rack_id == rack.rack_id) {
            Some(existing) => *existing = rack,
            None => self.racks.push(rack),
        }
    }

    pub fn get(&self, rack_id: &str) -> Option<&RackOccupancy> {
        self.racks.iter().find(|r| r.rack_id == rack_id)
    }

    /// Racks in scan order.
    pub fn racks(&self) -> impl Iterator<Item = &RackOccupancy> {
        self.racks.iter()
    }

    pub fn len(&self) -> usize {
        self.racks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.racks.is_empty()
    }

    /// Record a placement as taken. Returns `false` if the rack is unknown.
    pub fn claim(&mut self, placement: &Placement) -> bool {
        match self.racks.iter_mut().find(|r| r.rack_id == placement.rack_id) {
            Some(rack) => {
                rack.claim(placement.start_u, placement.end_u);
                true
            }
            None => false,
        }
    }
}
