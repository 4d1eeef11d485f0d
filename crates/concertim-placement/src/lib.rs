//! Concertim rack placement — occupancy, template choice, first-fit slots.
//!
//! This crate only makes decisions. It never talks to Concertim; the
//! `concertim-sync` crate builds the occupancy snapshot, asks this crate
//! where each device goes, and issues the creation calls.
//!
//! # Components
//!
//! - **`occupancy`** — Per-rack occupied rows, in rack listing order
//! - **`template`** — vCPU count → device template
//! - **`placer`** — Top-down first-fit search across racks

pub mod error;
pub mod occupancy;
pub mod placer;
pub mod template;

pub use error::{PlacementError, PlacementResult};
pub use occupancy::{OccupancyMap, Placement, RackOccupancy};
pub use placer::{find_slot, find_span, footprint};
pub use template::{DEFAULT_TEMPLATE_INDEX, select_template};
