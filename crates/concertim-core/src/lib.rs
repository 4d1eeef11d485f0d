//! concertim-core — shared types for the Concertim/OpenStack glue.
//!
//! Holds the REST document types exchanged with Concertim (racks,
//! devices, templates, metrics), the device requests coming from the
//! OpenStack side, and the `concertim.toml` configuration.

pub mod config;
pub mod types;

pub use config::GlueConfig;
pub use types::*;
