//! concertim-sync — keeps Concertim's racks in step with OpenStack.
//!
//! Talks to Concertim through the [`ConcertimClient`] trait and uses
//! `concertim-placement` to decide where new devices go.
//!
//! # Architecture
//!
//! ```text
//! DeviceProvisioner
//!   ├── InventorySnapshot (list racks → get each rack → list templates)
//!   ├── select_template / find_slot (concertim-placement)
//!   └── ConcertimClient::create_device
//! ```

pub mod client;
pub mod error;
pub mod memory;
pub mod metrics;
pub mod provisioner;
pub mod snapshot;

pub use client::{ClientFuture, ConcertimClient};
pub use error::{ClientError, ClientResult, SyncError, SyncResult};
pub use memory::{CallCounts, InMemoryConcertim, InventoryDocument};
pub use metrics::{MetricOutcome, report_metrics};
pub use provisioner::{BATCH_FACING, BatchReport, DeviceOutcome, DeviceProvisioner, DeviceReport};
pub use snapshot::InventorySnapshot;
