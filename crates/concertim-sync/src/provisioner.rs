//! Batch device provisioning.
//!
//! For each request, in order:
//! 1. Resolve a template from the requested vCPU count
//! 2. Find a free span against the batch's in-memory occupancy
//! 3. Claim the span locally, then ask Concertim to create the device
//!
//! The batch never aborts part-way: every request gets a [`DeviceOutcome`].
//! Only failing to build the initial snapshot fails the call as a whole.

use std::fmt;
use std::sync::Arc;

use concertim_core::{Device, DeviceRequest, Facing, NewDevice, TemplateId};
use concertim_placement::{Placement, PlacementError, find_slot, select_template};
use tracing::{info, warn};

use crate::client::ConcertimClient;
use crate::error::{ClientError, SyncResult};
use crate::snapshot::InventorySnapshot;

/// Batch-created devices always face front.
pub const BATCH_FACING: Facing = Facing::Front;

/// What happened to one device request.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceOutcome {
    /// Created in Concertim at `placement`.
    Provisioned {
        device: Device,
        template_id: TemplateId,
        placement: Placement,
    },
    /// Every rack is full for this template's footprint.
    NoFreeSlot { template_id: TemplateId },
    /// No usable template, or the template has no known size class.
    PlacementFailed(PlacementError),
    /// A slot was found and claimed but the creation call failed.
    CreateFailed {
        template_id: TemplateId,
        placement: Placement,
        error: ClientError,
    },
}

impl DeviceOutcome {
    pub fn is_provisioned(&self) -> bool {
        matches!(self, DeviceOutcome::Provisioned { .. })
    }

    /// Short machine-readable label.
    pub fn status(&self) -> &'static str {
        match self {
            DeviceOutcome::Provisioned { .. } => "provisioned",
            DeviceOutcome::NoFreeSlot { .. } => "no_free_slot",
            DeviceOutcome::PlacementFailed(_) => "placement_failed",
            DeviceOutcome::CreateFailed { .. } => "create_failed",
        }
    }
}

impl fmt::Display for DeviceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceOutcome::Provisioned {
                device, placement, ..
            } => write!(
                f,
                "device {} in rack {} rows {}-{}",
                device.id, placement.rack_id, placement.start_u, placement.end_u
            ),
            DeviceOutcome::NoFreeSlot { template_id } => {
                write!(f, "no free slot for template {template_id}")
            }
            DeviceOutcome::PlacementFailed(e) => write!(f, "{e}"),
            DeviceOutcome::CreateFailed {
                placement, error, ..
            } => write!(
                f,
                "create in rack {} rows {}-{} failed: {error}",
                placement.rack_id, placement.start_u, placement.end_u
            ),
        }
    }
}

/// A request paired with its outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceReport {
    pub request: DeviceRequest,
    pub outcome: DeviceOutcome,
}

/// Outcomes for a whole batch, in request order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub devices: Vec<DeviceReport>,
}

impl BatchReport {
    /// Devices Concertim created.
    pub fn provisioned(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter().filter_map(|r| match &r.outcome {
            DeviceOutcome::Provisioned { device, .. } => Some(device),
            _ => None,
        })
    }

    /// Requests that did not end with a created device.
    pub fn failures(&self) -> impl Iterator<Item = &DeviceReport> {
        self.devices.iter().filter(|r| !r.outcome.is_provisioned())
    }

    pub fn is_complete(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Places and creates batches of devices through a [`ConcertimClient`].
///
/// Holds no occupancy between calls; each batch works from its own snapshot.
#[derive(Clone)]
pub struct DeviceProvisioner {
    client: Arc<dyn ConcertimClient>,
}

impl DeviceProvisioner {
    pub fn new(client: Arc<dyn ConcertimClient>) -> Self {
        Self { client }
    }

    /// Snapshot the inventory, then provision every request against it.
    pub async fn provision_batch(&self, requests: &[DeviceRequest]) -> SyncResult<BatchReport> {
        let mut snapshot = InventorySnapshot::fetch(self.client.as_ref()).await?;
        Ok(self.provision_into(&mut snapshot, requests).await)
    }

    /// Provision against a snapshot the caller already holds, updating its
    /// occupancy as rows are claimed.
    pub async fn provision_into(
        &self,
        snapshot: &mut InventorySnapshot,
        requests: &[DeviceRequest],
    ) -> BatchReport {
        let mut report = BatchReport::default();

        for request in requests {
            let outcome = self.provision_one(snapshot, request).await;
            match &outcome {
                DeviceOutcome::Provisioned { .. } => info!(
                    name = %request.name,
                    outcome = %outcome,
                    "device provisioned"
                ),
                _ => warn!(
                    name = %request.name,
                    status = outcome.status(),
                    outcome = %outcome,
                    "device not provisioned"
                ),
            }
            report.devices.push(DeviceReport {
                request: request.clone(),
                outcome,
            });
        }

        let provisioned = report.provisioned().count();
        info!(
            requested = requests.len(),
            provisioned,
            failed = requests.len() - provisioned,
            "batch finished"
        );
        report
    }

    /// Place and create a single device.
    ///
    /// The span is claimed in `snapshot` before the create call and stays
    /// claimed if the call fails, since Concertim may have applied it anyway;
    /// the next snapshot settles it.
    pub async fn provision_one(
        &self,
        snapshot: &mut InventorySnapshot,
        request: &DeviceRequest,
    ) -> DeviceOutcome {
        let template = match select_template(&snapshot.templates, request.vcpus) {
            Ok(t) => t.clone(),
            Err(e) => return DeviceOutcome::PlacementFailed(e),
        };

        let placement = match find_slot(&template, &snapshot.occupancy) {
            Ok(Some(placement)) => placement,
            Ok(None) => {
                return DeviceOutcome::NoFreeSlot {
                    template_id: template.id,
                };
            }
            Err(e) => return DeviceOutcome::PlacementFailed(e),
        };

        snapshot.occupancy.claim(&placement);

        let new_device = NewDevice {
            template_id: template.id.clone(),
            name: request.name.clone(),
            description: request.description.clone(),
            facing: BATCH_FACING,
            rack_id: placement.rack_id.clone(),
            start_u: placement.start_u,
        };

        match self.client.create_device(&new_device).await {
            Ok(device) => DeviceOutcome::Provisioned {
                device,
                template_id: template.id,
                placement,
            },
            Err(error) => DeviceOutcome::CreateFailed {
                template_id: template.id,
                placement,
                error,
            },
        }
    }
}
