//! In-process Concertim backed by a mutex-guarded inventory.
//!
//! Enforces the same rules the real service does for device creation
//! (known rack and template, span inside the rack, no overlap), so plans
//! computed against it are ones Concertim would accept. Used for offline
//! planning from an inventory file and throughout the tests.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use concertim_core::{
    Device, DeviceId, Location, Metric, NewDevice, RackDetail, RackSummary, Template,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::{ClientFuture, ConcertimClient};
use crate::error::{ClientError, ClientResult};

/// A full inventory document: what `list_racks` + `get_rack` + `list_templates` return.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InventoryDocument {
    #[serde(default)]
    pub racks: Vec<RackDetail>,
    #[serde(default)]
    pub templates: Vec<Template>,
}

/// How many times each call was made.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub list_racks: u32,
    pub get_rack: u32,
    pub list_templates: u32,
    pub create_device: u32,
    pub put_metric: u32,
}

#[derive(Debug, Default)]
struct Inventory {
    racks: Vec<RackDetail>,
    templates: Vec<Template>,
    metrics: Vec<(DeviceId, Metric)>,
    fail_creates: HashSet<String>,
    next_device_id: u64,
    calls: CallCounts,
}

impl Inventory {
    fn device_exists(&self, device_id: &str) -> bool {
        self.racks
            .iter()
            .flat_map(|r| r.devices.iter())
            .any(|d| d.id == device_id)
    }

    fn create(&mut self, new: &NewDevice) -> ClientResult<Device> {
        if self.fail_creates.contains(&new.name) {
            return Err(ClientError::Transport(format!(
                "connection reset while creating {}",
                new.name
            )));
        }

        let template = self
            .templates
            .iter()
            .find(|t| t.id == new.template_id)
            .ok_or_else(|| ClientError::NotFound(format!("template {}", new.template_id)))?;
        let height = template
            .size_class()
            .map(|class| class.footprint())
            .ok_or_else(|| ClientError::Status {
                status: 422,
                message: format!("template {} has no height", template.id),
            })?;

        let device_id = (self.next_device_id + 1).to_string();
        let rack = self
            .racks
            .iter_mut()
            .find(|r| r.id == new.rack_id)
            .ok_or_else(|| ClientError::NotFound(format!("rack {}", new.rack_id)))?;

        let end_u = new
            .start_u
            .checked_add(height - 1)
            .filter(|&end_u| new.start_u >= 1 && end_u <= rack.u_height)
            .ok_or_else(|| ClientError::Status {
                status: 422,
                message: format!(
                    "{} rows from {} outside rack {} (height {})",
                    height, new.start_u, rack.id, rack.u_height
                ),
            })?;
        let location = Location {
            start_u: new.start_u,
            end_u,
            facing: new.facing,
        };
        let overlaps = rack.devices.iter().any(|d| {
            d.location.start_u <= location.end_u && location.start_u <= d.location.end_u
        });
        if overlaps {
            return Err(ClientError::Status {
                status: 409,
                message: format!(
                    "rows {}..={} in rack {} are occupied",
                    location.start_u, location.end_u, rack.id
                ),
            });
        }

        let device = Device {
            id: device_id,
            name: new.name.clone(),
            description: new.description.clone(),
            template_id: Some(new.template_id.clone()),
            location,
        };
        rack.devices.push(device.clone());
        self.next_device_id += 1;
        Ok(device)
    }
}

/// An in-memory [`ConcertimClient`].
#[derive(Debug, Default)]
pub struct InMemoryConcertim {
    inner: Mutex<Inventory>,
}

impl InMemoryConcertim {
    pub fn new(racks: Vec<RackDetail>, templates: Vec<Template>) -> Self {
        // New ids continue after the highest numeric id already present.
        let next_device_id = racks
            .iter()
            .flat_map(|r| r.devices.iter())
            .filter_map(|d| d.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self {
            inner: Mutex::new(Inventory {
                racks,
                templates,
                next_device_id,
                ..Inventory::default()
            }),
        }
    }

    pub fn from_document(doc: InventoryDocument) -> Self {
        Self::new(doc.racks, doc.templates)
    }

    /// Make every creation of a device with this name fail with a transport error.
    pub fn fail_creates_for(self, name: impl Into<String>) -> Self {
        self.lock().fail_creates.insert(name.into());
        self
    }

    /// Current inventory, including devices created so far.
    pub fn document(&self) -> InventoryDocument {
        let inner = self.lock();
        InventoryDocument {
            racks: inner.racks.clone(),
            templates: inner.templates.clone(),
        }
    }

    /// Metrics pushed so far, in arrival order.
    pub fn metrics(&self) -> Vec<(DeviceId, Metric)> {
        self.lock().metrics.clone()
    }

    pub fn calls(&self) -> CallCounts {
        self.lock().calls
    }

    fn lock(&self) -> MutexGuard<'_, Inventory> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ConcertimClient for InMemoryConcertim {
    fn list_racks(&self) -> ClientFuture<'_, Vec<RackSummary>> {
        Box::pin(async move {
            let mut inner = self.lock();
            inner.calls.list_racks += 1;
            let racks: Vec<RackSummary> = inner.racks.iter().map(RackDetail::summary).collect();
            Ok(racks)
        })
    }

    fn get_rack<'a>(&'a self, rack_id: &'a str) -> ClientFuture<'a, RackDetail> {
        Box::pin(async move {
            let mut inner = self.lock();
            inner.calls.get_rack += 1;
            inner
                .racks
                .iter()
                .find(|r| r.id == rack_id)
                .cloned()
                .ok_or_else(|| ClientError::NotFound(format!("rack {rack_id}")))
        })
    }

    fn list_templates(&self) -> ClientFuture<'_, Vec<Template>> {
        Box::pin(async move {
            let mut inner = self.lock();
            inner.calls.list_templates += 1;
            Ok(inner.templates.clone())
        })
    }

    fn create_device<'a>(&'a self, device: &'a NewDevice) -> ClientFuture<'a, Device> {
        Box::pin(async move {
            let mut inner = self.lock();
            inner.calls.create_device += 1;
            let result = inner.create(device);
            if let Ok(created) = &result {
                debug!(
                    device = %created.id,
                    rack = %device.rack_id,
                    start_u = created.location.start_u,
                    "in-memory device created"
                );
            }
            result
        })
    }

    fn put_metric<'a>(&'a self, device_id: &'a str, metric: &'a Metric) -> ClientFuture<'a, ()> {
        Box::pin(async move {
            let mut inner = self.lock();
            inner.calls.put_metric += 1;
            if !inner.device_exists(device_id) {
                return Err(ClientError::NotFound(format!("device {device_id}")));
            }
            inner.metrics.push((device_id.to_string(), metric.clone()));
            Ok(())
        })
    }
}
