//! Inventory snapshot — the read-only view a provisioning batch works from.

use concertim_core::{RackDetail, Template};
use concertim_placement::{OccupancyMap, RackOccupancy};
use tracing::{debug, info};

use crate::client::ConcertimClient;
use crate::error::{SyncError, SyncResult};

/// Rack occupancy and templates fetched at the start of a batch.
///
/// Each batch fetches its own snapshot; nothing here is shared between
/// batches, so two batches running at once never see each other's
/// in-memory claims.
#[derive(Debug, Clone, Default)]
pub struct InventorySnapshot {
    pub occupancy: OccupancyMap,
    pub templates: Vec<Template>,
}

impl InventorySnapshot {
    /// One rack listing, one detail fetch per rack (in listed order), then
    /// the template listing. Any failed call fails the snapshot.
    pub async fn fetch(client: &dyn ConcertimClient) -> SyncResult<Self> {
        let racks = client.list_racks().await?;

        let mut occupancy = OccupancyMap::new();
        for summary in &racks {
            let detail = client.get_rack(&summary.id).await?;
            if detail.id != summary.id {
                return Err(SyncError::Snapshot(format!(
                    "asked for rack {} but got rack {}",
                    summary.id, detail.id
                )));
            }
            let rack = RackOccupancy::from_rack(&detail);
            debug!(
                rack = %rack.rack_id,
                u_height = rack.u_height,
                occupied = rack.occupied().len(),
                "rack occupancy loaded"
            );
            occupancy.insert(rack);
        }

        let templates = client.list_templates().await?;
        info!(
            racks = occupancy.len(),
            templates = templates.len(),
            "inventory snapshot built"
        );

        Ok(Self {
            occupancy,
            templates,
        })
    }

    /// Build directly from documents already in hand.
    pub fn from_parts(racks: &[RackDetail], templates: Vec<Template>) -> Self {
        Self {
            occupancy: OccupancyMap::from_racks(racks),
            templates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientFuture;
    use crate::error::ClientError;
    use crate::memory::InMemoryConcertim;
    use concertim_core::{Device, Facing, Location, Metric, NewDevice, RackSummary};

    fn rack(id: &str, u_height: u32, spans: &[(u32, u32)]) -> RackDetail {
        RackDetail {
            id: id.to_string(),
            name: format!("rack-{id}"),
            u_height,
            devices: spans
                .iter()
                .enumerate()
                .map(|(i, &(start_u, end_u))| Device {
                    id: format!("{id}-{i}"),
                    name: format!("dev-{i}"),
                    description: String::new(),
                    template_id: None,
                    location: Location {
                        start_u,
                        end_u,
                        facing: Facing::Front,
                    },
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn fetch_reads_each_rack_once() {
        let client = InMemoryConcertim::new(
            vec![rack("b", 10, &[(1, 2)]), rack("a", 6, &[]), rack("c", 4, &[(4, 4)])],
            Vec::new(),
        );

        let snapshot = InventorySnapshot::fetch(&client).await.unwrap();

        let order: Vec<_> = snapshot.occupancy.racks().map(|r| r.rack_id.clone()).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
        assert!(!snapshot.occupancy.get("b").unwrap().is_free(2));
        assert!(!snapshot.occupancy.get("c").unwrap().is_free(4));

        let calls = client.calls();
        assert_eq!(calls.list_racks, 1);
        assert_eq!(calls.get_rack, 3);
        assert_eq!(calls.list_templates, 1);
    }

    #[test]
    fn from_parts_matches_fetch_shape() {
        let racks = vec![rack("x", 4, &[(2, 3)])];
        let snapshot = InventorySnapshot::from_parts(&racks, Vec::new());
        assert_eq!(snapshot.occupancy.len(), 1);
        assert_eq!(snapshot.occupancy.get("x").unwrap().free_rows(), 2);
    }

    /// Lists a rack whose detail call fails.
    struct BrokenDetail;

    impl ConcertimClient for BrokenDetail {
        fn list_racks(&self) -> ClientFuture<'_, Vec<RackSummary>> {
            Box::pin(async {
                Ok(vec![RackSummary {
                    id: "1".to_string(),
                    name: "r".to_string(),
                }])
            })
        }

        fn get_rack<'a>(&'a self, _rack_id: &'a str) -> ClientFuture<'a, RackDetail> {
            Box::pin(async {
                Err(ClientError::Status {
                    status: 500,
                    message: "boom".to_string(),
                })
            })
        }

        fn list_templates(&self) -> ClientFuture<'_, Vec<Template>> {
            Box::pin(async { Ok(Vec::new()) })
        }

        fn create_device<'a>(&'a self, _device: &'a NewDevice) -> ClientFuture<'a, Device> {
            Box::pin(async { Err(ClientError::Transport("unused".to_string())) })
        }

        fn put_metric<'a>(&'a self, _device_id: &'a str, _metric: &'a Metric) -> ClientFuture<'a, ()> {
            Box::pin(async { Ok(()) })
        }
    }

    #[tokio::test]
    async fn failed_rack_fetch_fails_snapshot() {
        let err = InventorySnapshot::fetch(&BrokenDetail).await.unwrap_err();
        assert!(matches!(err, SyncError::Client(ClientError::Status { status: 500, .. })));
    }
}
