//! `concertim-glue plan` — dry-run a provisioning batch against a file.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::ValueEnum;
use concertim_core::DeviceRequest;
use concertim_sync::{BatchReport, DeviceOutcome, DeviceProvisioner, InMemoryConcertim, InventoryDocument};
use serde::de::DeserializeOwned;
use tracing::info;

/// How `plan` prints its report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub async fn plan(inventory: &Path, requests: &Path, format: OutputFormat) -> Result<()> {
    let report = run(inventory, requests).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report_json(&report))?),
        OutputFormat::Text => print!("{}", render_text(&report)),
    }

    Ok(())
}

/// Load both files and provision the requests into an in-memory Concertim.
pub async fn run(inventory: &Path, requests: &Path) -> Result<BatchReport> {
    let doc: InventoryDocument = read_json(inventory)?;
    let requests: Vec<DeviceRequest> = read_json(requests)?;
    info!(
        racks = doc.racks.len(),
        templates = doc.templates.len(),
        requests = requests.len(),
        "planning batch"
    );

    let client = Arc::new(InMemoryConcertim::from_document(doc));
    let provisioner = DeviceProvisioner::new(client);
    Ok(provisioner.provision_batch(&requests).await?)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

pub fn render_text(report: &BatchReport) -> String {
    let mut out = String::new();
    for entry in &report.devices {
        let mark = if entry.outcome.is_provisioned() { "✓" } else { "✗" };
        out.push_str(&format!("{mark} {}: {}\n", entry.request.name, entry.outcome));
    }
    let placed = report.provisioned().count();
    out.push_str(&format!("{placed}/{} devices placed\n", report.devices.len()));
    out
}

pub fn report_json(report: &BatchReport) -> serde_json::Value {
    let devices: Vec<_> = report
        .devices
        .iter()
        .map(|entry| {
            let mut value = serde_json::json!({
                "name": entry.request.name,
                "status": entry.outcome.status(),
            });
            match &entry.outcome {
                DeviceOutcome::Provisioned {
                    device,
                    template_id,
                    placement,
                } => {
                    value["device_id"] = serde_json::json!(device.id);
                    value["template_id"] = serde_json::json!(template_id);
                    value["placement"] = serde_json::json!(placement);
                }
                DeviceOutcome::NoFreeSlot { template_id } => {
                    value["template_id"] = serde_json::json!(template_id);
                }
                DeviceOutcome::PlacementFailed(e) => {
                    value["error"] = serde_json::json!(e.to_string());
                }
                DeviceOutcome::CreateFailed {
                    template_id,
                    placement,
                    error,
                } => {
                    value["template_id"] = serde_json::json!(template_id);
                    value["placement"] = serde_json::json!(placement);
                    value["error"] = serde_json::json!(error.to_string());
                }
            }
            value
        })
        .collect();

    serde_json::json!({
        "placed": report.provisioned().count(),
        "devices": devices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, value: serde_json::Value) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, serde_json::to_vec(&value).unwrap()).unwrap();
        path
    }

    fn fixture(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
        let inventory = write(
            dir,
            "inventory.json",
            serde_json::json!({
                "racks": [{"id": "1", "name": "rack-1", "u_height": 2}],
                "templates": [
                    {"id": "m", "name": "Medium", "description": "2 VCPU"},
                    {"id": "s", "name": "Small", "description": "1 VCPU"}
                ]
            }),
        );
        let requests = write(
            dir,
            "requests.json",
            serde_json::json!([
                {"name": "a", "vcpus": 1},
                {"name": "b", "vcpus": 1},
                {"name": "c", "vcpus": 1}
            ]),
        );
        (inventory, requests)
    }

    #[tokio::test]
    async fn plans_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let (inventory, requests) = fixture(dir.path());

        let report = run(&inventory, &requests).await.unwrap();
        assert_eq!(report.provisioned().count(), 2);

        let text = render_text(&report);
        assert!(text.contains("✓ a: device 1 in rack 1 rows 2-2"));
        assert!(text.contains("✗ c: no free slot for template s"));
        assert!(text.ends_with("2/3 devices placed\n"));

        let json = report_json(&report);
        assert_eq!(json["placed"], 2);
        assert_eq!(json["devices"][1]["placement"]["start_u"], 1);
        assert_eq!(json["devices"][2]["status"], "no_free_slot");
    }

    #[tokio::test]
    async fn bad_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let (inventory, _) = fixture(dir.path());
        let missing = dir.path().join("nope.json");

        let err = run(&inventory, &missing).await.unwrap_err();
        assert!(format!("{err:#}").contains("nope.json"));
    }
}
