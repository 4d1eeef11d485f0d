//! Domain types shared across the Concertim glue crates.
//!
//! These mirror the JSON documents exchanged with the Concertim REST API
//! (racks, devices, templates, metrics) plus the inputs the glue accepts
//! from the OpenStack side (device requests). Everything is serde
//! serializable so fakes and the CLI can load inventories from files.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier assigned to a rack by Concertim.
pub type RackId = String;

/// Identifier assigned to a device by Concertim.
pub type DeviceId = String;

/// Identifier of a device template.
pub type TemplateId = String;

// ── Racks ──────────────────────────────────────────────────────────

/// A rack as it appears in the rack listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RackSummary {
    pub id: RackId,
    pub name: String,
}

/// A rack with its height and the devices currently mounted in it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RackDetail {
    pub id: RackId,
    pub name: String,
    /// Total number of unit rows, numbered `1..=u_height`.
    pub u_height: u32,
    #[serde(default)]
    pub devices: Vec<Device>,
}

impl RackDetail {
    pub fn summary(&self) -> RackSummary {
        RackSummary {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

// ── Devices ────────────────────────────────────────────────────────

/// Which side of the rack a device is mounted on.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Facing {
    #[default]
    #[serde(rename = "f")]
    Front,
    #[serde(rename = "b")]
    Back,
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Facing::Front => write!(f, "f"),
            Facing::Back => write!(f, "b"),
        }
    }
}

/// Where a device sits in a rack. Rows are inclusive on both ends.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    pub start_u: u32,
    pub end_u: u32,
    #[serde(default)]
    pub facing: Facing,
}

impl Location {
    /// Every row covered by this location.
    pub fn rows(&self) -> std::ops::RangeInclusive<u32> {
        self.start_u..=self.end_u
    }
}

/// A device mounted in a rack.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub template_id: Option<TemplateId>,
    pub location: Location,
}

/// Body of a device creation call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewDevice {
    pub template_id: TemplateId,
    pub name: String,
    pub description: String,
    pub facing: Facing,
    pub rack_id: RackId,
    pub start_u: u32,
}

/// A pending device: something OpenStack created that Concertim should show.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Requested virtual CPU count, matched against template descriptions.
    pub vcpus: u32,
}

impl DeviceRequest {
    pub fn new(name: impl Into<String>, description: impl Into<String>, vcpus: u32) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            vcpus,
        }
    }
}

// ── Templates ──────────────────────────────────────────────────────

/// Size class of a device template. Each class occupies a fixed number of rows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SizeClass {
    Small,
    Medium,
    Large,
    Xlarge,
}

impl SizeClass {
    /// Parse a template name into a size class. Case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "small" => Some(SizeClass::Small),
            "medium" => Some(SizeClass::Medium),
            "large" => Some(SizeClass::Large),
            "xlarge" => Some(SizeClass::Xlarge),
            _ => None,
        }
    }

    /// Number of contiguous rows a device of this class occupies.
    pub fn footprint(self) -> u32 {
        match self {
            SizeClass::Small => 1,
            SizeClass::Medium => 2,
            SizeClass::Large => 3,
            SizeClass::Xlarge => 4,
        }
    }
}

/// A device template. Read from Concertim, immutable within a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Template {
    pub id: TemplateId,
    /// Human-readable size class name ("Small", "Medium", ...).
    pub name: String,
    /// Free text; mentions the vCPU count as `"<n> VCPU"`.
    #[serde(default)]
    pub description: String,
}

impl Template {
    /// The size class named by this template, if it is one of the known four.
    pub fn size_class(&self) -> Option<SizeClass> {
        SizeClass::from_name(&self.name)
    }
}

// ── Metrics ────────────────────────────────────────────────────────

/// How a metric value is expected to change between samples.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Slope {
    Zero,
    Positive,
    Negative,
    #[default]
    Both,
}

/// A single metric sample pushed against a device.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Metric {
    pub name: String,
    pub value: f64,
    #[serde(default)]
    pub units: String,
    #[serde(default)]
    pub slope: Slope,
    /// Seconds the sample stays valid.
    pub ttl: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_class_footprints() {
        assert_eq!(SizeClass::Small.footprint(), 1);
        assert_eq!(SizeClass::Medium.footprint(), 2);
        assert_eq!(SizeClass::Large.footprint(), 3);
        assert_eq!(SizeClass::Xlarge.footprint(), 4);
    }

    #[test]
    fn size_class_parse_ignores_case() {
        assert_eq!(SizeClass::from_name("Small"), Some(SizeClass::Small));
        assert_eq!(SizeClass::from_name("XLARGE"), Some(SizeClass::Xlarge));
        assert_eq!(SizeClass::from_name("tiny"), None);
        assert_eq!(SizeClass::from_name(""), None);
    }

    #[test]
    fn facing_uses_short_wire_names() {
        assert_eq!(serde_json::to_string(&Facing::Front).unwrap(), "\"f\"");
        assert_eq!(serde_json::to_string(&Facing::Back).unwrap(), "\"b\"");
        assert_eq!(Facing::Back.to_string(), "b");
    }

    #[test]
    fn rack_detail_parses_api_document() {
        let json = r#"{
            "id": "3",
            "name": "rack-1",
            "u_height": 42,
            "devices": [
                {"id": "10", "name": "vm-a", "location": {"start_u": 5, "end_u": 6, "facing": "f"}}
            ]
        }"#;
        let rack: RackDetail = serde_json::from_str(json).unwrap();
        assert_eq!(rack.u_height, 42);
        assert_eq!(rack.devices.len(), 1);
        assert_eq!(rack.devices[0].location.rows().collect::<Vec<_>>(), vec![5, 6]);
        assert_eq!(rack.summary().name, "rack-1");
    }

    #[test]
    fn metric_slope_defaults_to_both() {
        let metric: Metric =
            serde_json::from_str(r#"{"name": "cpu", "value": 0.5, "ttl": 60}"#).unwrap();
        assert_eq!(metric.slope, Slope::Both);
        assert_eq!(
            serde_json::to_value(Slope::Positive).unwrap(),
            serde_json::json!("positive")
        );
    }
}
