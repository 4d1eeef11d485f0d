//! Pushing device metrics to Concertim.

use concertim_core::Metric;
use tracing::{debug, warn};

use crate::client::ConcertimClient;
use crate::error::ClientError;

/// Result of pushing one metric.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricOutcome {
    pub name: String,
    pub result: Result<(), ClientError>,
}

/// Push every metric for `device_id` in order. A failed push is recorded
/// and the rest are still sent.
pub async fn report_metrics(
    client: &dyn ConcertimClient,
    device_id: &str,
    metrics: &[Metric],
) -> Vec<MetricOutcome> {
    let mut outcomes = Vec::with_capacity(metrics.len());

    for metric in metrics {
        let result = client.put_metric(device_id, metric).await;
        match &result {
            Ok(()) => debug!(device = device_id, metric = %metric.name, value = metric.value, "metric pushed"),
            Err(e) => warn!(device = device_id, metric = %metric.name, error = %e, "metric push failed"),
        }
        outcomes.push(MetricOutcome {
            name: metric.name.clone(),
            result,
        });
    }

    outcomes
}
