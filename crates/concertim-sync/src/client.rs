//! The Concertim REST API as seen by the glue.
//!
//! Implementations are handed in already authenticated: whatever token
//! exchange the transport needs happens when the client is built, so a
//! `ConcertimClient` value is always usable. The HTTP implementation lives
//! outside this crate; [`InMemoryConcertim`](crate::InMemoryConcertim) is
//! the in-process one.

use std::future::Future;
use std::pin::Pin;

use concertim_core::{Device, Metric, NewDevice, RackDetail, RackSummary, Template};

use crate::error::ClientResult;

/// Boxed future alias for client calls.
pub type ClientFuture<'a, T> = Pin<Box<dyn Future<Output = ClientResult<T>> + Send + 'a>>;

/// Calls the synchronizer makes against Concertim — injected for testability.
pub trait ConcertimClient: Send + Sync {
    /// All racks, in the order Concertim lists them.
    fn list_racks(&self) -> ClientFuture<'_, Vec<RackSummary>>;

    /// One rack with its height and mounted devices.
    fn get_rack<'a>(&'a self, rack_id: &'a str) -> ClientFuture<'a, RackDetail>;

    /// All device templates, in listing order.
    fn list_templates(&self) -> ClientFuture<'_, Vec<Template>>;

    /// Create a device at the given rack position.
    fn create_device<'a>(&'a self, device: &'a NewDevice) -> ClientFuture<'a, Device>;

    /// Push one metric sample for a device.
    fn put_metric<'a>(&'a self, device_id: &'a str, metric: &'a Metric) -> ClientFuture<'a, ()>;
}
