//! The seam between the climate adapter and whatever talks to the thermostat.

use async_trait::async_trait;

use crate::Result;
use crate::decode::DeviceSnapshot;
use crate::protocol::FieldWrite;
use crate::types::DeviceClass;

/// Access to one thermostat.
///
/// [`RadioThermClient`](crate::RadioThermClient) implements this over the
/// device's HTTP API; tests substitute an in-memory fake.
#[async_trait]
pub trait DeviceHandle: Send + Sync {
    /// Capability tier, `None` until the device has been identified. Must not
    /// change once known.
    fn device_class(&self) -> Option<DeviceClass>;

    /// Read a full snapshot of the thermostat fields.
    async fn fetch(&self) -> Result<DeviceSnapshot>;

    /// Write one field. One network round trip.
    async fn write(&self, write: FieldWrite) -> Result<()>;
}
