mod client;
mod config;
mod coordinator;
mod decode;
mod device;
mod diff;
mod entity;
mod error;
mod protocol;
mod thermostat;
mod types;

pub use client::{RadioThermClient, RadioThermClientBuilder};
pub use config::ThermostatConfig;
pub use coordinator::{start, Coordinator, RefreshHandle, Running};
pub use decode::{decode, DecodedState, DeviceSnapshot};
pub use device::DeviceHandle;
pub use entity::{EntityDescription, Feature, PRECISION, TEMPERATURE_UNIT};
pub use error::{Error, Result};
pub use protocol::FieldWrite;
pub use thermostat::{RefreshRequester, Thermostat, ThermostatBuilder};
pub use types::*;
