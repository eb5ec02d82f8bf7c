//! How the adapter presents itself to a home-automation host: a static
//! description registered once, a state-attribute document, and string-keyed
//! service calls.

use serde::Serialize;
use serde_json::{json, Value};

use crate::thermostat::Thermostat;
use crate::types::*;
use crate::{Error, Result};

pub const TEMPERATURE_UNIT: &str = "°F";
pub const PRECISION: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    TargetTemperature,
    FanMode,
    PresetMode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityDescription {
    pub name: String,
    pub unique_id: String,
    pub temperature_unit: &'static str,
    pub precision: f64,
    pub supported_features: Vec<Feature>,
    pub hvac_modes: Vec<HvacMode>,
    pub fan_modes: Vec<FanMode>,
    pub preset_modes: Vec<PresetMode>,
    pub device: DeviceInfo,
}

impl Thermostat {
    pub fn description(&self) -> EntityDescription {
        let class = self.device_class();
        let mut supported_features = vec![Feature::TargetTemperature, Feature::FanMode];
        if class.has_presets() {
            supported_features.push(Feature::PresetMode);
        }
        let info = self.info();

        EntityDescription {
            name: info.name.clone(),
            unique_id: info.mac.clone(),
            temperature_unit: TEMPERATURE_UNIT,
            precision: PRECISION,
            supported_features,
            hvac_modes: HvacMode::ALL.to_vec(),
            fan_modes: class.fan_modes().to_vec(),
            preset_modes: class.preset_modes().to_vec(),
            device: info.clone(),
        }
    }

    /// Current state as the host sees it. `fan_action` is an extra attribute.
    pub fn state_attributes(&self) -> Value {
        let state = self.state();
        let mut attrs = json!({
            "hvac_mode": state.hvac_mode,
            "hvac_action": state.hvac_action,
            "current_temperature": state.current_temperature,
            "temperature": state.target_temperature,
            "fan_mode": state.fan_mode,
            "fan_action": state.fan_action.as_str(),
        });
        if self.device_class().has_humidity() {
            attrs["current_humidity"] = json!(state.humidity);
        }
        if self.device_class().has_presets() {
            attrs["preset_mode"] = json!(state.preset_mode);
        }
        attrs
    }

    /// Dispatch a host service call.
    ///
    /// `set_temperature` without a `temperature` key does nothing.
    pub async fn call_service(&self, service: &str, data: &Value) -> Result<()> {
        match service {
            "set_temperature" => {
                let Some(temp) = data.get("temperature") else {
                    return Ok(());
                };
                let temp = temp.as_f64().ok_or_else(|| {
                    Error::InvalidInput(format!("{temp} is not a valid temperature"))
                })?;
                let hold_changed = data
                    .get("hold_changed")
                    .and_then(|v| v.as_bool())
                    .unwrap_or(false);
                self.set_temperature(temp, hold_changed).await
            }
            "set_hvac_mode" => {
                let mode = str_arg(data, "hvac_mode")?.parse()?;
                self.set_hvac_mode(mode).await
            }
            "set_fan_mode" => {
                let mode = str_arg(data, "fan_mode")?.parse()?;
                self.set_fan_mode(mode).await
            }
            "set_preset_mode" => {
                if !self.device_class().has_presets() {
                    return Err(Error::Unsupported("preset modes"));
                }
                let preset = str_arg(data, "preset_mode")?.parse()?;
                self.set_preset_mode(preset).await
            }
            other => Err(Error::InvalidInput(format!("unknown service: {other}"))),
        }
    }
}

fn str_arg<'a>(data: &'a Value, key: &str) -> Result<&'a str> {
    data.get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::InvalidInput(format!("missing {key}")))
}
