use serde::{Deserialize, Serialize};

use crate::types::*;
use crate::{Error, Result};

/// One polled read of `/tstat`, plus `/tstat/humidity` on CT80 models.
///
/// The thermostat only reports the setpoint(s) that apply to its current
/// mode, so both setpoints are optional.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DeviceSnapshot {
    pub temp: f64,
    pub tmode: i64,
    pub tstate: i64,
    pub fmode: i64,
    pub fstate: i64,
    pub hold: i64,
    #[serde(default)]
    pub t_cool: Option<f64>,
    #[serde(default)]
    pub t_heat: Option<f64>,
    #[serde(default)]
    pub program_mode: Option<i64>,
    #[serde(default)]
    pub humidity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedState {
    pub current_temperature: f64,
    pub hvac_mode: HvacMode,
    pub hvac_action: Option<HvacAction>,
    pub fan_mode: FanMode,
    pub fan_action: FanAction,
    pub target_temperature: Option<f64>,
    pub preset_mode: Option<PresetMode>,
    pub hold_is_set: bool,
    pub humidity: Option<f64>,
}

fn lookup<T>(field: &'static str, code: i64, table: fn(i64) -> Option<T>) -> Result<T> {
    table(code).ok_or(Error::InvalidCode { field, code })
}

/// Translate a raw snapshot into semantic state.
///
/// `previous` is only consulted in auto mode while the system is idle: the
/// device gives no hint which setpoint applies, so the last known target is
/// kept rather than cleared.
pub fn decode(
    snapshot: &DeviceSnapshot,
    class: DeviceClass,
    previous: Option<&DecodedState>,
) -> Result<DecodedState> {
    let hvac_mode = lookup("tmode", snapshot.tmode, HvacMode::from_code)?;
    let hold_is_set = lookup("hold", snapshot.hold, hold_from_code)?;
    let fan_mode = lookup("fmode", snapshot.fmode, FanMode::from_code)?;
    let fan_action = lookup("fstate", snapshot.fstate, FanAction::from_code)?;

    let hvac_action = match hvac_mode {
        HvacMode::Off => None,
        _ => Some(lookup("tstate", snapshot.tstate, HvacAction::from_code)?),
    };

    let cool = || snapshot.t_cool.ok_or(Error::MissingField("t_cool"));
    let heat = || snapshot.t_heat.ok_or(Error::MissingField("t_heat"));
    let carried = previous.and_then(|p| p.target_temperature);

    let target_temperature = match (hvac_mode, hvac_action) {
        (HvacMode::Cool, _) => Some(cool()?),
        (HvacMode::Heat, _) => Some(heat()?),
        (HvacMode::Auto, Some(HvacAction::Cooling)) => Some(cool()?),
        (HvacMode::Auto, Some(HvacAction::Heating)) => Some(heat()?),
        _ => carried,
    };

    let (humidity, preset_mode) = match class {
        DeviceClass::Ct80 => {
            let code = snapshot
                .program_mode
                .ok_or(Error::MissingField("program_mode"))?;
            (
                snapshot.humidity,
                Some(lookup("program_mode", code, PresetMode::from_code)?),
            )
        }
        DeviceClass::Ct30 => (None, None),
    };

    Ok(DecodedState {
        current_temperature: snapshot.temp,
        hvac_mode,
        hvac_action,
        fan_mode,
        fan_action,
        target_temperature,
        preset_mode,
        hold_is_set,
        humidity,
    })
}
