use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::Error;

/// Round to the thermostat's half-degree resolution.
pub fn round_temp(temperature: f64) -> f64 {
    (temperature * 2.0).round() / 2.0
}

/// Capability tier of the thermostat, fixed by a one-time model probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeviceClass {
    Ct30,
    Ct80,
}

impl DeviceClass {
    pub fn from_model(model: &str) -> Self {
        if model.to_ascii_uppercase().contains("CT80") {
            DeviceClass::Ct80
        } else {
            DeviceClass::Ct30
        }
    }

    pub fn fan_modes(&self) -> &'static [FanMode] {
        match self {
            DeviceClass::Ct30 => &[FanMode::On, FanMode::Auto],
            DeviceClass::Ct80 => &[FanMode::On, FanMode::Circulate, FanMode::Auto],
        }
    }

    pub fn preset_modes(&self) -> &'static [PresetMode] {
        match self {
            DeviceClass::Ct30 => &[],
            DeviceClass::Ct80 => &PresetMode::ALL,
        }
    }

    pub fn has_presets(&self) -> bool {
        matches!(self, DeviceClass::Ct80)
    }

    pub fn has_humidity(&self) -> bool {
        matches!(self, DeviceClass::Ct80)
    }
}

/// Programmed temperature mode (`tmode`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HvacMode {
    Off,
    Heat,
    Cool,
    Auto,
}

impl HvacMode {
    pub const ALL: [HvacMode; 4] = [HvacMode::Auto, HvacMode::Cool, HvacMode::Heat, HvacMode::Off];

    pub fn code(&self) -> u8 {
        match self {
            HvacMode::Off => 0,
            HvacMode::Heat => 1,
            HvacMode::Cool => 2,
            HvacMode::Auto => 3,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(HvacMode::Off),
            1 => Some(HvacMode::Heat),
            2 => Some(HvacMode::Cool),
            3 => Some(HvacMode::Auto),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HvacMode::Off => "off",
            HvacMode::Heat => "heat",
            HvacMode::Cool => "cool",
            HvacMode::Auto => "auto",
        }
    }
}

impl FromStr for HvacMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HvacMode::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("{s} is not a valid hvac mode")))
    }
}

/// Active heat/cool state (`tstate`). Decode only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HvacAction {
    Idle,
    Heating,
    Cooling,
}

impl HvacAction {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(HvacAction::Idle),
            1 => Some(HvacAction::Heating),
            2 => Some(HvacAction::Cooling),
            _ => None,
        }
    }
}

/// Programmed fan mode (`fmode`). Circulate only exists on CT80 models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FanMode {
    Auto,
    Circulate,
    On,
}

impl FanMode {
    pub const ALL: [FanMode; 3] = [FanMode::Auto, FanMode::Circulate, FanMode::On];

    pub fn code(&self) -> u8 {
        match self {
            FanMode::Auto => 0,
            FanMode::Circulate => 1,
            FanMode::On => 2,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(FanMode::Auto),
            1 => Some(FanMode::Circulate),
            2 => Some(FanMode::On),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FanMode::Auto => "auto",
            FanMode::Circulate => "circulate",
            FanMode::On => "on",
        }
    }
}

impl FromStr for FanMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FanMode::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("{s} is not a valid fan mode")))
    }
}

/// Whether the fan is actually running (`fstate`). Decode only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FanAction {
    Off,
    On,
}

impl FanAction {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(FanAction::Off),
            1 => Some(FanAction::On),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FanAction::Off => "off",
            FanAction::On => "on",
        }
    }
}

/// Named schedule profile (`program_mode`), CT80 only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetMode {
    Home,
    Alternate,
    Away,
    Holiday,
}

impl PresetMode {
    pub const ALL: [PresetMode; 4] = [
        PresetMode::Home,
        PresetMode::Alternate,
        PresetMode::Away,
        PresetMode::Holiday,
    ];

    pub fn code(&self) -> u8 {
        match self {
            PresetMode::Home => 0,
            PresetMode::Alternate => 1,
            PresetMode::Away => 2,
            PresetMode::Holiday => 3,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(PresetMode::Home),
            1 => Some(PresetMode::Alternate),
            2 => Some(PresetMode::Away),
            3 => Some(PresetMode::Holiday),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PresetMode::Home => "home",
            PresetMode::Alternate => "alternate",
            PresetMode::Away => "away",
            PresetMode::Holiday => "holiday",
        }
    }
}

impl FromStr for PresetMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PresetMode::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("{s} is not a valid preset mode")))
    }
}

/// `hold` flag. Decode only.
pub fn hold_from_code(code: i64) -> Option<bool> {
    match code {
        0 => Some(false),
        1 => Some(true),
        _ => None,
    }
}

impl fmt::Display for HvacMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for FanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PresetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static identity of a thermostat, read once when connecting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceInfo {
    pub name: String,
    pub model: String,
    pub manufacturer: String,
    pub fw_version: String,
    pub mac: String,
}

pub const MANUFACTURER: &str = "Radio Thermostats";

/// State-change notifications derived by diffing consecutive decoded states.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    TemperatureChanged { temp: f64 },
    HumidityChanged { humidity: f64 },
    HvacModeChanged { mode: HvacMode },
    HvacActionChanged { action: Option<HvacAction> },
    TargetTemperatureChanged { temp: Option<f64> },
    FanChanged { mode: FanMode, action: FanAction },
    PresetChanged { preset: PresetMode },
    HoldChanged { active: bool },
}
