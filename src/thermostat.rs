use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{Datelike, Local, NaiveDateTime, Timelike};
use tracing::{debug, warn};

use crate::decode::{decode, DecodedState, DeviceSnapshot};
use crate::device::DeviceHandle;
use crate::diff::diff_states;
use crate::protocol::FieldWrite;
use crate::types::*;
use crate::{Error, Result};

type StateCallback = Box<dyn Fn(&DecodedState) + Send + Sync>;
type EventCallback = Box<dyn Fn(&Event) + Send + Sync>;

/// Out-of-band refresh trigger supplied by whoever polls the device.
/// Must not block.
pub trait RefreshRequester: Send + Sync {
    fn request_refresh(&self);
}

pub struct ThermostatBuilder {
    device: Arc<dyn DeviceHandle>,
    info: DeviceInfo,
    hold_temp: bool,
    state_callbacks: Vec<StateCallback>,
    event_callbacks: Vec<EventCallback>,
}

impl ThermostatBuilder {
    pub fn new(device: Arc<dyn DeviceHandle>, info: DeviceInfo) -> Self {
        Self {
            device,
            info,
            hold_temp: false,
            state_callbacks: Vec::new(),
            event_callbacks: Vec::new(),
        }
    }

    /// Put the thermostat into hold whenever a target temperature is set.
    pub fn hold_temp(mut self, hold: bool) -> Self {
        self.hold_temp = hold;
        self
    }

    pub fn on_state(mut self, f: impl Fn(&DecodedState) + Send + Sync + 'static) -> Self {
        self.state_callbacks.push(Box::new(f));
        self
    }

    pub fn on_event(mut self, f: impl Fn(&Event) + Send + Sync + 'static) -> Self {
        self.event_callbacks.push(Box::new(f));
        self
    }

    /// Decode the initial snapshot and fix the capability tier. Fails with
    /// [`Error::NotConnected`] if the handle has not identified the device yet.
    pub fn build(
        self,
        refresher: Arc<dyn RefreshRequester>,
        initial: &DeviceSnapshot,
    ) -> Result<Thermostat> {
        let class = self.device.device_class().ok_or(Error::NotConnected)?;
        let state = decode(initial, class, None)?;
        debug!(name = %self.info.name, ?class, "thermostat adapter created");

        Ok(Thermostat {
            device: self.device,
            refresher,
            info: self.info,
            class,
            hold_temp: self.hold_temp,
            state: Mutex::new(state),
            commands: tokio::sync::Mutex::new(()),
            state_callbacks: self.state_callbacks,
            event_callbacks: self.event_callbacks,
        })
    }
}

/// Climate adapter for one thermostat.
///
/// Commands are serialised: at most one device write is in flight per
/// adapter. Local state is updated only after the device accepted the write,
/// and the next decoded snapshot always replaces it.
pub struct Thermostat {
    device: Arc<dyn DeviceHandle>,
    refresher: Arc<dyn RefreshRequester>,
    info: DeviceInfo,
    class: DeviceClass,
    hold_temp: bool,
    state: Mutex<DecodedState>,
    commands: tokio::sync::Mutex<()>,
    state_callbacks: Vec<StateCallback>,
    event_callbacks: Vec<EventCallback>,
}

impl Thermostat {
    pub fn builder(device: Arc<dyn DeviceHandle>, info: DeviceInfo) -> ThermostatBuilder {
        ThermostatBuilder::new(device, info)
    }

    pub fn info(&self) -> &DeviceInfo {
        &self.info
    }

    pub fn device_class(&self) -> DeviceClass {
        self.class
    }

    pub fn state(&self) -> DecodedState {
        self.lock_state().clone()
    }

    fn lock_state(&self) -> MutexGuard<'_, DecodedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Called by the poller whenever a new snapshot is available. A snapshot
    /// that fails to decode leaves the previous state untouched.
    pub fn on_snapshot_updated(&self, snapshot: &DeviceSnapshot) -> Result<()> {
        let (previous, next) = {
            let mut state = self.lock_state();
            let next = match decode(snapshot, self.class, Some(&*state)) {
                Ok(next) => next,
                Err(e) => {
                    warn!(name = %self.info.name, error = %e, "discarding snapshot");
                    return Err(e);
                }
            };
            let previous = std::mem::replace(&mut *state, next.clone());
            (previous, next)
        };
        self.publish(Some(&previous), &next);
        Ok(())
    }

    /// Schedule the one-shot clock sync. Call once the adapter is visible to
    /// the host, never from construction: the write is a network round trip
    /// and clears any temporary override on the device.
    pub fn added_to_host(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        self.publish(None, &self.state());
        let this = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = this.set_device_time().await {
                warn!(name = %this.info.name, error = %e, "failed to set thermostat clock");
            }
        })
    }

    // -- Command methods --

    /// Set the target temperature, rounded to half a degree.
    ///
    /// Which setpoint is written follows the current mode; in auto while idle
    /// no setpoint is written but the local target still moves. The hold flag
    /// is written when `hold_changed` is set or hold is not yet on.
    pub async fn set_temperature(&self, temperature: f64, hold_changed: bool) -> Result<()> {
        if !temperature.is_finite() {
            return Err(Error::InvalidInput(format!(
                "{temperature} is not a valid temperature"
            )));
        }
        let target = round_temp(temperature);
        let hold_temp = self.hold_temp;

        self.run_command(
            "set_temperature",
            |state| {
                let mut writes = Vec::with_capacity(2);
                match (state.hvac_mode, state.hvac_action) {
                    (HvacMode::Cool, _) | (HvacMode::Auto, Some(HvacAction::Cooling)) => {
                        writes.push(FieldWrite::TCool(target));
                    }
                    (HvacMode::Heat, _) | (HvacMode::Auto, Some(HvacAction::Heating)) => {
                        writes.push(FieldWrite::THeat(target));
                    }
                    _ => {}
                }
                if hold_changed || !state.hold_is_set {
                    writes.push(FieldWrite::Hold(u8::from(hold_temp)));
                }
                writes
            },
            |state| state.target_temperature = Some(target),
        )
        .await
    }

    /// Off and auto are written as `tmode`. Heat and cool are selected by
    /// writing the matching setpoint, which switches `tmode` on the device.
    pub async fn set_hvac_mode(&self, mode: HvacMode) -> Result<()> {
        self.run_command(
            "set_hvac_mode",
            |state| {
                let write = match (mode, state.target_temperature) {
                    (HvacMode::Cool, Some(t)) => FieldWrite::TCool(t),
                    (HvacMode::Heat, Some(t)) => FieldWrite::THeat(t),
                    _ => FieldWrite::TMode(mode.code()),
                };
                vec![write]
            },
            |state| {
                state.hvac_mode = mode;
                if mode == HvacMode::Off {
                    state.hvac_action = None;
                }
            },
        )
        .await
    }

    pub async fn set_fan_mode(&self, mode: FanMode) -> Result<()> {
        self.run_command(
            "set_fan_mode",
            |_| vec![FieldWrite::FMode(mode.code())],
            |state| state.fan_mode = mode,
        )
        .await
    }

    pub async fn set_preset_mode(&self, preset: PresetMode) -> Result<()> {
        if !self.class.has_presets() {
            return Err(Error::Unsupported("preset modes"));
        }
        self.run_command(
            "set_preset_mode",
            |_| vec![FieldWrite::ProgramMode(preset.code())],
            |state| state.preset_mode = Some(preset),
        )
        .await
    }

    /// Sync the device clock to local time. This reverts the thermostat to
    /// its programmed schedule, so it is only safe at startup. A failed write
    /// still requests a refresh.
    pub async fn set_device_time(&self) -> Result<()> {
        self.set_device_time_at(Local::now().naive_local()).await
    }

    pub async fn set_device_time_at(&self, now: NaiveDateTime) -> Result<()> {
        let write = FieldWrite::Time {
            day: now.weekday().num_days_from_monday(),
            hour: now.hour(),
            minute: now.minute(),
        };
        let result = {
            let _guard = self.commands.lock().await;
            debug!(name = %self.info.name, ?write, "setting thermostat clock");
            self.device.write(write).await
        };
        if result.is_err() {
            self.refresher.request_refresh();
        }
        result
    }

    // -- Helpers --

    /// Serialise against other commands, perform the planned writes, apply
    /// the optimistic update if all of them succeed, then ask for a refresh
    /// whatever the outcome.
    async fn run_command(
        &self,
        action: &'static str,
        plan: impl FnOnce(&DecodedState) -> Vec<FieldWrite>,
        apply: impl FnOnce(&mut DecodedState),
    ) -> Result<()> {
        let result = self.write_and_apply(action, plan, apply).await;
        if let Err(ref e) = result {
            warn!(name = %self.info.name, action, error = %e, "command failed");
        }
        self.refresher.request_refresh();
        result
    }

    async fn write_and_apply(
        &self,
        action: &'static str,
        plan: impl FnOnce(&DecodedState) -> Vec<FieldWrite>,
        apply: impl FnOnce(&mut DecodedState),
    ) -> Result<()> {
        let _guard = self.commands.lock().await;

        let writes = plan(&self.state());
        debug!(name = %self.info.name, action, ?writes, "sending command");
        for write in &writes {
            self.device.write(*write).await?;
        }

        let (previous, next) = {
            let mut state = self.lock_state();
            let previous = state.clone();
            apply(&mut *state);
            for write in &writes {
                if let FieldWrite::Hold(v) = write {
                    state.hold_is_set = *v == 1;
                }
            }
            (previous, state.clone())
        };
        self.publish(Some(&previous), &next);
        Ok(())
    }

    fn publish(&self, previous: Option<&DecodedState>, next: &DecodedState) {
        for cb in &self.state_callbacks {
            cb(next);
        }
        let events = diff_states(previous, next);
        for event in &events {
            for cb in &self.event_callbacks {
                cb(event);
            }
        }
        if !events.is_empty() {
            debug!(name = %self.info.name, count = events.len(), "published state changes");
        }
    }
}
