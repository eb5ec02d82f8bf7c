#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use radiotherm::{
    DeviceClass, DeviceHandle, DeviceInfo, DeviceSnapshot, Error, FieldWrite, RefreshRequester,
    Result, Thermostat, ThermostatBuilder, MANUFACTURER,
};

/// In-memory thermostat that records every write.
pub struct FakeDevice {
    pub class: DeviceClass,
    pub snapshot: Mutex<DeviceSnapshot>,
    pub writes: Mutex<Vec<FieldWrite>>,
    pub fail_writes: AtomicBool,
    pub fail_fetches: AtomicBool,
    pub fetches: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    in_flight: AtomicUsize,
    delay: Duration,
}

impl FakeDevice {
    pub fn new(class: DeviceClass, snapshot: DeviceSnapshot) -> Self {
        Self {
            class,
            snapshot: Mutex::new(snapshot),
            writes: Mutex::new(Vec::new()),
            fail_writes: AtomicBool::new(false),
            fail_fetches: AtomicBool::new(false),
            fetches: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn writes(&self) -> Vec<FieldWrite> {
        self.writes.lock().unwrap().clone()
    }

    pub fn set_snapshot(&self, snapshot: DeviceSnapshot) {
        *self.snapshot.lock().unwrap() = snapshot;
    }
}

#[async_trait]
impl DeviceHandle for FakeDevice {
    fn device_class(&self) -> Option<DeviceClass> {
        Some(self.class)
    }

    async fn fetch(&self) -> Result<DeviceSnapshot> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetches.load(Ordering::SeqCst) {
            return Err(Error::Device("unreachable".to_string()));
        }
        Ok(self.snapshot.lock().unwrap().clone())
    }

    async fn write(&self, write: FieldWrite) -> Result<()> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Device("rejected".to_string()));
        }
        self.writes.lock().unwrap().push(write);
        Ok(())
    }
}

#[derive(Default)]
pub struct RefreshCounter(pub AtomicUsize);

impl RefreshCounter {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl RefreshRequester for RefreshCounter {
    fn request_refresh(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn snapshot(tmode: i64, tstate: i64) -> DeviceSnapshot {
    DeviceSnapshot {
        temp: 71.0,
        tmode,
        tstate,
        fmode: 0,
        fstate: 0,
        hold: 0,
        t_cool: Some(76.0),
        t_heat: Some(68.0),
        program_mode: Some(0),
        humidity: Some(40.0),
    }
}

pub fn info() -> DeviceInfo {
    DeviceInfo {
        name: "Hallway".to_string(),
        model: "CT50 V1.94".to_string(),
        manufacturer: MANUFACTURER.to_string(),
        fw_version: "1.04.84".to_string(),
        mac: "5cdad4123456".to_string(),
    }
}

pub struct Harness {
    pub device: Arc<FakeDevice>,
    pub refresh: Arc<RefreshCounter>,
    pub thermostat: Arc<Thermostat>,
}

pub fn harness(device: FakeDevice) -> Harness {
    harness_with(device, |b| b)
}

pub fn harness_with(
    device: FakeDevice,
    customize: impl FnOnce(ThermostatBuilder) -> ThermostatBuilder,
) -> Harness {
    let initial = device.snapshot.lock().unwrap().clone();
    let device = Arc::new(device);
    let refresh = Arc::new(RefreshCounter::default());
    let thermostat = customize(Thermostat::builder(device.clone(), info()))
        .build(refresh.clone(), &initial)
        .expect("initial snapshot should decode");
    Harness {
        device,
        refresh,
        thermostat: Arc::new(thermostat),
    }
}
