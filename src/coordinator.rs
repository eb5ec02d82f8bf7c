use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, trace, warn};

use crate::client::RadioThermClient;
use crate::config::ThermostatConfig;
use crate::decode::DeviceSnapshot;
use crate::device::DeviceHandle;
use crate::thermostat::{RefreshRequester, Thermostat, ThermostatBuilder};
use crate::Result;

/// Wakes the coordinator for an immediate poll. Requests made while a poll
/// is running collapse into one follow-up poll.
#[derive(Clone)]
pub struct RefreshHandle(Arc<Notify>);

impl RefreshRequester for RefreshHandle {
    fn request_refresh(&self) {
        trace!("refresh requested");
        self.0.notify_one();
    }
}

/// Polls a thermostat on a fixed interval and on demand, handing each
/// snapshot to the adapter.
pub struct Coordinator {
    device: Arc<dyn DeviceHandle>,
    interval: Duration,
    wake: Arc<Notify>,
}

impl Coordinator {
    pub fn new(device: Arc<dyn DeviceHandle>, interval: Duration) -> Self {
        Self {
            device,
            interval,
            wake: Arc::new(Notify::new()),
        }
    }

    pub fn refresh_handle(&self) -> RefreshHandle {
        RefreshHandle(Arc::clone(&self.wake))
    }

    /// Initial fetch, before an adapter exists to receive it.
    pub async fn first_refresh(&self) -> Result<DeviceSnapshot> {
        self.device.fetch().await
    }

    pub async fn refresh(&self, thermostat: &Thermostat) -> Result<()> {
        let snapshot = self.device.fetch().await?;
        thermostat.on_snapshot_updated(&snapshot)
    }

    /// Poll forever. Failed polls are logged and the last good state is kept
    /// until a later poll succeeds.
    pub async fn run(self, thermostat: Arc<Thermostat>) {
        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => trace!("scheduled poll"),
                _ = self.wake.notified() => debug!("on-demand poll"),
            }
            if let Err(e) = self.refresh(&thermostat).await {
                warn!(name = %thermostat.info().name, error = %e, "poll failed");
            }
        }
    }

    pub fn spawn(self, thermostat: Arc<Thermostat>) -> JoinHandle<()> {
        tokio::spawn(self.run(thermostat))
    }
}

/// A connected adapter and the task polling for it.
pub struct Running {
    pub thermostat: Arc<Thermostat>,
    pub poller: JoinHandle<()>,
    pub clock_sync: JoinHandle<()>,
}

/// Connect to the configured thermostat, build the adapter from a first
/// snapshot, start polling and schedule the clock sync.
///
/// `customize` may register observers on the adapter before it is built.
pub async fn start(
    config: &ThermostatConfig,
    customize: impl FnOnce(ThermostatBuilder) -> ThermostatBuilder,
) -> Result<Running> {
    let mut client = RadioThermClient::builder(&config.host)
        .protocol(&config.protocol)
        .timeout(config.timeout())
        .build()?;
    let info = client.connect().await?;
    let device: Arc<dyn DeviceHandle> = Arc::new(client);

    let coordinator = Coordinator::new(Arc::clone(&device), config.poll_interval());
    let initial = coordinator.first_refresh().await?;

    let thermostat = customize(Thermostat::builder(device, info).hold_temp(config.hold_temp))
        .build(Arc::new(coordinator.refresh_handle()), &initial)?;
    let thermostat = Arc::new(thermostat);

    let clock_sync = thermostat.added_to_host();
    let poller = coordinator.spawn(Arc::clone(&thermostat));

    Ok(Running {
        thermostat,
        poller,
        clock_sync,
    })
}
