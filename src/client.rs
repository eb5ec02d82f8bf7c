use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, trace};

use crate::decode::DeviceSnapshot;
use crate::device::DeviceHandle;
use crate::protocol::{
    check_write_response, string_field, FieldWrite, HUMIDITY_PATH, MODEL_PATH, NAME_PATH,
    SYS_PATH, TSTAT_PATH,
};
use crate::types::{DeviceClass, DeviceInfo, MANUFACTURER};
use crate::{Error, Result};

const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub struct RadioThermClientBuilder {
    ip: String,
    protocol: String,
    timeout: Duration,
}

impl RadioThermClientBuilder {
    pub fn new(ip: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            protocol: "http".to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn protocol(mut self, proto: &str) -> Self {
        self.protocol = proto.to_string();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<RadioThermClient> {
        let http = reqwest::Client::builder().timeout(self.timeout).build()?;

        Ok(RadioThermClient {
            http,
            base_url: format!("{}://{}", self.protocol, self.ip),
            identity: None,
        })
    }
}

/// HTTP client for the thermostat's local JSON API.
pub struct RadioThermClient {
    http: reqwest::Client,
    base_url: String,
    identity: Option<(DeviceInfo, DeviceClass)>,
}

impl RadioThermClient {
    pub fn builder(ip: impl Into<String>) -> RadioThermClientBuilder {
        RadioThermClientBuilder::new(ip)
    }

    /// Probe the thermostat's identity and capability tier. Must succeed
    /// before snapshots can be fetched.
    pub async fn connect(&mut self) -> Result<DeviceInfo> {
        debug!(url = %self.base_url, "probing thermostat");

        let model_doc = self.get_json(MODEL_PATH).await?;
        let sys_doc = self.get_json(SYS_PATH).await?;
        let name_doc = self.get_json(NAME_PATH).await?;

        let model = string_field(&model_doc, "model")?;
        let info = DeviceInfo {
            name: string_field(&name_doc, "name")?,
            model: model.clone(),
            manufacturer: MANUFACTURER.to_string(),
            fw_version: string_field(&sys_doc, "fw_version")?,
            mac: string_field(&sys_doc, "uuid")?,
        };
        let class = DeviceClass::from_model(&model);
        debug!(model = %model, ?class, "thermostat identified");

        self.identity = Some((info.clone(), class));
        Ok(info)
    }

    pub fn info(&self) -> Option<&DeviceInfo> {
        self.identity.as_ref().map(|(info, _)| info)
    }

    async fn get_json(&self, path: &str) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        trace!(url = %url, "GET");
        let body = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        serde_json::from_str(&body).map_err(|e| Error::Protocol(format!("{path}: {e}")))
    }
}

#[async_trait]
impl DeviceHandle for RadioThermClient {
    fn device_class(&self) -> Option<DeviceClass> {
        self.identity.as_ref().map(|(_, class)| *class)
    }

    async fn fetch(&self) -> Result<DeviceSnapshot> {
        let class = match &self.identity {
            Some((_, class)) => *class,
            None => return Err(Error::NotConnected),
        };

        let tstat = self.get_json(TSTAT_PATH).await?;
        let mut snapshot: DeviceSnapshot = serde_json::from_value(tstat)
            .map_err(|e| Error::Protocol(format!("{TSTAT_PATH}: {e}")))?;

        if class.has_humidity() {
            let doc = self.get_json(HUMIDITY_PATH).await?;
            snapshot.humidity = doc.get("humidity").and_then(|v| v.as_f64());
        }

        trace!(?snapshot, "fetched snapshot");
        Ok(snapshot)
    }

    async fn write(&self, write: FieldWrite) -> Result<()> {
        if self.identity.is_none() {
            return Err(Error::NotConnected);
        }

        let url = format!("{}{}", self.base_url, TSTAT_PATH);
        let body = write.body();
        debug!(url = %url, field = write.field(), %body, "writing field");

        let text = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        check_write_response(&text)
    }
}
