use serde_json::{json, Map, Value};

use crate::{Error, Result};

pub const TSTAT_PATH: &str = "/tstat";
pub const HUMIDITY_PATH: &str = "/tstat/humidity";
pub const MODEL_PATH: &str = "/tstat/model";
pub const SYS_PATH: &str = "/sys";
pub const NAME_PATH: &str = "/sys/name";

/// A single-field write against `/tstat`. Each one is one network round trip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldWrite {
    TMode(u8),
    TCool(f64),
    THeat(f64),
    FMode(u8),
    Hold(u8),
    ProgramMode(u8),
    Time { day: u32, hour: u32, minute: u32 },
}

impl FieldWrite {
    pub fn field(&self) -> &'static str {
        match self {
            FieldWrite::TMode(_) => "tmode",
            FieldWrite::TCool(_) => "t_cool",
            FieldWrite::THeat(_) => "t_heat",
            FieldWrite::FMode(_) => "fmode",
            FieldWrite::Hold(_) => "hold",
            FieldWrite::ProgramMode(_) => "program_mode",
            FieldWrite::Time { .. } => "time",
        }
    }

    pub fn body(&self) -> Value {
        let value = match *self {
            FieldWrite::TMode(v)
            | FieldWrite::FMode(v)
            | FieldWrite::Hold(v)
            | FieldWrite::ProgramMode(v) => json!(v),
            FieldWrite::TCool(t) | FieldWrite::THeat(t) => json!(t),
            FieldWrite::Time { day, hour, minute } => json!({
                "day": day,
                "hour": hour,
                "minute": minute,
            }),
        };
        let mut body = Map::new();
        body.insert(self.field().to_string(), value);
        Value::Object(body)
    }
}

/// The thermostat answers writes with `{"success": 0}` and failures with
/// `{"error": "..."}`.
pub fn check_write_response(body: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(body)
        .map_err(|e| Error::Protocol(format!("unparseable write response: {e}")))?;
    if let Some(err) = parsed.get("error") {
        let msg = err
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| err.to_string());
        return Err(Error::Device(msg));
    }
    match parsed.get("success") {
        Some(_) => Ok(()),
        None => Err(Error::Protocol(format!("unexpected write response: {body}"))),
    }
}

/// Pull a string field out of one of the small identity documents
/// (`/sys`, `/sys/name`, `/tstat/model`).
pub fn string_field(doc: &Value, key: &'static str) -> Result<String> {
    doc.get(key)
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or(Error::MissingField(key))
}
