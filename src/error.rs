use std::fmt;

#[derive(Debug)]
pub enum Error {
    Http(reqwest::Error),
    NotConnected,
    InvalidInput(String),
    Unsupported(&'static str),
    InvalidCode { field: &'static str, code: i64 },
    MissingField(&'static str),
    Device(String),
    Protocol(String),
}

impl Error {
    /// True when the failure happened talking to the thermostat, as opposed to
    /// a rejected argument or an undecodable snapshot.
    pub fn is_communication(&self) -> bool {
        matches!(
            self,
            Error::Http(_) | Error::NotConnected | Error::Device(_) | Error::Protocol(_)
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Http(e) => write!(f, "HTTP error: {e}"),
            Error::NotConnected => write!(f, "not connected"),
            Error::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Error::Unsupported(what) => write!(f, "not supported by this model: {what}"),
            Error::InvalidCode { field, code } => write!(f, "unknown {field} code: {code}"),
            Error::MissingField(field) => write!(f, "snapshot missing field: {field}"),
            Error::Device(msg) => write!(f, "device rejected request: {msg}"),
            Error::Protocol(msg) => write!(f, "protocol error: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Http(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
