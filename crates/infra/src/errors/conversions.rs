//! Conversions from external infrastructure errors into domain errors.

use std::io::{Error as IoError, ErrorKind};

use reqwest::Error as HttpError;
use serde_json::Error as JsonError;
use timetrail_domain::TimetrailError;
use toml::de::Error as TomlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub TimetrailError);

impl From<InfraError> for TimetrailError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<TimetrailError> for InfraError {
    fn from(value: TimetrailError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoTimetrailError {
    fn into_timetrail(self) -> TimetrailError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → TimetrailError */
/* -------------------------------------------------------------------------- */

impl IntoTimetrailError for HttpError {
    fn into_timetrail(self) -> TimetrailError {
        if self.is_timeout() {
            return TimetrailError::RemoteSync("HTTP request timed out".into());
        }

        if self.is_connect() {
            return TimetrailError::RemoteSync("HTTP connection failure".into());
        }

        if self.is_decode() {
            return TimetrailError::Parse(format!("HTTP response body: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                400..=499 if code != 429 => TimetrailError::InvalidInput(message),
                _ => TimetrailError::RemoteSync(message),
            };
        }

        TimetrailError::RemoteSync(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_timetrail())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → TimetrailError */
/* -------------------------------------------------------------------------- */

impl IntoTimetrailError for JsonError {
    fn into_timetrail(self) -> TimetrailError {
        TimetrailError::Parse(format!(
            "invalid JSON at line {} column {}: {self}",
            self.line(),
            self.column()
        ))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_timetrail())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → TimetrailError */
/* -------------------------------------------------------------------------- */

impl IntoTimetrailError for IoError {
    fn into_timetrail(self) -> TimetrailError {
        match self.kind() {
            ErrorKind::PermissionDenied => {
                TimetrailError::Storage(format!("permission denied: {self}"))
            }
            ErrorKind::InvalidData => TimetrailError::Parse(format!("invalid data: {self}")),
            _ => TimetrailError::Storage(self.to_string()),
        }
    }
}

impl From<IoError> for InfraError {
    fn from(value: IoError) -> Self {
        InfraError(value.into_timetrail())
    }
}

/* -------------------------------------------------------------------------- */
/* toml::de::Error → TimetrailError */
/* -------------------------------------------------------------------------- */

impl IntoTimetrailError for TomlError {
    fn into_timetrail(self) -> TimetrailError {
        TimetrailError::Config(format!("Invalid TOML format: {}", self.message()))
    }
}

impl From<TomlError> for InfraError {
    fn from(value: TomlError) -> Self {
        InfraError(value.into_timetrail())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
