use crate::config::ConfigError;
use crate::portal::PortalError;
use crate::session::CredentialError;
use crate::telemetry::TelemetryError;
use crate::workflows::document_check::workflow::CheckWorkflowError;
use crate::workflows::geocode::GeocodeError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Credential(CredentialError),
    Portal(PortalError),
    Workflow(CheckWorkflowError),
    Geocode(GeocodeError),
    Io(std::io::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Credential(err) => write!(f, "session error: {}", err),
            AppError::Portal(err) => write!(f, "portal error: {}", err),
            AppError::Workflow(err) => write!(f, "workflow error: {}", err),
            AppError::Geocode(err) => write!(f, "geocoding error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Credential(err) => Some(err),
            AppError::Portal(err) => Some(err),
            AppError::Workflow(err) => Some(err),
            AppError::Geocode(err) => Some(err),
            AppError::Io(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<CredentialError> for AppError {
    fn from(value: CredentialError) -> Self {
        Self::Credential(value)
    }
}

impl From<PortalError> for AppError {
    fn from(value: PortalError) -> Self {
        Self::Portal(value)
    }
}

impl From<CheckWorkflowError> for AppError {
    fn from(value: CheckWorkflowError) -> Self {
        Self::Workflow(value)
    }
}

impl From<GeocodeError> for AppError {
    fn from(value: GeocodeError) -> Self {
        Self::Geocode(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
