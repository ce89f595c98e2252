use crate::registry::ViewName;
use axum::http::StatusCode;
use std::{path::PathBuf, time::Duration};
use thiserror::Error;

/// Failure of a single bridge call.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("{op} rejected: {reason}")]
    Rejected { op: &'static str, reason: String },
    #[error("{op} timed out after {after:?}")]
    Timeout { op: &'static str, after: Duration },
    #[error("ledger storage failure: {0}")]
    Storage(#[from] std::io::Error),
}

impl RemoteError {
    pub fn rejected(op: &'static str, reason: impl Into<String>) -> Self {
        Self::Rejected {
            op,
            reason: reason.into(),
        }
    }
}

/// Required input missing or malformed. Raised before any remote call.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub action: &'static str,
    pub missing: Vec<&'static str>,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("no refresh procedure registered for view `{0}`")]
    Unregistered(ViewName),
    #[error("refresh of `{view}` failed: {source}")]
    Remote {
        view: ViewName,
        #[source]
        source: RemoteError,
    },
}

impl RefreshError {
    pub fn view(&self) -> ViewName {
        match self {
            RefreshError::Unregistered(view) | RefreshError::Remote { view, .. } => *view,
        }
    }
}

#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{action} declined by user")]
    ConfirmationDeclined { action: &'static str },
    #[error("`{holder}` is still in flight")]
    Busy { holder: &'static str },
    #[error("{acknowledgment}")]
    Remote {
        action: &'static str,
        acknowledgment: String,
        #[source]
        source: RemoteError,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for {key}: {value}")]
    InvalidEnv { key: &'static str, value: String },
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn bad_gateway(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: err.to_string(),
        }
    }
}

impl From<ActionError> for AppError {
    fn from(err: ActionError) -> Self {
        let status = match &err {
            ActionError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ActionError::ConfirmationDeclined { .. } => StatusCode::OK,
            ActionError::Busy { .. } => StatusCode::CONFLICT,
            ActionError::Remote { .. } => StatusCode::BAD_GATEWAY,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<RemoteError> for AppError {
    fn from(err: RemoteError) -> Self {
        Self::bad_gateway(err)
    }
}

impl From<RefreshError> for AppError {
    fn from(err: RefreshError) -> Self {
        Self::bad_gateway(err)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
