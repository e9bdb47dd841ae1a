//! Action requests sent by the SDK to the ingest endpoint.
//!
//! The wire format is one flat JSON object with an `action` discriminator
//! and optional fields. [`IngestAction::from_request`] turns it into a typed
//! enum, enforcing the required fields for each action.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::timestamp::parse_timestamp;
use crate::types::{DbId, Timestamp};

/// Raw request body for `POST /vr-log`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApiRequest {
    #[serde(default)]
    pub action: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub device_id: Option<String>,
    pub content_name: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub session_id: Option<String>,
}

/// Action discriminator values.
pub const ACTION_REGISTER: &str = "register";
pub const ACTION_LOGIN: &str = "login";
pub const ACTION_LOGOUT: &str = "logout";
pub const ACTION_VR_LOG: &str = "vr_log";
pub const ACTION_CONTENT_LOG: &str = "content_log";

/// A validated ingest action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestAction {
    Register {
        username: String,
        password: Option<String>,
    },
    Login {
        username: String,
        password: Option<String>,
    },
    Logout {
        session_id: DbId,
    },
    VrLog {
        device_id: String,
        content_name: String,
        start_time: Timestamp,
        end_time: Option<Timestamp>,
        username: Option<String>,
    },
    ContentLog {
        username: String,
        content_name: String,
        start_time: Timestamp,
        end_time: Option<Timestamp>,
    },
}

impl IngestAction {
    /// Validate a raw request into a typed action.
    pub fn from_request(req: ApiRequest) -> Result<Self, CoreError> {
        match req.action.trim() {
            ACTION_REGISTER => Ok(Self::Register {
                username: require_all(&[("username", &req.username)])?.remove(0),
                password: present(req.password),
            }),
            ACTION_LOGIN => Ok(Self::Login {
                username: require_all(&[("username", &req.username)])?.remove(0),
                password: present(req.password),
            }),
            ACTION_LOGOUT => {
                let raw = require_all(&[("session_id", &req.session_id)])?.remove(0);
                let session_id = raw.parse::<DbId>().map_err(|_| {
                    CoreError::Validation(format!("session_id is not a valid id: '{raw}'"))
                })?;
                Ok(Self::Logout { session_id })
            }
            ACTION_VR_LOG => {
                let mut fields = require_all(&[
                    ("device_id", &req.device_id),
                    ("content_name", &req.content_name),
                    ("start_time", &req.start_time),
                ])?;
                let start_raw = fields.pop().unwrap_or_default();
                let content_name = fields.pop().unwrap_or_default();
                let device_id = fields.pop().unwrap_or_default();
                let (start_time, end_time) = parse_interval(&start_raw, req.end_time.as_deref())?;
                Ok(Self::VrLog {
                    device_id,
                    content_name,
                    start_time,
                    end_time,
                    username: present(req.username),
                })
            }
            ACTION_CONTENT_LOG => {
                let mut fields = require_all(&[
                    ("username", &req.username),
                    ("content_name", &req.content_name),
                    ("start_time", &req.start_time),
                ])?;
                let start_raw = fields.pop().unwrap_or_default();
                let content_name = fields.pop().unwrap_or_default();
                let username = fields.pop().unwrap_or_default();
                let (start_time, end_time) = parse_interval(&start_raw, req.end_time.as_deref())?;
                Ok(Self::ContentLog {
                    username,
                    content_name,
                    start_time,
                    end_time,
                })
            }
            other => Err(CoreError::Validation(format!("Invalid action: '{other}'"))),
        }
    }

    /// Wire name of this action, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Register { .. } => ACTION_REGISTER,
            Self::Login { .. } => ACTION_LOGIN,
            Self::Logout { .. } => ACTION_LOGOUT,
            Self::VrLog { .. } => ACTION_VR_LOG,
            Self::ContentLog { .. } => ACTION_CONTENT_LOG,
        }
    }
}

/// Trimmed, non-empty value or `None`.
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Collect every required field, reporting all missing names at once.
fn require_all(fields: &[(&str, &Option<String>)]) -> Result<Vec<String>, CoreError> {
    let mut values = Vec::with_capacity(fields.len());
    let mut missing = Vec::new();
    for (name, value) in fields {
        match present((*value).clone()) {
            Some(v) => values.push(v),
            None => missing.push(*name),
        }
    }
    if missing.is_empty() {
        Ok(values)
    } else {
        Err(CoreError::Validation(format!(
            "{} required",
            missing.join(", ")
        )))
    }
}

/// Parse a start/end pair, rejecting intervals that end before they start.
pub fn parse_interval(
    start_raw: &str,
    end_raw: Option<&str>,
) -> Result<(Timestamp, Option<Timestamp>), CoreError> {
    let start = parse_timestamp("start_time", start_raw)?;
    let end = match end_raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Some(parse_timestamp("end_time", raw)?),
        None => None,
    };
    if let Some(end) = end {
        if end < start {
            return Err(CoreError::Validation(
                "end_time must not be earlier than start_time".into(),
            ));
        }
    }
    Ok((start, end))
}
