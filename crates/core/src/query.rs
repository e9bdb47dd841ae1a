//! Typed read queries for `GET /vr-log`.

use serde::Deserialize;

use crate::error::CoreError;

/// Default row limit when `limit` is absent.
pub const DEFAULT_QUERY_LIMIT: i64 = 100;

/// Hard upper bound on rows returned by a single query.
pub const MAX_QUERY_LIMIT: i64 = 1000;

/// Which table a query reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    VrLogs,
    ContentLogs,
    UserSessions,
    ContentData,
}

impl QueryType {
    /// Parse the `type` parameter. Absent means `vr_logs`.
    pub fn parse(raw: Option<&str>) -> Result<Self, CoreError> {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            None | Some("vr_logs") => Ok(Self::VrLogs),
            Some("content_logs") => Ok(Self::ContentLogs),
            Some("user_sessions") => Ok(Self::UserSessions),
            Some("content_data") => Ok(Self::ContentData),
            Some(other) => Err(CoreError::Validation(format!(
                "Invalid query type: '{other}'"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VrLogs => "vr_logs",
            Self::ContentLogs => "content_logs",
            Self::UserSessions => "user_sessions",
            Self::ContentData => "content_data",
        }
    }
}

/// Raw query-string parameters.
#[derive(Debug, Default, Deserialize)]
pub struct DataQueryParams {
    #[serde(rename = "type")]
    pub query_type: Option<String>,
    pub username: Option<String>,
    pub device_id: Option<String>,
    pub limit: Option<i64>,
}

/// A validated read query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataQuery {
    pub query_type: QueryType,
    pub username: Option<String>,
    pub device_id: Option<String>,
    pub limit: i64,
}

impl DataQuery {
    pub fn from_params(params: DataQueryParams) -> Result<Self, CoreError> {
        let query_type = QueryType::parse(params.query_type.as_deref())?;
        let non_empty = |v: Option<String>| {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        };
        Ok(Self {
            query_type,
            username: non_empty(params.username),
            device_id: non_empty(params.device_id),
            limit: clamp_limit(params.limit, DEFAULT_QUERY_LIMIT, MAX_QUERY_LIMIT),
        })
    }
}

/// Clamp a user-provided limit to `[1, max]`, using `default` when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_type_defaults_to_vr_logs() {
        let q = DataQuery::from_params(DataQueryParams::default()).unwrap();
        assert_eq!(q.query_type, QueryType::VrLogs);
        assert_eq!(q.limit, DEFAULT_QUERY_LIMIT);
    }

    #[test]
    fn limit_is_clamped() {
        assert_eq!(clamp_limit(Some(5000), 100, 1000), 1000);
        assert_eq!(clamp_limit(Some(0), 100, 1000), 1);
        assert_eq!(clamp_limit(Some(-3), 100, 1000), 1);
        assert_eq!(clamp_limit(Some(42), 100, 1000), 42);
    }

    #[test]
    fn blank_filters_are_dropped() {
        let q = DataQuery::from_params(DataQueryParams {
            query_type: Some("user_sessions".into()),
            username: Some("  ".into()),
            device_id: None,
            limit: None,
        })
        .unwrap();
        assert_eq!(q.query_type, QueryType::UserSessions);
        assert!(q.username.is_none());
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!(QueryType::parse(Some("passwords")).is_err());
    }
}
