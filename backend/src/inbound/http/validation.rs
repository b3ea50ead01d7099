//! Shared validation helpers for inbound HTTP adapters.

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::domain::Error;
use crate::domain::collab::RequestStatus;
use crate::domain::ports::{DEFAULT_PAGE_LIMIT, Page};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidTimestamp,
    InvalidStatus,
    InvalidPage,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidTimestamp => "invalid_timestamp",
            ErrorCode::InvalidStatus => "invalid_status",
            ErrorCode::InvalidPage => "invalid_page",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, message: String, code: ErrorCode, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

/// Parse an RFC 3339 timestamp, normalising to UTC.
pub(crate) fn parse_rfc3339_timestamp(
    value: String,
    field: FieldName,
) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(&value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| {
            field_error(
                field,
                format!("{} must be an RFC 3339 timestamp", field.as_str()),
                ErrorCode::InvalidTimestamp,
                &value,
            )
        })
}

/// Parse an optional RFC 3339 timestamp.
pub(crate) fn parse_optional_rfc3339_timestamp(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<DateTime<Utc>>, Error> {
    value
        .map(|value| parse_rfc3339_timestamp(value, field))
        .transpose()
}

/// Parse a status keyword.
pub(crate) fn parse_status(value: String, field: FieldName) -> Result<RequestStatus, Error> {
    value.parse::<RequestStatus>().map_err(|_| {
        field_error(
            field,
            format!(
                "{} must be one of PENDING, ACCEPTED, DECLINED, CANCELLED, COMPLETED",
                field.as_str()
            ),
            ErrorCode::InvalidStatus,
            &value,
        )
    })
}

/// Parse an optional status keyword.
pub(crate) fn parse_optional_status(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<RequestStatus>, Error> {
    value.map(|value| parse_status(value, field)).transpose()
}

/// Build a pagination window from optional query parameters.
pub(crate) fn parse_page(limit: Option<i64>, offset: Option<i64>) -> Result<Page, Error> {
    let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT);
    let offset = offset.unwrap_or(0);
    Page::new(limit, offset).map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({
            "field": "limit/offset",
            "code": ErrorCode::InvalidPage.as_str(),
        }))
    })
}
