//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;

use crate::domain::{Error, PropertyStatus};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingHeader,
    UnknownStatus,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingHeader => "missing_header",
            ErrorCode::UnknownStatus => "unknown_status",
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

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_header_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required header: {field}"))
        .with_code(ErrorCode::MissingHeader)
}

/// Parse a lifecycle status name as sent by clients.
pub(crate) fn parse_status(value: &str, field: FieldName) -> Result<PropertyStatus, Error> {
    value.trim().parse::<PropertyStatus>().map_err(|_| {
        let field = field.as_str();
        ValidationError::new(
            field,
            format!("{field} must be one of pending, published, inactive, finalized"),
        )
        .with_value(ErrorCode::UnknownStatus, value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode as DomainErrorCode;
    use rstest::rstest;

    const STATUS: FieldName = FieldName::new("status");

    #[rstest]
    #[case("published", PropertyStatus::Published)]
    #[case(" inactive ", PropertyStatus::Inactive)]
    fn parses_known_statuses(#[case] raw: &str, #[case] expected: PropertyStatus) {
        assert_eq!(parse_status(raw, STATUS).expect("status"), expected);
    }

    #[rstest]
    fn unknown_status_reports_field_and_value() {
        let err = parse_status("archived", STATUS).expect_err("unknown");

        assert_eq!(err.code(), DomainErrorCode::InvalidRequest);
        assert_eq!(
            err.details(),
            Some(&json!({"field": "status", "value": "archived", "code": "unknown_status"}))
        );
    }

    #[rstest]
    fn missing_header_names_the_header() {
        let err = missing_header_error(FieldName::new("Content-Type"));
        assert_eq!(
            err.details(),
            Some(&json!({"field": "Content-Type", "code": "missing_header"}))
        );
    }
}
