//! Response envelope shared by every command and query handler.
//!
//! Envelopes are built in one step by the constructor for the branch a handler
//! ends in. Nothing hands a half-built response between functions.

use serde::{Serialize, Serializer};

use super::employee::EmployeeRecord;

/// Single field-level or operation-level error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    pub error_message: String,
    pub property_name: Option<String>,
    pub error_code: Option<String>,
    pub resource_name: Option<String>,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error_message: message.into(),
            property_name: None,
            error_code: None,
            resource_name: None,
        }
    }

    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.property_name = Some(property.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.error_code = Some(code.into());
        self
    }
}

/// Outcome of validation: valid iff there are no errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResponse {
    errors: Vec<ValidationError>,
}

impl ValidationResponse {
    pub fn new(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    pub fn single(error: ValidationError) -> Self {
        Self { errors: vec![error] }
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// True if any error carries exactly this message.
    pub fn has_message(&self, message: &str) -> bool {
        self.errors.iter().any(|e| e.error_message == message)
    }
}

/// Status attached to an envelope. Serialized as the numeric HTTP code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    Ok,
    BadRequest,
    NotFound,
    InternalServerError,
}

impl StatusCode {
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::InternalServerError => 500,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, StatusCode::Ok)
    }
}

impl Serialize for StatusCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.as_u16())
    }
}

/// Uniform response wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    validation_result: ValidationResponse,
    result: Option<T>,
    status_code: StatusCode,
    count: usize,
}

/// Response of the Create and Update commands.
pub type CommandResponse = Envelope<EmployeeRecord>;

/// Response of the query handlers.
pub type QueryResponse<T> = Envelope<T>;

impl<T> Envelope<T> {
    /// Successful response carrying `result`.
    pub fn ok(result: T) -> Self {
        Self {
            validation_result: ValidationResponse::default(),
            result: Some(result),
            status_code: StatusCode::Ok,
            count: 0,
        }
    }

    /// Validation failed; always a bad request.
    pub fn invalid(validation: ValidationResponse) -> Self {
        Self {
            validation_result: validation,
            result: None,
            status_code: StatusCode::BadRequest,
            count: 0,
        }
    }

    /// Single-error failure with the given status.
    pub fn failure(status_code: StatusCode, error: ValidationError) -> Self {
        Self {
            validation_result: ValidationResponse::single(error),
            result: None,
            status_code,
            count: 0,
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn validation_result(&self) -> &ValidationResponse {
        &self.validation_result
    }

    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    pub fn status_code(&self) -> StatusCode {
        self.status_code
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_valid(&self) -> bool {
        self.validation_result.is_valid()
    }
}

impl<T> Envelope<Vec<T>> {
    /// Successful list response; `count` is the number of returned items.
    pub fn list(items: Vec<T>) -> Self {
        let count = items.len();
        Self::ok(items).with_count(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_json_shape() {
        let envelope: Envelope<String> = Envelope::failure(
            StatusCode::BadRequest,
            ValidationError::new("Email already exists").with_property("Email"),
        );
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["statusCode"], 400);
        assert_eq!(json["count"], 0);
        assert!(json["result"].is_null());
        let error = &json["validationResult"]["errors"][0];
        assert_eq!(error["errorMessage"], "Email already exists");
        assert_eq!(error["propertyName"], "Email");
        assert!(error["errorCode"].is_null());
        assert!(error["resourceName"].is_null());
    }

    #[test]
    fn test_list_counts_items() {
        let envelope = Envelope::list(vec![1, 2, 3]);
        assert_eq!(envelope.count(), 3);
        assert_eq!(envelope.status_code(), StatusCode::Ok);
        assert!(envelope.is_valid());
    }

    #[test]
    fn test_invalid_is_bad_request() {
        let validation = ValidationResponse::single(ValidationError::new("'Name' must not be empty."));
        let envelope: Envelope<()> = Envelope::invalid(validation);
        assert_eq!(envelope.status_code(), StatusCode::BadRequest);
        assert!(!envelope.is_valid());
        assert!(envelope.result().is_none());
    }

    #[test]
    fn test_status_code_numbers() {
        assert_eq!(StatusCode::Ok.as_u16(), 200);
        assert_eq!(StatusCode::NotFound.as_u16(), 404);
        assert_eq!(StatusCode::InternalServerError.as_u16(), 500);
        assert!(!StatusCode::BadRequest.is_success());
    }
}
