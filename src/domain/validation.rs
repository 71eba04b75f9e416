use std::fmt;

use crate::domain::params::{SmsParameters, SmsRoute};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingRecipients,
    MissingField {
        field: &'static str,
        route: SmsRoute,
    },
    InvalidScheduleTime {
        input: String,
    },
    InvalidPhoneNumber {
        input: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRecipients => {
                write!(f, "recipient number(s) are required; use to()")
            }
            Self::MissingField { field, route } => {
                write!(f, "{field} is required for route {route}")
            }
            Self::InvalidScheduleTime { input } => {
                write!(
                    f,
                    "invalid schedule time: {input} (expected YYYY-MM-DD-HH-MM)"
                )
            }
            Self::InvalidPhoneNumber { input } => {
                write!(
                    f,
                    "invalid phone number: {input} (expected a 10-digit Indian mobile number)"
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check that the accumulated parameters are submittable for their route.
///
/// Rules are applied in a fixed order and the first violation wins, so a
/// request missing several fields always reports the same one. Recipients are
/// checked for every route; the remaining requirements branch on the route the
/// same way the wire protocol does.
pub fn validate_for_route(params: &SmsParameters) -> Result<(), ValidationError> {
    if params.numbers().is_empty() {
        return Err(ValidationError::MissingRecipients);
    }

    let route = params.route();
    match route {
        SmsRoute::Quick => require(params.message(), "Message content", route),
        SmsRoute::Otp => require(params.message(), "OTP value", route),
        SmsRoute::Dlt | SmsRoute::DltManual => {
            require(params.template_id(), "Template ID", route)?;
            require(params.variables_values(), "Variables values", route)?;
            require(params.sender_id(), "Sender ID", route)?;
            if route == SmsRoute::DltManual {
                require(params.entity_id(), "Entity ID", route)?;
            }
            Ok(())
        }
    }
}

fn require(
    value: Option<&str>,
    field: &'static str,
    route: SmsRoute,
) -> Result<(), ValidationError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(()),
        _ => Err(ValidationError::MissingField { field, route }),
    }
}
