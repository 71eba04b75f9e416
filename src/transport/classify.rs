use serde_json::Value;

use crate::domain::{
    DltManagerResponse, Fast2smsResponse, RawBody, ResponseBase, SmsSendResponse,
    WalletBalanceResponse,
};

const DEFAULT_MESSAGE: &str = "No message provided";

#[derive(Debug, thiserror::Error)]
pub enum MalformedResponseError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response body is not a JSON object")]
    NotAnObject,

    #[error("response body is empty")]
    EmptyBody,

    #[error("response must contain a \"return\" or \"success\" key")]
    MissingSuccessFlag,

    #[error("\"return\" or \"success\" must be a boolean")]
    NonBooleanSuccessFlag,

    #[error("\"status_code\" must be an integer")]
    NonIntegerStatusCode,

    #[error("expected a {expected} response, got a different shape")]
    UnexpectedShape { expected: &'static str },
}

/// Classify a raw response body into exactly one typed variant.
pub fn classify_response(body: &str) -> Result<Fast2smsResponse, MalformedResponseError> {
    let value: Value = serde_json::from_str(body)?;
    let Value::Object(raw) = value else {
        return Err(MalformedResponseError::NotAnObject);
    };
    classify_body(raw)
}

/// Classify an already parsed body.
///
/// Shape predicates are checked in a fixed order and the first match wins:
/// `wallet`, then `request_id`, then `success` together with `data`, then the
/// generic fallback. The ordering is part of the crate's contract; the
/// provider itself does not tag response shapes.
pub fn classify_body(raw: RawBody) -> Result<Fast2smsResponse, MalformedResponseError> {
    if raw.is_empty() {
        return Err(MalformedResponseError::EmptyBody);
    }

    let flag = raw
        .get("return")
        .or_else(|| raw.get("success"))
        .ok_or(MalformedResponseError::MissingSuccessFlag)?;
    let success = flag
        .as_bool()
        .ok_or(MalformedResponseError::NonBooleanSuccessFlag)?;

    let error_code = match raw.get("status_code") {
        None | Some(Value::Null) => None,
        Some(value) => Some(
            value
                .as_i64()
                .ok_or(MalformedResponseError::NonIntegerStatusCode)?,
        ),
    };

    let message = extract_message(&raw);
    let base = ResponseBase {
        success,
        message,
        error_code,
        raw,
    };

    if base.raw.contains_key("wallet") {
        let balance = number_or_string_f64(base.raw.get("wallet"));
        let sms_count = number_or_string_i64(base.raw.get("sms_count"));
        return Ok(Fast2smsResponse::WalletBalance(WalletBalanceResponse {
            base,
            balance,
            sms_count,
        }));
    }

    if let Some(request_id) = base.raw.get("request_id") {
        let request_id = match request_id {
            Value::String(value) => value.clone(),
            other => other.to_string(),
        };
        let messages = match base.raw.get("message") {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(value) => value.clone(),
                    other => other.to_string(),
                })
                .collect(),
            _ => Vec::new(),
        };
        return Ok(Fast2smsResponse::SmsSend(SmsSendResponse {
            base,
            request_id,
            messages,
        }));
    }

    if base.raw.contains_key("success") && base.raw.contains_key("data") {
        let data = match base.raw.get("data") {
            Some(Value::Array(rows)) => rows
                .iter()
                .filter_map(|row| row.as_object().cloned())
                .collect(),
            _ => Vec::new(),
        };
        return Ok(Fast2smsResponse::DltManager(DltManagerResponse {
            base,
            data,
        }));
    }

    Ok(Fast2smsResponse::Generic(base))
}

/// Extract a display message from a body that is inconsistent about whether
/// `message` is a scalar or a keyed collection of per-recipient statuses.
fn extract_message(raw: &RawBody) -> String {
    match raw.get("message") {
        Some(Value::String(value)) => return value.clone(),
        Some(Value::Array(items)) => {
            if let Some(first) = items.first() {
                if let Some(value) = scalar_to_string(first) {
                    return value;
                }
            }
        }
        Some(Value::Object(map)) => {
            if let Some((_, first)) = map.iter().next() {
                if let Some(value) = scalar_to_string(first) {
                    return value;
                }
            }
        }
        _ => {}
    }
    DEFAULT_MESSAGE.to_owned()
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(value) => Some(value.clone()),
        Value::Number(value) => Some(value.to_string()),
        _ => None,
    }
}

fn number_or_string_f64(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(value) => value.as_f64(),
        Value::String(value) => value.trim().parse().ok(),
        _ => None,
    }
}

fn number_or_string_i64(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(value) => value.as_i64(),
        Value::String(value) => value.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_or_non_object_bodies_are_rejected() {
        assert!(matches!(
            classify_response("{}"),
            Err(MalformedResponseError::EmptyBody)
        ));
        assert!(matches!(
            classify_response("[1, 2]"),
            Err(MalformedResponseError::NotAnObject)
        ));
        assert!(matches!(
            classify_response("{ not json }"),
            Err(MalformedResponseError::Json(_))
        ));
    }

    #[test]
    fn a_success_flag_is_mandatory_and_must_be_boolean() {
        assert!(matches!(
            classify_response(r#"{"message": "hi"}"#),
            Err(MalformedResponseError::MissingSuccessFlag)
        ));
        assert!(matches!(
            classify_response(r#"{"return": "true"}"#),
            Err(MalformedResponseError::NonBooleanSuccessFlag)
        ));
        assert!(matches!(
            classify_response(r#"{"success": 1}"#),
            Err(MalformedResponseError::NonBooleanSuccessFlag)
        ));
    }

    #[test]
    fn status_code_must_be_an_integer_when_present() {
        assert!(matches!(
            classify_response(r#"{"return": true, "status_code": "abc"}"#),
            Err(MalformedResponseError::NonIntegerStatusCode)
        ));
        assert!(matches!(
            classify_response(r#"{"return": true, "status_code": 200.5}"#),
            Err(MalformedResponseError::NonIntegerStatusCode)
        ));

        let response =
            classify_response(r#"{"return": false, "status_code": 412, "message": "Invalid Authentication"}"#)
                .unwrap();
        assert!(matches!(response, Fast2smsResponse::Generic(_)));
        assert!(!response.is_success());
        assert_eq!(response.error_code(), Some(412));
        assert_eq!(response.message(), "Invalid Authentication");

        // A null status_code counts as absent.
        let response = classify_response(r#"{"return": true, "status_code": null}"#).unwrap();
        assert_eq!(response.error_code(), None);
    }

    #[test]
    fn wallet_key_classifies_as_wallet_balance() {
        let response = classify_response(r#"{"return": true, "wallet": "500.50"}"#).unwrap();
        let wallet = response.as_wallet_balance().unwrap();
        assert_eq!(wallet.balance, Some(500.50));
        assert_eq!(wallet.sms_count, None);

        let response =
            classify_response(r#"{"return": true, "wallet": 12.5, "sms_count": "73"}"#).unwrap();
        let wallet = response.as_wallet_balance().unwrap();
        assert_eq!(wallet.balance, Some(12.5));
        assert_eq!(wallet.sms_count, Some(73));

        let response = classify_response(r#"{"return": true, "wallet": [1]}"#).unwrap();
        assert_eq!(response.as_wallet_balance().unwrap().balance, None);
    }

    #[test]
    fn request_id_key_classifies_as_sms_send() {
        let body = r#"
        {
          "return": true,
          "request_id": "lwdtp7cjyqxvfe9",
          "message": ["SMS sent successfully."]
        }
        "#;
        let response = classify_response(body).unwrap();
        let send = response.as_sms_send().unwrap();
        assert_eq!(send.request_id, "lwdtp7cjyqxvfe9");
        assert_eq!(send.messages, ["SMS sent successfully."]);
        assert_eq!(send.base.message, "SMS sent successfully.");

        let response = classify_response(r#"{"return": true, "request_id": 12345}"#).unwrap();
        assert_eq!(response.as_sms_send().unwrap().request_id, "12345");
    }

    #[test]
    fn success_and_data_together_classify_as_dlt_manager() {
        let body = r#"
        {
          "success": true,
          "data": [
            {"sender_id": "FSTSMS", "entity_id": "1234567890", "entity_name": "Acme"}
          ]
        }
        "#;
        let response = classify_response(body).unwrap();
        let manager = response.as_dlt_manager().unwrap();
        assert_eq!(manager.data.len(), 1);
        assert_eq!(manager.senders()[0].sender_id.as_deref(), Some("FSTSMS"));

        // `return` + `data` without a `success` key stays generic.
        let response = classify_response(r#"{"return": true, "data": []}"#).unwrap();
        assert!(matches!(response, Fast2smsResponse::Generic(_)));
    }

    #[test]
    fn classification_order_is_wallet_first() {
        let body = r#"{"return": true, "wallet": "10.0", "request_id": "abc"}"#;
        let response = classify_response(body).unwrap();
        assert!(response.as_wallet_balance().is_some());
    }

    #[test]
    fn message_extraction_falls_back_in_order() {
        let response = classify_response(r#"{"return": true, "message": "plain"}"#).unwrap();
        assert_eq!(response.message(), "plain");

        let response =
            classify_response(r#"{"return": true, "message": ["first", "second"]}"#).unwrap();
        assert_eq!(response.message(), "first");

        let response =
            classify_response(r#"{"return": true, "message": {"9999999999": "Delivered"}}"#)
                .unwrap();
        assert_eq!(response.message(), "Delivered");

        let response = classify_response(r#"{"return": true, "message": []}"#).unwrap();
        assert_eq!(response.message(), "No message provided");

        let response = classify_response(r#"{"return": true}"#).unwrap();
        assert_eq!(response.message(), "No message provided");
    }
}
