use serde_json::Value;

use crate::client::Fast2smsError;
use crate::domain::SmsSendResponse;

/// Observer for the client's fire-and-forget integration events.
///
/// Listeners are invoked synchronously after the outcome is known and before
/// it is returned to the caller; they must not block. Every method has a
/// no-op default, so implementors override only what they subscribe to.
pub trait EventListener: Send + Sync {
    /// A message was dispatched and the provider acknowledged it with a
    /// request id.
    fn sms_sent(&self, payload: &[(String, String)], response: &SmsSendResponse) {
        let _ = (payload, response);
    }

    /// A dispatch failed after the payload was assembled. `response` carries
    /// the raw provider body when one was received before the failure.
    fn sms_failed(&self, payload: &[(String, String)], error: &Fast2smsError, response: Option<&Value>) {
        let _ = (payload, error, response);
    }

    /// A balance check came back at or below the watched threshold.
    fn low_balance(&self, balance: f64, threshold: f64) {
        let _ = (balance, threshold);
    }
}
