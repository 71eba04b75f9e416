use serde_json::{Map, Value};

/// Raw response body as returned by Fast2SMS.
pub type RawBody = Map<String, Value>;

#[derive(Debug, Clone, PartialEq)]
/// Attributes shared by every classified response.
pub struct ResponseBase {
    /// Success indicator derived from the `return` or `success` key.
    pub success: bool,
    /// Human-readable message extracted from the body (with fallbacks).
    pub message: String,
    /// Provider status code (`status_code`), when present.
    pub error_code: Option<i64>,
    /// The complete raw body for fields this crate does not model.
    pub raw: RawBody,
}

impl ResponseBase {
    /// Whether the API call was reported successful.
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Look up an unmodeled field in the raw body.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.raw.get(key)
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Wallet balance lookup result (`/wallet`).
pub struct WalletBalanceResponse {
    pub base: ResponseBase,
    /// Current wallet balance; `wallet` arrives as a string or a number.
    pub balance: Option<f64>,
    /// Remaining SMS count, when the provider includes it.
    pub sms_count: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
/// Accepted send result (`/bulkV2`).
pub struct SmsSendResponse {
    pub base: ResponseBase,
    /// Unique identifier of the accepted request.
    pub request_id: String,
    /// Per-recipient status lines, best-effort.
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
/// DLT metadata lookup result (`/dlt_manager`).
pub struct DltManagerResponse {
    pub base: ResponseBase,
    /// Rows of the `data` array; shape depends on the lookup type.
    pub data: Vec<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One registered sender row derived from a DLT manager lookup.
pub struct DltSender {
    pub sender_id: Option<String>,
    pub entity_id: Option<String>,
    pub entity_name: Option<String>,
}

impl DltManagerResponse {
    /// Registered senders, normalized to id/entity/entity-name triples.
    pub fn senders(&self) -> Vec<DltSender> {
        self.data
            .iter()
            .map(|row| DltSender {
                sender_id: string_field(row, "sender_id"),
                entity_id: string_field(row, "entity_id"),
                entity_name: string_field(row, "entity_name"),
            })
            .collect()
    }

    /// All registered templates across every row, flattened.
    pub fn templates(&self) -> Vec<Value> {
        let mut templates = Vec::new();
        for row in &self.data {
            if let Some(Value::Array(items)) = row.get("templates") {
                templates.extend(items.iter().cloned());
            }
        }
        templates
    }
}

fn string_field(row: &Map<String, Value>, key: &str) -> Option<String> {
    match row.get(key)? {
        Value::String(value) => Some(value.clone()),
        Value::Number(value) => Some(value.to_string()),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Classified Fast2SMS response.
///
/// The provider does not tag response shapes, so the variant is chosen by key
/// presence in a fixed order (wallet, then request id, then DLT data); see the
/// transport layer for the classification rules.
pub enum Fast2smsResponse {
    WalletBalance(WalletBalanceResponse),
    SmsSend(SmsSendResponse),
    DltManager(DltManagerResponse),
    Generic(ResponseBase),
}

impl Fast2smsResponse {
    /// Attributes shared by every variant.
    pub fn base(&self) -> &ResponseBase {
        match self {
            Self::WalletBalance(response) => &response.base,
            Self::SmsSend(response) => &response.base,
            Self::DltManager(response) => &response.base,
            Self::Generic(base) => base,
        }
    }

    /// Whether the API call was reported successful.
    pub fn is_success(&self) -> bool {
        self.base().success
    }

    /// Extracted human-readable message.
    pub fn message(&self) -> &str {
        &self.base().message
    }

    /// Provider status code, when present.
    pub fn error_code(&self) -> Option<i64> {
        self.base().error_code
    }

    /// The complete raw body.
    pub fn raw(&self) -> &RawBody {
        &self.base().raw
    }

    /// Borrow as a wallet balance result, if that is what was classified.
    pub fn as_wallet_balance(&self) -> Option<&WalletBalanceResponse> {
        match self {
            Self::WalletBalance(response) => Some(response),
            _ => None,
        }
    }

    /// Borrow as a send result, if that is what was classified.
    pub fn as_sms_send(&self) -> Option<&SmsSendResponse> {
        match self {
            Self::SmsSend(response) => Some(response),
            _ => None,
        }
    }

    /// Borrow as a DLT manager result, if that is what was classified.
    pub fn as_dlt_manager(&self) -> Option<&DltManagerResponse> {
        match self {
            Self::DltManager(response) => Some(response),
            _ => None,
        }
    }
}
