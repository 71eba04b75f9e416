//! Domain layer: parameter store, validated value types, and typed responses (no I/O).

mod params;
mod response;
mod validation;
mod value;

pub use params::{DltManagerType, SmsLanguage, SmsParameters, SmsRoute};
pub use response::{
    DltManagerResponse, DltSender, Fast2smsResponse, RawBody, ResponseBase, SmsSendResponse,
    WalletBalanceResponse,
};
pub use validation::{ValidationError, validate_for_route};
pub use value::{PhoneNumber, Recipients, ScheduleTime, VariableValues};
