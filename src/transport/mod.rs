//! Transport layer: wire-format details (form assembly and response classification).

mod classify;
mod payload;

pub use classify::{MalformedResponseError, classify_response};
pub use payload::{
    BULK_PATH, DLT_MANAGER_PATH, WALLET_PATH, encode_dlt_manager_form, encode_send_form,
};
