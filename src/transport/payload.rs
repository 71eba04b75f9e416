use crate::domain::{DltManagerType, ScheduleTime, SmsLanguage, SmsParameters, SmsRoute};

/// Primary send endpoint.
pub const BULK_PATH: &str = "/bulkV2";
/// Wallet balance endpoint.
pub const WALLET_PATH: &str = "/wallet";
/// DLT metadata lookup endpoint.
pub const DLT_MANAGER_PATH: &str = "/dlt_manager";

const NUMBERS: &str = "numbers";
const FLASH: &str = "flash";
const SENDER_ID: &str = "sender_id";
const MESSAGE: &str = "message";
const ENTITY_ID: &str = "entity_id";
const TEMPLATE_ID: &str = "template_id";
const VARIABLES_VALUES: &str = "variables_values";

/// Assemble the flat form payload for a validated send.
///
/// The transport is multipart-form flavored, so every value is already a
/// string. Must run after route validation; absent optional fields are
/// silently omitted rather than sent empty.
pub fn encode_send_form(params: &SmsParameters) -> Vec<(String, String)> {
    let mut form = vec![
        (
            SmsRoute::FIELD.to_owned(),
            params.route().as_wire_value().to_owned(),
        ),
        (NUMBERS.to_owned(), params.numbers().join(",")),
        (
            FLASH.to_owned(),
            if params.flash() { "1" } else { "0" }.to_owned(),
        ),
    ];

    match params.route() {
        SmsRoute::Dlt | SmsRoute::DltManual => {
            push_present(&mut form, SENDER_ID, params.sender_id());
            push_present(&mut form, MESSAGE, params.message());
            push_present(&mut form, ENTITY_ID, params.entity_id());
            push_present(&mut form, TEMPLATE_ID, params.template_id());
            push_present(&mut form, VARIABLES_VALUES, params.variables_values());
        }
        // The OTP code travels in variables_values.
        SmsRoute::Otp => push_present(&mut form, VARIABLES_VALUES, params.message()),
        SmsRoute::Quick => {
            push_present(&mut form, MESSAGE, params.message());
            form.push((
                SmsLanguage::FIELD.to_owned(),
                params.language().as_wire_value().to_owned(),
            ));
        }
    }

    if let Some(time) = params.schedule_time() {
        form.push((ScheduleTime::FIELD.to_owned(), time.as_str().to_owned()));
    }

    form
}

/// Assemble the form payload for a DLT metadata lookup.
pub fn encode_dlt_manager_form(lookup: DltManagerType) -> Vec<(String, String)> {
    vec![(
        DltManagerType::FIELD.to_owned(),
        lookup.as_wire_value().to_owned(),
    )]
}

fn push_present(form: &mut Vec<(String, String)>, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        form.push((key.to_owned(), value.to_owned()));
    }
}
