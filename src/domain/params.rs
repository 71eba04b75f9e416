use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::value::{Recipients, ScheduleTime, VariableValues};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Delivery route selecting cost, compliance model, and required fields.
pub enum SmsRoute {
    /// DLT approved transactional/promotional SMS.
    #[serde(rename = "dlt")]
    Dlt,
    /// One-time password SMS.
    #[serde(rename = "otp")]
    Otp,
    /// Quick SMS without DLT registration (random sender id, higher cost).
    #[serde(rename = "q")]
    Quick,
    /// DLT SMS without Fast2SMS content verification.
    #[serde(rename = "dlt_manual")]
    DltManual,
}

impl SmsRoute {
    /// Form field name used by Fast2SMS (`route`).
    pub const FIELD: &'static str = "route";

    /// Value sent on the wire for this route.
    pub fn as_wire_value(self) -> &'static str {
        match self {
            Self::Dlt => "dlt",
            Self::Otp => "otp",
            Self::Quick => "q",
            Self::DltManual => "dlt_manual",
        }
    }

    /// Map a wire value back to a route, e.g. when reading configuration.
    pub fn from_wire_value(value: &str) -> Option<Self> {
        Some(match value {
            "dlt" => Self::Dlt,
            "otp" => Self::Otp,
            "q" => Self::Quick,
            "dlt_manual" => Self::DltManual,
            _ => return None,
        })
    }
}

impl fmt::Display for SmsRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire_value())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
/// Message language for Quick SMS.
pub enum SmsLanguage {
    #[default]
    #[serde(rename = "english")]
    English,
    /// Unicode encoding for regional languages.
    #[serde(rename = "unicode")]
    Unicode,
}

impl SmsLanguage {
    /// Form field name used by Fast2SMS (`language`).
    pub const FIELD: &'static str = "language";

    /// Value sent on the wire for this language.
    pub fn as_wire_value(self) -> &'static str {
        match self {
            Self::English => "english",
            Self::Unicode => "unicode",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Kind of DLT metadata requested from `/dlt_manager`.
pub enum DltManagerType {
    /// Registered sender ids and their entities.
    Sender,
    /// Registered content templates.
    Template,
}

impl DltManagerType {
    /// Form field name used by Fast2SMS (`type`).
    pub const FIELD: &'static str = "type";

    /// Value sent on the wire for this lookup type.
    pub fn as_wire_value(self) -> &'static str {
        match self {
            Self::Sender => "sender",
            Self::Template => "template",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Accumulated per-message configuration.
///
/// One instance backs one client and is reused across submissions; the client
/// swaps it for a fresh defaulted copy on every terminal outcome. The struct
/// is a plain value and serializes as the transferable snapshot handed to
/// deferred/queued senders, which rebuild an identical store from it and run
/// the same validate/assemble/submit pipeline.
pub struct SmsParameters {
    numbers: Vec<String>,
    message: Option<String>,
    sender_id: Option<String>,
    route: SmsRoute,
    entity_id: Option<String>,
    template_id: Option<String>,
    variables_values: Option<String>,
    flash: bool,
    schedule_time: Option<ScheduleTime>,
    language: SmsLanguage,
}

impl SmsParameters {
    /// Create a store holding the configured defaults.
    pub fn new(default_sender_id: impl Into<String>, default_route: SmsRoute) -> Self {
        let sender_id = default_sender_id.into();
        Self {
            numbers: Vec::new(),
            message: None,
            sender_id: if sender_id.is_empty() {
                None
            } else {
                Some(sender_id)
            },
            route: default_route,
            entity_id: None,
            template_id: None,
            variables_values: None,
            flash: false,
            schedule_time: None,
            language: SmsLanguage::English,
        }
    }

    /// Set the recipient number(s); a single number or a list.
    pub fn set_numbers(&mut self, numbers: impl Into<Recipients>) -> &mut Self {
        self.numbers = numbers.into().into_vec();
        self
    }

    /// Set the message content (Quick), OTP code (OTP), or DLT message id.
    pub fn set_message(&mut self, message: impl Into<String>) -> &mut Self {
        self.message = Some(message.into());
        self
    }

    /// Set the DLT approved sender id (3-6 characters).
    pub fn set_sender_id(&mut self, sender_id: impl Into<String>) -> &mut Self {
        self.sender_id = Some(sender_id.into());
        self
    }

    /// Drop the sender id, including the configured default.
    pub fn clear_sender_id(&mut self) -> &mut Self {
        self.sender_id = None;
        self
    }

    /// Set the delivery route.
    pub fn set_route(&mut self, route: SmsRoute) -> &mut Self {
        self.route = route;
        self
    }

    /// Set the DLT principal entity id.
    pub fn set_entity_id(&mut self, entity_id: impl Into<String>) -> &mut Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Set the DLT content template id.
    pub fn set_template_id(&mut self, template_id: impl Into<String>) -> &mut Self {
        self.template_id = Some(template_id.into());
        self
    }

    /// Set template variable values; lists are pipe-joined immediately.
    pub fn set_variables_values(&mut self, values: impl Into<VariableValues>) -> &mut Self {
        self.variables_values = Some(values.into().into_string());
        self
    }

    /// Toggle flash delivery.
    pub fn set_flash(&mut self, flash: bool) -> &mut Self {
        self.flash = flash;
        self
    }

    /// Schedule delivery at a future time.
    pub fn set_schedule_time(&mut self, time: ScheduleTime) -> &mut Self {
        self.schedule_time = Some(time);
        self
    }

    /// Set the message language.
    pub fn set_language(&mut self, language: SmsLanguage) -> &mut Self {
        self.language = language;
        self
    }

    /// Recipient numbers in submission order.
    pub fn numbers(&self) -> &[String] {
        &self.numbers
    }

    /// Message content, OTP code, or DLT message id.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Sender id, explicit or defaulted.
    pub fn sender_id(&self) -> Option<&str> {
        self.sender_id.as_deref()
    }

    /// Selected route.
    pub fn route(&self) -> SmsRoute {
        self.route
    }

    /// DLT principal entity id.
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// DLT content template id.
    pub fn template_id(&self) -> Option<&str> {
        self.template_id.as_deref()
    }

    /// Pipe-joined template variable values.
    pub fn variables_values(&self) -> Option<&str> {
        self.variables_values.as_deref()
    }

    /// Whether the message is sent as a flash message.
    pub fn flash(&self) -> bool {
        self.flash
    }

    /// Scheduled delivery time, if any.
    pub fn schedule_time(&self) -> Option<&ScheduleTime> {
        self.schedule_time.as_ref()
    }

    /// Selected message language.
    pub fn language(&self) -> SmsLanguage {
        self.language
    }
}
