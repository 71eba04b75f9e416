use chrono::NaiveDateTime;
use phonenumber::country;
use serde::{Deserialize, Serialize};

use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
/// Scheduled delivery time (`schedule_time`).
///
/// Invariant: always stored in the fixed `YYYY-MM-DD-HH-MM` textual form
/// Fast2SMS expects. Strings in any other shape are rejected; structured
/// timestamps are formatted into the pattern before storage.
pub struct ScheduleTime(String);

impl ScheduleTime {
    /// Form field name used by Fast2SMS (`schedule_time`).
    pub const FIELD: &'static str = "schedule_time";

    /// Create a schedule time from an already formatted string.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if !is_schedule_pattern(trimmed) {
            return Err(ValidationError::InvalidScheduleTime { input: value });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Create a schedule time from a wall-clock timestamp.
    ///
    /// Seconds are dropped; Fast2SMS schedules at minute granularity.
    pub fn from_datetime(value: NaiveDateTime) -> Self {
        Self(value.format("%Y-%m-%d-%H-%M").to_string())
    }

    /// Borrow the formatted value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<NaiveDateTime> for ScheduleTime {
    fn from(value: NaiveDateTime) -> Self {
        Self::from_datetime(value)
    }
}

impl TryFrom<String> for ScheduleTime {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ScheduleTime> for String {
    fn from(value: ScheduleTime) -> Self {
        value.0
    }
}

fn is_schedule_pattern(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != 16 {
        return false;
    }
    bytes.iter().enumerate().all(|(idx, byte)| match idx {
        4 | 7 | 10 | 13 => *byte == b'-',
        _ => byte.is_ascii_digit(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Recipient list accepted by `to()`.
///
/// Normalizes a single number or a list of numbers into one shape. Values are
/// passed through as-is; Fast2SMS expects bare 10-digit Indian mobile numbers,
/// and [`PhoneNumber`] is the opt-in way to enforce that.
pub struct Recipients(Vec<String>);

impl Recipients {
    /// Consume into the normalized list.
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<&str> for Recipients {
    fn from(value: &str) -> Self {
        Self(vec![value.to_owned()])
    }
}

impl From<String> for Recipients {
    fn from(value: String) -> Self {
        Self(vec![value])
    }
}

impl From<Vec<String>> for Recipients {
    fn from(value: Vec<String>) -> Self {
        Self(value)
    }
}

impl From<Vec<&str>> for Recipients {
    fn from(value: Vec<&str>) -> Self {
        Self(value.into_iter().map(str::to_owned).collect())
    }
}

impl From<&[&str]> for Recipients {
    fn from(value: &[&str]) -> Self {
        Self(value.iter().map(|it| (*it).to_owned()).collect())
    }
}

impl From<PhoneNumber> for Recipients {
    fn from(value: PhoneNumber) -> Self {
        Self(vec![value.national().to_owned()])
    }
}

impl From<Vec<PhoneNumber>> for Recipients {
    fn from(value: Vec<PhoneNumber>) -> Self {
        Self(
            value
                .into_iter()
                .map(|it| it.national().to_owned())
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Template variable values accepted by `variables()`.
///
/// A list is joined with `|` immediately; the original list is not
/// recoverable afterwards. A single string is taken verbatim, so callers may
/// also pass an already joined value.
pub struct VariableValues(String);

impl VariableValues {
    /// Separator Fast2SMS uses between template variable values.
    pub const SEPARATOR: &'static str = "|";

    /// Borrow the pipe-joined value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the pipe-joined value.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for VariableValues {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for VariableValues {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<Vec<String>> for VariableValues {
    fn from(value: Vec<String>) -> Self {
        Self(value.join(Self::SEPARATOR))
    }
}

impl From<Vec<&str>> for VariableValues {
    fn from(value: Vec<&str>) -> Self {
        Self(value.join(Self::SEPARATOR))
    }
}

impl From<&[&str]> for VariableValues {
    fn from(value: &[&str]) -> Self {
        Self(value.join(Self::SEPARATOR))
    }
}

#[derive(Debug, Clone)]
/// Parsed and validated Indian mobile number.
///
/// Fast2SMS delivers to 10-digit Indian mobile numbers (leading digit 6-9).
/// This type parses free-form input with India as the default region and
/// exposes the bare national digits the API expects. Recipient strings passed
/// straight to `to()` are not validated; this type is the opt-in check.
pub struct PhoneNumber {
    raw: String,
    national: String,
}

impl PhoneNumber {
    /// Parse and normalize a phone number.
    pub fn parse(input: impl Into<String>) -> Result<Self, ValidationError> {
        let input = input.into();
        let raw = input.trim().to_owned();
        if raw.is_empty() {
            return Err(ValidationError::InvalidPhoneNumber { input: raw });
        }

        let parsed = phonenumber::parse(Some(country::Id::IN), &raw)
            .map_err(|_| ValidationError::InvalidPhoneNumber { input: raw.clone() })?;
        let national = parsed.national().value().to_string();

        if national.len() != 10 || !matches!(national.as_bytes()[0], b'6'..=b'9') {
            return Err(ValidationError::InvalidPhoneNumber { input: raw });
        }

        Ok(Self { raw, national })
    }

    /// Raw input after trimming.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The 10 national digits as sent to Fast2SMS.
    pub fn national(&self) -> &str {
        &self.national
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.national == other.national
    }
}

impl Eq for PhoneNumber {}

impl std::hash::Hash for PhoneNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.national.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn schedule_time_accepts_the_fixed_pattern() {
        let time = ScheduleTime::new("2026-01-01-10-00").unwrap();
        assert_eq!(time.as_str(), "2026-01-01-10-00");

        let time = ScheduleTime::new(" 2026-12-31-23-59 ").unwrap();
        assert_eq!(time.as_str(), "2026-12-31-23-59");
    }

    #[test]
    fn schedule_time_rejects_other_shapes() {
        for input in [
            "2026/01/01 10:00",
            "2026-01-01 10:00",
            "2026-01-01-10",
            "2026-01-01-10-00-00",
            "not a time",
            "",
        ] {
            let err = ScheduleTime::new(input).unwrap_err();
            assert!(
                matches!(err, ValidationError::InvalidScheduleTime { .. }),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn schedule_time_formats_datetimes_into_the_pattern() {
        let datetime = NaiveDate::from_ymd_opt(2026, 1, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let time = ScheduleTime::from_datetime(datetime);
        assert_eq!(time.as_str(), "2026-01-01-10-00");

        let via_from: ScheduleTime = datetime.into();
        assert_eq!(via_from, time);
    }

    #[test]
    fn schedule_time_serde_round_trips_and_validates() {
        let time = ScheduleTime::new("2026-01-01-10-00").unwrap();
        let json = serde_json::to_string(&time).unwrap();
        assert_eq!(json, "\"2026-01-01-10-00\"");
        let back: ScheduleTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, time);

        let bad: Result<ScheduleTime, _> = serde_json::from_str("\"2026/01/01\"");
        assert!(bad.is_err());
    }

    #[test]
    fn recipients_normalize_single_values_and_lists() {
        let single: Recipients = "9999999999".into();
        assert_eq!(single.into_vec(), vec!["9999999999".to_owned()]);

        let many: Recipients = vec!["9999999999", "8888888888"].into();
        assert_eq!(
            many.into_vec(),
            vec!["9999999999".to_owned(), "8888888888".to_owned()]
        );
    }

    #[test]
    fn variable_values_join_lists_with_pipes() {
        let values: VariableValues = vec!["Hello", "World"].into();
        assert_eq!(values.as_str(), "Hello|World");

        let single: VariableValues = "1234".into();
        assert_eq!(single.as_str(), "1234");

        // Joining is idempotent for identical input.
        let again: VariableValues = vec!["Hello", "World"].into();
        assert_eq!(again, values);
    }

    #[test]
    fn phone_number_accepts_indian_mobiles() {
        let plain = PhoneNumber::parse("9999999999").unwrap();
        assert_eq!(plain.national(), "9999999999");

        let e164 = PhoneNumber::parse("+91 99999 99999").unwrap();
        assert_eq!(e164.national(), "9999999999");
        assert_eq!(e164, plain);

        let recipients: Recipients = e164.into();
        assert_eq!(recipients.into_vec(), vec!["9999999999".to_owned()]);
    }

    #[test]
    fn phone_number_rejects_non_mobile_input() {
        assert!(PhoneNumber::parse("").is_err());
        assert!(PhoneNumber::parse("12345").is_err());
        assert!(PhoneNumber::parse("not-a-number").is_err());
        // Indian mobiles start with 6-9.
        assert!(PhoneNumber::parse("1999999999").is_err());
    }
}
