//! In-memory fake transport: records submissions and answers assertion queries.
//!
//! While faking is enabled the client skips the network entirely. Every
//! submission is snapshotted into a process-wide log and answered with a
//! canned success body, which then flows through the same response
//! classification as production traffic. Enable at the start of a test,
//! exercise the code under test, then assert on what was "sent":
//!
//! ```no_run
//! fast2sms::fake::enable();
//! // ... code that sends SMS ...
//! fast2sms::fake::assert_sent_containing(&[("message", "Your OTP is 123456")]);
//! fast2sms::fake::assert_sent_count(1);
//! ```
//!
//! The log lives until [`enable`] is called again; [`disable`] stops
//! interception without clearing it. Assertion queries panic when faking was
//! never enabled, so a forgotten [`enable`] call cannot masquerade as "no SMS
//! was sent". The log is guarded by a mutex: appends are single-writer,
//! reads may happen from any thread.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

const CANNED_BODY: &str = r#"{"return": true, "message": "SMS sent successfully (faked)."}"#;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Immutable snapshot of one submitted wire payload.
pub struct SentRecord {
    path: String,
    payload: BTreeMap<String, String>,
}

impl SentRecord {
    /// Endpoint path the payload was submitted to (e.g. `/bulkV2`).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The submitted form fields.
    pub fn payload(&self) -> &BTreeMap<String, String> {
        &self.payload
    }

    /// Look up a single form field.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.payload.get(key).map(String::as_str)
    }

    /// Whether every given key/value pair is present with exactly that value.
    pub fn contains(&self, expected: &[(&str, &str)]) -> bool {
        expected
            .iter()
            .all(|(key, value)| self.get(key) == Some(*value))
    }
}

#[derive(Debug)]
struct FakeState {
    enabled: bool,
    sent: Vec<SentRecord>,
}

static STATE: Mutex<FakeState> = Mutex::new(FakeState {
    enabled: false,
    sent: Vec::new(),
});

fn state() -> MutexGuard<'static, FakeState> {
    STATE.lock().unwrap_or_else(PoisonError::into_inner)
}

fn require_enabled() -> MutexGuard<'static, FakeState> {
    let state = state();
    if !state.enabled {
        panic!("Fast2sms faking is not enabled; call fast2sms::fake::enable() first");
    }
    state
}

/// Start (or restart) a faking session, clearing the log.
pub fn enable() {
    let mut state = state();
    state.enabled = true;
    state.sent.clear();
}

/// Stop intercepting submissions. The log is kept until the next [`enable`].
pub fn disable() {
    state().enabled = false;
}

/// Whether a faking session is active.
pub fn is_enabled() -> bool {
    state().enabled
}

/// Record an intercepted submission and return the canned response body.
pub(crate) fn record(path: &str, payload: &[(String, String)]) -> String {
    let record = SentRecord {
        path: path.to_owned(),
        payload: payload.iter().cloned().collect(),
    };
    state().sent.push(record);
    CANNED_BODY.to_owned()
}

/// Snapshot of everything recorded in the current session.
///
/// # Panics
/// Panics if faking is not enabled.
pub fn sent_records() -> Vec<SentRecord> {
    require_enabled().sent.clone()
}

/// Assert that at least one SMS was sent.
///
/// # Panics
/// Panics if nothing was sent, or if faking is not enabled.
pub fn assert_sent() {
    let state = require_enabled();
    assert!(!state.sent.is_empty(), "no SMS was sent");
}

/// Assert that at least one sent SMS satisfies the predicate.
///
/// # Panics
/// Panics if no record matches, or if faking is not enabled.
pub fn assert_sent_where(predicate: impl Fn(&SentRecord) -> bool) {
    let state = require_enabled();
    assert!(
        state.sent.iter().any(|record| predicate(record)),
        "no sent SMS matched the predicate ({} recorded)",
        state.sent.len()
    );
}

/// Assert that at least one sent SMS contains every given key/value pair.
///
/// # Panics
/// Panics if no record matches, or if faking is not enabled.
pub fn assert_sent_containing(expected: &[(&str, &str)]) {
    let state = require_enabled();
    assert!(
        state.sent.iter().any(|record| record.contains(expected)),
        "no sent SMS contained {expected:?}; recorded: {:?}",
        state.sent
    );
}

/// Assert that no SMS was sent at all.
///
/// # Panics
/// Panics if anything was sent, or if faking is not enabled.
pub fn assert_not_sent() {
    let state = require_enabled();
    assert!(
        state.sent.is_empty(),
        "{} SMS were sent when none should have been",
        state.sent.len()
    );
}

/// Assert that no sent SMS satisfies the predicate.
///
/// # Panics
/// Panics if a record matches, or if faking is not enabled.
pub fn assert_not_sent_where(predicate: impl Fn(&SentRecord) -> bool) {
    let state = require_enabled();
    assert!(
        !state.sent.iter().any(|record| predicate(record)),
        "an SMS matching the predicate was sent when it should not have been"
    );
}

/// Assert that no sent SMS contains every given key/value pair.
///
/// # Panics
/// Panics if a record matches, or if faking is not enabled.
pub fn assert_not_sent_containing(expected: &[(&str, &str)]) {
    let state = require_enabled();
    assert!(
        !state.sent.iter().any(|record| record.contains(expected)),
        "an SMS containing {expected:?} was sent when it should not have been"
    );
}

/// Assert that exactly `expected` SMS were sent.
///
/// # Panics
/// Panics on a count mismatch, or if faking is not enabled.
pub fn assert_sent_count(expected: usize) {
    let state = require_enabled();
    assert_eq!(
        state.sent.len(),
        expected,
        "expected {expected} SMS to be sent, but {} were sent",
        state.sent.len()
    );
}

/// Serializes tests that touch the process-wide faking state.
#[cfg(test)]
pub(crate) fn test_lock() -> MutexGuard<'static, ()> {
    static LOCK: Mutex<()> = Mutex::new(());
    LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}
