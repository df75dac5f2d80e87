//! # Payment Records
//!
//! The strongly-typed result of a verified and resolved callback.

use super::descriptor::PaymentDescriptor;
use super::notification::{fields, Notification};
use std::sync::Arc;

/// A verified micro-payment bound to the descriptor it was matched to.
///
/// Only the dispatcher creates records, after both signature verification
/// and descriptor resolution succeeded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentRecord {
    /// Name of the handler that built the record
    pub handler: String,
    pub is_test: bool,
    pub to: String,
    pub from: String,
    pub sms: String,
    pub operator: String,
    pub amount: String,
    pub currency: String,
    pub country: String,
    pub id: String,
    pub key: String,
    pub ss1: String,
    pub ss2: String,
    pub descriptor: Arc<PaymentDescriptor>,
}

impl PaymentRecord {
    /// Copy the micro-payment fields out of a notification.
    pub fn from_notification(
        handler: impl Into<String>,
        notification: &Notification,
        descriptor: Arc<PaymentDescriptor>,
    ) -> Self {
        let field = |name: &str| notification.value(name).to_string();

        Self {
            handler: handler.into(),
            is_test: notification.is_test(),
            to: field(fields::TO),
            from: field(fields::FROM),
            sms: field(fields::SMS),
            operator: field(fields::OPERATOR),
            amount: field(fields::AMOUNT),
            currency: field(fields::CURRENCY),
            country: field(fields::COUNTRY),
            id: field(fields::ID),
            key: field(fields::KEY),
            ss1: field(fields::SS1),
            ss2: field(fields::SS2),
            descriptor,
        }
    }

    /// The SMS text after the key, with surrounding whitespace removed.
    ///
    /// `"CODE1234 hello "` with key `CODE1234` gives `"hello"`.
    pub fn main_message(&self) -> &str {
        self.sms.get(self.key.len()..).unwrap_or("").trim()
    }

    /// Whether the SMS text starts with `keyword`, ignoring ASCII case.
    pub fn sms_starts_with(&self, keyword: &str) -> bool {
        self.sms
            .get(..keyword.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(keyword))
    }

    /// The key with the descriptor prefix removed.
    pub fn base_key(&self) -> &str {
        self.descriptor.strip_key(&self.key).unwrap_or(&self.key)
    }
}
