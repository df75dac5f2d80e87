//! # Notifications
//!
//! The raw callback data received from the gateway, plus the pure helpers
//! that operate on it before any signature is checked: transport prefix
//! stripping and shape classification.
//!
//! Field order matters. The SS2 signed message is built by walking the
//! fields in the order the gateway sent them, so `Notification` keeps
//! insertion order instead of using a hash map.

use serde::Serialize;
use std::collections::HashMap;

/// Field names used by micro-payment callbacks.
pub mod fields {
    pub const TO: &str = "to";
    pub const FROM: &str = "from";
    pub const SMS: &str = "sms";
    pub const OPERATOR: &str = "operator";
    pub const AMOUNT: &str = "amount";
    pub const CURRENCY: &str = "currency";
    pub const COUNTRY: &str = "country";
    pub const ID: &str = "id";
    pub const TEST: &str = "test";
    pub const KEY: &str = "key";
    pub const SS1: &str = "_ss1";
    pub const SS2: &str = "_ss2";

    /// Marker present only in macro (bank/card) payment callbacks
    pub const PROJECT_ID: &str = "projectid";
}

/// Every field a micro-payment callback must carry.
pub const MICRO_PAYMENT_FIELDS: [&str; 12] = [
    fields::TO,
    fields::SMS,
    fields::FROM,
    fields::OPERATOR,
    fields::AMOUNT,
    fields::CURRENCY,
    fields::COUNTRY,
    fields::ID,
    fields::SS2,
    fields::SS1,
    fields::TEST,
    fields::KEY,
];

/// Prefix the gateway puts in front of every callback parameter.
pub const DEFAULT_TRANSPORT_PREFIX: &str = "wp_";

/// Ordered string-to-string map of callback parameters.
///
/// Keys are indexed so insert and lookup stay O(1) however many
/// parameters the sender attaches.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Notification {
    fields: Vec<(String, String)>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Notification {
    /// Create an empty notification.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field. An existing key keeps its position and takes the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.index.get(&key) {
            Some(&position) => self.fields[position].1 = value,
            None => {
                self.index.insert(key.clone(), self.fields.len());
                self.fields.push((key, value));
            }
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .map(|&position| self.fields[position].1.as_str())
    }

    /// Value of `key`, or the empty string when absent.
    pub fn value(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Iterate over `(key, value)` pairs in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The `test` flag coerced to a boolean.
    ///
    /// Follows integer coercion: an optional sign followed by digits is
    /// read as a number and any non-zero value is true. Empty, absent or
    /// non-numeric values are false.
    pub fn is_test(&self) -> bool {
        self.get(fields::TEST).map(coerce_flag).unwrap_or(false)
    }

    /// The `test` flag rendered as `"0"` or `"1"`.
    pub fn test_flag(&self) -> &'static str {
        if self.is_test() {
            "1"
        } else {
            "0"
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Notification
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut notification = Self::new();
        for (key, value) in iter {
            notification.insert(key, value);
        }
        notification
    }
}

/// Read a non-negative integer the way a loose integer cast does: leading
/// whitespace, an optional `+`, then the leading digits. Trailing garbage is
/// ignored. `None` when there are no digits, the value is negative or it
/// does not fit.
pub(crate) fn coerce_unsigned(value: &str) -> Option<u64> {
    let trimmed = value.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());

    unsigned[..end].parse().ok()
}

fn coerce_flag(value: &str) -> bool {
    let trimmed = value.trim_start();
    let unsigned = trimmed
        .strip_prefix('-')
        .or_else(|| trimmed.strip_prefix('+'))
        .unwrap_or(trimmed);

    unsigned
        .chars()
        .take_while(char::is_ascii_digit)
        .any(|c| c != '0')
}

// =============================================================================
// PREFIX STRIPPING
// =============================================================================

/// Keep only the fields whose key starts with `prefix` and is strictly
/// longer than it, with the prefix removed.
///
/// An empty prefix returns the notification unchanged.
pub fn strip_prefix(notification: &Notification, prefix: &str) -> Notification {
    if prefix.is_empty() {
        return notification.clone();
    }

    notification
        .iter()
        .filter_map(|(key, value)| {
            key.strip_prefix(prefix)
                .filter(|rest| !rest.is_empty())
                .map(|rest| (rest, value))
        })
        .collect()
}

// =============================================================================
// SHAPE CLASSIFICATION
// =============================================================================

/// Which kind of payment a callback describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum PaymentShape {
    /// SMS micropayment: has `to`, `from`, `sms` and no `projectid`
    Micro,
    /// Bank/card payment, marked by `projectid`
    Macro,
    /// Anything else
    Unknown,
}

/// Classify the shape of an already-stripped notification.
pub fn classify_shape(notification: &Notification) -> PaymentShape {
    if notification.contains(fields::PROJECT_ID) {
        return PaymentShape::Macro;
    }

    let micro = [fields::TO, fields::FROM, fields::SMS]
        .iter()
        .all(|field| notification.contains(field));

    if micro {
        PaymentShape::Micro
    } else {
        PaymentShape::Unknown
    }
}

/// Micro-payment fields absent from the notification, in canonical order.
pub fn missing_micro_fields(notification: &Notification) -> Vec<&'static str> {
    MICRO_PAYMENT_FIELDS
        .iter()
        .copied()
        .filter(|field| !notification.contains(field))
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
