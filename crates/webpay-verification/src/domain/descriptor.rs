//! # Payment Descriptors
//!
//! Data-driven definitions of the premium SMS numbers a merchant runs, and
//! the frozen registry that matches a callback to one of them.
//!
//! ## Matching
//!
//! A descriptor matches when:
//! 1. `to`, read as an integer, equals `short_number`
//! 2. `key` starts with the (case-sensitive) prefix, if any
//! 3. the rest of `key` equals `base_key`, ignoring ASCII case
//!
//! Descriptors are scanned in registration order and the first match wins.
//! Overlapping registrations are allowed; the builder logs a warning so the
//! shadowed entry does not go unnoticed.

use super::errors::WebPaymentError;
use super::notification::{coerce_unsigned, fields, Notification};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// Number of fields in the legacy positional descriptor format.
pub const LEGACY_FIELD_COUNT: usize = 6;

/// One premium-rate SMS payment definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDescriptor {
    /// Keyword in front of the base key (may be empty)
    #[serde(default)]
    pub prefix: String,
    /// Keyword identifying the service, compared case-insensitively
    pub base_key: String,
    /// ISO 3166-1 alpha-2 country code
    pub country_code2: String,
    /// Premium short number the SMS is sent to
    pub short_number: u64,
    /// Price charged to the sender, in minor units
    pub charge: u64,
    /// ISO 4217 currency of `charge`
    pub currency: String,
    /// Price without VAT, in minor units
    pub charge_no_tax: u64,
}

impl PaymentDescriptor {
    /// Create and validate a descriptor.
    pub fn new(
        prefix: impl Into<String>,
        base_key: impl Into<String>,
        country_code2: impl Into<String>,
        short_number: u64,
        charge: u64,
        currency: impl Into<String>,
        charge_no_tax: u64,
    ) -> Result<Self, WebPaymentError> {
        let descriptor = Self {
            prefix: prefix.into(),
            base_key: base_key.into(),
            country_code2: country_code2.into(),
            short_number,
            charge,
            currency: currency.into(),
            charge_no_tax,
        };
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Build a descriptor from the positional field list used by older
    /// integrations: `[base_key, short_number, charge, charge_no_tax,
    /// currency, prefix]`, optionally followed by the country code.
    pub fn from_fields(values: &[&str], country_code2: &str) -> Result<Self, WebPaymentError> {
        let (values, country) = match values.len() {
            LEGACY_FIELD_COUNT => (values, country_code2),
            n if n == LEGACY_FIELD_COUNT + 1 => (&values[..LEGACY_FIELD_COUNT], values[6]),
            n => {
                return Err(WebPaymentError::InvalidRegistration(format!(
                    "descriptor needs {LEGACY_FIELD_COUNT} fields, got {n}"
                )))
            }
        };

        Self::new(
            values[5],
            values[0],
            country,
            parse_amount("short_number", values[1])?,
            parse_amount("charge", values[2])?,
            values[4],
            parse_amount("charge_no_tax", values[3])?,
        )
    }

    /// Check the invariants a registered descriptor must hold.
    pub fn validate(&self) -> Result<(), WebPaymentError> {
        if self.base_key.trim().is_empty() {
            return Err(invalid("base_key must not be empty"));
        }

        if self.country_code2.len() != 2
            || !self.country_code2.bytes().all(|b| b.is_ascii_alphabetic())
        {
            return Err(invalid(&format!(
                "country code {:?} is not two letters",
                self.country_code2
            )));
        }

        if self.currency.len() != 3 || !self.currency.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(invalid(&format!(
                "currency {:?} is not a three-letter code",
                self.currency
            )));
        }

        if self.charge_no_tax > self.charge {
            return Err(invalid("charge_no_tax exceeds charge"));
        }

        Ok(())
    }

    /// `key` with this descriptor's prefix removed, if it carries the prefix.
    pub fn strip_key<'a>(&self, key: &'a str) -> Option<&'a str> {
        key.strip_prefix(self.prefix.as_str())
    }

    /// Whether `key` (without prefix) is this descriptor's base key.
    pub fn is_base_key(&self, key: &str) -> bool {
        self.base_key.eq_ignore_ascii_case(key)
    }

    /// Whether this descriptor describes the given callback.
    pub fn matches(&self, notification: &Notification) -> bool {
        let Some(to) = notification.get(fields::TO).and_then(coerce_unsigned) else {
            return false;
        };

        if to != self.short_number {
            return false;
        }

        self.strip_key(notification.value(fields::KEY))
            .is_some_and(|rest| self.is_base_key(rest))
    }

    /// Two descriptors that would match exactly the same callbacks.
    fn overlaps(&self, other: &Self) -> bool {
        self.short_number == other.short_number
            && self.prefix == other.prefix
            && self.base_key.eq_ignore_ascii_case(&other.base_key)
    }
}

fn parse_amount(name: &str, value: &str) -> Result<u64, WebPaymentError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(&format!("{name} {value:?} is not a non-negative integer")))
}

fn invalid(reason: &str) -> WebPaymentError {
    WebPaymentError::InvalidRegistration(reason.to_string())
}

// =============================================================================
// REGISTRY
// =============================================================================

/// Collects descriptors during startup.
#[derive(Debug, Default)]
pub struct PaymentInfoRegistryBuilder {
    descriptors: Vec<Arc<PaymentDescriptor>>,
}

impl PaymentInfoRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a descriptor after validating it.
    pub fn register(mut self, descriptor: PaymentDescriptor) -> Result<Self, WebPaymentError> {
        descriptor.validate()?;

        if let Some(existing) = self.descriptors.iter().find(|d| d.overlaps(&descriptor)) {
            warn!(
                short_number = descriptor.short_number,
                prefix = %descriptor.prefix,
                base_key = %descriptor.base_key,
                shadowed_by_country = %existing.country_code2,
                "Overlapping payment descriptor registered; the earlier one wins"
            );
        }

        self.descriptors.push(Arc::new(descriptor));
        Ok(self)
    }

    /// Append descriptors in iteration order.
    pub fn register_all<I>(self, descriptors: I) -> Result<Self, WebPaymentError>
    where
        I: IntoIterator<Item = PaymentDescriptor>,
    {
        descriptors
            .into_iter()
            .try_fold(self, |builder, descriptor| builder.register(descriptor))
    }

    /// Append a descriptor given in the positional field format.
    pub fn register_fields(
        self,
        values: &[&str],
        country_code2: &str,
    ) -> Result<Self, WebPaymentError> {
        self.register(PaymentDescriptor::from_fields(values, country_code2)?)
    }

    /// Freeze the registry.
    pub fn build(self) -> PaymentInfoRegistry {
        PaymentInfoRegistry {
            descriptors: self.descriptors.into(),
        }
    }
}

/// Frozen, ordered set of payment descriptors.
///
/// Read-only after `build`, so it can be shared across threads without locks.
#[derive(Clone, Debug)]
pub struct PaymentInfoRegistry {
    descriptors: Arc<[Arc<PaymentDescriptor>]>,
}

impl PaymentInfoRegistry {
    pub fn builder() -> PaymentInfoRegistryBuilder {
        PaymentInfoRegistryBuilder::new()
    }

    /// First descriptor, in registration order, that matches the callback.
    pub fn find_match(&self, notification: &Notification) -> Option<Arc<PaymentDescriptor>> {
        self.descriptors
            .iter()
            .find(|descriptor| descriptor.matches(notification))
            .cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PaymentDescriptor> {
        self.descriptors.iter().map(|d| d.as_ref())
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================
