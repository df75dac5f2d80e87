//! # Payment Handlers
//!
//! Strategies that turn a verified notification and its descriptor into a
//! `PaymentRecord`, and the frozen table that selects one by key.
//!
//! Resolution scans the registered handlers in order and takes the first
//! one whose `accepts` returns true for the descriptor-stripped key. When
//! none does, the generic micro-payment handler builds the record. This
//! fallback only covers handler selection: a callback that matched no
//! descriptor never reaches this table.

use super::descriptor::PaymentDescriptor;
use super::errors::WebPaymentError;
use super::notification::Notification;
use super::record::PaymentRecord;
use std::fmt;
use std::sync::Arc;

/// Name of the built-in fallback handler.
pub const GENERIC_HANDLER: &str = "generic";

/// A record-building strategy selected by key shape.
pub trait PaymentHandler: Send + Sync {
    /// Unique name, stored in every record the handler builds.
    fn name(&self) -> &str;

    /// Whether this handler is responsible for the (descriptor-stripped) key.
    fn accepts(&self, key: &str) -> bool;

    fn build(&self, notification: &Notification, descriptor: Arc<PaymentDescriptor>)
        -> PaymentRecord;
}

impl fmt::Debug for dyn PaymentHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentHandler")
            .field("name", &self.name())
            .finish()
    }
}

// =============================================================================
// BUILT-IN HANDLERS
// =============================================================================

/// Accepts every key and copies the micro-payment fields verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericMicroHandler;

impl PaymentHandler for GenericMicroHandler {
    fn name(&self) -> &str {
        GENERIC_HANDLER
    }

    fn accepts(&self, _key: &str) -> bool {
        true
    }

    fn build(
        &self,
        notification: &Notification,
        descriptor: Arc<PaymentDescriptor>,
    ) -> PaymentRecord {
        PaymentRecord::from_notification(GENERIC_HANDLER, notification, descriptor)
    }
}

/// Handles SMS commands that start with a fixed keyword, e.g. `CODE` followed
/// by a four digit code.
#[derive(Debug, Clone)]
pub struct PrefixHandler {
    name: String,
    keyword: String,
}

impl PrefixHandler {
    pub fn new(name: impl Into<String>, keyword: impl Into<String>) -> Result<Self, WebPaymentError> {
        let name = name.into();
        let keyword = keyword.into();

        if keyword.trim().is_empty() {
            return Err(WebPaymentError::InvalidRegistration(format!(
                "handler {name:?} has an empty keyword"
            )));
        }

        Ok(Self { name, keyword })
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }
}

impl PaymentHandler for PrefixHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn accepts(&self, key: &str) -> bool {
        key.get(..self.keyword.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(&self.keyword))
    }

    fn build(
        &self,
        notification: &Notification,
        descriptor: Arc<PaymentDescriptor>,
    ) -> PaymentRecord {
        PaymentRecord::from_notification(self.name.as_str(), notification, descriptor)
    }
}

type Predicate = dyn Fn(&str) -> bool + Send + Sync;
type Constructor = dyn Fn(&Notification, Arc<PaymentDescriptor>) -> PaymentRecord + Send + Sync;

/// A handler assembled from a capability predicate and a constructor.
pub struct HandlerBinding {
    name: String,
    predicate: Box<Predicate>,
    constructor: Box<Constructor>,
}

impl HandlerBinding {
    pub fn new<A, B>(name: impl Into<String>, accepts: A, build: B) -> Self
    where
        A: Fn(&str) -> bool + Send + Sync + 'static,
        B: Fn(&Notification, Arc<PaymentDescriptor>) -> PaymentRecord + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            predicate: Box::new(accepts),
            constructor: Box::new(build),
        }
    }
}

impl PaymentHandler for HandlerBinding {
    fn name(&self) -> &str {
        &self.name
    }

    fn accepts(&self, key: &str) -> bool {
        (self.predicate)(key)
    }

    fn build(
        &self,
        notification: &Notification,
        descriptor: Arc<PaymentDescriptor>,
    ) -> PaymentRecord {
        (self.constructor)(notification, descriptor)
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

/// Collects handlers during startup.
pub struct HandlerRegistryBuilder {
    handlers: Vec<Arc<dyn PaymentHandler>>,
    fallback: Arc<dyn PaymentHandler>,
}

impl Default for HandlerRegistryBuilder {
    fn default() -> Self {
        Self {
            handlers: Vec::new(),
            fallback: Arc::new(GenericMicroHandler),
        }
    }
}

impl HandlerRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler. Names must be non-empty and unique.
    pub fn register<H>(mut self, handler: H) -> Result<Self, WebPaymentError>
    where
        H: PaymentHandler + 'static,
    {
        let name = handler.name();

        if name.trim().is_empty() {
            return Err(WebPaymentError::InvalidRegistration(
                "handler name must not be empty".to_string(),
            ));
        }

        if name == self.fallback.name() || self.handlers.iter().any(|h| h.name() == name) {
            return Err(WebPaymentError::InvalidRegistration(format!(
                "handler {name:?} is already registered"
            )));
        }

        self.handlers.push(Arc::new(handler));
        Ok(self)
    }

    /// Replace the handler used when nothing else accepts a key.
    pub fn with_fallback<H>(mut self, handler: H) -> Self
    where
        H: PaymentHandler + 'static,
    {
        self.fallback = Arc::new(handler);
        self
    }

    /// Freeze the registry.
    pub fn build(self) -> HandlerRegistry {
        HandlerRegistry {
            handlers: self.handlers.into(),
            fallback: self.fallback,
        }
    }
}

/// Frozen, ordered handler table.
#[derive(Clone)]
pub struct HandlerRegistry {
    handlers: Arc<[Arc<dyn PaymentHandler>]>,
    fallback: Arc<dyn PaymentHandler>,
}

impl HandlerRegistry {
    pub fn builder() -> HandlerRegistryBuilder {
        HandlerRegistryBuilder::new()
    }

    /// First handler accepting `key`, or the fallback.
    pub fn resolve(&self, key: &str) -> &dyn PaymentHandler {
        self.handlers
            .iter()
            .find(|handler| handler.accepts(key))
            .unwrap_or(&self.fallback)
            .as_ref()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        HandlerRegistryBuilder::new().build()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.handlers.iter().map(|h| h.name()).collect();
        f.debug_struct("HandlerRegistry")
            .field("handlers", &names)
            .field("fallback", &self.fallback.name())
            .finish()
    }
}
