//! Payment entities and the opaque references exchanged with the hosted
//! checkout.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Order;
use crate::types::{OrderId, PaymentId, PaymentStatus};

/// A payment record as listed per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub payment_id: Option<PaymentId>,
    pub order_id: Option<OrderId>,
    pub status: PaymentStatus,
    pub amount: Option<Decimal>,
}

/// An order joined with the settled payment that covers it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaidOrder {
    pub order: Order,
    pub payment: Payment,
}

/// Opaque reference to a payment session created by the backend.
///
/// Only ever handed to the payment integration; the client never parses it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentSessionRef(String);

impl PaymentSessionRef {
    /// Wrap a reference returned by the backend.
    #[must_use]
    pub const fn new(reference: String) -> Self {
        Self(reference)
    }

    /// Borrow the raw reference.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaymentSessionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Session id carried back by the hosted checkout's success redirect.
///
/// Used only as a correlation token for the success banner; the backend
/// decides whether the payment actually completed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReturnSessionId(String);

impl ReturnSessionId {
    /// Wrap an id read from a return URL.
    #[must_use]
    pub const fn new(id: String) -> Self {
        Self(id)
    }

    /// Borrow the raw id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReturnSessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
