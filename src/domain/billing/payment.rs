//! Course payment results.

use serde::Deserialize;

use super::errors::BillingError;
use crate::domain::foundation::Timestamp;

/// Body of a successful `POST /courses/{code}/pay`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PaymentReceipt {
    pub success: bool,

    #[serde(default)]
    pub course_type: Option<String>,

    /// Set when a rent was paid.
    #[serde(default)]
    pub expires_at: Option<Timestamp>,
}

/// What the user is told after pressing "pay".
///
/// The numeric codes travel in the `payment_status` query parameter of the
/// redirect back to the course page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentOutcome {
    Succeeded,
    InsufficientFunds,
    AlreadyPaid,
    Failed,
}

impl PaymentOutcome {
    /// Folds one pay-course call into an outcome.
    ///
    /// # Errors
    ///
    /// `InvalidToken` is returned unchanged: the session must re-authenticate
    /// before any outcome can be shown.
    pub fn from_payment(result: Result<PaymentReceipt, BillingError>) -> Result<Self, BillingError> {
        match result {
            Ok(receipt) if receipt.success => Ok(PaymentOutcome::Succeeded),
            Ok(_) => Ok(PaymentOutcome::Failed),
            Err(BillingError::InsufficientFunds) => Ok(PaymentOutcome::InsufficientFunds),
            Err(BillingError::AlreadyPaid) => Ok(PaymentOutcome::AlreadyPaid),
            Err(BillingError::InvalidToken) => Err(BillingError::InvalidToken),
            Err(_) => Ok(PaymentOutcome::Failed),
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            PaymentOutcome::Succeeded => 0,
            PaymentOutcome::InsufficientFunds => 1,
            PaymentOutcome::AlreadyPaid => 2,
            PaymentOutcome::Failed => 3,
        }
    }

    /// Parses a `payment_status` value; anything unknown is ignored.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(PaymentOutcome::Succeeded),
            1 => Some(PaymentOutcome::InsufficientFunds),
            2 => Some(PaymentOutcome::AlreadyPaid),
            3 => Some(PaymentOutcome::Failed),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PaymentOutcome::Succeeded)
    }

    pub fn message(&self) -> &'static str {
        match self {
            PaymentOutcome::Succeeded => "Курс успешно оплачен",
            PaymentOutcome::InsufficientFunds => "Недостаточно средств для оплаты курса",
            PaymentOutcome::AlreadyPaid => "Курс уже оплачен ранее",
            PaymentOutcome::Failed => "Не удалось оплатить курс. Попробуйте позже",
        }
    }
}
