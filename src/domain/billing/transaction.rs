//! Balance movements recorded by billing.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// Direction of a balance movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Deposit,
    Payment,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "deposit",
            TransactionType::Payment => "payment",
        }
    }

    /// Label shown in the transaction history.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "Зачисление",
            TransactionType::Payment => "Оплата",
        }
    }
}

/// One entry of `/transactions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,

    pub created_at: Timestamp,

    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    pub amount: f64,

    /// Set for payments only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_code: Option<String>,

    /// Set for rent payments only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<Timestamp>,
}

impl Transaction {
    pub fn is_payment(&self) -> bool {
        self.transaction_type == TransactionType::Payment
    }

    /// True while the payment is still valid: rent until `expires_at`, buy forever.
    pub fn is_active_at(&self, now: Timestamp) -> bool {
        match self.expires_at {
            Some(expires_at) => now.is_before(&expires_at),
            None => true,
        }
    }

    /// True if this is a still-valid payment for `course_code`.
    pub fn grants_access_to(&self, course_code: &str, now: Timestamp) -> bool {
        self.is_payment()
            && self.course_code.as_deref() == Some(course_code)
            && self.is_active_at(now)
    }
}

/// Query filters for `/transactions`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub transaction_type: Option<TransactionType>,
    pub course_code: Option<String>,
    pub skip_expired: bool,
}

impl TransactionFilter {
    /// No filtering: the full history.
    pub fn all() -> Self {
        Self::default()
    }

    /// Active payments, optionally narrowed to one course.
    pub fn active_payments(course_code: Option<&str>) -> Self {
        Self {
            transaction_type: Some(TransactionType::Payment),
            course_code: course_code.map(str::to_string),
            skip_expired: true,
        }
    }

    /// Query pairs in billing's `filter[...]` notation.
    ///
    /// `filter[skip_expired]` is only sent when enabled.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(transaction_type) = self.transaction_type {
            pairs.push(("filter[type]".to_string(), transaction_type.as_str().to_string()));
        }
        if let Some(code) = &self.course_code {
            pairs.push(("filter[course_code]".to_string(), code.clone()));
        }
        if self.skip_expired {
            pairs.push(("filter[skip_expired]".to_string(), "1".to_string()));
        }
        pairs
    }

    /// Applies the filter locally, as billing would.
    pub fn matches(&self, transaction: &Transaction, now: Timestamp) -> bool {
        if let Some(transaction_type) = self.transaction_type {
            if transaction.transaction_type != transaction_type {
                return false;
            }
        }
        if let Some(code) = &self.course_code {
            if transaction.course_code.as_deref() != Some(code.as_str()) {
                return false;
            }
        }
        !self.skip_expired || transaction.is_active_at(now)
    }
}
