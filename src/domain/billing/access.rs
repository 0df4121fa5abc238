//! Course access policy.
//!
//! Derives what a user sees for a course from its billing type and the user's
//! payments. Pure: no I/O, no clock reads.

use super::course::{BillingCourse, CourseType};
use super::transaction::Transaction;
use crate::domain::foundation::Timestamp;

/// Display and gating state of one course for one user.
#[derive(Debug, Clone, PartialEq)]
pub enum CourseAccess {
    /// Buy-type course, not purchased.
    LockedShowPrice { price: f64 },
    /// Rent-type course, no active rent.
    LockedShowRentPrice { weekly_price: f64 },
    /// Rent-type course with an active rent.
    UnlockedRented { until: Option<Timestamp> },
    /// Buy-type course, purchased.
    UnlockedOwned,
    UnlockedFree,
}

impl CourseAccess {
    /// Evaluates access from the user's payments.
    ///
    /// Only payments for this course that are still valid at `now` count.
    /// With several, the one running longest wins; a payment without expiry
    /// outranks any rent.
    pub fn evaluate(course: &BillingCourse, payments: &[Transaction], now: Timestamp) -> Self {
        let active = payments
            .iter()
            .filter(|payment| payment.grants_access_to(&course.code, now))
            .max_by_key(|payment| (payment.expires_at.is_none(), payment.expires_at));

        match (course.course_type, active) {
            (CourseType::Free, _) => CourseAccess::UnlockedFree,
            (CourseType::Rent, Some(payment)) => CourseAccess::UnlockedRented {
                until: payment.expires_at,
            },
            (CourseType::Buy, Some(_)) => CourseAccess::UnlockedOwned,
            (CourseType::Rent, None) => CourseAccess::LockedShowRentPrice {
                weekly_price: course.price(),
            },
            (CourseType::Buy, None) => CourseAccess::LockedShowPrice {
                price: course.price(),
            },
        }
    }

    /// Evaluates access from a bare paid flag, when the payment itself is not at hand.
    pub fn evaluate_paid(course: &BillingCourse, paid: bool) -> Self {
        match (course.course_type, paid) {
            (CourseType::Free, _) => CourseAccess::UnlockedFree,
            (CourseType::Rent, true) => CourseAccess::UnlockedRented { until: None },
            (CourseType::Buy, true) => CourseAccess::UnlockedOwned,
            (CourseType::Rent, false) => CourseAccess::LockedShowRentPrice {
                weekly_price: course.price(),
            },
            (CourseType::Buy, false) => CourseAccess::LockedShowPrice {
                price: course.price(),
            },
        }
    }

    /// True if lessons may be shown.
    pub fn is_unlocked(&self) -> bool {
        matches!(
            self,
            CourseAccess::UnlockedRented { .. }
                | CourseAccess::UnlockedOwned
                | CourseAccess::UnlockedFree
        )
    }

    /// Caption under the course card.
    pub fn label(&self) -> String {
        match self {
            CourseAccess::LockedShowPrice { price } => format!("{}₽", format_amount(*price)),
            CourseAccess::LockedShowRentPrice { weekly_price } => {
                format!("{}₽ в неделю", format_amount(*weekly_price))
            }
            CourseAccess::UnlockedRented { until: Some(until) } => {
                format!("Арендовано до {}", until.format_simple())
            }
            CourseAccess::UnlockedRented { until: None } => "Арендовано".to_string(),
            CourseAccess::UnlockedOwned => "Куплено".to_string(),
            CourseAccess::UnlockedFree => "Бесплатный".to_string(),
        }
    }
}

/// Whole amounts print without decimals (`10`), others as is (`10.5`).
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 && amount.abs() < 1e15 {
        format!("{:.0}", amount)
    } else {
        format!("{}", amount)
    }
}
