//! Billing-side course records.
//!
//! Billing owns a course's type and price; the local catalogue owns its name,
//! description and lessons. The two are joined by `code`.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// How a course is sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseType {
    Free,
    Rent,
    Buy,
}

impl CourseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseType::Free => "free",
            CourseType::Rent => "rent",
            CourseType::Buy => "buy",
        }
    }

    pub fn is_free(&self) -> bool {
        matches!(self, CourseType::Free)
    }
}

impl std::fmt::Display for CourseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A course as listed by `/courses` and `/courses/{code}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingCourse {
    pub code: String,

    #[serde(rename = "type")]
    pub course_type: CourseType,

    /// Absent for free courses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl BillingCourse {
    pub fn new(code: impl Into<String>, course_type: CourseType, price: Option<f64>) -> Self {
        Self {
            code: code.into(),
            course_type,
            price,
        }
    }

    pub fn free(code: impl Into<String>) -> Self {
        Self::new(code, CourseType::Free, None)
    }

    /// Price to charge; always zero for free courses.
    pub fn price(&self) -> f64 {
        if self.course_type.is_free() {
            0.0
        } else {
            self.price.unwrap_or(0.0)
        }
    }
}

/// Course payload for `POST /courses[/{code}]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseDraft {
    pub code: String,
    pub name: String,

    #[serde(rename = "type")]
    pub course_type: CourseType,

    pub price: f64,
}

impl CourseDraft {
    /// Builds a draft from the course form; free courses carry a zero price.
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        course_type: CourseType,
        price: f64,
    ) -> Self {
        let price = if course_type.is_free() { 0.0 } else { price };
        Self {
            code: code.into().trim().to_string(),
            name: name.into().trim().to_string(),
            course_type,
            price,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.code.is_empty() {
            return Err(ValidationError::empty_field("code"));
        }
        if self.code.chars().any(|c| c.is_whitespace() || c == '/' || c == '?') {
            return Err(ValidationError::invalid_format(
                "code",
                "must not contain whitespace, '/' or '?'",
            ));
        }
        if self.name.is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        if !self.course_type.is_free() && !(self.price.is_finite() && self.price > 0.0) {
            return Err(ValidationError::invalid_format(
                "price",
                "paid courses need a positive price",
            ));
        }
        Ok(())
    }

    /// The billing record this draft produces once saved.
    pub fn to_billing_course(&self) -> BillingCourse {
        let price = (!self.course_type.is_free()).then_some(self.price);
        BillingCourse::new(self.code.clone(), self.course_type, price)
    }
}
