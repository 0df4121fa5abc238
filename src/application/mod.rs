//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates billing operations through the `BillingService`
//! port. Command handlers change state in billing (login, register, pay,
//! save); query handlers only read.

pub mod handlers;

pub use handlers::{
    // Session handlers
    LoginCommand, LoginHandler, LoginResult,
    RefreshIdentityCommand, RefreshIdentityHandler, RefreshIdentityResult,
    RegisterCommand, RegisterError, RegisterHandler, RegisterResult,
    // Course handlers
    CatalogEntry, ListCatalogHandler, ListCatalogQuery,
    CheckCourseAccessHandler, CheckCourseAccessQuery, CourseAccessView,
    PayCourseCommand, PayCourseHandler, PayCourseResult,
    SaveCourseCommand, SaveCourseError, SaveCourseHandler, SaveCourseResult,
    // Profile handlers
    GetProfileHandler, GetProfileQuery, ProfileView,
    ListTransactionsHandler, ListTransactionsQuery, TransactionRow,
};
