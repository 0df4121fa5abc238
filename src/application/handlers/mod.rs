//! Application handlers.
//!
//! Command and query handlers that orchestrate billing operations for the
//! session, course and profile pages.

pub mod clock;
pub mod course;
pub mod profile;
pub mod session;

pub use clock::{fixed_clock, system_clock, Clock};
pub use course::{
    CatalogEntry, CheckCourseAccessHandler, CheckCourseAccessQuery, CourseAccessView,
    ListCatalogHandler, ListCatalogQuery, PayCourseCommand, PayCourseHandler, PayCourseResult,
    SaveCourseCommand, SaveCourseError, SaveCourseHandler, SaveCourseResult,
};
pub use profile::{
    GetProfileHandler, GetProfileQuery, ListTransactionsHandler, ListTransactionsQuery,
    ProfileView, TransactionRow,
};
pub use session::{
    LoginCommand, LoginHandler, LoginResult, RefreshIdentityCommand, RefreshIdentityHandler,
    RefreshIdentityResult, RegisterCommand, RegisterError, RegisterHandler, RegisterResult,
};
