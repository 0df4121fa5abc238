//! Course query and command handlers.

mod check_course_access;
mod list_catalog;
mod pay_course;
mod save_course;

pub use check_course_access::{
    CheckCourseAccessHandler, CheckCourseAccessQuery, CourseAccessView,
};
pub use list_catalog::{CatalogEntry, ListCatalogHandler, ListCatalogQuery};
pub use pay_course::{PayCourseCommand, PayCourseHandler, PayCourseResult};
pub use save_course::{SaveCourseCommand, SaveCourseError, SaveCourseHandler, SaveCourseResult};
