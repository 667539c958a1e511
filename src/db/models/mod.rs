mod certificate;
mod employee;
mod quiz;
mod quiz_result;
mod training_item;

pub use certificate::*;
pub use employee::*;
pub use quiz::*;
pub use quiz_result::*;
pub use training_item::*;

/// Department sentinel for content and quizzes offered to everyone.
pub const ALL_DEPARTMENTS: &str = "All";

/// Whether something targeted at `target` is offered to `department`.
pub fn department_matches(target: &str, department: &str) -> bool {
    target.eq_ignore_ascii_case(ALL_DEPARTMENTS) || target.eq_ignore_ascii_case(department)
}
