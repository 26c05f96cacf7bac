//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. Every multi-step state change runs inside one database
//! transaction with a row lock on the mutated row, so the precondition
//! check and the write are atomic with respect to concurrent requests.

pub mod course_assignment;
pub mod enrollment;
pub mod grade_approval;

pub use course_assignment::{
    AssignmentError, CourseAssignmentRepository, CreateAssignmentInput,
};
pub use enrollment::{EnrollmentRepository, PaymentRecorded, RecordPaymentInput};
pub use grade_approval::{AppliedApproval, GradeApprovalRepository};
