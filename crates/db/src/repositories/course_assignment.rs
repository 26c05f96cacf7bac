//! Course assignment repository with instructor conflict detection.

use chrono::{NaiveTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect,
    Set, SqlErr, TransactionTrait,
};
use thiserror::Error;
use uuid::Uuid;

use registra_core::schedule::{self, AssignmentSlot, ScheduleError};

use crate::entities::course_assignments;

/// Input for assigning an instructor to a course offering.
#[derive(Debug, Clone)]
pub struct CreateAssignmentInput {
    /// The instructor being assigned.
    pub staff_id: Uuid,
    /// The course offering; at most one assignment per offering.
    pub course_offering_id: Uuid,
    /// Section label (e.g. "BSCS-2A").
    pub section: String,
    /// Day of week; stored lowercase.
    pub day: String,
    /// Class start time (inclusive).
    pub start_time: NaiveTime,
    /// Class end time (exclusive).
    pub end_time: NaiveTime,
}

/// Errors from course assignment writes.
#[derive(Debug, Error)]
pub enum AssignmentError {
    /// The slot is invalid or collides with the instructor's schedule.
    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    /// The course offering already has an assigned instructor.
    #[error("Course offering {0} already has an assigned instructor")]
    OfferingAlreadyAssigned(Uuid),

    /// A database operation failed.
    #[error("Database error: {0}")]
    Database(String),
}

impl AssignmentError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Schedule(e) => e.status_code(),
            Self::OfferingAlreadyAssigned(_) => 409,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Schedule(e) => e.error_code(),
            Self::OfferingAlreadyAssigned(_) => "OFFERING_ALREADY_ASSIGNED",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

/// Repository for instructor course assignments.
#[derive(Debug, Clone)]
pub struct CourseAssignmentRepository {
    db: DatabaseConnection,
}

impl CourseAssignmentRepository {
    /// Creates a new course assignment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Assigns an instructor to a course offering after checking their
    /// existing schedule for the same day.
    ///
    /// The instructor's current assignments are read and the conflict
    /// check runs inside the same transaction that inserts the row, so
    /// two simultaneous assignments cannot both slip past the check
    /// unchecked against each other.
    ///
    /// # Errors
    ///
    /// Returns an error if the time range is invalid, the slot overlaps
    /// an existing assignment, the offering is already assigned, or the
    /// database fails.
    pub async fn create(
        &self,
        input: CreateAssignmentInput,
    ) -> Result<course_assignments::Model, AssignmentError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AssignmentError::Database(e.to_string()))?;

        let existing = course_assignments::Entity::find()
            .filter(course_assignments::Column::StaffId.eq(input.staff_id))
            .filter(course_assignments::Column::Day.eq(input.day.to_lowercase()))
            .lock_exclusive()
            .all(&txn)
            .await
            .map_err(|e| AssignmentError::Database(e.to_string()))?;

        let slots: Vec<AssignmentSlot> = existing
            .iter()
            .map(|a| AssignmentSlot {
                section: a.section.clone(),
                day: a.day.clone(),
                start_time: a.start_time,
                end_time: a.end_time,
            })
            .collect();

        schedule::check_conflict(&input.day, input.start_time, input.end_time, &slots)?;

        let now = Utc::now().into();
        let assignment = course_assignments::ActiveModel {
            id: Set(Uuid::new_v4()),
            staff_id: Set(input.staff_id),
            course_offering_id: Set(input.course_offering_id),
            section: Set(input.section),
            day: Set(input.day.to_lowercase()),
            start_time: Set(input.start_time),
            end_time: Set(input.end_time),
            created_at: Set(now),
        };

        let inserted = assignment.insert(&txn).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                AssignmentError::OfferingAlreadyAssigned(input.course_offering_id)
            } else {
                AssignmentError::Database(e.to_string())
            }
        })?;

        txn.commit()
            .await
            .map_err(|e| AssignmentError::Database(e.to_string()))?;

        Ok(inserted)
    }

    /// Lists an instructor's assignments.
    ///
    /// # Errors
    ///
    /// Returns `AssignmentError::Database` on query failure.
    pub async fn list_for_staff(
        &self,
        staff_id: Uuid,
    ) -> Result<Vec<course_assignments::Model>, AssignmentError> {
        course_assignments::Entity::find()
            .filter(course_assignments::Column::StaffId.eq(staff_id))
            .all(&self.db)
            .await
            .map_err(|e| AssignmentError::Database(e.to_string()))
    }
}
