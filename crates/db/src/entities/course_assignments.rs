//! `SeaORM` Entity for the course_assignments table.
//!
//! One row per course offering, used by the instructor double-booking
//! check.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "course_assignments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub staff_id: Uuid,
    #[sea_orm(unique)]
    pub course_offering_id: Uuid,
    pub section: String,
    /// Day of week, lowercase (e.g. "monday").
    pub day: String,
    pub start_time: Time,
    pub end_time: Time,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
