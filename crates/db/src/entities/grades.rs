//! `SeaORM` Entity for the grades table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::GradeApprovalStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "grades")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub student_id: Uuid,
    pub course_offering_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))", nullable)]
    pub final_grade: Option<Decimal>,
    pub approval_status: GradeApprovalStatus,
    pub registrar_approved_by: Option<Uuid>,
    pub registrar_approved_at: Option<DateTimeWithTimeZone>,
    pub dean_approved_by: Option<Uuid>,
    pub dean_approved_at: Option<DateTimeWithTimeZone>,
    pub final_approved_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
