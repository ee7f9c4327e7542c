//! Persisted payment schedule rows for loan releases.
//!
//! Generated once at release creation from `(document_date, no_of_weeks)` by
//! [`generate_schedule`](crate::generate_schedule); later modules pre-fill
//! receipt entries from these rows and flip `paid`.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::LedgerError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub id: Uuid,
    pub document_id: Uuid,
    pub week_no: i32,
    pub due_date: NaiveDate,
    pub paid: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payment_schedules")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub document_id: String,
    pub week_no: i32,
    pub due_date: Date,
    pub paid: bool,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::documents::Entity",
        from = "Column::DocumentId",
        to = "super::documents::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Documents,
}

impl Related<super::documents::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Documents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&ScheduleEntry> for ActiveModel {
    fn from(row: &ScheduleEntry) -> Self {
        Self {
            id: ActiveValue::Set(row.id.to_string()),
            document_id: ActiveValue::Set(row.document_id.to_string()),
            week_no: ActiveValue::Set(row.week_no),
            due_date: ActiveValue::Set(row.due_date),
            paid: ActiveValue::Set(row.paid),
            deleted_at: ActiveValue::Set(row.deleted_at),
        }
    }
}

impl TryFrom<Model> for ScheduleEntry {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| LedgerError::KeyNotFound("schedule row not exists".to_string()))?,
            document_id: Uuid::parse_str(&model.document_id)
                .map_err(|_| LedgerError::KeyNotFound("document not exists".to_string()))?,
            week_no: model.week_no,
            due_date: model.due_date,
            paid: model.paid,
            deleted_at: model.deleted_at,
        })
    }
}
