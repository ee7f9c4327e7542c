//! Document line entries.
//!
//! An [`Entry`] is a single debit-or-credit line belonging to a
//! [`Document`](crate::Document). Magnitudes are stored as integer **minor
//! units**; by accounting convention exactly one of `debit_minor` and
//! `credit_minor` is nonzero per line, and the surviving lines of a document
//! must satisfy the tally conditions at every committed state.
//!
//! Entries are soft-deleted individually or by the owning document's cascade;
//! they are updated in place but never reparented to another document.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EntryInput, LedgerError, ResultLedger};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: Uuid,
    pub document_id: Uuid,
    pub line_no: i32,
    pub account_code: String,
    pub debit_minor: i64,
    pub credit_minor: i64,
    pub member_ref: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub week_no: Option<i32>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Entry {
    /// Materializes an insert command into a row, keeping a client-supplied
    /// id when one arrives with a sync batch.
    pub(crate) fn from_input(document_id: Uuid, input: &EntryInput) -> Self {
        Self {
            id: input.id.unwrap_or_else(Uuid::new_v4),
            document_id,
            line_no: input.line_no,
            account_code: input.account_code.trim().to_uppercase(),
            debit_minor: input.debit_minor,
            credit_minor: input.credit_minor,
            member_ref: input.member_ref.clone(),
            due_date: input.due_date,
            week_no: input.week_no,
            deleted_at: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub document_id: String,
    pub line_no: i32,
    pub account_code: String,
    pub debit_minor: i64,
    pub credit_minor: i64,
    pub member_ref: Option<String>,
    pub due_date: Option<Date>,
    pub week_no: Option<i32>,
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

impl From<&Entry> for ActiveModel {
    fn from(entry: &Entry) -> Self {
        Self {
            id: ActiveValue::Set(entry.id.to_string()),
            document_id: ActiveValue::Set(entry.document_id.to_string()),
            line_no: ActiveValue::Set(entry.line_no),
            account_code: ActiveValue::Set(entry.account_code.clone()),
            debit_minor: ActiveValue::Set(entry.debit_minor),
            credit_minor: ActiveValue::Set(entry.credit_minor),
            member_ref: ActiveValue::Set(entry.member_ref.clone()),
            due_date: ActiveValue::Set(entry.due_date),
            week_no: ActiveValue::Set(entry.week_no),
            deleted_at: ActiveValue::Set(entry.deleted_at),
        }
    }
}

impl TryFrom<Model> for Entry {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_entry_id(&model.id)?,
            document_id: Uuid::parse_str(&model.document_id)
                .map_err(|_| LedgerError::KeyNotFound("document not exists".to_string()))?,
            line_no: model.line_no,
            account_code: model.account_code,
            debit_minor: model.debit_minor,
            credit_minor: model.credit_minor,
            member_ref: model.member_ref,
            due_date: model.due_date,
            week_no: model.week_no,
            deleted_at: model.deleted_at,
        })
    }
}

pub(crate) fn parse_entry_id(raw: &str) -> ResultLedger<Uuid> {
    Uuid::parse_str(raw).map_err(|_| LedgerError::KeyNotFound("entry not exists".to_string()))
}
