//! Ledger document primitives.
//!
//! A `Document` is the header record of one accounting transaction (a
//! voucher, receipt, release, or fund disbursement). Its balance lives in the
//! [`Entry`](crate::Entry) rows that reference it; the header only declares
//! the amount the entries must reconcile to.
//!
//! All seven document kinds share one record set with a `kind` discriminator
//! column. Documents are never hard-deleted: deletion sets `deleted_at` and
//! cascades to the owned entries (and payment schedule, for loan releases).

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Entry, LedgerError, ResultLedger, ScheduleEntry};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    LoanRelease,
    JournalVoucher,
    ExpenseVoucher,
    OfficialReceipt,
    Acknowledgement,
    EmergencyLoan,
    DamayanFund,
}

impl DocumentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LoanRelease => "loan_release",
            Self::JournalVoucher => "journal_voucher",
            Self::ExpenseVoucher => "expense_voucher",
            Self::OfficialReceipt => "official_receipt",
            Self::Acknowledgement => "acknowledgement",
            Self::EmergencyLoan => "emergency_loan",
            Self::DamayanFund => "damayan_fund",
        }
    }

    /// Human-readable code prefix for this kind (`LR#102`, `JV#17`, ...).
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::LoanRelease => "LR#",
            Self::JournalVoucher => "JV#",
            Self::ExpenseVoucher => "EV#",
            Self::OfficialReceipt => "OR#",
            Self::Acknowledgement => "AR#",
            Self::EmergencyLoan => "EL#",
            Self::DamayanFund => "DF#",
        }
    }

    /// Only loan releases carry a weekly payment schedule.
    pub fn has_schedule(self) -> bool {
        matches!(self, Self::LoanRelease)
    }

    /// Normalizes a stored code for comparison.
    ///
    /// Early records were saved with a bare numeric code; those read as
    /// already carrying the kind prefix (`17` reads as `JV#17`). Everything
    /// else is compared uppercase.
    pub fn normalize_stored_code(self, raw: &str) -> String {
        let trimmed = raw.trim();
        if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return format!("{}{}", self.code_prefix(), trimmed);
        }
        trimmed.to_uppercase()
    }
}

impl TryFrom<&str> for DocumentKind {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "loan_release" => Ok(Self::LoanRelease),
            "journal_voucher" => Ok(Self::JournalVoucher),
            "expense_voucher" => Ok(Self::ExpenseVoucher),
            "official_receipt" => Ok(Self::OfficialReceipt),
            "acknowledgement" => Ok(Self::Acknowledgement),
            "emergency_loan" => Ok(Self::EmergencyLoan),
            "damayan_fund" => Ok(Self::DamayanFund),
            other => Err(LedgerError::Validation(format!(
                "invalid document kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub kind: DocumentKind,
    pub code: String,
    pub amount_minor: i64,
    pub document_date: NaiveDate,
    pub period_month: i32,
    pub period_year: i32,
    pub check_no: Option<String>,
    pub bank_ref: Option<String>,
    pub member_ref: Option<String>,
    pub remarks: Option<String>,
    pub no_of_weeks: Option<i32>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<String>,
    pub entries: Vec<Entry>,
    pub schedule: Vec<ScheduleEntry>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "documents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub kind: String,
    pub code: String,
    pub amount_minor: i64,
    pub document_date: Date,
    pub period_month: i32,
    pub period_year: i32,
    pub check_no: Option<String>,
    pub bank_ref: Option<String>,
    pub member_ref: Option<String>,
    pub remarks: Option<String>,
    pub no_of_weeks: Option<i32>,
    pub created_by: String,
    pub created_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
    pub deleted_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::entries::Entity")]
    Entries,
    #[sea_orm(has_many = "super::schedules::Entity")]
    Schedules,
}

impl Related<super::entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entries.def()
    }
}

impl Related<super::schedules::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Schedules.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Document> for ActiveModel {
    fn from(doc: &Document) -> Self {
        Self {
            id: ActiveValue::Set(doc.id.to_string()),
            kind: ActiveValue::Set(doc.kind.as_str().to_string()),
            code: ActiveValue::Set(doc.code.clone()),
            amount_minor: ActiveValue::Set(doc.amount_minor),
            document_date: ActiveValue::Set(doc.document_date),
            period_month: ActiveValue::Set(doc.period_month),
            period_year: ActiveValue::Set(doc.period_year),
            check_no: ActiveValue::Set(doc.check_no.clone()),
            bank_ref: ActiveValue::Set(doc.bank_ref.clone()),
            member_ref: ActiveValue::Set(doc.member_ref.clone()),
            remarks: ActiveValue::Set(doc.remarks.clone()),
            no_of_weeks: ActiveValue::Set(doc.no_of_weeks),
            created_by: ActiveValue::Set(doc.created_by.clone()),
            created_at: ActiveValue::Set(doc.created_at),
            deleted_at: ActiveValue::Set(doc.deleted_at),
            deleted_by: ActiveValue::Set(doc.deleted_by.clone()),
        }
    }
}

impl TryFrom<Model> for Document {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| LedgerError::KeyNotFound("document not exists".to_string()))?,
            kind: DocumentKind::try_from(model.kind.as_str())?,
            code: model.code,
            amount_minor: model.amount_minor,
            document_date: model.document_date,
            period_month: model.period_month,
            period_year: model.period_year,
            check_no: model.check_no,
            bank_ref: model.bank_ref,
            member_ref: model.member_ref,
            remarks: model.remarks,
            no_of_weeks: model.no_of_weeks,
            created_by: model.created_by,
            created_at: model.created_at,
            deleted_at: model.deleted_at,
            deleted_by: model.deleted_by,
            entries: Vec::new(),
            schedule: Vec::new(),
        })
    }
}

pub(crate) fn parse_document_id(raw: &str) -> ResultLedger<Uuid> {
    Uuid::parse_str(raw).map_err(|_| LedgerError::KeyNotFound("document not exists".to_string()))
}
