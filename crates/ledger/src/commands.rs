//! Command structs for engine operations.
//!
//! These types group parameters for write operations (create/update/delete
//! and sync reconciliation), keeping call sites readable and avoiding long
//! argument lists.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::DocumentKind;

/// Header fields for a new document.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DocumentHeader {
    pub code: String,
    pub amount_minor: i64,
    pub document_date: NaiveDate,
    pub period_month: i32,
    pub period_year: i32,
    pub check_no: Option<String>,
    pub bank_ref: Option<String>,
    pub member_ref: Option<String>,
    pub remarks: Option<String>,
    /// Term length in weeks; required for loan releases, ignored elsewhere.
    pub no_of_weeks: Option<i32>,
}

impl DocumentHeader {
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        amount_minor: i64,
        document_date: NaiveDate,
        period_month: i32,
        period_year: i32,
    ) -> Self {
        Self {
            code: code.into(),
            amount_minor,
            document_date,
            period_month,
            period_year,
            check_no: None,
            bank_ref: None,
            member_ref: None,
            remarks: None,
            no_of_weeks: None,
        }
    }

    #[must_use]
    pub fn check_no(mut self, check_no: impl Into<String>) -> Self {
        self.check_no = Some(check_no.into());
        self
    }

    #[must_use]
    pub fn bank_ref(mut self, bank_ref: impl Into<String>) -> Self {
        self.bank_ref = Some(bank_ref.into());
        self
    }

    #[must_use]
    pub fn member_ref(mut self, member_ref: impl Into<String>) -> Self {
        self.member_ref = Some(member_ref.into());
        self
    }

    #[must_use]
    pub fn remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }

    #[must_use]
    pub fn no_of_weeks(mut self, no_of_weeks: i32) -> Self {
        self.no_of_weeks = Some(no_of_weeks);
        self
    }
}

/// One line entry to insert.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EntryInput {
    /// Client-supplied id (sync batches); generated when absent.
    pub id: Option<Uuid>,
    pub line_no: i32,
    pub account_code: String,
    pub debit_minor: i64,
    pub credit_minor: i64,
    pub member_ref: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub week_no: Option<i32>,
}

impl EntryInput {
    #[must_use]
    pub fn new(
        line_no: i32,
        account_code: impl Into<String>,
        debit_minor: i64,
        credit_minor: i64,
    ) -> Self {
        Self {
            id: None,
            line_no,
            account_code: account_code.into(),
            debit_minor,
            credit_minor,
            member_ref: None,
            due_date: None,
            week_no: None,
        }
    }

    #[must_use]
    pub fn id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn member_ref(mut self, member_ref: impl Into<String>) -> Self {
        self.member_ref = Some(member_ref.into());
        self
    }

    #[must_use]
    pub fn due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    #[must_use]
    pub fn week_no(mut self, week_no: i32) -> Self {
        self.week_no = Some(week_no);
        self
    }
}

/// Create a document with its first entry set.
#[derive(Clone, Debug)]
pub struct CreateDocumentCmd {
    pub kind: DocumentKind,
    /// Client-supplied document id (sync batches); generated when absent.
    pub document_id: Option<Uuid>,
    pub header: DocumentHeader,
    pub entries: Vec<EntryInput>,
    pub actor: String,
}

impl CreateDocumentCmd {
    #[must_use]
    pub fn new(kind: DocumentKind, header: DocumentHeader, actor: impl Into<String>) -> Self {
        Self {
            kind,
            document_id: None,
            header,
            entries: Vec::new(),
            actor: actor.into(),
        }
    }

    #[must_use]
    pub fn document_id(mut self, id: Uuid) -> Self {
        self.document_id = Some(id);
        self
    }

    #[must_use]
    pub fn entry(mut self, entry: EntryInput) -> Self {
        self.entries.push(entry);
        self
    }

    #[must_use]
    pub fn entries(mut self, entries: Vec<EntryInput>) -> Self {
        self.entries = entries;
        self
    }
}

/// Field-wise header patch; `None` keeps the stored value.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DocumentPatch {
    pub code: Option<String>,
    pub amount_minor: Option<i64>,
    pub document_date: Option<NaiveDate>,
    pub period_month: Option<i32>,
    pub period_year: Option<i32>,
    pub check_no: Option<String>,
    pub bank_ref: Option<String>,
    pub member_ref: Option<String>,
    pub remarks: Option<String>,
}

impl DocumentPatch {
    #[must_use]
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    #[must_use]
    pub fn amount_minor(mut self, amount_minor: i64) -> Self {
        self.amount_minor = Some(amount_minor);
        self
    }
}

/// Field-wise entry patch; `None` keeps the stored value.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EntryPatch {
    pub id: Uuid,
    pub line_no: Option<i32>,
    pub account_code: Option<String>,
    pub debit_minor: Option<i64>,
    pub credit_minor: Option<i64>,
    pub member_ref: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub week_no: Option<i32>,
}

impl EntryPatch {
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            line_no: None,
            account_code: None,
            debit_minor: None,
            credit_minor: None,
            member_ref: None,
            due_date: None,
            week_no: None,
        }
    }

    #[must_use]
    pub fn debit_minor(mut self, debit_minor: i64) -> Self {
        self.debit_minor = Some(debit_minor);
        self
    }

    #[must_use]
    pub fn credit_minor(mut self, credit_minor: i64) -> Self {
        self.credit_minor = Some(credit_minor);
        self
    }

    #[must_use]
    pub fn account_code(mut self, account_code: impl Into<String>) -> Self {
        self.account_code = Some(account_code.into());
        self
    }
}

/// Entry mutations applied by one update.
#[derive(Clone, Debug, Default)]
pub struct EntryDiff {
    pub to_create: Vec<EntryInput>,
    pub to_update: Vec<EntryPatch>,
    pub to_delete_ids: Vec<Uuid>,
}

impl EntryDiff {
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_update.is_empty() && self.to_delete_ids.is_empty()
    }
}

/// Update a document header together with an entry diff.
#[derive(Clone, Debug)]
pub struct UpdateDocumentCmd {
    pub kind: DocumentKind,
    pub document_id: Uuid,
    pub patch: DocumentPatch,
    pub diff: EntryDiff,
    pub actor: String,
}

impl UpdateDocumentCmd {
    #[must_use]
    pub fn new(kind: DocumentKind, document_id: Uuid, actor: impl Into<String>) -> Self {
        Self {
            kind,
            document_id,
            patch: DocumentPatch::default(),
            diff: EntryDiff::default(),
            actor: actor.into(),
        }
    }

    #[must_use]
    pub fn patch(mut self, patch: DocumentPatch) -> Self {
        self.patch = patch;
        self
    }

    #[must_use]
    pub fn diff(mut self, diff: EntryDiff) -> Self {
        self.diff = diff;
        self
    }
}

/// Top-level action a sync record requests for its document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncAction {
    Create,
    Update,
    Delete,
}

/// Per-line action inside a sync record.
///
/// `Retain` marks a line that is already persisted: it participates in the
/// tally recomputation but is not written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryAction {
    Create,
    Update,
    Delete,
    Retain,
}

/// One line of a sync record, carrying the client's last known field values
/// plus the action tag.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SyncEntryRecord {
    pub action: EntryAction,
    pub id: Uuid,
    pub line_no: i32,
    pub account_code: String,
    pub debit_minor: i64,
    pub credit_minor: i64,
    pub member_ref: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub week_no: Option<i32>,
}

/// One offline-authored document change, as uploaded by a disconnected
/// client. Lives only for the duration of one reconciliation call.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SyncChangeRecord {
    pub action: SyncAction,
    /// Client-generated document id; identifies the target for updates and
    /// deletes and becomes the stored id for creates.
    pub document_id: Uuid,
    pub header: DocumentHeader,
    pub entries: Vec<SyncEntryRecord>,
}
