//! Wire types shared between the back end and sync clients.
//!
//! These mirror the JSON a disconnected client uploads; the transport layer
//! (HTTP in production, the admin CLI here) maps them onto engine commands.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod sync {
    use super::*;

    /// Top-level action requested for one document.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum RecordAction {
        Create,
        Update,
        Delete,
    }

    /// Per-line action. `Retain` lines are already persisted server-side and
    /// are uploaded only so the document's balance can be recomputed.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum LineAction {
        Create,
        Update,
        Delete,
        Retain,
    }

    /// One uploaded batch for a single document kind.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct SyncBatch {
        /// Document kind string (`loan_release`, `journal_voucher`, ...).
        pub kind: String,
        pub records: Vec<SyncRecord>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct SyncRecord {
        pub action: RecordAction,
        /// Client-generated document id (UUID, serialized as a string).
        pub document_id: Uuid,
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
        #[serde(default)]
        pub entries: Vec<SyncLine>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct SyncLine {
        pub action: LineAction,
        /// Client-generated entry id.
        pub id: Uuid,
        pub line_no: i32,
        pub account_code: String,
        pub debit_minor: i64,
        pub credit_minor: i64,
        pub member_ref: Option<String>,
        pub due_date: Option<NaiveDate>,
        pub week_no: Option<i32>,
    }
}
