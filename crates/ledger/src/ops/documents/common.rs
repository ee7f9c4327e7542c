use chrono::{DateTime, Utc};
use uuid::Uuid;

use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, prelude::*, sea_query::Expr,
};

use crate::{
    CreateDocumentCmd, Document, DocumentKind, Entry, EntryDiff, LedgerError, ResultLedger,
    ScheduleEntry, activity, documents, entries, generate_schedule, schedules, tally,
};

use super::super::Engine;

impl Engine {
    /// Finds a surviving (not soft-deleted) document of the given kind.
    pub(in crate::ops) async fn require_document(
        &self,
        db_tx: &DatabaseTransaction,
        kind: DocumentKind,
        document_id: Uuid,
    ) -> ResultLedger<documents::Model> {
        documents::Entity::find_by_id(document_id.to_string())
            .filter(documents::Column::Kind.eq(kind.as_str()))
            .filter(documents::Column::DeletedAt.is_null())
            .one(db_tx)
            .await?
            .ok_or_else(|| LedgerError::KeyNotFound("document not exists".to_string()))
    }

    /// Loads the surviving entries of a document, ordered by line number.
    pub(in crate::ops) async fn load_surviving_entries(
        &self,
        db_tx: &DatabaseTransaction,
        document_id: Uuid,
    ) -> ResultLedger<Vec<Entry>> {
        let models = entries::Entity::find()
            .filter(entries::Column::DocumentId.eq(document_id.to_string()))
            .filter(entries::Column::DeletedAt.is_null())
            .order_by_asc(entries::Column::LineNo)
            .all(db_tx)
            .await?;

        let mut out = Vec::with_capacity(models.len());
        for model in models {
            out.push(Entry::try_from(model)?);
        }
        Ok(out)
    }

    /// Re-runs the tally conditions against the full surviving entry set and
    /// the declared amount. Called after every entry mutation has landed.
    pub(in crate::ops) async fn check_document_tally(
        &self,
        db_tx: &DatabaseTransaction,
        document_id: Uuid,
        amount_minor: i64,
    ) -> ResultLedger<()> {
        let survivors = self.load_surviving_entries(db_tx, document_id).await?;
        if tally::has_duplicate_lines(&survivors) {
            return Err(LedgerError::TallyMismatch(tally::TallyCheck::DuplicateLines));
        }

        let cash_codes = self.cash_leg_codes(db_tx).await?;
        if let Some(check) = tally::tally(&survivors, &cash_codes, amount_minor).first_failure() {
            return Err(LedgerError::TallyMismatch(check));
        }
        Ok(())
    }

    /// Persists a new document header with its entry set (and payment
    /// schedule, for loan releases). Does **not** run the tally check; the
    /// caller does that once all entry mutations for the operation are done.
    pub(in crate::ops) async fn insert_document_with_entries(
        &self,
        db_tx: &DatabaseTransaction,
        cmd: CreateDocumentCmd,
        now: DateTime<Utc>,
    ) -> ResultLedger<Document> {
        if cmd.entries.is_empty() {
            return Err(LedgerError::Validation(
                "document must have at least one entry".to_string(),
            ));
        }

        let code = cmd.header.code.trim().to_uppercase();
        self.ensure_code_available(db_tx, &code).await?;

        let document_id = cmd.document_id.unwrap_or_else(Uuid::new_v4);
        let doc = Document {
            id: document_id,
            kind: cmd.kind,
            code,
            amount_minor: cmd.header.amount_minor,
            document_date: cmd.header.document_date,
            period_month: cmd.header.period_month,
            period_year: cmd.header.period_year,
            check_no: cmd.header.check_no.clone(),
            bank_ref: cmd.header.bank_ref.clone(),
            member_ref: cmd.header.member_ref.clone(),
            remarks: cmd.header.remarks.clone(),
            no_of_weeks: cmd.header.no_of_weeks,
            created_by: cmd.actor.clone(),
            created_at: now,
            deleted_at: None,
            deleted_by: None,
            entries: Vec::new(),
            schedule: Vec::new(),
        };
        documents::ActiveModel::from(&doc).insert(db_tx).await?;

        let entry_rows: Vec<Entry> = cmd
            .entries
            .iter()
            .map(|input| Entry::from_input(document_id, input))
            .collect();
        let models: Vec<entries::ActiveModel> =
            entry_rows.iter().map(entries::ActiveModel::from).collect();
        let expected = models.len() as u64;
        let inserted = entries::Entity::insert_many(models)
            .exec_without_returning(db_tx)
            .await?;
        if inserted != expected {
            return Err(LedgerError::Persistence(format!(
                "entry insert persisted {inserted} of {expected} rows"
            )));
        }

        let schedule_rows = if cmd.kind.has_schedule() {
            let weeks = match cmd.header.no_of_weeks {
                Some(weeks) if weeks >= 1 => weeks as u32,
                _ => {
                    return Err(LedgerError::Validation(
                        "loan release requires a term of at least one week".to_string(),
                    ));
                }
            };
            let rows: Vec<ScheduleEntry> = generate_schedule(cmd.header.document_date, weeks)
                .into_iter()
                .map(|line| ScheduleEntry {
                    id: Uuid::new_v4(),
                    document_id,
                    week_no: line.week as i32,
                    due_date: line.due_date,
                    paid: line.paid,
                    deleted_at: None,
                })
                .collect();
            let models: Vec<schedules::ActiveModel> =
                rows.iter().map(schedules::ActiveModel::from).collect();
            let expected = models.len() as u64;
            let inserted = schedules::Entity::insert_many(models)
                .exec_without_returning(db_tx)
                .await?;
            if inserted != expected {
                return Err(LedgerError::Persistence(format!(
                    "schedule insert persisted {inserted} of {expected} rows"
                )));
            }
            rows
        } else {
            Vec::new()
        };

        self.record_activity(
            db_tx,
            &cmd.actor,
            format!("created {} {}", doc.kind.as_str(), doc.code),
            doc.kind.as_str(),
            &document_id.to_string(),
            now,
        )
        .await?;
        for entry in &entry_rows {
            self.record_activity(
                db_tx,
                &cmd.actor,
                format!("added entry line {} to {}", entry.line_no, doc.code),
                "entry",
                &entry.id.to_string(),
                now,
            )
            .await?;
        }

        Ok(Document {
            entries: entry_rows,
            schedule: schedule_rows,
            ..doc
        })
    }

    /// Applies one entry diff: inserts first, then soft-deletes, then per-id
    /// field updates. Every write verifies its affected count.
    pub(in crate::ops) async fn apply_entry_diff(
        &self,
        db_tx: &DatabaseTransaction,
        document_id: Uuid,
        diff: &EntryDiff,
        now: DateTime<Utc>,
    ) -> ResultLedger<()> {
        if !diff.to_create.is_empty() {
            let models: Vec<entries::ActiveModel> = diff
                .to_create
                .iter()
                .map(|input| entries::ActiveModel::from(&Entry::from_input(document_id, input)))
                .collect();
            let expected = models.len() as u64;
            let inserted = entries::Entity::insert_many(models)
                .exec_without_returning(db_tx)
                .await?;
            if inserted != expected {
                return Err(LedgerError::Persistence(format!(
                    "entry insert persisted {inserted} of {expected} rows"
                )));
            }
        }

        if !diff.to_delete_ids.is_empty() {
            let ids: Vec<String> = diff.to_delete_ids.iter().map(Uuid::to_string).collect();
            let expected = ids.len() as u64;
            // Only not-yet-deleted rows match: deleting an already-deleted
            // entry surfaces as a count mismatch, not a silent no-op.
            let result = entries::Entity::update_many()
                .col_expr(entries::Column::DeletedAt, Expr::value(Some(now)))
                .filter(entries::Column::Id.is_in(ids))
                .filter(entries::Column::DocumentId.eq(document_id.to_string()))
                .filter(entries::Column::DeletedAt.is_null())
                .exec(db_tx)
                .await?;
            if result.rows_affected != expected {
                return Err(LedgerError::Persistence(format!(
                    "entry delete matched {} of {expected} rows",
                    result.rows_affected
                )));
            }
        }

        for patch in &diff.to_update {
            let mut update = entries::Entity::update_many()
                .filter(entries::Column::Id.eq(patch.id.to_string()))
                .filter(entries::Column::DocumentId.eq(document_id.to_string()))
                .filter(entries::Column::DeletedAt.is_null());
            let mut changed = false;
            if let Some(line_no) = patch.line_no {
                update = update.col_expr(entries::Column::LineNo, Expr::value(line_no));
                changed = true;
            }
            if let Some(account_code) = patch.account_code.as_deref() {
                update = update.col_expr(
                    entries::Column::AccountCode,
                    Expr::value(account_code.trim().to_uppercase()),
                );
                changed = true;
            }
            if let Some(debit_minor) = patch.debit_minor {
                update = update.col_expr(entries::Column::DebitMinor, Expr::value(debit_minor));
                changed = true;
            }
            if let Some(credit_minor) = patch.credit_minor {
                update = update.col_expr(entries::Column::CreditMinor, Expr::value(credit_minor));
                changed = true;
            }
            if let Some(member_ref) = patch.member_ref.as_deref() {
                update = update.col_expr(
                    entries::Column::MemberRef,
                    Expr::value(Some(member_ref.to_string())),
                );
                changed = true;
            }
            if let Some(due_date) = patch.due_date {
                update = update.col_expr(entries::Column::DueDate, Expr::value(Some(due_date)));
                changed = true;
            }
            if let Some(week_no) = patch.week_no {
                update = update.col_expr(entries::Column::WeekNo, Expr::value(Some(week_no)));
                changed = true;
            }
            if !changed {
                continue;
            }

            let result = update.exec(db_tx).await?;
            if result.rows_affected != 1 {
                return Err(LedgerError::Persistence(format!(
                    "entry {} not updated",
                    patch.id
                )));
            }
        }

        Ok(())
    }

    /// Soft-deletes a set of headers and cascades to their entries and
    /// schedule rows. The header write verifies its affected count; the
    /// cascade is unconditional.
    pub(in crate::ops) async fn cascade_soft_delete(
        &self,
        db_tx: &DatabaseTransaction,
        kind: DocumentKind,
        docs: &[(Uuid, String)],
        actor: &str,
        now: DateTime<Utc>,
    ) -> ResultLedger<()> {
        let ids: Vec<String> = docs.iter().map(|(id, _)| id.to_string()).collect();
        let expected = ids.len() as u64;

        let result = documents::Entity::update_many()
            .col_expr(documents::Column::DeletedAt, Expr::value(Some(now)))
            .col_expr(
                documents::Column::DeletedBy,
                Expr::value(Some(actor.to_string())),
            )
            .filter(documents::Column::Id.is_in(ids.clone()))
            .filter(documents::Column::Kind.eq(kind.as_str()))
            .filter(documents::Column::DeletedAt.is_null())
            .exec(db_tx)
            .await?;
        if result.rows_affected != expected {
            return Err(LedgerError::Persistence(format!(
                "document delete matched {} of {expected} rows",
                result.rows_affected
            )));
        }

        entries::Entity::update_many()
            .col_expr(entries::Column::DeletedAt, Expr::value(Some(now)))
            .filter(entries::Column::DocumentId.is_in(ids.clone()))
            .exec(db_tx)
            .await?;

        schedules::Entity::update_many()
            .col_expr(schedules::Column::DeletedAt, Expr::value(Some(now)))
            .filter(schedules::Column::DocumentId.is_in(ids))
            .exec(db_tx)
            .await?;

        for (id, code) in docs {
            self.record_activity(
                db_tx,
                actor,
                format!("deleted {} {}", kind.as_str(), code),
                kind.as_str(),
                &id.to_string(),
                now,
            )
            .await?;
        }

        Ok(())
    }

    pub(in crate::ops) async fn record_activity(
        &self,
        db_tx: &DatabaseTransaction,
        actor: &str,
        text: String,
        resource_kind: &str,
        resource_id: &str,
        now: DateTime<Utc>,
    ) -> ResultLedger<()> {
        let row = activity::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4().to_string()),
            actor: ActiveValue::Set(actor.to_string()),
            activity: ActiveValue::Set(text),
            resource_kind: ActiveValue::Set(resource_kind.to_string()),
            resource_id: ActiveValue::Set(resource_id.to_string()),
            recorded_at: ActiveValue::Set(now),
        };
        row.insert(db_tx).await?;
        Ok(())
    }
}
