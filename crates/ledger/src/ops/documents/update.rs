use chrono::{DateTime, Utc};
use sea_orm::{QueryFilter, TransactionTrait, prelude::*, sea_query::Expr};

use crate::{Document, LedgerError, ResultLedger, UpdateDocumentCmd, documents};

use super::super::{Engine, with_tx};

impl Engine {
    /// Updates a document header together with an entry diff, atomically.
    ///
    /// Order of application: header patch, entry inserts, entry soft-deletes,
    /// per-entry field updates — then the tally check against the full
    /// surviving set and the patched amount. Any failed condition rolls the
    /// whole transaction back.
    pub async fn update_document(&self, cmd: UpdateDocumentCmd) -> ResultLedger<Document> {
        tracing::debug!(
            kind = cmd.kind.as_str(),
            document_id = %cmd.document_id,
            "updating document"
        );
        with_tx!(self, |db_tx| {
            let now = Utc::now();
            let kind = cmd.kind;
            let document_id = cmd.document_id;
            self.update_document_in_tx(&db_tx, cmd, now).await?;
            self.document_in_tx(&db_tx, kind, document_id).await
        })
    }

    pub(in crate::ops) async fn update_document_in_tx(
        &self,
        db_tx: &sea_orm::DatabaseTransaction,
        cmd: UpdateDocumentCmd,
        now: DateTime<Utc>,
    ) -> ResultLedger<()> {
        let model = self
            .require_document(db_tx, cmd.kind, cmd.document_id)
            .await?;
        let new_amount_minor = cmd.patch.amount_minor.unwrap_or(model.amount_minor);

        // The code uniqueness check runs only when the code actually changes.
        // Stored values are normalized first: legacy bare-numeric codes read
        // as already carrying their kind prefix.
        let mut new_code: Option<String> = None;
        if let Some(raw) = cmd.patch.code.as_deref() {
            let candidate = raw.trim().to_uppercase();
            if candidate != cmd.kind.normalize_stored_code(&model.code) {
                self.ensure_code_available(db_tx, &candidate).await?;
                new_code = Some(candidate);
            }
        }

        let mut update = documents::Entity::update_many()
            .filter(documents::Column::Id.eq(cmd.document_id.to_string()))
            .filter(documents::Column::Kind.eq(cmd.kind.as_str()))
            .filter(documents::Column::DeletedAt.is_null());
        let mut changed = false;
        if let Some(code) = new_code.clone() {
            update = update.col_expr(documents::Column::Code, Expr::value(code));
            changed = true;
        }
        if let Some(amount_minor) = cmd.patch.amount_minor {
            update = update.col_expr(documents::Column::AmountMinor, Expr::value(amount_minor));
            changed = true;
        }
        if let Some(document_date) = cmd.patch.document_date {
            update = update.col_expr(documents::Column::DocumentDate, Expr::value(document_date));
            changed = true;
        }
        if let Some(period_month) = cmd.patch.period_month {
            update = update.col_expr(documents::Column::PeriodMonth, Expr::value(period_month));
            changed = true;
        }
        if let Some(period_year) = cmd.patch.period_year {
            update = update.col_expr(documents::Column::PeriodYear, Expr::value(period_year));
            changed = true;
        }
        if let Some(check_no) = cmd.patch.check_no.as_deref() {
            update = update.col_expr(
                documents::Column::CheckNo,
                Expr::value(Some(check_no.to_string())),
            );
            changed = true;
        }
        if let Some(bank_ref) = cmd.patch.bank_ref.as_deref() {
            update = update.col_expr(
                documents::Column::BankRef,
                Expr::value(Some(bank_ref.to_string())),
            );
            changed = true;
        }
        if let Some(member_ref) = cmd.patch.member_ref.as_deref() {
            update = update.col_expr(
                documents::Column::MemberRef,
                Expr::value(Some(member_ref.to_string())),
            );
            changed = true;
        }
        if let Some(remarks) = cmd.patch.remarks.as_deref() {
            update = update.col_expr(
                documents::Column::Remarks,
                Expr::value(Some(remarks.to_string())),
            );
            changed = true;
        }
        if changed {
            let result = update.exec(db_tx).await?;
            if result.rows_affected != 1 {
                return Err(LedgerError::Persistence(format!(
                    "document {} header not updated",
                    cmd.document_id
                )));
            }
        }

        self.apply_entry_diff(db_tx, cmd.document_id, &cmd.diff, now)
            .await?;
        self.check_document_tally(db_tx, cmd.document_id, new_amount_minor)
            .await?;

        let code = new_code.unwrap_or(model.code);
        self.record_activity(
            db_tx,
            &cmd.actor,
            format!("updated {} {}", cmd.kind.as_str(), code),
            cmd.kind.as_str(),
            &cmd.document_id.to_string(),
            now,
        )
        .await?;

        Ok(())
    }
}
