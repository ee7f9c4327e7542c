//! Batch reconciliation of offline-authored changes.
//!
//! A disconnected client uploads one batch per document kind; every record
//! carries a top-level create/update/delete action and per-line actions
//! (create/update/delete/retain). The whole batch shares one outer
//! transaction: a failure in any single record aborts everything — this is an
//! all-or-nothing reconciliation contract, not per-record partial success.
//!
//! Records are processed sequentially inside the transaction: a database
//! transaction is a single connection and admits no concurrent writers.

use chrono::{DateTime, Utc};
use sea_orm::{DatabaseTransaction, TransactionTrait};

use crate::{
    CreateDocumentCmd, DocumentHeader, DocumentKind, DocumentPatch, EntryAction, EntryDiff,
    EntryInput, EntryPatch, ResultLedger, SyncAction, SyncChangeRecord, SyncEntryRecord,
    UpdateDocumentCmd,
};

use super::{Engine, with_tx};

impl Engine {
    /// Applies a batch of client-tagged change records for one document kind.
    ///
    /// Creates are applied first, then updates, then one bulk soft-delete
    /// over all delete-tagged ids (whose matched count must equal the
    /// requested count). Referenced entities (account codes, members) are
    /// assumed validated upstream; only the internal ledger invariants are
    /// enforced here.
    pub async fn reconcile_batch(
        &self,
        kind: DocumentKind,
        records: Vec<SyncChangeRecord>,
        actor: &str,
    ) -> ResultLedger<()> {
        let mut to_create = Vec::new();
        let mut to_update = Vec::new();
        let mut to_delete = Vec::new();
        for record in records {
            match record.action {
                SyncAction::Create => to_create.push(record),
                SyncAction::Update => to_update.push(record),
                SyncAction::Delete => to_delete.push(record.document_id),
            }
        }
        tracing::info!(
            kind = kind.as_str(),
            creates = to_create.len(),
            updates = to_update.len(),
            deletes = to_delete.len(),
            "reconciling sync batch"
        );

        with_tx!(self, |db_tx| {
            let now = Utc::now();
            for record in &to_create {
                self.reconcile_create(&db_tx, kind, record, actor, now)
                    .await?;
            }
            for record in &to_update {
                self.reconcile_update(&db_tx, kind, record, actor, now)
                    .await?;
            }
            if !to_delete.is_empty() {
                self.soft_delete_documents_in_tx(&db_tx, kind, &to_delete, actor, now)
                    .await?;
            }
            Ok(())
        })
    }

    /// A nominally "create" record can carry update/delete-tagged lines too:
    /// the client created the document and kept editing it before ever
    /// syncing. The document is created from the create-tagged lines, the
    /// trailing diff is applied on top, and the tally runs once — after the
    /// diff, never against the intermediate state.
    async fn reconcile_create(
        &self,
        db_tx: &DatabaseTransaction,
        kind: DocumentKind,
        record: &SyncChangeRecord,
        actor: &str,
        now: DateTime<Utc>,
    ) -> ResultLedger<()> {
        let (create_inputs, diff) = partition_entry_actions(&record.entries);
        let amount_minor = record.header.amount_minor;

        let cmd = CreateDocumentCmd {
            kind,
            document_id: Some(record.document_id),
            header: record.header.clone(),
            entries: create_inputs,
            actor: actor.to_string(),
        };
        let doc = self.insert_document_with_entries(db_tx, cmd, now).await?;
        if !diff.is_empty() {
            self.apply_entry_diff(db_tx, doc.id, &diff, now).await?;
        }
        self.check_document_tally(db_tx, doc.id, amount_minor).await
    }

    async fn reconcile_update(
        &self,
        db_tx: &DatabaseTransaction,
        kind: DocumentKind,
        record: &SyncChangeRecord,
        actor: &str,
        now: DateTime<Utc>,
    ) -> ResultLedger<()> {
        let (create_inputs, mut diff) = partition_entry_actions(&record.entries);
        diff.to_create = create_inputs;

        let cmd = UpdateDocumentCmd {
            kind,
            document_id: record.document_id,
            patch: header_patch(&record.header),
            diff,
            actor: actor.to_string(),
        };
        self.update_document_in_tx(db_tx, cmd, now).await
    }
}

/// Splits a record's lines by action: create-tagged lines become inserts,
/// update/delete-tagged lines an [`EntryDiff`]. Retain-tagged lines are
/// already persisted — they are dropped here and reach the tally through the
/// surviving-set reload.
fn partition_entry_actions(entries: &[SyncEntryRecord]) -> (Vec<EntryInput>, EntryDiff) {
    let mut create_inputs = Vec::new();
    let mut diff = EntryDiff::default();

    for line in entries {
        match line.action {
            EntryAction::Create => create_inputs.push(EntryInput {
                id: Some(line.id),
                line_no: line.line_no,
                account_code: line.account_code.clone(),
                debit_minor: line.debit_minor,
                credit_minor: line.credit_minor,
                member_ref: line.member_ref.clone(),
                due_date: line.due_date,
                week_no: line.week_no,
            }),
            EntryAction::Update => diff.to_update.push(EntryPatch {
                id: line.id,
                line_no: Some(line.line_no),
                account_code: Some(line.account_code.clone()),
                debit_minor: Some(line.debit_minor),
                credit_minor: Some(line.credit_minor),
                member_ref: line.member_ref.clone(),
                due_date: line.due_date,
                week_no: line.week_no,
            }),
            EntryAction::Delete => diff.to_delete_ids.push(line.id),
            EntryAction::Retain => {}
        }
    }

    (create_inputs, diff)
}

/// The client uploads the full header it last saw; every field maps onto the
/// patch so the stored header converges to the client state.
fn header_patch(header: &DocumentHeader) -> DocumentPatch {
    DocumentPatch {
        code: Some(header.code.clone()),
        amount_minor: Some(header.amount_minor),
        document_date: Some(header.document_date),
        period_month: Some(header.period_month),
        period_year: Some(header.period_year),
        check_no: header.check_no.clone(),
        bank_ref: header.bank_ref.clone(),
        member_ref: header.member_ref.clone(),
        remarks: header.remarks.clone(),
    }
}
