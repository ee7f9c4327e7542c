use chrono::Utc;
use sea_orm::TransactionTrait;

use crate::{CreateDocumentCmd, Document, ResultLedger};

use super::super::{Engine, with_tx};

impl Engine {
    /// Creates a document together with its first entry set, atomically.
    ///
    /// The header, its entries, the payment schedule (loan releases), and the
    /// activity records are persisted in one transaction; the tally check
    /// runs once everything has landed. Returns the hydrated document.
    pub async fn create_document(&self, cmd: CreateDocumentCmd) -> ResultLedger<Document> {
        tracing::debug!(
            kind = cmd.kind.as_str(),
            code = %cmd.header.code,
            entries = cmd.entries.len(),
            "creating document"
        );
        with_tx!(self, |db_tx| {
            let now = Utc::now();
            let amount_minor = cmd.header.amount_minor;
            let doc = self.insert_document_with_entries(&db_tx, cmd, now).await?;
            self.check_document_tally(&db_tx, doc.id, amount_minor)
                .await?;
            Ok(doc)
        })
    }
}
