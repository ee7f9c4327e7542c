use chrono::{DateTime, Utc};
use sea_orm::{DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{DocumentKind, LedgerError, ResultLedger, documents};

use super::super::{Engine, with_tx};

impl Engine {
    /// Soft-deletes a document, cascading to its entries and schedule rows.
    ///
    /// The cascade is unconditional: every owned row gets the delete marker
    /// regardless of its own state. A second delete finds no surviving header
    /// and fails with `KeyNotFound` — never a partial cascade. The balance of
    /// a deleted document is not validated.
    pub async fn soft_delete_document(
        &self,
        kind: DocumentKind,
        document_id: Uuid,
        actor: &str,
    ) -> ResultLedger<Uuid> {
        tracing::debug!(kind = kind.as_str(), document_id = %document_id, "deleting document");
        with_tx!(self, |db_tx| {
            let now = Utc::now();
            let model = self.require_document(&db_tx, kind, document_id).await?;
            self.cascade_soft_delete(&db_tx, kind, &[(document_id, model.code)], actor, now)
                .await?;
            Ok(document_id)
        })
    }

    /// Bulk soft-delete used by sync reconciliation: every requested id must
    /// match a surviving document of the kind, else the batch fails.
    pub(in crate::ops) async fn soft_delete_documents_in_tx(
        &self,
        db_tx: &DatabaseTransaction,
        kind: DocumentKind,
        document_ids: &[Uuid],
        actor: &str,
        now: DateTime<Utc>,
    ) -> ResultLedger<()> {
        let ids: Vec<String> = document_ids.iter().map(Uuid::to_string).collect();
        let models = documents::Entity::find()
            .filter(documents::Column::Id.is_in(ids))
            .filter(documents::Column::Kind.eq(kind.as_str()))
            .filter(documents::Column::DeletedAt.is_null())
            .all(db_tx)
            .await?;
        if models.len() != document_ids.len() {
            return Err(LedgerError::Persistence(format!(
                "delete matched {} of {} documents",
                models.len(),
                document_ids.len()
            )));
        }

        let mut docs = Vec::with_capacity(models.len());
        for model in models {
            docs.push((documents::parse_document_id(&model.id)?, model.code));
        }
        self.cascade_soft_delete(db_tx, kind, &docs, actor, now)
            .await
    }
}
