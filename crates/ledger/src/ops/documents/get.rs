use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{Document, DocumentKind, ResultLedger, ScheduleEntry, schedules, tally};

use super::super::{Engine, with_tx};

impl Engine {
    /// Returns a hydrated document: the surviving header with its surviving
    /// entries (ordered by line number) and, for loan releases, the surviving
    /// payment schedule.
    pub async fn document(
        &self,
        kind: DocumentKind,
        document_id: Uuid,
    ) -> ResultLedger<Document> {
        with_tx!(self, |db_tx| {
            self.document_in_tx(&db_tx, kind, document_id).await
        })
    }

    /// Recomputes the tally report for a stored document without mutating
    /// anything. Useful for audits of documents written before a chart
    /// change.
    pub async fn document_tally(
        &self,
        kind: DocumentKind,
        document_id: Uuid,
    ) -> ResultLedger<tally::TallyReport> {
        with_tx!(self, |db_tx| {
            let model = self.require_document(&db_tx, kind, document_id).await?;
            let survivors = self.load_surviving_entries(&db_tx, document_id).await?;
            let cash_codes = self.cash_leg_codes(&db_tx).await?;
            Ok(tally::tally(&survivors, &cash_codes, model.amount_minor))
        })
    }

    pub(in crate::ops) async fn document_in_tx(
        &self,
        db_tx: &DatabaseTransaction,
        kind: DocumentKind,
        document_id: Uuid,
    ) -> ResultLedger<Document> {
        let model = self.require_document(db_tx, kind, document_id).await?;
        let mut doc = Document::try_from(model)?;
        doc.entries = self.load_surviving_entries(db_tx, document_id).await?;

        if kind.has_schedule() {
            let models = schedules::Entity::find()
                .filter(schedules::Column::DocumentId.eq(document_id.to_string()))
                .filter(schedules::Column::DeletedAt.is_null())
                .order_by_asc(schedules::Column::WeekNo)
                .all(db_tx)
                .await?;
            let mut rows = Vec::with_capacity(models.len());
            for model in models {
                rows.push(ScheduleEntry::try_from(model)?);
            }
            doc.schedule = rows;
        }

        Ok(doc)
    }
}
