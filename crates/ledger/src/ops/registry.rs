use sea_orm::{DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};

use crate::{LedgerError, ResultLedger, documents};

use super::{Engine, with_tx};

impl Engine {
    /// Whether a candidate document code is free to use.
    ///
    /// Codes form one namespace across every document kind: a code held by a
    /// not-deleted document of any kind blocks the candidate. Soft-deleted
    /// documents release their code.
    pub async fn is_code_unique(&self, candidate: &str) -> ResultLedger<bool> {
        let code = candidate.trim().to_uppercase();
        with_tx!(self, |db_tx| {
            let in_use = self.code_in_use(&db_tx, &code).await?;
            Ok(!in_use)
        })
    }

    pub(super) async fn code_in_use(
        &self,
        db_tx: &DatabaseTransaction,
        code: &str,
    ) -> ResultLedger<bool> {
        let existing = documents::Entity::find()
            .filter(documents::Column::Code.eq(code))
            .filter(documents::Column::DeletedAt.is_null())
            .one(db_tx)
            .await?;
        Ok(existing.is_some())
    }

    pub(super) async fn ensure_code_available(
        &self,
        db_tx: &DatabaseTransaction,
        code: &str,
    ) -> ResultLedger<()> {
        if self.code_in_use(db_tx, code).await? {
            return Err(LedgerError::CodeTaken(code.to_string()));
        }
        Ok(())
    }
}
