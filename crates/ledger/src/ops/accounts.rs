use std::collections::HashSet;

use sea_orm::{DatabaseTransaction, QueryOrder, TransactionTrait, prelude::*};

use crate::{AccountCode, LedgerError, ResultLedger, accounts};

use super::{Engine, with_tx};

impl Engine {
    /// Registers an account code in the chart of accounts.
    ///
    /// `cash_leg` marks codes that represent actual cash or bank movement;
    /// the tally's net-amount condition keys off this flag.
    pub async fn register_account(
        &self,
        code: &str,
        name: &str,
        cash_leg: bool,
    ) -> ResultLedger<String> {
        let code = code.trim().to_uppercase();
        if code.is_empty() {
            return Err(LedgerError::Validation(
                "account code must not be empty".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let existing = accounts::Entity::find_by_id(code.clone())
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                return Err(LedgerError::CodeTaken(code.clone()));
            }

            let account = AccountCode {
                code: code.clone(),
                name: name.trim().to_string(),
                cash_leg,
            };
            accounts::ActiveModel::from(&account).insert(&db_tx).await?;
            Ok(code.clone())
        })
    }

    /// Lists the registered chart of accounts.
    pub async fn accounts(&self) -> ResultLedger<Vec<AccountCode>> {
        let models = accounts::Entity::find()
            .order_by_asc(accounts::Column::Code)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(AccountCode::from).collect())
    }

    /// Loads the set of account codes flagged as cash/bank legs, from the
    /// current transactional view.
    pub(super) async fn cash_leg_codes(
        &self,
        db_tx: &DatabaseTransaction,
    ) -> ResultLedger<HashSet<String>> {
        let models = accounts::Entity::find()
            .filter(accounts::Column::CashLeg.eq(true))
            .all(db_tx)
            .await?;
        Ok(models.into_iter().map(|model| model.code).collect())
    }
}
