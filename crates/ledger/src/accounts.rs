//! Chart-of-accounts records.
//!
//! The engine only cares about one property of an account code: whether it
//! represents actual cash or bank movement (`cash_leg`). That flag drives the
//! tally's net-amount condition. Everything else about the chart of accounts
//! (categories, reporting groups) lives outside this crate.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountCode {
    pub code: String,
    pub name: String,
    pub cash_leg: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "account_codes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub code: String,
    pub name: String,
    pub cash_leg: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&AccountCode> for ActiveModel {
    fn from(account: &AccountCode) -> Self {
        Self {
            code: ActiveValue::Set(account.code.clone()),
            name: ActiveValue::Set(account.name.clone()),
            cash_leg: ActiveValue::Set(account.cash_leg),
        }
    }
}

impl From<Model> for AccountCode {
    fn from(model: Model) -> Self {
        Self {
            code: model.code,
            name: model.name,
            cash_leg: model.cash_leg,
        }
    }
}
