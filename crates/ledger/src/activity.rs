//! Activity log rows.
//!
//! Every mutation emits one row per affected resource: `(actor, activity
//! text, resource kind, resource id)`. The rows are written inside the same
//! transaction as the business mutation, so a failed activity write rolls the
//! mutation back with it.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "activity_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub actor: String,
    pub activity: String,
    pub resource_kind: String,
    pub resource_id: String,
    pub recorded_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
