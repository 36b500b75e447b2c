use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{ResourceType, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "trial_grants")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i64,
  pub user_id: i64,
  pub course_id: i64,
  pub resource_type: ResourceType,
  pub used_at: DateTime,
  pub expires_at: DateTime,
}

impl Model {
  pub fn is_valid(&self, now: DateTime) -> bool {
    self.expires_at > now
  }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "user::Entity",
    from = "Column::UserId",
    to = "user::Column::Id"
  )]
  User,
}

impl Related<user::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::User.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
