use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{enrollment, subscription, trial_grant};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
  #[sea_orm(string_value = "student")]
  #[default]
  Student,
  #[sea_orm(string_value = "teacher")]
  Teacher,
  #[sea_orm(string_value = "admin")]
  Admin,
  #[sea_orm(string_value = "superadmin")]
  Superadmin,
}

impl UserRole {
  pub fn is_admin(self) -> bool {
    matches!(self, Self::Admin | Self::Superadmin)
  }

  pub fn can_manage_content(self) -> bool {
    self == Self::Teacher || self.is_admin()
  }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub id: i64,
  pub role: UserRole,
  /// Set once by the first trial grant, never cleared.
  pub trial_used: bool,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(has_many = "enrollment::Entity")]
  Enrollments,
  #[sea_orm(has_many = "subscription::Entity")]
  Subscriptions,
  #[sea_orm(has_many = "trial_grant::Entity")]
  TrialGrants,
}

impl Related<enrollment::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Enrollments.def()
  }
}

impl Related<subscription::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Subscriptions.def()
  }
}

impl Related<trial_grant::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::TrialGrants.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
