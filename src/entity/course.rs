use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{enrollment, live_class, recording};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "courses")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i64,
  pub title: String,
  pub description: Option<String>,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(has_many = "enrollment::Entity")]
  Enrollments,
  #[sea_orm(has_many = "recording::Entity")]
  Recordings,
  #[sea_orm(has_many = "live_class::Entity")]
  LiveClasses,
}

impl Related<enrollment::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Enrollments.def()
  }
}

impl Related<recording::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Recordings.def()
  }
}

impl Related<live_class::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::LiveClasses.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
