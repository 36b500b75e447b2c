use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::course;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "live_classes")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i64,
  pub course_id: i64,
  pub title: String,
  pub starts_at: DateTime,
  pub meeting_url: String,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "course::Entity",
    from = "Column::CourseId",
    to = "course::Column::Id"
  )]
  Course,
}

impl Related<course::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Course.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
