use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::course;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lecture_recordings")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i64,
  pub course_id: i64,
  pub title: String,
  pub description: Option<String>,
  pub duration_secs: Option<i32>,
  pub video_url: String,
  pub is_published: bool,
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
