use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{ResourceType, subscription};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum PlanType {
  #[sea_orm(string_value = "recordings_only")]
  RecordingsOnly,
  #[sea_orm(string_value = "live_classes_only")]
  LiveClassesOnly,
  #[sea_orm(string_value = "recordings_and_live")]
  RecordingsAndLive,
}

impl PlanType {
  /// Fixed plan coverage table.
  pub fn covers(self, resource: ResourceType) -> bool {
    use ResourceType::*;

    match self {
      Self::RecordingsOnly => resource == LectureRecording,
      Self::LiveClassesOnly => resource == LiveClass,
      Self::RecordingsAndLive => true,
    }
  }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subscription_plans")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i64,
  pub name: String,
  pub plan_type: PlanType,
  /// Minor currency units.
  pub price: i64,
  pub duration_months: Option<i32>,
  pub cutoff_at: Option<DateTime>,
  pub is_active: bool,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(has_many = "subscription::Entity")]
  Subscriptions,
}

impl Related<subscription::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Subscriptions.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
