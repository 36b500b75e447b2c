use std::fmt;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of course content an entitlement is resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
  #[sea_orm(string_value = "lecture_recording")]
  LectureRecording,
  #[sea_orm(string_value = "live_class")]
  LiveClass,
}

impl ResourceType {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::LectureRecording => "lecture_recording",
      Self::LiveClass => "live_class",
    }
  }
}

impl fmt::Display for ResourceType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}
