use serde::Deserialize;

use crate::{entity::live_class, prelude::*};

#[derive(Debug, Clone, Deserialize)]
pub struct NewLiveClass {
  pub title: String,
  pub starts_at: DateTime,
  pub meeting_url: String,
}

pub struct LiveClass<'a, C = DatabaseConnection> {
  db: &'a C,
}

impl<'a, C: ConnectionTrait> LiveClass<'a, C> {
  pub fn new(db: &'a C) -> Self {
    Self { db }
  }

  pub async fn create(
    &self,
    course_id: i64,
    new: NewLiveClass,
  ) -> Result<live_class::Model> {
    if new.title.trim().is_empty() || new.meeting_url.trim().is_empty() {
      return Err(Error::InvalidArgs(
        "Live class needs a title and a meeting url".into(),
      ));
    }

    let class = live_class::ActiveModel {
      course_id: Set(course_id),
      title: Set(new.title),
      starts_at: Set(new.starts_at),
      meeting_url: Set(new.meeting_url),
      created_at: Set(now()),
      ..Default::default()
    };

    Ok(class.insert(self.db).await?)
  }

  pub async fn by_course(
    &self,
    course_id: i64,
  ) -> Result<Vec<live_class::Model>> {
    Ok(
      live_class::Entity::find()
        .filter(live_class::Column::CourseId.eq(course_id))
        .order_by_asc(live_class::Column::StartsAt)
        .all(self.db)
        .await?,
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::sv::test_utils::test_db;

  #[tokio::test]
  async fn test_schedule_order() {
    let db = test_db::setup().await;
    let course = test_db::course(&db, "Music").await;
    let sv = LiveClass::new(&db);
    let t = now();

    for (title, offset) in [("second", 48), ("first", 24)] {
      sv.create(course.id, NewLiveClass {
        title: title.into(),
        starts_at: t + TimeDelta::hours(offset),
        meeting_url: format!("https://meet.example/{title}"),
      })
      .await
      .unwrap();
    }

    let titles: Vec<_> = sv
      .by_course(course.id)
      .await
      .unwrap()
      .into_iter()
      .map(|class| class.title)
      .collect();
    assert_eq!(titles, ["first", "second"]);
  }
}
