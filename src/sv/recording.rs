use serde::Deserialize;

use crate::{entity::recording, prelude::*};

#[derive(Debug, Clone, Deserialize)]
pub struct NewRecording {
  pub title: String,
  pub description: Option<String>,
  pub duration_secs: Option<i32>,
  pub video_url: String,
}

pub struct Recording<'a, C = DatabaseConnection> {
  db: &'a C,
}

impl<'a, C: ConnectionTrait> Recording<'a, C> {
  pub fn new(db: &'a C) -> Self {
    Self { db }
  }

  /// New recordings start unpublished.
  pub async fn create(
    &self,
    course_id: i64,
    new: NewRecording,
  ) -> Result<recording::Model> {
    self.create_at(course_id, new, now()).await
  }

  pub async fn create_at(
    &self,
    course_id: i64,
    new: NewRecording,
    now: DateTime,
  ) -> Result<recording::Model> {
    if new.title.trim().is_empty() || new.video_url.trim().is_empty() {
      return Err(Error::InvalidArgs(
        "Recording needs a title and a video url".into(),
      ));
    }

    let recording = recording::ActiveModel {
      course_id: Set(course_id),
      title: Set(new.title),
      description: Set(new.description),
      duration_secs: Set(new.duration_secs),
      video_url: Set(new.video_url),
      is_published: Set(false),
      created_at: Set(now),
      ..Default::default()
    };

    Ok(recording.insert(self.db).await?)
  }

  pub async fn set_published(
    &self,
    id: i64,
    published: bool,
  ) -> Result<recording::Model> {
    let recording = recording::Entity::find_by_id(id)
      .one(self.db)
      .await?
      .ok_or(Error::RecordingNotFound)?;

    Ok(
      recording::ActiveModel { is_published: Set(published), ..recording.into() }
        .update(self.db)
        .await?,
    )
  }

  /// Published recordings of a course, oldest first.
  pub async fn published(
    &self,
    course_id: i64,
  ) -> Result<Vec<recording::Model>> {
    Ok(
      recording::Entity::find()
        .filter(recording::Column::CourseId.eq(course_id))
        .filter(recording::Column::IsPublished.eq(true))
        .order_by_asc(recording::Column::CreatedAt)
        .order_by_asc(recording::Column::Id)
        .all(self.db)
        .await?,
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::sv::test_utils::test_db;

  fn lecture(title: &str) -> NewRecording {
    NewRecording {
      title: title.into(),
      description: None,
      duration_secs: Some(3600),
      video_url: format!("https://cdn.example/{title}.m3u8"),
    }
  }

  #[tokio::test]
  async fn test_only_published_listed() {
    let db = test_db::setup().await;
    let course = test_db::course(&db, "History").await;
    let sv = Recording::new(&db);

    let first = sv.create(course.id, lecture("intro")).await.unwrap();
    sv.create(course.id, lecture("draft")).await.unwrap();
    assert!(sv.published(course.id).await.unwrap().is_empty());

    sv.set_published(first.id, true).await.unwrap();
    let listed = sv.published(course.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "intro");
  }

  #[tokio::test]
  async fn test_missing_video_rejected() {
    let db = test_db::setup().await;
    let mut new = lecture("intro");
    new.video_url = String::new();

    assert!(matches!(
      Recording::new(&db).create(1, new).await,
      Err(Error::InvalidArgs(_))
    ));
  }
}
