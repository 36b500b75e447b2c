use serde::Serialize;

use crate::{entity::recording, prelude::*, sv};

/// Recording as shown to a caller. `video_url` is withheld when locked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordingView {
  pub id: i64,
  pub title: String,
  pub description: Option<String>,
  pub duration_secs: Option<i32>,
  pub created_at: DateTime,
  pub locked: bool,
  pub video_url: Option<String>,
}

impl RecordingView {
  pub fn unlocked(recording: recording::Model) -> Self {
    Self::build(recording, false)
  }

  pub fn locked(recording: recording::Model) -> Self {
    Self::build(recording, true)
  }

  fn build(recording: recording::Model, locked: bool) -> Self {
    Self {
      id: recording.id,
      title: recording.title,
      description: recording.description,
      duration_secs: recording.duration_secs,
      created_at: recording.created_at,
      locked,
      video_url: (!locked).then_some(recording.video_url),
    }
  }
}

/// Guest policy over a course's published recordings in creation order:
/// the oldest is playable, the rest are teasers.
pub fn guest_view(recordings: Vec<recording::Model>) -> Vec<RecordingView> {
  recordings
    .into_iter()
    .enumerate()
    .map(|(idx, recording)| {
      if idx == 0 {
        RecordingView::unlocked(recording)
      } else {
        RecordingView::locked(recording)
      }
    })
    .collect()
}

/// Unauthenticated preview. Does not touch trial state.
pub struct Preview<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Preview<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn guest(&self, course_id: i64) -> Result<Vec<RecordingView>> {
    sv::Course::new(self.db).require(course_id).await?;

    let recordings = sv::Recording::new(self.db).published(course_id).await?;
    Ok(guest_view(recordings))
  }
}
