use crate::{entity::course, prelude::*};

pub struct Course<'a, C = DatabaseConnection> {
  db: &'a C,
}

impl<'a, C: ConnectionTrait> Course<'a, C> {
  pub fn new(db: &'a C) -> Self {
    Self { db }
  }

  pub async fn create(
    &self,
    title: String,
    description: Option<String>,
  ) -> Result<course::Model> {
    if title.trim().is_empty() {
      return Err(Error::InvalidArgs("Course title is required".into()));
    }

    let course = course::ActiveModel {
      title: Set(title),
      description: Set(description),
      created_at: Set(now()),
      ..Default::default()
    };

    Ok(course.insert(self.db).await?)
  }

  pub async fn by_id(&self, id: i64) -> Result<Option<course::Model>> {
    Ok(course::Entity::find_by_id(id).one(self.db).await?)
  }

  pub async fn require(&self, id: i64) -> Result<course::Model> {
    self.by_id(id).await?.ok_or(Error::CourseNotFound)
  }

  pub async fn all(&self) -> Result<Vec<course::Model>> {
    Ok(
      course::Entity::find()
        .order_by_asc(course::Column::CreatedAt)
        .order_by_asc(course::Column::Id)
        .all(self.db)
        .await?,
    )
  }
}
