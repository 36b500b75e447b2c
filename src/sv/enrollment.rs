use sea_orm::{SqlErr, sea_query::OnConflict};

use crate::{
  entity::{EnrollmentType, enrollment},
  prelude::*,
};

/// Course membership ledger: at most one row per (user, course).
pub struct Enrollment<'a, C = DatabaseConnection> {
  db: &'a C,
}

impl<'a, C: ConnectionTrait> Enrollment<'a, C> {
  pub fn new(db: &'a C) -> Self {
    Self { db }
  }

  pub async fn get(
    &self,
    user_id: i64,
    course_id: i64,
  ) -> Result<Option<enrollment::Model>> {
    Ok(
      enrollment::Entity::find_by_id((user_id, course_id)).one(self.db).await?,
    )
  }

  /// Idempotent. An existing row, `paid` or `demo`, is left untouched.
  pub async fn upsert_demo(
    &self,
    user_id: i64,
    course_id: i64,
  ) -> Result<enrollment::Model> {
    let row = enrollment::ActiveModel {
      user_id: Set(user_id),
      course_id: Set(course_id),
      enrollment_type: Set(EnrollmentType::Demo),
      subscription_id: Set(None),
      created_at: Set(now()),
    };

    let inserted = enrollment::Entity::insert(row)
      .on_conflict(
        OnConflict::columns([
          enrollment::Column::UserId,
          enrollment::Column::CourseId,
        ])
        .do_nothing()
        .to_owned(),
      )
      .exec_without_returning(self.db)
      .await?;

    if inserted > 0 {
      debug!("demo enrollment created: user={user_id} course={course_id}");
    }

    self.get(user_id, course_id).await?.ok_or_else(|| {
      sea_orm::DbErr::RecordNotFound("enrollment after upsert".into()).into()
    })
  }

  /// Fails with [`Error::Conflict`] if the pair is already enrolled.
  pub async fn create_paid(
    &self,
    user_id: i64,
    course_id: i64,
    subscription_id: Option<i64>,
  ) -> Result<enrollment::Model> {
    if let Some(existing) = self.get(user_id, course_id).await? {
      warn!(
        "enrollment conflict: user={user_id} course={course_id} already {:?}",
        existing.enrollment_type
      );
      return Err(Error::Conflict);
    }

    let row = enrollment::ActiveModel {
      user_id: Set(user_id),
      course_id: Set(course_id),
      enrollment_type: Set(EnrollmentType::Paid),
      subscription_id: Set(subscription_id),
      created_at: Set(now()),
    };

    row.insert(self.db).await.map_err(|err| match err.sql_err() {
      Some(SqlErr::UniqueConstraintViolation(_)) => {
        warn!("enrollment conflict: user={user_id} course={course_id} raced");
        Error::Conflict
      }
      _ => err.into(),
    })
  }

  /// Upgrades a `demo` row to `paid`, e.g. when a trial user buys the course.
  pub async fn promote(
    &self,
    user_id: i64,
    course_id: i64,
    subscription_id: Option<i64>,
  ) -> Result<enrollment::Model> {
    let row = self.get(user_id, course_id).await?.ok_or_else(|| {
      Error::InvalidArgs("No enrollment to promote".into())
    })?;

    if row.enrollment_type == EnrollmentType::Paid {
      return Err(Error::Conflict);
    }

    Ok(
      enrollment::ActiveModel {
        enrollment_type: Set(EnrollmentType::Paid),
        subscription_id: Set(subscription_id),
        ..row.into()
      }
      .update(self.db)
      .await?,
    )
  }
}
