use sea_orm::sea_query::Expr;

use crate::{
  entity::{ResourceType, course, trial_grant, user},
  prelude::*,
  sv,
};

/// Lifetime of a trial grant from the moment it is issued.
pub const TRIAL_HOURS: i64 = 24;

/// One-time, time-bounded trial access. Every user gets a single grant for
/// one resource type in one course, ever.
pub struct TrialGrant<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> TrialGrant<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn is_eligible(&self, user_id: i64) -> Result<bool> {
    let user = sv::User::new(self.db).require(user_id).await?;
    Ok(!user.trial_used)
  }

  pub async fn grant(
    &self,
    user_id: i64,
    course_id: i64,
    resource: ResourceType,
  ) -> Result<trial_grant::Model> {
    self.grant_at(user_id, course_id, resource, now()).await
  }

  /// Issues the trial and consumes eligibility in one transaction. The first
  /// statement is the conditional `trial_used` flip, so the write lock is
  /// held from the start: concurrent callers queue behind it and then see
  /// zero affected rows, which is `NotEligible`.
  ///
  /// Also upserts a `demo` enrollment for the course, which the resolver
  /// honours for every resource type and without an expiry.
  pub async fn grant_at(
    &self,
    user_id: i64,
    course_id: i64,
    resource: ResourceType,
    now: DateTime,
  ) -> Result<trial_grant::Model> {
    let txn = self.db.begin().await?;

    let consumed = user::Entity::update_many()
      .col_expr(user::Column::TrialUsed, Expr::value(true))
      .filter(user::Column::Id.eq(user_id))
      .filter(user::Column::TrialUsed.eq(false))
      .exec(&txn)
      .await?;

    if consumed.rows_affected == 0 {
      user::Entity::find_by_id(user_id)
        .one(&txn)
        .await?
        .ok_or(Error::UserNotFound)?;
      return Err(Trial::NotEligible.into());
    }

    course::Entity::find_by_id(course_id)
      .one(&txn)
      .await?
      .ok_or(Error::CourseNotFound)?;

    if valid_in(&txn, user_id, course_id, resource, now).await?.is_some() {
      return Err(Trial::DuplicatePending.into());
    }

    let grant = trial_grant::ActiveModel {
      user_id: Set(user_id),
      course_id: Set(course_id),
      resource_type: Set(resource),
      used_at: Set(now),
      expires_at: Set(now + TimeDelta::hours(TRIAL_HOURS)),
      ..Default::default()
    }
    .insert(&txn)
    .await?;

    sv::Enrollment::new(&txn).upsert_demo(user_id, course_id).await?;

    txn.commit().await?;

    info!(
      "trial #{} issued: user={user_id} course={course_id} resource={resource} until {}",
      grant.id, grant.expires_at
    );

    Ok(grant)
  }

  pub async fn valid_grant(
    &self,
    user_id: i64,
    course_id: i64,
    resource: ResourceType,
    now: DateTime,
  ) -> Result<Option<trial_grant::Model>> {
    valid_in(self.db, user_id, course_id, resource, now).await
  }

  /// Whether the user holds an expired grant anywhere in the course.
  pub async fn has_lapsed(
    &self,
    user_id: i64,
    course_id: i64,
    now: DateTime,
  ) -> Result<bool> {
    let lapsed = trial_grant::Entity::find()
      .filter(trial_grant::Column::UserId.eq(user_id))
      .filter(trial_grant::Column::CourseId.eq(course_id))
      .filter(trial_grant::Column::ExpiresAt.lte(now))
      .one(self.db)
      .await?;

    Ok(lapsed.is_some())
  }

  pub async fn by_user(&self, user_id: i64) -> Result<Vec<trial_grant::Model>> {
    Ok(
      trial_grant::Entity::find()
        .filter(trial_grant::Column::UserId.eq(user_id))
        .order_by_desc(trial_grant::Column::UsedAt)
        .all(self.db)
        .await?,
    )
  }

  /// Administrative hard delete. Eligibility is not refunded.
  pub async fn revoke(&self, grant_id: i64) -> Result<()> {
    let result =
      trial_grant::Entity::delete_by_id(grant_id).exec(self.db).await?;

    if result.rows_affected == 0 {
      return Err(Error::GrantNotFound);
    }

    info!("trial #{grant_id} revoked");
    Ok(())
  }
}

async fn valid_in<C: ConnectionTrait>(
  db: &C,
  user_id: i64,
  course_id: i64,
  resource: ResourceType,
  now: DateTime,
) -> Result<Option<trial_grant::Model>> {
  Ok(
    trial_grant::Entity::find()
      .filter(trial_grant::Column::UserId.eq(user_id))
      .filter(trial_grant::Column::CourseId.eq(course_id))
      .filter(trial_grant::Column::ResourceType.eq(resource))
      .filter(trial_grant::Column::ExpiresAt.gt(now))
      .order_by_desc(trial_grant::Column::ExpiresAt)
      .one(db)
      .await?,
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    entity::{EnrollmentType, trial_grant},
    sv::test_utils::test_db,
  };

  #[tokio::test]
  async fn test_grant_consumes_eligibility() {
    let db = test_db::setup().await;
    test_db::student(&db, 1).await;
    let course = test_db::course(&db, "Chemistry").await;
    let sv = TrialGrant::new(&db);

    assert!(sv.is_eligible(1).await.unwrap());

    let t = now();
    let grant = sv
      .grant_at(1, course.id, ResourceType::LectureRecording, t)
      .await
      .unwrap();

    assert_eq!(grant.expires_at, t + TimeDelta::hours(24));
    assert_eq!(grant.used_at, t);
    assert!(!sv.is_eligible(1).await.unwrap());
  }

  #[tokio::test]
  async fn test_single_lifetime_trial() {
    let db = test_db::setup().await;
    test_db::student(&db, 1).await;
    let algebra = test_db::course(&db, "Algebra").await;
    let biology = test_db::course(&db, "Biology").await;
    let sv = TrialGrant::new(&db);

    sv.grant(1, algebra.id, ResourceType::LectureRecording).await.unwrap();

    for (course, resource) in [
      (algebra.id, ResourceType::LectureRecording),
      (algebra.id, ResourceType::LiveClass),
      (biology.id, ResourceType::LectureRecording),
      (biology.id, ResourceType::LiveClass),
    ] {
      assert!(matches!(
        sv.grant(1, course, resource).await,
        Err(Error::Trial(Trial::NotEligible))
      ));
    }

    assert_eq!(sv.by_user(1).await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn test_duplicate_pending() {
    let db = test_db::setup().await;
    test_db::student(&db, 1).await;
    let course = test_db::course(&db, "Algebra").await;
    let sv = TrialGrant::new(&db);

    // a grant row whose owner still looks eligible, e.g. restored from backup
    let t = now();
    trial_grant::ActiveModel {
      user_id: Set(1),
      course_id: Set(course.id),
      resource_type: Set(ResourceType::LiveClass),
      used_at: Set(t),
      expires_at: Set(t + TimeDelta::hours(TRIAL_HOURS)),
      ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    assert!(matches!(
      sv.grant(1, course.id, ResourceType::LiveClass).await,
      Err(Error::Trial(Trial::DuplicatePending))
    ));
    // failed attempt leaves the flag alone
    assert!(sv.is_eligible(1).await.unwrap());
  }

  #[tokio::test]
  async fn test_grant_creates_demo_enrollment() {
    let db = test_db::setup().await;
    test_db::student(&db, 1).await;
    let course = test_db::course(&db, "Algebra").await;

    TrialGrant::new(&db)
      .grant(1, course.id, ResourceType::LiveClass)
      .await
      .unwrap();

    let row =
      sv::Enrollment::new(&db).get(1, course.id).await.unwrap().unwrap();
    assert_eq!(row.enrollment_type, EnrollmentType::Demo);
  }

  #[tokio::test]
  async fn test_grant_expiry() {
    let db = test_db::setup().await;
    test_db::student(&db, 1).await;
    let course = test_db::course(&db, "Algebra").await;
    let sv = TrialGrant::new(&db);
    let resource = ResourceType::LectureRecording;

    let t = now() - TimeDelta::hours(25);
    sv.grant_at(1, course.id, resource, t).await.unwrap();

    assert!(
      sv.valid_grant(1, course.id, resource, t + TimeDelta::hours(1))
        .await
        .unwrap()
        .is_some()
    );
    let valid = sv.valid_grant(1, course.id, resource, now()).await.unwrap();
    assert!(valid.is_none());
    // expiry is exclusive
    assert!(
      sv.valid_grant(1, course.id, resource, t + TimeDelta::hours(24))
        .await
        .unwrap()
        .is_none()
    );
    assert!(sv.has_lapsed(1, course.id, now()).await.unwrap());
  }

  #[tokio::test]
  async fn test_revoke_keeps_flag() {
    let db = test_db::setup().await;
    test_db::student(&db, 1).await;
    let course = test_db::course(&db, "Algebra").await;
    let sv = TrialGrant::new(&db);

    let grant =
      sv.grant(1, course.id, ResourceType::LiveClass).await.unwrap();
    sv.revoke(grant.id).await.unwrap();

    assert!(sv.by_user(1).await.unwrap().is_empty());
    assert!(!sv.is_eligible(1).await.unwrap());
    assert!(matches!(sv.revoke(grant.id).await, Err(Error::GrantNotFound)));
  }

  #[tokio::test]
  async fn test_unknown_user() {
    let db = test_db::setup().await;
    let course = test_db::course(&db, "Algebra").await;

    assert!(matches!(
      TrialGrant::new(&db).grant(7, course.id, ResourceType::LiveClass).await,
      Err(Error::UserNotFound)
    ));
  }

  #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
  async fn test_concurrent_grants_issue_one_trial() {
    let dir = tempfile::tempdir().unwrap();
    let db = test_db::setup_file(dir.path(), 8).await;
    test_db::student(&db, 1).await;

    let mut courses = Vec::new();
    for i in 0..8 {
      courses.push(test_db::course(&db, &format!("Course {i}")).await.id);
    }

    let handles: Vec<_> = courses
      .into_iter()
      .map(|course_id| {
        let db = db.clone();
        tokio::spawn(async move {
          TrialGrant::new(&db)
            .grant(1, course_id, ResourceType::LiveClass)
            .await
        })
      })
      .collect();

    let mut granted = 0;
    for handle in handles {
      match handle.await.unwrap() {
        Ok(_) => granted += 1,
        Err(Error::Trial(Trial::NotEligible)) => {}
        Err(err) => panic!("racing grant failed with {err}"),
      }
    }

    assert_eq!(granted, 1);
    assert_eq!(trial_grant::Entity::find().all(&db).await.unwrap().len(), 1);
    assert!(!TrialGrant::new(&db).is_eligible(1).await.unwrap());
  }

  #[tokio::test]
  async fn test_unknown_course() {
    let db = test_db::setup().await;
    test_db::student(&db, 1).await;
    let sv = TrialGrant::new(&db);

    assert!(matches!(
      sv.grant(1, 999, ResourceType::LiveClass).await,
      Err(Error::CourseNotFound)
    ));
    assert!(sv.is_eligible(1).await.unwrap());
  }
}
