use sea_orm::Condition;

use crate::{
  entity::{SubscriptionStatus, plan, subscription},
  prelude::*,
  sv,
};

/// Ledger of purchased plan instances bound to a user and a course.
pub struct Subscription<'a, C = DatabaseConnection> {
  db: &'a C,
}

impl<'a, C: ConnectionTrait> Subscription<'a, C> {
  pub fn new(db: &'a C) -> Self {
    Self { db }
  }

  /// Starts a subscription on `plan_id` at `now`. Payment is assumed to be
  /// verified by the caller.
  pub async fn purchase(
    &self,
    user_id: i64,
    course_id: i64,
    plan_id: i64,
    now: DateTime,
  ) -> Result<subscription::Model> {
    let plan = sv::Plan::new(self.db).require(plan_id).await?;
    if !plan.is_active {
      return Err(Error::InvalidArgs("Plan is no longer offered".into()));
    }

    let expires_at = sv::plan::expiry(&plan, now)?;

    let subscription = subscription::ActiveModel {
      user_id: Set(user_id),
      course_id: Set(course_id),
      plan_id: Set(plan.id),
      status: Set(SubscriptionStatus::Active),
      starts_at: Set(now),
      expires_at: Set(expires_at),
      created_at: Set(now),
      ..Default::default()
    };

    let subscription = subscription.insert(self.db).await?;
    info!(
      "subscription #{} started: user={user_id} course={course_id} plan={:?} until {}",
      subscription.id, plan.plan_type, expires_at
    );

    Ok(subscription)
  }

  /// Every subscription that currently covers (user, course), latest
  /// expiry first.
  pub async fn active_all(
    &self,
    user_id: i64,
    course_id: i64,
    now: DateTime,
  ) -> Result<Vec<(subscription::Model, plan::Model)>> {
    let rows = subscription::Entity::find()
      .find_also_related(plan::Entity)
      .filter(subscription::Column::UserId.eq(user_id))
      .filter(subscription::Column::CourseId.eq(course_id))
      .filter(subscription::Column::Status.eq(SubscriptionStatus::Active))
      .filter(subscription::Column::ExpiresAt.gt(now))
      .order_by_desc(subscription::Column::ExpiresAt)
      .all(self.db)
      .await?;

    Ok(
      rows
        .into_iter()
        .filter_map(|(sub, plan)| plan.map(|plan| (sub, plan)))
        .collect(),
    )
  }

  pub async fn active(
    &self,
    user_id: i64,
    course_id: i64,
    now: DateTime,
  ) -> Result<Option<(subscription::Model, plan::Model)>> {
    Ok(self.active_all(user_id, course_id, now).await?.into_iter().next())
  }

  /// Whether the user once held a subscription for the course that no
  /// longer covers it.
  pub async fn has_lapsed(
    &self,
    user_id: i64,
    course_id: i64,
    now: DateTime,
  ) -> Result<bool> {
    let lapsed = subscription::Entity::find()
      .filter(subscription::Column::UserId.eq(user_id))
      .filter(subscription::Column::CourseId.eq(course_id))
      .filter(
        Condition::any()
          .add(subscription::Column::ExpiresAt.lte(now))
          .add(subscription::Column::Status.eq(SubscriptionStatus::Expired)),
      )
      .one(self.db)
      .await?;

    Ok(lapsed.is_some())
  }

  pub async fn set_status(
    &self,
    id: i64,
    status: SubscriptionStatus,
  ) -> Result<subscription::Model> {
    let sub = subscription::Entity::find_by_id(id)
      .one(self.db)
      .await?
      .ok_or(Error::SubscriptionNotFound)?;

    Ok(
      subscription::ActiveModel { status: Set(status), ..sub.into() }
        .update(self.db)
        .await?,
    )
  }
}
