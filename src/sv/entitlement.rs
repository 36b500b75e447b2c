//! Access decision for a (user, course, resource type) triple.
//!
//! Loading and deciding are split: [`Entitlement::facts`] reads a snapshot
//! of the three ledgers, and [`decide`] runs the precedence rules over it
//! without touching storage.

use serde::Serialize;

use crate::{
  entity::{
    EnrollmentType, PlanType, ResourceType, enrollment, plan, subscription,
    trial_grant,
  },
  prelude::*,
  sv,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Via {
  Subscription,
  Demo,
  None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Detail {
  PaidEnrollment,
  DemoEnrollment,
  Plan { plan_type: PlanType, expires_at: DateTime },
  TrialGrant { expires_at: DateTime },
  /// Denied, but the user can still start their one trial.
  TrialAvailable,
  /// Denied, and a subscription or trial for this course has run out.
  Expired,
  NoAccess,
  /// Storage failed; access is refused rather than guessed.
  Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
  pub granted: bool,
  pub via: Via,
  pub detail: Detail,
}

impl Verdict {
  fn grant(via: Via, detail: Detail) -> Self {
    Self { granted: true, via, detail }
  }

  fn deny(detail: Detail) -> Self {
    Self { granted: false, via: Via::None, detail }
  }
}

/// Read-only snapshot of everything the rules look at.
#[derive(Debug, Clone, Default)]
pub struct Facts {
  pub enrollment: Option<enrollment::Model>,
  pub subscriptions: Vec<(subscription::Model, plan::Model)>,
  pub grant: Option<trial_grant::Model>,
  pub trial_used: bool,
  pub lapsed: bool,
}

type Rule = fn(&Facts, ResourceType, DateTime) -> Option<Verdict>;

/// Evaluated in order; the first rule to answer wins.
const RULES: [Rule; 3] = [by_enrollment, by_subscription, by_trial];

/// Membership short-circuits everything else. A `demo` row unlocks both
/// resource types and is never re-checked against the grant that created
/// it.
fn by_enrollment(
  facts: &Facts,
  _: ResourceType,
  _: DateTime,
) -> Option<Verdict> {
  facts.enrollment.as_ref().map(|row| match row.enrollment_type {
    EnrollmentType::Paid => {
      Verdict::grant(Via::Subscription, Detail::PaidEnrollment)
    }
    EnrollmentType::Demo => Verdict::grant(Via::Demo, Detail::DemoEnrollment),
  })
}

fn by_subscription(
  facts: &Facts,
  resource: ResourceType,
  now: DateTime,
) -> Option<Verdict> {
  facts
    .subscriptions
    .iter()
    .find(|(sub, plan)| sub.is_covering(now) && plan.plan_type.covers(resource))
    .map(|(sub, plan)| {
      Verdict::grant(Via::Subscription, Detail::Plan {
        plan_type: plan.plan_type,
        expires_at: sub.expires_at,
      })
    })
}

fn by_trial(
  facts: &Facts,
  resource: ResourceType,
  now: DateTime,
) -> Option<Verdict> {
  facts
    .grant
    .as_ref()
    .filter(|grant| grant.resource_type == resource && grant.is_valid(now))
    .map(|grant| {
      Verdict::grant(Via::Demo, Detail::TrialGrant {
        expires_at: grant.expires_at,
      })
    })
}

fn denial(facts: &Facts) -> Verdict {
  let detail = if facts.lapsed {
    Detail::Expired
  } else if !facts.trial_used {
    Detail::TrialAvailable
  } else {
    Detail::NoAccess
  };

  Verdict::deny(detail)
}

pub fn decide(facts: &Facts, resource: ResourceType, now: DateTime) -> Verdict {
  RULES
    .iter()
    .find_map(|rule| rule(facts, resource, now))
    .unwrap_or_else(|| denial(facts))
}

pub struct Entitlement<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Entitlement<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn facts(
    &self,
    user_id: i64,
    course_id: i64,
    resource: ResourceType,
    now: DateTime,
  ) -> Result<Facts> {
    let enrollment =
      sv::Enrollment::new(self.db).get(user_id, course_id).await?;
    if enrollment.is_some() {
      return Ok(Facts { enrollment, ..Default::default() });
    }

    let subscriptions = sv::Subscription::new(self.db);
    let trials = sv::TrialGrant::new(self.db);

    let trial_used = sv::User::new(self.db)
      .by_id(user_id)
      .await?
      .is_some_and(|user| user.trial_used);

    Ok(Facts {
      enrollment,
      subscriptions: subscriptions.active_all(user_id, course_id, now).await?,
      grant: trials.valid_grant(user_id, course_id, resource, now).await?,
      trial_used,
      lapsed: subscriptions.has_lapsed(user_id, course_id, now).await?
        || trials.has_lapsed(user_id, course_id, now).await?,
    })
  }

  pub async fn resolve(
    &self,
    user_id: i64,
    course_id: i64,
    resource: ResourceType,
  ) -> Verdict {
    self.resolve_at(user_id, course_id, resource, now()).await
  }

  /// Never fails: a storage error yields a denial.
  pub async fn resolve_at(
    &self,
    user_id: i64,
    course_id: i64,
    resource: ResourceType,
    now: DateTime,
  ) -> Verdict {
    match self.facts(user_id, course_id, resource, now).await {
      Ok(facts) => {
        let verdict = decide(&facts, resource, now);
        debug!(
          "access user={user_id} course={course_id} resource={resource}: {:?} via {:?}",
          verdict.detail, verdict.via
        );
        verdict
      }
      Err(err) => {
        error!(
          "entitlement lookup failed for user={user_id} course={course_id}: {err}"
        );
        Verdict::deny(Detail::Unavailable)
      }
    }
  }
}
