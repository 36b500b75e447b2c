use serde::{Deserialize, Serialize};

use crate::{
  entity::{EnrollmentType, enrollment, subscription},
  prelude::*,
  sv,
};

/// An approved payment, as reported by the billing side.
#[derive(Debug, Clone, Deserialize)]
pub struct Approval {
  pub user_id: i64,
  pub course_id: i64,
  /// Absent for a one-off course purchase.
  pub plan_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct Approved {
  pub enrollment: enrollment::Model,
  pub subscription: Option<subscription::Model>,
}

pub struct Payment<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Payment<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// Turns an approved payment into a subscription (if a plan was bought)
  /// and a `paid` enrollment. A trial user's `demo` row is promoted; an
  /// existing `paid` row is a [`Error::Conflict`] and nothing is written.
  pub async fn approve(&self, approval: Approval) -> Result<Approved> {
    let Approval { user_id, course_id, plan_id } = approval;
    let txn = self.db.begin().await?;

    sv::User::new(&txn).require(user_id).await?;
    sv::Course::new(&txn).require(course_id).await?;

    let ledger = sv::Enrollment::new(&txn);
    let existing = ledger.get(user_id, course_id).await?;
    let paid =
      |row: &enrollment::Model| row.enrollment_type == EnrollmentType::Paid;
    if existing.as_ref().is_some_and(paid) {
      warn!(
        "payment approved twice: user={user_id} course={course_id} plan={plan_id:?}"
      );
      return Err(Error::Conflict);
    }

    let subscription = match plan_id {
      Some(plan_id) => Some(
        sv::Subscription::new(&txn)
          .purchase(user_id, course_id, plan_id, now())
          .await?,
      ),
      None => None,
    };
    let subscription_id = subscription.as_ref().map(|sub| sub.id);

    let enrollment = match existing {
      Some(_) => ledger.promote(user_id, course_id, subscription_id).await?,
      None => ledger.create_paid(user_id, course_id, subscription_id).await?,
    };

    txn.commit().await?;

    info!("payment approved: user={user_id} course={course_id}");
    Ok(Approved { enrollment, subscription })
  }
}
