use chrono::Months;
use serde::Deserialize;

use crate::{
  entity::{PlanType, plan},
  prelude::*,
};

/// Catalog entry as submitted by an administrator.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPlan {
  pub name: String,
  pub plan_type: PlanType,
  #[serde(default)]
  pub price: i64,
  pub duration_months: Option<i32>,
  pub cutoff_at: Option<DateTime>,
}

impl NewPlan {
  fn validate(&self) -> Result<()> {
    if self.name.trim().is_empty() {
      return Err(Error::InvalidArgs("Plan name is required".into()));
    }
    if self.price < 0 {
      return Err(Error::InvalidArgs("Plan price must not be negative".into()));
    }

    match (self.duration_months, self.cutoff_at) {
      (Some(months), None) if months > 0 => Ok(()),
      (Some(_), None) => {
        Err(Error::InvalidArgs("Plan duration must be positive".into()))
      }
      (None, Some(_)) => Ok(()),
      _ => Err(Error::InvalidArgs(
        "Plan needs exactly one of duration_months or cutoff_at".into(),
      )),
    }
  }
}

/// When a subscription to `plan` bought at `now` stops covering.
pub fn expiry(plan: &plan::Model, now: DateTime) -> Result<DateTime> {
  match (plan.duration_months, plan.cutoff_at) {
    (Some(months), _) => u32::try_from(months)
      .ok()
      .and_then(|months| now.checked_add_months(Months::new(months)))
      .ok_or_else(|| Error::InvalidArgs("Plan duration out of range".into())),
    (None, Some(cutoff)) if cutoff > now => Ok(cutoff),
    (None, Some(_)) => {
      Err(Error::InvalidArgs("Plan cutoff date has already passed".into()))
    }
    (None, None) => {
      Err(Error::InvalidArgs("Plan has no duration configured".into()))
    }
  }
}

pub struct Plan<'a, C = DatabaseConnection> {
  db: &'a C,
}

impl<'a, C: ConnectionTrait> Plan<'a, C> {
  pub fn new(db: &'a C) -> Self {
    Self { db }
  }

  pub async fn create(&self, new: NewPlan) -> Result<plan::Model> {
    new.validate()?;

    let plan = plan::ActiveModel {
      name: Set(new.name),
      plan_type: Set(new.plan_type),
      price: Set(new.price),
      duration_months: Set(new.duration_months),
      cutoff_at: Set(new.cutoff_at),
      is_active: Set(true),
      created_at: Set(now()),
      ..Default::default()
    };

    Ok(plan.insert(self.db).await?)
  }

  pub async fn by_id(&self, id: i64) -> Result<Option<plan::Model>> {
    Ok(plan::Entity::find_by_id(id).one(self.db).await?)
  }

  pub async fn require(&self, id: i64) -> Result<plan::Model> {
    self.by_id(id).await?.ok_or(Error::PlanNotFound)
  }

  pub async fn active(&self) -> Result<Vec<plan::Model>> {
    Ok(
      plan::Entity::find()
        .filter(plan::Column::IsActive.eq(true))
        .order_by_asc(plan::Column::Price)
        .all(self.db)
        .await?,
    )
  }

  pub async fn set_active(&self, id: i64, active: bool) -> Result<plan::Model> {
    let plan = self.require(id).await?;

    Ok(
      plan::ActiveModel { is_active: Set(active), ..plan.into() }
        .update(self.db)
        .await?,
    )
  }
}
