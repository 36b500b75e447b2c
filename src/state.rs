use crate::{config::Config, prelude::*, sv};

pub struct AppState {
  pub db: DatabaseConnection,
  pub config: Config,
}

impl AppState {
  pub async fn new(config: Config) -> Result<Self> {
    let db = Database::connect(config.database_url.as_str()).await?;
    migration::Migrator::up(&db, None).await?;

    Ok(Self { db, config })
  }

  pub fn sv(&self) -> Services<'_> {
    Services::new(&self.db)
  }
}

pub struct Services<'a> {
  pub user: sv::User<'a>,
  pub course: sv::Course<'a>,
  pub enrollment: sv::Enrollment<'a>,
  pub plan: sv::Plan<'a>,
  pub subscription: sv::Subscription<'a>,
  pub trial: sv::TrialGrant<'a>,
  pub entitlement: sv::Entitlement<'a>,
  pub recording: sv::Recording<'a>,
  pub live_class: sv::LiveClass<'a>,
  pub preview: sv::Preview<'a>,
  pub payment: sv::Payment<'a>,
}

impl<'a> Services<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self {
      user: sv::User::new(db),
      course: sv::Course::new(db),
      enrollment: sv::Enrollment::new(db),
      plan: sv::Plan::new(db),
      subscription: sv::Subscription::new(db),
      trial: sv::TrialGrant::new(db),
      entitlement: sv::Entitlement::new(db),
      recording: sv::Recording::new(db),
      live_class: sv::LiveClass::new(db),
      preview: sv::Preview::new(db),
      payment: sv::Payment::new(db),
    }
  }
}
