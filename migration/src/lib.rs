pub use sea_orm_migration::prelude::*;

mod m20261001_000001_create_users;
mod m20261001_000002_create_courses;
mod m20261001_000003_create_subscription_plans;
mod m20261001_000004_create_subscriptions;
mod m20261001_000005_create_enrollments;
mod m20261001_000006_create_trial_grants;
mod m20261001_000007_create_course_content;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
  fn migrations() -> Vec<Box<dyn MigrationTrait>> {
    vec![
      Box::new(m20261001_000001_create_users::Migration),
      Box::new(m20261001_000002_create_courses::Migration),
      Box::new(m20261001_000003_create_subscription_plans::Migration),
      Box::new(m20261001_000004_create_subscriptions::Migration),
      Box::new(m20261001_000005_create_enrollments::Migration),
      Box::new(m20261001_000006_create_trial_grants::Migration),
      Box::new(m20261001_000007_create_course_content::Migration),
    ]
  }
}
